//! In-memory mock device for hardware-free operation

use crate::link::{LinkReader, LinkWriter};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Distance sweep bounds for the simulated ranger (cm)
const DISTANCE_MAX_CM: u32 = 140;
const DISTANCE_MIN_CM: u32 = 20;
const DISTANCE_STEP_CM: u32 = 5;

/// Open a link backed by a simulated alert controller instead of hardware.
///
/// The simulated device behaves like the real firmware's happy path: for
/// every heartbeat it receives it answers with one status line echoing the
/// risk token, a sweeping distance reading, and `STATUS:OK`. It stops when
/// either side of the link goes away.
pub fn open_mock() -> (LinkReader, LinkWriter) {
    info!("opening mock telemetry link (no hardware)");

    let (host_side, device_side) = tokio::io::duplex(1024);
    let (device_rx, device_tx) = tokio::io::split(device_side);
    tokio::spawn(run_mock_device(LinkReader::new(device_rx), device_tx));

    let (host_rx, host_tx) = tokio::io::split(host_side);
    (LinkReader::new(host_rx), LinkWriter::new(host_tx))
}

async fn run_mock_device(
    mut inbound: LinkReader,
    mut outbound: impl AsyncWrite + Unpin,
) {
    let mut distance_cm = DISTANCE_MAX_CM;

    loop {
        let heartbeat = match inbound.read_line(Duration::from_millis(500)).await {
            Ok(Some(line)) => line,
            Ok(None) => continue,
            Err(_) => break,
        };

        distance_cm = if distance_cm <= DISTANCE_MIN_CM {
            DISTANCE_MAX_CM
        } else {
            distance_cm - DISTANCE_STEP_CM
        };

        let reply = format!("RISK:{heartbeat},DISTANCE:{distance_cm},STATUS:OK\n");
        if outbound.write_all(reply.as_bytes()).await.is_err() {
            break;
        }
    }

    debug!("mock device stopped");
}
