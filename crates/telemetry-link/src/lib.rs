//! Telemetry Link to the Alert Controller
//!
//! This crate provides the duplex, line-delimited text link to the external
//! microcontroller that drives the blind-spot alert actuator:
//! - outbound: one risk token per line (`HIGH` / `LOW` / `NONE`)
//! - inbound: device status lines (`RISK:<tok>,DISTANCE:<int>,STATUS:<tok>`)
//!
//! The reader never surfaces a line before observing its terminating
//! newline; partial input is buffered across reads. The writer half is the
//! only way bytes leave the process, so holding it behind a lock keeps the
//! channel single-writer.

mod link;
mod mock;
pub mod wire;

pub use link::{open_serial, LinkReader, LinkWriter};
pub use mock::open_mock;
pub use wire::{parse_status_line, ParseError, StatusReport};

use thiserror::Error;

/// Errors on the telemetry link itself.
///
/// These are never recovered locally; the caller decides whether the
/// process keeps running.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("serial port error: {0}")]
    Serial(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("device disconnected")]
    Disconnected,
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Serial(err.to_string())
    }
}
