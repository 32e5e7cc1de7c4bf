//! Wire grammar for both directions of the link

use risk_eval::RiskLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix identifying an inbound status line
const STATUS_PREFIX: &str = "RISK:";

/// Malformed inbound line.
///
/// Recovered locally by the caller: the line is discarded with a warning
/// and the next line is read.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed status line: {0}")]
    Malformed(&'static str),

    #[error("invalid distance field: {0:?}")]
    InvalidDistance(String),
}

/// One parsed status line from the device.
///
/// `risk` is the device's own reported token, independent of the locally
/// computed risk level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub risk: String,
    pub distance_cm: u32,
    pub status: String,
}

/// Encode the outbound heartbeat line for a risk level
pub fn encode_risk(level: RiskLevel) -> String {
    format!("{}\n", level.as_wire_token())
}

/// Parse one inbound line.
///
/// Grammar: `RISK:<token>,DISTANCE:<integer>,STATUS:<token>`, fields
/// comma-separated, tokens non-empty and comma-free, distance a
/// non-negative base-10 integer. Lines without the `RISK:` prefix are not
/// status lines and yield `Ok(None)`.
pub fn parse_status_line(line: &str) -> Result<Option<StatusReport>, ParseError> {
    let line = line.trim();
    if !line.starts_with(STATUS_PREFIX) {
        return Ok(None);
    }

    let mut fields = line.split(',');
    let risk = field_value(fields.next(), "RISK")?;
    let distance = field_value(fields.next(), "DISTANCE")?;
    let status = field_value(fields.next(), "STATUS")?;
    if fields.next().is_some() {
        return Err(ParseError::Malformed("trailing fields"));
    }

    // The device may emit garbage here; validate rather than trust.
    let distance: i64 = distance
        .parse()
        .map_err(|_| ParseError::InvalidDistance(distance.to_string()))?;
    let distance_cm =
        u32::try_from(distance).map_err(|_| ParseError::InvalidDistance(distance.to_string()))?;

    Ok(Some(StatusReport {
        risk: risk.to_string(),
        distance_cm,
        status: status.to_string(),
    }))
}

fn field_value<'a>(field: Option<&'a str>, tag: &'static str) -> Result<&'a str, ParseError> {
    let field = field.ok_or(ParseError::Malformed("missing field"))?;
    let value = field
        .strip_prefix(tag)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or(ParseError::Malformed("bad field tag"))?;
    if value.is_empty() {
        return Err(ParseError::Malformed("empty token"));
    }
    Ok(value)
}
