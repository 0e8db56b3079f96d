//! Minimal RFC 5424 structured syslog parser for the log-ingest datagram
//! path (spec §4.4).
//!
//! Only the fields the collector cares about are extracted: APP-NAME,
//! MSGID, TIMESTAMP and MSG. HOSTNAME, PROCID and STRUCTURED-DATA are
//! read past but not retained.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed syslog header")]
    Malformed,
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("unexpected MSGID: {0:?}")]
    UnexpectedMsgId(String),
}

/// The fields of a syslog record the collector persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub app_name: String,
    pub msg_id: String,
    pub timestamp: String,
    pub message: String,
}

impl Record {
    /// `"<APP-NAME>:<MSGID>"`, the stream an event is appended under.
    pub fn stream(&self) -> String {
        format!("{}:{}", self.app_name, self.msg_id)
    }
}

/// Parse a single RFC 5424 datagram.
///
/// Format: `<PRI>VERSION SP TIMESTAMP SP HOSTNAME SP APP-NAME SP PROCID SP
/// MSGID SP STRUCTURED-DATA SP MSG`. A nil field is written as `-`.
pub fn parse(packet: &[u8]) -> Result<Record, ParseError> {
    let text = std::str::from_utf8(packet).map_err(|_| ParseError::Malformed)?;

    let mut fields = text.splitn(8, ' ');
    let _pri_version = fields.next().ok_or(ParseError::Malformed)?;
    let timestamp = fields.next().ok_or(ParseError::MissingField("TIMESTAMP"))?;
    let _hostname = fields.next().ok_or(ParseError::MissingField("HOSTNAME"))?;
    let app_name = fields.next().ok_or(ParseError::MissingField("APP-NAME"))?;
    let _procid = fields.next().ok_or(ParseError::MissingField("PROCID"))?;
    let msg_id = fields.next().ok_or(ParseError::MissingField("MSGID"))?;
    let _structured_data = fields.next().ok_or(ParseError::MissingField("STRUCTURED-DATA"))?;
    let message = fields.next().ok_or(ParseError::MissingField("MSG"))?;

    if app_name == "-" {
        return Err(ParseError::MissingField("APP-NAME"));
    }
    if timestamp == "-" {
        return Err(ParseError::MissingField("TIMESTAMP"));
    }
    if message.is_empty() {
        return Err(ParseError::MissingField("MSG"));
    }
    match msg_id {
        "out" | "err" => {}
        other => return Err(ParseError::UnexpectedMsgId(other.to_string())),
    }

    Ok(Record {
        app_name: app_name.to_string(),
        msg_id: msg_id.to_string(),
        timestamp: timestamp.to_string(),
        message: message.to_string(),
    })
}

#[cfg(test)]
#[path = "rfc5424_tests.rs"]
mod tests;
