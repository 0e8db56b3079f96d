//! Log record domain type shared between `exo-logd` and `exo-engine`
//! (spec §3: "Log record").

use crate::EventId;
use serde::{Deserialize, Serialize};

/// An ingested structured log record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogRecord {
    pub id: EventId,
    pub stream: String,
    pub timestamp: String,
    pub message: String,
}

/// Channel a process/container log stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Out,
    Err,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Out => "out",
            Channel::Err => "err",
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, <Self as std::str::FromStr>::Err> {
        match s {
            "out" => Ok(Channel::Out),
            "err" => Ok(Channel::Err),
            other => Err(format!("unexpected MSGID: {other:?}")),
        }
    }
}

/// Build the stream name `"<component-id>:<channel>"`.
pub fn stream_name(component_id: &str, channel: Channel) -> String {
    format!("{component_id}:{}", channel.as_str())
}
