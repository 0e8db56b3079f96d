//! Log-group / stream expansion (spec §4.4): each process-like component
//! acts as a log group combining its `:out` and `:err` streams; bare log
//! components (not yet modeled as a controller) are referenced directly
//! by stream name.

use exo_core::{Channel, ComponentRecord};

pub struct LogGroup {
    pub name: String,
    pub streams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogDescription {
    pub name: String,
    pub last_event_at: Option<String>,
}

/// One log group per component, combining its out/err streams.
pub fn describe_logs(components: &[ComponentRecord]) -> Vec<LogGroup> {
    components
        .iter()
        .map(|c| LogGroup {
            name: c.id.as_str().to_string(),
            streams: vec![
                exo_core::stream_name(c.id.as_str(), Channel::Out),
                exo_core::stream_name(c.id.as_str(), Channel::Err),
            ],
        })
        .collect()
}

/// Expand each named group into the streams `GetEvents` should query: the
/// bare name itself (a directly-named log stream), plus `:out`/`:err`.
pub fn expand_groups(groups: &[String]) -> Vec<String> {
    let mut streams = Vec::with_capacity(groups.len() * 3);
    for group in groups {
        streams.push(group.clone());
        streams.push(format!("{group}:out"));
        streams.push(format!("{group}:err"));
    }
    streams
}

#[cfg(test)]
#[path = "log_groups_tests.rs"]
mod tests;
