//! Procfile format: one `name: command` declaration per line. Each line
//! becomes a `process` component whose spec runs the command line through
//! `sh -c`, matching how Procfile runners in the wild invoke entries (the
//! line is free-form shell, not a pre-tokenized argv).

use crate::error::ManifestError;
use crate::types::Manifest;

/// Parse a Procfile. Blank lines and lines starting with `#` are skipped;
/// any other line must be of the form `name: command`.
pub fn parse(source: &str) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::new();
    for (idx, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, command)) = line.split_once(':') else {
            return Err(ManifestError::Procfile {
                line: idx + 1,
                message: format!("expected \"name: command\", got {raw_line:?}"),
            });
        };
        let name = name.trim();
        let command = command.trim();
        if name.is_empty() {
            return Err(ManifestError::Procfile {
                line: idx + 1,
                message: "empty process name".to_string(),
            });
        }
        if command.is_empty() {
            manifest.push_warning(format!("process {name:?} has an empty command, skipping"));
            continue;
        }
        let spec = serde_json::json!({
            "command": "sh",
            "args": ["-c", command],
        })
        .to_string();
        manifest.insert(name.to_string(), "process", spec);
    }
    Ok(manifest)
}

#[cfg(test)]
#[path = "procfile_tests.rs"]
mod tests;
