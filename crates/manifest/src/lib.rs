// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! exo-manifest: parsing for the three manifest formats `apply` accepts
//! (spec §4.6, §6) — the native `exo` HCL format, Docker Compose YAML,
//! and Procfiles — plus the `compose2exo` conversion used by the CLI
//! filter of the same name.

mod compose;
mod convert;
mod error;
mod hcl;
mod procfile;
mod types;

use std::path::Path;

pub use convert::{compose_to_exo, render_hcl};
pub use error::ManifestError;
pub use types::{ComponentSpec, Format, Manifest};

/// Parse manifest text already known to be in `format`.
pub fn parse(format: Format, source: &str) -> Result<Manifest, ManifestError> {
    let manifest = match format {
        Format::Exo => hcl::parse(source),
        Format::Compose => compose::parse(source),
        Format::Procfile => procfile::parse(source),
    }?;
    for warning in &manifest.warnings {
        tracing::warn!(format = format.tag(), %warning, "manifest parse warning");
    }
    Ok(manifest)
}

/// Read and parse a manifest file, inferring its format from the path
/// suffix unless `format` overrides it (spec.md §4.6 step 1).
pub fn parse_file(path: &Path, format: Option<Format>) -> Result<Manifest, ManifestError> {
    let format = match format {
        Some(format) => format,
        None => Format::from_path_suffix(&path.to_string_lossy()).ok_or_else(|| {
            ManifestError::UnknownFormat {
                path: path.display().to_string(),
            }
        })?,
    };
    tracing::debug!(path = %path.display(), format = format.tag(), "loading manifest");
    let source = std::fs::read_to_string(path)?;
    parse(format, &source)
}

#[cfg(test)]
mod lib_tests;
