//! The native `exo` format: HCL with one block per component type, each
//! block labeled with the component name.
//!
//! ```hcl
//! process "web" {
//!   command = "node"
//!   args    = ["server.js"]
//!   env     = { PORT = "44222" }
//! }
//!
//! container "cache" {
//!   image      = "redis:7"
//!   depends_on = ["web"]
//! }
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ManifestError;
use crate::types::Manifest;

#[derive(Debug, Default, Deserialize)]
struct HclManifest {
    #[serde(default)]
    process: HashMap<String, ProcessBlock>,
    #[serde(default)]
    container: HashMap<String, ContainerBlock>,
    #[serde(default)]
    network: HashMap<String, NetworkBlock>,
    #[serde(default)]
    volume: HashMap<String, VolumeBlock>,
}

#[derive(Debug, Deserialize)]
struct ProcessBlock {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: HashMap<String, String>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ContainerBlock {
    image: String,
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NetworkBlock {
    #[serde(default)]
    depends_on: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeBlock {
    #[serde(default)]
    depends_on: Vec<String>,
}

pub fn parse(source: &str) -> Result<Manifest, ManifestError> {
    let parsed: HclManifest = hcl::from_str(source)?;
    let mut manifest = Manifest::new();
    for (name, block) in parsed.process {
        let spec = serde_json::json!({
            "command": block.command,
            "args": block.args,
            "env": block.env,
            "cwd": block.cwd,
            "depends_on": block.depends_on,
        })
        .to_string();
        manifest.insert(name, "process", spec);
    }
    for (name, block) in parsed.container {
        let spec = serde_json::json!({
            "image": block.image,
            "depends_on": block.depends_on,
        })
        .to_string();
        manifest.insert(name, "container", spec);
    }
    for (name, block) in parsed.network {
        let spec = serde_json::json!({ "depends_on": block.depends_on }).to_string();
        manifest.insert(name, "network", spec);
    }
    for (name, block) in parsed.volume {
        let spec = serde_json::json!({ "depends_on": block.depends_on }).to_string();
        manifest.insert(name, "volume", spec);
    }
    Ok(manifest)
}

#[cfg(test)]
#[path = "hcl_tests.rs"]
mod tests;
