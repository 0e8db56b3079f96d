//! `compose2exo`: render a format-neutral [`Manifest`] back out as `exo`
//! HCL text, the shape [`crate::hcl::parse`] reads. Used by the `compose
//! YAML in, exo manifest out` CLI filter (spec.md §6).

use std::fmt::Write as _;

use serde_json::Value;

use crate::error::ManifestError;
use crate::types::Manifest;

fn hcl_string(s: &str) -> String {
    format!("{:?}", s)
}

fn hcl_string_list(values: &[Value]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| hcl_string(v.as_str().unwrap_or_default()))
        .collect();
    format!("[{}]", items.join(", "))
}

fn hcl_env_map(value: &Value) -> String {
    let Some(map) = value.as_object() else {
        return "{}".to_string();
    };
    if map.is_empty() {
        return "{}".to_string();
    }
    let mut out = String::from("{\n");
    for (key, v) in map {
        let _ = writeln!(out, "    {key} = {}", hcl_string(v.as_str().unwrap_or_default()));
    }
    out.push('}');
    out
}

/// Render the manifest's components as `exo` HCL blocks. Component types
/// with no corresponding block shape (anything outside process/container/
/// network/volume) are skipped with a warning rather than failing the
/// whole conversion.
pub fn render_hcl(manifest: &Manifest) -> Result<String, ManifestError> {
    let mut out = String::new();
    for (name, component) in &manifest.components {
        let spec: Value = serde_json::from_str(&component.spec)?;
        match component.type_.as_str() {
            "process" => {
                let command = spec.get("command").and_then(Value::as_str).unwrap_or("");
                let args = spec
                    .get("args")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let env = spec.get("env").cloned().unwrap_or(Value::Null);
                let depends_on = spec
                    .get("depends_on")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let _ = writeln!(out, "process {} {{", hcl_string(name));
                let _ = writeln!(out, "  command = {}", hcl_string(command));
                if !args.is_empty() {
                    let _ = writeln!(out, "  args    = {}", hcl_string_list(&args));
                }
                if env.as_object().is_some_and(|m| !m.is_empty()) {
                    let _ = writeln!(out, "  env     = {}", hcl_env_map(&env));
                }
                if !depends_on.is_empty() {
                    let _ = writeln!(out, "  depends_on = {}", hcl_string_list(&depends_on));
                }
                let _ = writeln!(out, "}}\n");
            }
            "container" => {
                let image = spec.get("image").and_then(Value::as_str).unwrap_or("");
                let depends_on = spec
                    .get("depends_on")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let _ = writeln!(out, "container {} {{", hcl_string(name));
                let _ = writeln!(out, "  image = {}", hcl_string(image));
                if !depends_on.is_empty() {
                    let _ = writeln!(out, "  depends_on = {}", hcl_string_list(&depends_on));
                }
                let _ = writeln!(out, "}}\n");
            }
            other => {
                let _ = writeln!(out, "# skipped component {name:?} of unsupported type {other:?}\n");
            }
        }
    }
    Ok(out)
}

/// Read a Compose YAML document and write the equivalent `exo` manifest.
pub fn compose_to_exo(compose_yaml: &str) -> Result<String, ManifestError> {
    let manifest = crate::compose::parse(compose_yaml)?;
    render_hcl(&manifest)
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
