//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use marq_ir::Circuit;
use marq_stim::parse;
use serde::de::DeserializeOwned;

/// Read a text file, with the path in the error.
pub fn read_text(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Load a circuit from full or compact circuit text.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let source = read_text(path)?;
    parse(&source).with_context(|| format!("Failed to parse circuit: {path}"))
}

/// Load a JSON document, or YAML for `.yaml` / `.yml` files.
pub fn load_document<T: DeserializeOwned>(path: &str) -> Result<T> {
    let source = read_text(path)?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Failed to read YAML document: {path}")),
        _ => serde_json::from_str(&source)
            .with_context(|| format!("Failed to read JSON document: {path}")),
    }
}
