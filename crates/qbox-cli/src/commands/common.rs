//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use qbox_compile::BoxingConfig;
use qbox_ir::Circuit;

/// Load a circuit from a JSON file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse circuit: {}", path.display()))
}

/// Save a circuit as pretty-printed JSON.
pub fn save_circuit(circuit: &Circuit, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(circuit).context("Failed to serialize circuit")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Load a boxing configuration from a YAML or JSON file.
pub fn load_config(path: &Path) -> Result<BoxingConfig> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source).map_err(anyhow::Error::from),
        _ => serde_yaml_ng::from_str(&source).map_err(anyhow::Error::from),
    };
    config.with_context(|| format!("Invalid config: {}", path.display()))
}

/// `dir/stem.json` -> `dir/stem_<suffix>.json`
pub fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}_{suffix}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbox_compile::{BarrierPolicy, InjectNoiseTargets};

    #[test]
    fn test_derived_path() {
        assert_eq!(
            derived_path(Path::new("data/bell.json"), "boxed"),
            PathBuf::from("data/bell_boxed.json")
        );
        assert_eq!(
            derived_path(Path::new("ghz"), "flat"),
            PathBuf::from("ghz_flat.json")
        );
    }

    #[test]
    fn test_load_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxing.yaml");
        fs::write(
            &path,
            "inject_noise_targets: gates\nremove_barriers: finally\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.inject_noise_targets, InjectNoiseTargets::Gates);
        assert_eq!(config.remove_barriers, BarrierPolicy::Finally);
        assert!(config.enable_measures);
    }

    #[test]
    fn test_load_config_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxing.json");
        fs::write(&path, r#"{"enable_gate": false}"#).unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config"));
    }

    #[test]
    fn test_circuit_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.json");
        let circuit = Circuit::bell().unwrap();

        save_circuit(&circuit, &path).unwrap();
        assert_eq!(load_circuit(&path).unwrap(), circuit);
    }

    #[test]
    fn test_missing_circuit_file() {
        let err = load_circuit(Path::new("/nonexistent/circuit.json")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
