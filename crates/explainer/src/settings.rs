use crate::prelude::{eprintln, *};
use explainer_core::config::{parse_config, resolve_settings, PartialSettings, Settings};
use std::path::{Path, PathBuf};

/// `<config_dir>/explainer/config.toml`, e.g. `~/.config/explainer/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("explainer").join("config.toml"))
}

/// Resolve the process-wide settings from flags, the config file and defaults.
///
/// An explicit `--config` path must exist. The default path is optional.
pub fn load(global: &crate::Global) -> Result<Settings> {
    let file = match &global.config {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => PartialSettings::default(),
        },
    };

    let settings = resolve_settings(&cli_layer(global), &file).map_err(|e| eyre!("{e}"))?;

    if global.verbose {
        eprintln!("Ollama URL: {}", settings.ollama_url);
        eprintln!("Model: {}", settings.model);
        eprintln!("Temperature: {}", settings.temperature);
        eprintln!("Timeout: {}s", settings.timeout.as_secs());
    }

    Ok(settings)
}

pub fn read_config(path: &Path) -> Result<PartialSettings> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre!("Failed to read config file '{}': {}", path.display(), e))?;

    parse_config(&text).map_err(|e| eyre!("{} ({})", e, path.display()))
}

fn cli_layer(global: &crate::Global) -> PartialSettings {
    PartialSettings {
        ollama_url: global.ollama_url.clone(),
        model: global.model.clone(),
        temperature: global.temperature,
        timeout_secs: global.timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_config() {
        let file = config_file("model = \"codellama:7b\"\ntimeout_secs = 45\n");
        let parsed = read_config(file.path()).unwrap();
        assert_eq!(parsed.model.as_deref(), Some("codellama:7b"));
        assert_eq!(parsed.timeout_secs, Some(45));
    }

    #[test]
    fn test_read_config_reports_path_on_parse_error() {
        let file = config_file("temperature = \"hot\"");
        let err = read_config(file.path()).unwrap_err().to_string();
        assert!(err.contains("Invalid config file"));
        assert!(err.contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let global = crate::Global {
            config: Some(dir.path().join("missing.toml")),
            ..Default::default()
        };
        assert!(load(&global).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = config_file("model = \"codellama:7b\"\ntemperature = 0.1\n");
        let global = crate::Global {
            config: Some(file.path().to_path_buf()),
            model: Some("llama3:70b".to_string()),
            ..Default::default()
        };

        let settings = load(&global).unwrap();
        assert_eq!(settings.model, "llama3:70b");
        assert_eq!(settings.temperature, 0.1);
    }
}
