//! Engine configuration loading for the CLI.

use sp_engine::{Bounds, ClipMode, ConfigError, EngineConfig};
use std::path::{Path, PathBuf};

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Property error: {0}")]
    Property(#[from] sp_engine::PropertyError),

    #[error("Invalid sweep: {0}")]
    Sweep(String),
}

/// Command-line overrides applied on top of the file configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub strict: bool,
    pub p_min: Option<f64>,
    pub p_max: Option<f64>,
}

pub fn parse_yaml(content: &str) -> CliResult<EngineConfig> {
    let config: EngineConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_yaml(path: &Path) -> CliResult<EngineConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_yaml(&content)
}

/// File configuration (or defaults) with the overrides applied and validated.
pub fn resolve(path: Option<&Path>, overrides: Overrides) -> CliResult<EngineConfig> {
    let mut config = match path {
        Some(path) => load_yaml(path)?,
        None => EngineConfig::default(),
    };
    if overrides.strict {
        config.clip_mode = ClipMode::Strict;
    }
    config.bounds = Bounds::new(
        overrides.p_min.unwrap_or(config.bounds.p_min),
        overrides.p_max.unwrap_or(config.bounds.p_max),
    )?;
    config.validate()?;
    Ok(config)
}

pub fn to_yaml(config: &EngineConfig) -> CliResult<String> {
    Ok(serde_yaml::to_string(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = parse_yaml("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let yaml = "\
clip_mode: strict
bounds:
  p_max: 5.0e7
inversion:
  max_iters: 80
";
        let config = parse_yaml(yaml).unwrap();
        assert_eq!(config.clip_mode, ClipMode::Strict);
        assert_eq!(config.bounds.p_max, 5.0e7);
        assert_eq!(config.bounds.p_min, sp_engine::DEFAULT_P_MIN);
        assert_eq!(config.inversion.max_iters, 80);
        assert_eq!(config.inversion.h_rel_tol, 1e-6);
        assert_eq!(config.derivatives, Default::default());
    }

    #[test]
    fn invalid_values_rejected() {
        let err = parse_yaml("inversion:\n  max_iters: 0\n").unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::ZeroIterations)));

        let err = parse_yaml("bounds:\n  p_min: 2.0e8\n").unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::InvalidBounds { .. })));
    }

    #[test]
    fn unknown_clip_mode_is_a_yaml_error() {
        assert!(matches!(
            parse_yaml("clip_mode: sometimes\n"),
            Err(CliError::Yaml(_))
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let config = EngineConfig::default().strict();
        let text = to_yaml(&config).unwrap();
        assert_eq!(parse_yaml(&text).unwrap(), config);
    }

    #[test]
    fn overrides_apply_on_defaults() {
        let config = resolve(
            None,
            Overrides {
                strict: true,
                p_min: Some(1.0e3),
                p_max: None,
            },
        )
        .unwrap();
        assert_eq!(config.clip_mode, ClipMode::Strict);
        assert_eq!(config.bounds.p_min, 1.0e3);
        assert_eq!(config.bounds.p_max, sp_engine::DEFAULT_P_MAX);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_yaml(Path::new("/nonexistent/steam.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/steam.yaml"));
    }
}
