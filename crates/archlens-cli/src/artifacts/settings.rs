use std::path::Path;

use archlens_eval::EngineConfig;

use super::ArtifactResult;

/// Read an engine config from TOML; absent keys keep their defaults.
pub fn load_engine_config(path: Option<&Path>) -> ArtifactResult<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            "security_threshold = 75.0\ntop_n_expensive = 3\nas_of = \"2024-01-31\"\n",
        )
        .expect("parse config");

        assert_eq!(config.security_threshold, 75.0);
        assert_eq!(config.top_n_expensive, 3);
        assert_eq!(
            config.as_of,
            NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date")
        );
        assert_eq!(config.performance_threshold, 70.0);
        assert_eq!(config.score_histogram_bins, 12);
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = toml::from_str::<EngineConfig>("top_n_expensive = \"five\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn example_config_loads() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../configs/engine.example.toml");
        let config = load_engine_config(Some(&path)).expect("example config");

        assert_eq!(config.top_n_expensive, 5);
        assert_eq!(
            config.as_of,
            NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
        );
        config.validate().expect("example config is valid");
    }

    #[test]
    fn missing_path_means_defaults() {
        let config = load_engine_config(None).expect("defaults");
        assert_eq!(config.top_n_expensive, 5);
    }
}
