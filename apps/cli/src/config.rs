// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that layouts, plans and drawings are written to.
    pub output_dir: PathBuf,
    /// Log output format (`pretty` or `json`).
    pub log_format: LogFormat,
    /// Optional pipeline configuration JSON file.
    pub pipeline_config: Option<PathBuf>,
    /// Clustering seed override.
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            output_dir: var("SKETCHPLAN_OUTPUT_DIR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "./out".into())
                .into(),
            log_format: var("SKETCHPLAN_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or_default(),
            pipeline_config: var("SKETCHPLAN_CONFIG")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            seed: var("SKETCHPLAN_SEED").and_then(|s| s.trim().parse().ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.output_dir, PathBuf::from("./out"));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.pipeline_config.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_environment_values() {
        let config = Config::from_lookup(lookup(&[
            ("SKETCHPLAN_OUTPUT_DIR", "/tmp/plans"),
            ("SKETCHPLAN_LOG_FORMAT", "JSON"),
            ("SKETCHPLAN_CONFIG", "pipeline.json"),
            ("SKETCHPLAN_SEED", "42"),
        ]));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/plans"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.pipeline_config, Some(PathBuf::from("pipeline.json")));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_bad_seed_is_ignored() {
        let config = Config::from_lookup(lookup(&[("SKETCHPLAN_SEED", "forty-two")]));
        assert!(config.seed.is_none());
    }
}
