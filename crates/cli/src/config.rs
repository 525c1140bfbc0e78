use std::path::Path;

use anyhow::{bail, Context, Result};
use filehash_analysis::dispatcher::DEFAULT_CHUNK_SIZE;
use filehash_analysis::ActionKind;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub chunk_size: Option<usize>,
    pub actions: Option<Vec<ActionKind>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

/// Effective settings after applying overrides to a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub chunk_size: usize,
    pub actions: Vec<ActionKind>,
    pub pretty: bool,
}

impl Settings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            chunk_size: cfg.analysis.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            actions: cfg
                .analysis
                .actions
                .clone()
                .unwrap_or_else(|| ActionKind::ALL.to_vec()),
            pretty: cfg.output.pretty,
        }
    }

    /// Applies `FILEHASH_CHUNK_SIZE` and `FILEHASH_ACTIONS` style overrides,
    /// looked up through `var`.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = var("FILEHASH_CHUNK_SIZE") {
            self.chunk_size = raw
                .parse()
                .with_context(|| format!("invalid FILEHASH_CHUNK_SIZE: {raw}"))?;
        }
        if let Some(raw) = var("FILEHASH_ACTIONS") {
            self.actions = parse_actions(&raw)?;
        }
        Ok(self)
    }
}

pub fn parse_actions(raw: &str) -> Result<Vec<ActionKind>> {
    let mut actions = Vec::new();
    for name in raw.split(',').filter(|name| !name.trim().is_empty()) {
        let kind = name.parse::<ActionKind>()?;
        if !actions.contains(&kind) {
            actions.push(kind);
        }
    }
    Ok(actions)
}

/// Loads and checks a TOML config. An explicit empty action list or a zero
/// chunk size is rejected rather than silently producing empty reports.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read filehash config {}", path.display()))?;
    let cfg: Config = toml::from_str(&raw)
        .with_context(|| format!("invalid filehash config {}", path.display()))?;

    if cfg.analysis.chunk_size == Some(0) {
        bail!("{}: analysis.chunk_size must be positive", path.display());
    }
    if cfg.analysis.actions.as_ref().is_some_and(Vec::is_empty) {
        bail!("{}: analysis.actions lists no actions", path.display());
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_attach_every_action() {
        let settings = Settings::from_config(&Config::default());
        assert_eq!(settings.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(settings.actions, ActionKind::ALL.to_vec());
        assert!(!settings.pretty);
    }

    #[test]
    fn toml_sections_are_optional() {
        let cfg: Config = toml::from_str(
            r#"
            [analysis]
            actions = ["sha256", "md5"]
            "#,
        )
        .unwrap();
        let settings = Settings::from_config(&cfg);
        assert_eq!(settings.actions, vec![ActionKind::Sha256, ActionKind::Md5]);
        assert_eq!(settings.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn unknown_action_in_toml_is_rejected() {
        let parsed = toml::from_str::<Config>(
            r#"
            [analysis]
            actions = ["crc32"]
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let settings = Settings::from_config(&Config::default())
            .with_overrides(|key| match key {
                "FILEHASH_CHUNK_SIZE" => Some("4096".to_owned()),
                "FILEHASH_ACTIONS" => Some("sha1, sha1,md5".to_owned()),
                _ => None,
            })
            .unwrap();
        assert_eq!(settings.chunk_size, 4096);
        assert_eq!(settings.actions, vec![ActionKind::Sha1, ActionKind::Md5]);
    }

    #[test]
    fn bad_override_is_an_error() {
        let result = Settings::from_config(&Config::default())
            .with_overrides(|key| (key == "FILEHASH_CHUNK_SIZE").then(|| "lots".to_owned()));
        assert!(result.is_err());
    }
}
