use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::frequency_response::{DisplayScale, MagnitudeClip};

/// Tuning for an editing session. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Pointer-to-point distance (z-plane units) below which a press grabs
    /// an existing point.
    pub hit_radius: f64,
    /// Frequency samples per evaluation.
    pub num_samples: usize,
    /// dB floor, used for zero-magnitude samples and the bottom of the view.
    pub min_db: f64,
    /// dB ceiling, used for infinite samples and the top of the view.
    pub max_db: f64,
    /// Linear-scale ceiling for infinite samples.
    pub max_linear: f64,
    /// Magnitude scale at session start.
    pub initial_scale: DisplayScale,
    pub toggle_scale_key: char,
    pub clear_key: char,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_radius: 0.1,
            num_samples: 512,
            min_db: -60.0,
            max_db: 30.0,
            max_linear: 1000.0,
            initial_scale: DisplayScale::Log,
            toggle_scale_key: 'l',
            clear_key: 'c',
        }
    }
}

impl EditorConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|source| Error::Parse {
            what: "editor config".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), ?config, "loaded editor config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "hit_radius must be a positive number, got {}",
                self.hit_radius
            )));
        }
        if self.num_samples < 2 {
            return Err(Error::InvalidConfig(format!(
                "num_samples must be at least 2, got {}",
                self.num_samples
            )));
        }
        if !(self.min_db.is_finite() && self.max_db.is_finite() && self.min_db < self.max_db) {
            return Err(Error::InvalidConfig(format!(
                "min_db ({}) must be below max_db ({})",
                self.min_db, self.max_db
            )));
        }
        if !(self.max_linear.is_finite() && self.max_linear > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_linear must be a positive number, got {}",
                self.max_linear
            )));
        }
        if self.toggle_scale_key.eq_ignore_ascii_case(&self.clear_key) {
            return Err(Error::InvalidConfig(format!(
                "toggle_scale_key and clear_key are both `{}`",
                self.clear_key
            )));
        }
        Ok(())
    }

    /// Clip limits handed to the renderer with each frame.
    pub fn clip(&self) -> MagnitudeClip {
        MagnitudeClip {
            min_db: self.min_db,
            max_db: self.max_db,
            max_linear: self.max_linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.num_samples, 512);
        assert_eq!(config.hit_radius, 0.1);
        assert_eq!(config.initial_scale, DisplayScale::Log);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_toml_str(
            r#"
            hit_radius = 0.05
            initial_scale = "linear"
            clear_key = "x"
            "#,
        )
        .unwrap();
        assert_eq!(config.hit_radius, 0.05);
        assert_eq!(config.initial_scale, DisplayScale::Linear);
        assert_eq!(config.clear_key, 'x');
        assert_eq!(config.num_samples, 512);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = EditorConfig::from_toml_str("hit_raduis = 0.2").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "got {err}");
    }

    #[rstest]
    #[case("hit_radius = 0.0")]
    #[case("hit_radius = -1.0")]
    #[case("hit_radius = nan")]
    #[case("num_samples = 1")]
    #[case("min_db = 10.0\nmax_db = 10.0")]
    #[case("max_db = inf")]
    #[case("max_linear = 0.0")]
    #[case("toggle_scale_key = \"C\"")]
    fn test_invalid_values_are_rejected(#[case] raw: &str) {
        let err = EditorConfig::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "`{raw}` gave {err}");
    }

    #[test]
    fn test_clip_mirrors_limits() {
        let config = EditorConfig::from_toml_str("min_db = -90.0\nmax_linear = 50.0").unwrap();
        let clip = config.clip();
        assert_eq!(clip.min_db, -90.0);
        assert_eq!(clip.max_db, 30.0);
        assert_eq!(clip.max_linear, 50.0);
    }
}
