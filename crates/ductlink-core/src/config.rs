//! Configuration for the realignment engine.

use crate::error::{RealignError, RealignResult};
use crate::host::{PickFilter, any_element, ducts_only};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Tolerance for the projection postcondition, relative to coordinate magnitude.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Tolerance for the connector frame invariant, in model units.
pub const DEFAULT_FRAME_TOLERANCE: f64 = 1e-6;

/// Configuration options for realignment.
///
/// Loaded from TOML; every key is optional:
///
/// ```toml
/// tolerance = 1e-9
/// frame_tolerance = 1e-6
/// pick_ducts_only = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RealignConfig {
    /// Maximum perpendicular distance from a projected point to the connector axis,
    /// per unit of coordinate magnitude (never less than one unit).
    pub tolerance: f64,
    /// Maximum distance between a connector origin and its frame origin.
    pub frame_tolerance: f64,
    /// Restrict reference picks to ducts.
    pub pick_ducts_only: bool,
}

impl Default for RealignConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            frame_tolerance: DEFAULT_FRAME_TOLERANCE,
            pick_ducts_only: true,
        }
    }
}

impl RealignConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> RealignResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| RealignError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> RealignResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            RealignError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// Tolerances must be finite and positive.
    pub fn validate(&self) -> RealignResult<()> {
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("frame_tolerance", self.frame_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RealignError::Config(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Filter used for the reference pick.
    pub fn pick_filter(&self) -> PickFilter {
        if self.pick_ducts_only {
            ducts_only
        } else {
            any_element
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_frame_tolerance(mut self, tolerance: f64) -> Self {
        self.frame_tolerance = tolerance;
        self
    }

    pub fn with_pick_ducts_only(mut self, ducts_only: bool) -> Self {
        self.pick_ducts_only = ducts_only;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RealignConfig::default();
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.frame_tolerance, 1e-6);
        assert!(config.pick_ducts_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RealignConfig::from_toml_str("tolerance = 1e-4\n").unwrap();
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.frame_tolerance, DEFAULT_FRAME_TOLERANCE);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RealignConfig::from_toml_str("tolerance = -1.0"),
            Err(RealignError::Config(_))
        ));
        assert!(matches!(
            RealignConfig::from_toml_str("frame_tolerance = 0.0"),
            Err(RealignError::Config(_))
        ));
        assert!(matches!(
            RealignConfig::from_toml_str("unknown_key = 1"),
            Err(RealignError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pick_ducts_only = false").unwrap();
        let config = RealignConfig::from_file(file.path()).unwrap();
        assert!(!config.pick_ducts_only);
        assert!((config.pick_filter())(ElementKind::Fitting));

        let missing = RealignConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(RealignError::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = RealignConfig::new()
            .with_tolerance(1e-3)
            .with_frame_tolerance(1e-2)
            .with_pick_ducts_only(true);
        assert_eq!(config.tolerance, 1e-3);
        assert_eq!(config.frame_tolerance, 1e-2);
        assert!(!(config.pick_filter())(ElementKind::Fitting));
    }
}
