use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Smallest correspondence that pins down a 3D rotation.
pub const MIN_CORRESPONDENCES: usize = 3;

/// Tolerances used by [`crate::rigid::RigidAligner`].
///
/// ```toml
/// min_correspondences = 4
/// rank_tolerance = 1e-9
/// orthonormality_tolerance = 1e-6
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Fewest point pairs accepted for a fit.
    pub min_correspondences: usize,
    /// Second singular value of the cross-covariance, relative to the first,
    /// below which the source is treated as collinear.
    pub rank_tolerance: f64,
    /// Allowed deviation of det(R) from 1 and of RᵀR from the identity.
    pub orthonormality_tolerance: f64,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            min_correspondences: MIN_CORRESPONDENCES,
            rank_tolerance: 1e-9,
            orthonormality_tolerance: 1e-6,
        }
    }
}

impl AlignerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AlignerConfig =
            toml::from_str(text).context("failed to parse aligner config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path).with_context(|| {
            format!("failed to read aligner config: {:?}", path.as_ref())
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_correspondences < MIN_CORRESPONDENCES {
            bail!(
                "min_correspondences must be at least {}, got {}",
                MIN_CORRESPONDENCES,
                self.min_correspondences
            );
        }
        for (name, value) in [
            ("rank_tolerance", self.rank_tolerance),
            ("orthonormality_tolerance", self.orthonormality_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be a positive number, got {}", name, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AlignerConfig::from_toml_str("min_correspondences = 4\n").unwrap();
        assert_eq!(config.min_correspondences, 4);
        assert_eq!(config.rank_tolerance, AlignerConfig::default().rank_tolerance);
        assert_eq!(
            config.orthonormality_tolerance,
            AlignerConfig::default().orthonormality_tolerance
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AlignerConfig::from_toml_str("").unwrap();
        assert_eq!(config, AlignerConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(AlignerConfig::from_toml_str("min_correspondences = 2").is_err());
        assert!(AlignerConfig::from_toml_str("rank_tolerance = -1.0").is_err());
        assert!(AlignerConfig::from_toml_str("orthonormality_tolerance = 0.0").is_err());
        assert!(AlignerConfig::from_toml_str("rank_tolerance = \"tiny\"").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AlignerConfig::from_file("does/not/exist.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.toml"));
    }
}
