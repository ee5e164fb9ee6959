//! Spring parameters and evaluation configuration.
//!
//! [`JiggleParams`] holds the three animator-facing factors. They are
//! normally in `[0, 1]` but are deliberately not clamped: values outside
//! that range give growing or inverted oscillation, which is sometimes what
//! an animator wants.
//!
//! [`JiggleConfig`] holds settings that depend on the host timeline rather
//! than on the look of the motion.

use rig_types::{Result, RigError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Animator-facing spring factors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JiggleParams {
    /// Fraction of velocity removed per evaluation.
    /// 0 keeps all velocity, 1 kills it every step.
    pub damping: f64,

    /// Fraction of the remaining error to the goal corrected per evaluation.
    /// 0 never pulls toward the goal, 1 snaps onto it.
    pub stiffness: f64,

    /// Blend between the raw goal (0) and the full spring result (1).
    pub jiggle_amount: f64,
}

impl Default for JiggleParams {
    /// Node defaults: fully damped, fully stiff, jiggle off.
    fn default() -> Self {
        Self {
            damping: 1.0,
            stiffness: 1.0,
            jiggle_amount: 0.0,
        }
    }
}

impl JiggleParams {
    /// Create parameters from the three factors.
    #[must_use]
    pub fn new(damping: f64, stiffness: f64, jiggle_amount: f64) -> Self {
        Self {
            damping,
            stiffness,
            jiggle_amount,
        }
    }

    /// Set damping.
    #[must_use]
    pub fn damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set stiffness.
    #[must_use]
    pub fn stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set the jiggle amount.
    #[must_use]
    pub fn jiggle_amount(mut self, jiggle_amount: f64) -> Self {
        self.jiggle_amount = jiggle_amount;
        self
    }

    /// Check if every factor lies in `[0, 1]`.
    #[must_use]
    pub fn is_in_nominal_range(&self) -> bool {
        [self.damping, self.stiffness, self.jiggle_amount]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Validate the parameters.
    ///
    /// Only non-finite values are rejected.
    pub fn validate(&self) -> Result<()> {
        RigError::check_finite("damping", self.damping)?;
        RigError::check_finite("stiffness", self.stiffness)?;
        RigError::check_finite("jiggleAmount", self.jiggle_amount)?;
        Ok(())
    }
}

/// Timeline settings for spring evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JiggleConfig {
    /// Largest forward time gap that is still integrated, in host time units.
    ///
    /// A larger gap, or any backwards step, is treated as a scrub or loop and
    /// the spring restarts at the goal.
    pub reset_threshold: f64,
}

impl Default for JiggleConfig {
    fn default() -> Self {
        Self {
            reset_threshold: 1.0,
        }
    }
}

impl JiggleConfig {
    /// Create a config with the given reset threshold.
    #[must_use]
    pub fn with_reset_threshold(reset_threshold: f64) -> Self {
        Self { reset_threshold }
    }

    /// Config for a timeline sampled at `fps`, measured in seconds.
    ///
    /// Allows one frame of gap before resetting.
    #[must_use]
    pub fn seconds_at(fps: f64) -> Self {
        Self {
            reset_threshold: 1.0 / fps,
        }
    }

    /// Check if a time step of `dt` is a discontinuity.
    #[must_use]
    pub fn is_discontinuity(&self, dt: f64) -> bool {
        dt < 0.0 || dt > self.reset_threshold
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.reset_threshold.is_finite() || self.reset_threshold <= 0.0 {
            return Err(RigError::invalid_config(format!(
                "reset threshold must be positive and finite, got {}",
                self.reset_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_params() {
        let params = JiggleParams::default();
        assert_eq!(params.damping, 1.0);
        assert_eq!(params.stiffness, 1.0);
        assert_eq!(params.jiggle_amount, 0.0);
        assert!(params.is_in_nominal_range());
    }

    #[test]
    fn test_params_builder() {
        let params = JiggleParams::default()
            .damping(0.2)
            .stiffness(0.4)
            .jiggle_amount(1.0);
        assert_eq!(params, JiggleParams::new(0.2, 0.4, 1.0));
    }

    #[test]
    fn test_params_out_of_range_is_valid() {
        let params = JiggleParams::new(-0.5, 1.8, 2.0);
        assert!(!params.is_in_nominal_range());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        let err = JiggleParams::default().stiffness(f64::NAN).validate().unwrap_err();
        assert!(err.to_string().contains("stiffness"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_discontinuity() {
        let config = JiggleConfig::default();
        assert!(!config.is_discontinuity(0.0));
        assert!(!config.is_discontinuity(1.0));
        assert!(config.is_discontinuity(1.0001));
        assert!(config.is_discontinuity(-0.01));
    }

    #[test]
    fn test_config_seconds() {
        let config = JiggleConfig::seconds_at(24.0);
        assert_relative_eq!(config.reset_threshold, 1.0 / 24.0);
        assert!(config.is_discontinuity(2.0 / 24.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(JiggleConfig::with_reset_threshold(0.0).validate().is_err());
        assert!(JiggleConfig::with_reset_threshold(f64::INFINITY).validate().is_err());
        assert!(JiggleConfig::default().validate().is_ok());
    }
}
