//! Jiggle joint node.
//!
//! A [`JiggleJoint`] is the stateful wrapper a rig evaluates once per frame:
//! it owns the spring history, the animator-facing attributes, and the last
//! output. Attributes can be set by their long names so values coming from
//! a host attribute editor or a data file can be routed without matching on
//! strings at the call site.

use std::str::FromStr;

use nalgebra::{Matrix4, Point3, Vector3};
use rig_types::{Result, RigError};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{JiggleConfig, JiggleParams};
use crate::spring::SpringState;

/// Keyable scalar attributes of a jiggle joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JiggleAttribute {
    /// `jiggleAmount`
    JiggleAmount,
    /// `stiffness`
    Stiffness,
    /// `damping`
    Damping,
}

impl JiggleAttribute {
    /// All keyable attributes, in editor order.
    pub const ALL: [Self; 3] = [Self::JiggleAmount, Self::Stiffness, Self::Damping];

    /// Long attribute name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::JiggleAmount => "jiggleAmount",
            Self::Stiffness => "stiffness",
            Self::Damping => "damping",
        }
    }

    /// Value a freshly created node starts with.
    #[must_use]
    pub const fn default_value(self) -> f64 {
        match self {
            Self::JiggleAmount => 0.0,
            Self::Stiffness | Self::Damping => 1.0,
        }
    }

    /// Slider range shown to animators. Not enforced on values.
    #[must_use]
    pub const fn range(self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

impl FromStr for JiggleAttribute {
    type Err = RigError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.name() == name)
            .ok_or_else(|| RigError::unknown_attribute(name))
    }
}

/// Snapshot of a jiggle joint for debugging and tooling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JiggleDiagnostics {
    /// World-space spring position.
    pub position: Point3<f64>,
    /// Displacement over the last step.
    pub velocity: Vector3<f64>,
    /// Last output, in parent space.
    pub output: Point3<f64>,
    /// Number of evaluations since creation.
    pub evaluations: u64,
    /// Number of evaluations that restarted the spring.
    pub resets: u64,
}

/// A joint that follows its goal through a damped spring.
///
/// # Example
///
/// ```
/// use nalgebra::{Matrix4, Point3};
/// use rig_jiggle::{JiggleJoint, JiggleParams};
///
/// let mut joint = JiggleJoint::new(JiggleParams::new(0.1, 0.3, 1.0));
/// let identity = Matrix4::identity();
///
/// joint.compute(&Point3::origin(), &identity, 1.0);
/// let out = joint.compute(&Point3::new(0.0, 4.0, 0.0), &identity, 2.0);
///
/// // Lags behind the goal on the first frame after the move.
/// assert!(out.y > 0.0 && out.y < 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JiggleJoint {
    params: JiggleParams,
    config: JiggleConfig,
    state: SpringState,
    output: Point3<f64>,
    evaluations: u64,
    resets: u64,
}

impl Default for JiggleJoint {
    fn default() -> Self {
        Self::new(JiggleParams::default())
    }
}

impl JiggleJoint {
    /// Create a joint with the default timeline configuration.
    #[must_use]
    pub fn new(params: JiggleParams) -> Self {
        Self {
            params,
            config: JiggleConfig::default(),
            state: SpringState::new(),
            output: Point3::origin(),
            evaluations: 0,
            resets: 0,
        }
    }

    /// Create a joint after validating both parameter sets.
    pub fn try_new(params: JiggleParams, config: JiggleConfig) -> Result<Self> {
        params.validate()?;
        config.validate()?;
        Ok(Self::new(params).with_config(config))
    }

    /// Set the timeline configuration.
    #[must_use]
    pub fn with_config(mut self, config: JiggleConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluate one frame and return the output in parent space.
    pub fn compute(
        &mut self,
        goal: &Point3<f64>,
        parent_inverse: &Matrix4<f64>,
        time: f64,
    ) -> Point3<f64> {
        let step = self.state.step(goal, &self.params, time, &self.config);
        if step.reset {
            if self.state.initialized {
                debug!(
                    previous_time = self.state.previous_time,
                    time, "timeline discontinuity, restarting spring"
                );
            }
            self.resets += 1;
        }

        self.state = step.state;
        self.output = parent_inverse.transform_point(&step.position);
        self.evaluations += 1;
        trace!(time, output = ?self.output, "jiggle evaluated");
        self.output
    }

    /// Drop the spring history and the last output. The next evaluation
    /// reseeds at the goal.
    pub fn reset(&mut self) {
        self.state = SpringState::new();
        self.output = Point3::origin();
    }

    /// Current spring parameters.
    #[must_use]
    pub fn params(&self) -> &JiggleParams {
        &self.params
    }

    /// Replace all spring parameters.
    pub fn set_params(&mut self, params: JiggleParams) {
        self.params = params;
    }

    /// Timeline configuration.
    #[must_use]
    pub fn config(&self) -> &JiggleConfig {
        &self.config
    }

    /// Spring history.
    #[must_use]
    pub fn state(&self) -> &SpringState {
        &self.state
    }

    /// Last output, in parent space. The origin before the first evaluation
    /// and after [`reset`](Self::reset).
    #[must_use]
    pub fn output(&self) -> Point3<f64> {
        self.output
    }

    /// Read a keyable attribute.
    #[must_use]
    pub fn attribute(&self, attr: JiggleAttribute) -> f64 {
        match attr {
            JiggleAttribute::JiggleAmount => self.params.jiggle_amount,
            JiggleAttribute::Stiffness => self.params.stiffness,
            JiggleAttribute::Damping => self.params.damping,
        }
    }

    /// Write a keyable attribute. Non-finite values are rejected.
    pub fn set(&mut self, attr: JiggleAttribute, value: f64) -> Result<()> {
        let value = RigError::check_finite(attr.name(), value)?;
        match attr {
            JiggleAttribute::JiggleAmount => self.params.jiggle_amount = value,
            JiggleAttribute::Stiffness => self.params.stiffness = value,
            JiggleAttribute::Damping => self.params.damping = value,
        }
        Ok(())
    }

    /// Write a keyable attribute by its long name.
    pub fn set_attribute(&mut self, name: &str, value: f64) -> Result<()> {
        self.set(name.parse()?, value)
    }

    /// Snapshot for debugging.
    #[must_use]
    pub fn diagnostics(&self) -> JiggleDiagnostics {
        JiggleDiagnostics {
            position: self.state.current_position,
            velocity: self.state.velocity(),
            output: self.output,
            evaluations: self.evaluations,
            resets: self.resets,
        }
    }
}
