//! The jiggle spring integrator.
//!
//! A fixed-step, position-based damped spring. Each evaluation advances the
//! spring by exactly one step, however much time has passed; time is only
//! used to notice when the timeline has jumped.
//!
//! ```text
//! v      = (x_n - x_{n-1}) * (1 - damping)
//! x_pred = x_n + v
//! x_n+1  = x_pred + (goal - x_pred) * stiffness
//!
//! out    = parent_inverse * (goal + (x_n+1 - goal) * jiggle_amount)
//! ```
//!
//! With `e = x - goal` for a still goal this is
//! `e_n+1 = (1 - stiffness) * ((2 - damping) * e_n - (1 - damping) * e_n-1)`,
//! so the error shrinks by `1 - stiffness` per step when fully damped and
//! oscillates with decaying amplitude otherwise.
//!
//! # Resets
//!
//! The spring restarts at the goal, with zero velocity, when
//!
//! - it has never been evaluated,
//! - time went backwards (scrubbing, looping playback), or
//! - time jumped forward by more than [`JiggleConfig::reset_threshold`].
//!
//! On a reset evaluation no spring is applied and the output is the goal.

use nalgebra::{Matrix4, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{JiggleConfig, JiggleParams};

/// Position history of one spring.
///
/// Owned by exactly one caller and replaced on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpringState {
    /// Filtered world-space position after the last evaluation.
    pub current_position: Point3<f64>,

    /// Filtered world-space position before the last evaluation.
    pub previous_position: Point3<f64>,

    /// Time of the last evaluation.
    pub previous_time: f64,

    /// Whether the state has been seeded from a goal.
    pub initialized: bool,
}

impl Default for SpringState {
    fn default() -> Self {
        Self {
            current_position: Point3::origin(),
            previous_position: Point3::origin(),
            previous_time: 0.0,
            initialized: false,
        }
    }
}

impl SpringState {
    /// Create an unseeded state. The first evaluation seeds it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state at rest on `goal` at `time`.
    #[must_use]
    pub fn seeded(goal: Point3<f64>, time: f64) -> Self {
        Self {
            current_position: goal,
            previous_position: goal,
            previous_time: time,
            initialized: true,
        }
    }

    /// Displacement over the last step.
    #[must_use]
    pub fn velocity(&self) -> Vector3<f64> {
        self.current_position - self.previous_position
    }

    /// Check if evaluating at `time` would restart the spring.
    #[must_use]
    pub fn needs_reset(&self, time: f64, config: &JiggleConfig) -> bool {
        !self.initialized || config.is_discontinuity(time - self.previous_time)
    }

    /// Advance the spring one step toward `goal`.
    ///
    /// The returned position is in world space, blended by the jiggle
    /// amount, and not yet mapped through any parent transform.
    #[must_use]
    pub fn step(
        &self,
        goal: &Point3<f64>,
        params: &JiggleParams,
        time: f64,
        config: &JiggleConfig,
    ) -> SpringStep {
        if self.needs_reset(time, config) {
            return SpringStep {
                position: *goal,
                state: Self::seeded(*goal, time),
                reset: true,
            };
        }

        let velocity = self.velocity() * (1.0 - params.damping);
        let predicted = self.current_position + velocity;
        let pull = (goal - predicted) * params.stiffness;
        let new_position = predicted + pull;

        let state = Self {
            current_position: new_position,
            previous_position: self.current_position,
            previous_time: time,
            initialized: true,
        };

        SpringStep {
            position: goal + (new_position - goal) * params.jiggle_amount,
            state,
            reset: false,
        }
    }
}

/// Result of one spring step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringStep {
    /// Blended world-space position.
    pub position: Point3<f64>,
    /// State to use for the next step.
    pub state: SpringState,
    /// Whether this step restarted the spring.
    pub reset: bool,
}

/// Evaluate the spring once.
///
/// Returns the output position in the parent's local space and the new
/// state. Never fails; inputs are used as given.
///
/// # Example
///
/// ```
/// use nalgebra::{Matrix4, Point3};
/// use rig_jiggle::{JiggleConfig, JiggleParams, SpringState, evaluate};
///
/// let params = JiggleParams::new(0.0, 0.5, 1.0);
/// let config = JiggleConfig::default();
/// let identity = Matrix4::identity();
///
/// let (out, state) = evaluate(&SpringState::new(), &Point3::origin(), &params, &identity, 0.0, &config);
/// assert_eq!(out, Point3::origin());
///
/// // The goal jumps; the spring covers half the distance on the first step.
/// let goal = Point3::new(0.0, 10.0, 0.0);
/// let (out, _) = evaluate(&state, &goal, &params, &identity, 1.0, &config);
/// assert_eq!(out, Point3::new(0.0, 5.0, 0.0));
/// ```
#[must_use]
pub fn evaluate(
    state: &SpringState,
    goal: &Point3<f64>,
    params: &JiggleParams,
    parent_inverse: &Matrix4<f64>,
    time: f64,
    config: &JiggleConfig,
) -> (Point3<f64>, SpringState) {
    let step = state.step(goal, params, time, config);
    (parent_inverse.transform_point(&step.position), step.state)
}
