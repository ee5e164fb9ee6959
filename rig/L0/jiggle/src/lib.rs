//! Jiggle springs for secondary motion on rig joints.
//!
//! A jiggle joint follows an animated goal through a damped spring, so
//! muscles, fat and loose gear lag behind and overshoot the motion that
//! drives them. The spring is position-based and advances one fixed step per
//! evaluation:
//!
//! ```text
//!   goal ───────►┌──────────────┐     ┌───────────┐     ┌────────────────┐
//!                │ damped spring│────►│ jiggle    │────►│ parent inverse │────► output
//!   time ──reset►│ (SpringState)│     │ amount    │     │ (local space)  │
//!                └──────────────┘     └───────────┘     └────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use nalgebra::{Matrix4, Point3};
//! use rig_jiggle::{JiggleJoint, JiggleParams};
//!
//! let mut joint = JiggleJoint::new(JiggleParams::new(0.1, 0.4, 1.0));
//! let parent_inverse = Matrix4::identity();
//!
//! for frame in 1..=24 {
//!     let goal = Point3::new(0.0, if frame < 6 { 0.0 } else { 10.0 }, 0.0);
//!     let out = joint.compute(&goal, &parent_inverse, f64::from(frame));
//!     println!("frame {frame}: {:.3}", out.y);
//! }
//! ```
//!
//! # Pure Evaluation
//!
//! [`evaluate`] is the same update as a free function over an explicit
//! [`SpringState`]: the caller keeps the state and gets a new one back. It
//! never fails and does no I/O, so it can run on any thread.
//!
//! # Timeline Discontinuities
//!
//! Scrubbing backwards or jumping forward by more than
//! [`JiggleConfig::reset_threshold`] restarts the spring on the goal instead
//! of integrating from a stale state.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::suboptimal_flops
)]
#![cfg_attr(test, allow(clippy::float_cmp, clippy::cast_precision_loss))]

pub mod config;
pub mod group;
pub mod node;
pub mod spring;

pub use config::{JiggleConfig, JiggleParams};
pub use group::{JiggleGroup, JiggleInput};
pub use node::{JiggleAttribute, JiggleDiagnostics, JiggleJoint};
pub use spring::{SpringState, SpringStep, evaluate};

use nalgebra::{Matrix4, Point3};

/// A per-frame follower that turns a goal into a local-space position.
///
/// Lets rig code drive jiggle joints and other secondary-motion nodes
/// through one interface.
pub trait SecondaryMotion {
    /// Evaluate one frame.
    ///
    /// # Arguments
    ///
    /// * `goal` - World-space goal position
    /// * `parent_inverse` - Inverse of the parent's world matrix
    /// * `time` - Host timeline time
    ///
    /// # Returns
    ///
    /// Position in the parent's local space.
    fn compute(&mut self, goal: &Point3<f64>, parent_inverse: &Matrix4<f64>, time: f64)
    -> Point3<f64>;

    /// Forget all history.
    fn reset(&mut self);
}

impl SecondaryMotion for JiggleJoint {
    fn compute(
        &mut self,
        goal: &Point3<f64>,
        parent_inverse: &Matrix4<f64>,
        time: f64,
    ) -> Point3<f64> {
        self.compute(goal, parent_inverse, time)
    }

    fn reset(&mut self) {
        self.reset();
    }
}
