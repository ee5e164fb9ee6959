//! Groups of jiggle joints evaluated together.
//!
//! A muscle group usually puts one jiggle joint on the center joint of each
//! of its units. [`JiggleGroup`] keeps them in unit order so a whole group
//! can be tuned and evaluated per frame in one call.

use nalgebra::{Matrix4, Point3};
use rig_types::{Result, RigError};

use crate::config::JiggleParams;
use crate::node::JiggleJoint;

/// Per-frame input for one jiggle joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JiggleInput {
    /// World-space goal.
    pub goal: Point3<f64>,
    /// Inverse of the joint's parent world matrix.
    pub parent_inverse: Matrix4<f64>,
}

impl JiggleInput {
    /// Create an input.
    #[must_use]
    pub fn new(goal: Point3<f64>, parent_inverse: Matrix4<f64>) -> Self {
        Self {
            goal,
            parent_inverse,
        }
    }

    /// Input for a joint parented to the world.
    #[must_use]
    pub fn world(goal: Point3<f64>) -> Self {
        Self::new(goal, Matrix4::identity())
    }
}

/// An ordered, named collection of jiggle joints.
#[derive(Debug, Clone, Default)]
pub struct JiggleGroup {
    names: Vec<String>,
    joints: Vec<JiggleJoint>,
}

impl JiggleGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a joint, replacing any joint with the same name in place.
    #[must_use]
    pub fn with_joint(mut self, name: impl Into<String>, joint: JiggleJoint) -> Self {
        self.add(name, joint);
        self
    }

    /// Add a joint, replacing any joint with the same name in place.
    pub fn add(&mut self, name: impl Into<String>, joint: JiggleJoint) {
        let name = name.into();
        match self.index_of(&name) {
            Some(i) => self.joints[i] = joint,
            None => {
                self.names.push(name);
                self.joints.push(joint);
            }
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Get the number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Check if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Get a joint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&JiggleJoint> {
        self.index_of(name).map(|i| &self.joints[i])
    }

    /// Get a mutable joint by name.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut JiggleJoint> {
        self.index_of(name).map(|i| &mut self.joints[i])
    }

    /// Apply the same parameters to every joint.
    pub fn set_params_all(&mut self, params: JiggleParams) {
        for joint in &mut self.joints {
            joint.set_params(params);
        }
    }

    /// Evaluate every joint for one frame.
    ///
    /// `inputs` must hold one entry per joint, in [`names`](Self::names)
    /// order. Outputs come back in the same order.
    pub fn compute_all(&mut self, inputs: &[JiggleInput], time: f64) -> Result<Vec<Point3<f64>>> {
        if inputs.len() != self.joints.len() {
            return Err(RigError::InputCountMismatch {
                expected: self.joints.len(),
                actual: inputs.len(),
            });
        }

        Ok(self
            .joints
            .iter_mut()
            .zip(inputs)
            .map(|(joint, input)| joint.compute(&input.goal, &input.parent_inverse, time))
            .collect())
    }

    /// Drop the spring history of every joint.
    pub fn reset(&mut self) {
        for joint in &mut self.joints {
            joint.reset();
        }
    }
}
