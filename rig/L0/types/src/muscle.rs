//! Muscle group kinds and muscle unit naming.
//!
//! A muscle unit is three joints: an origin, an insertion, and a center
//! joint that rides between them. A muscle group is a fixed number of units
//! of one anatomical kind, named by appending `A`, `B`, `C`... to the group
//! name. Joint names are derived from the unit name:
//!
//! ```text
//! {unit}_muscleOrigin
//! {unit}_muscleInsertion
//! {unit}_JOmuscle
//! ```
//!
//! The set of group kinds is closed. Data files name the kind by its tag
//! string, and [`MuscleGroupKind::from_str`](std::str::FromStr) is the only
//! way from a tag back to a kind.

use std::str::FromStr;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RigError;

/// Suffix of a unit's origin joint.
pub const ORIGIN_SUFFIX: &str = "_muscleOrigin";
/// Suffix of a unit's insertion joint.
pub const INSERTION_SUFFIX: &str = "_muscleInsertion";
/// Suffix of a unit's center joint.
pub const CENTER_SUFFIX: &str = "_JOmuscle";

/// Anatomical muscle group kinds known to the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MuscleGroupKind {
    /// Trapezius: three units from neck/upper back to clavicle and acromion.
    TrapGroup,
    /// Latissimus dorsi: three units from the lower back to the upper arm.
    LatsGroup,
    /// Deltoid: three units capping the shoulder.
    DeltoidGroup,
    /// Upper arm flexor/extensor pair.
    ArmMuscleGroup,
    /// Pectoralis: two units from the sternum to the upper arm.
    PectoralisGroup,
}

impl MuscleGroupKind {
    /// All known kinds.
    pub const ALL: [Self; 5] = [
        Self::TrapGroup,
        Self::LatsGroup,
        Self::DeltoidGroup,
        Self::ArmMuscleGroup,
        Self::PectoralisGroup,
    ];

    /// The tag string written to data files.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TrapGroup => "TrapGroup",
            Self::LatsGroup => "LatsGroup",
            Self::DeltoidGroup => "DeltoidGroup",
            Self::ArmMuscleGroup => "ArmMuscleGroup",
            Self::PectoralisGroup => "PectoralisGroup",
        }
    }

    /// Names of the skeleton joints a group of this kind is attached to.
    ///
    /// These are the keys of the `inputs` table in data files. The spelling
    /// matches files already written by the rigging tools.
    #[must_use]
    pub const fn required_inputs(self) -> &'static [&'static str] {
        match self {
            Self::TrapGroup => &["back2Joint", "clavicleJoint", "acromionJoint"],
            Self::LatsGroup => &["back1Joint", "twist2Joint", "scapulaJoint", "trapCJoint"],
            Self::DeltoidGroup => &[
                "clavicleJoint",
                "upperArmJoint",
                "twist1Joint",
                "twist2Joint",
                "acromionJoint",
            ],
            Self::ArmMuscleGroup => &[
                "upArmTwsitJoint",
                "lowArmTwsitJoint",
                "twistBaseJoint",
                "twistValueJoint",
                "acromionJoint",
            ],
            Self::PectoralisGroup => &["back3Joint", "clavicleJoint", "upperarmJoint", "twist2Joint"],
        }
    }

    /// Number of muscle units in a group of this kind.
    #[must_use]
    pub const fn unit_count(self) -> usize {
        match self {
            Self::TrapGroup | Self::LatsGroup | Self::DeltoidGroup => 3,
            Self::ArmMuscleGroup | Self::PectoralisGroup => 2,
        }
    }

    /// Unit names for a group called `group_name`.
    #[must_use]
    pub fn unit_names(self, group_name: &str) -> Vec<String> {
        (b'A'..)
            .take(self.unit_count())
            .map(|letter| format!("{group_name}{}", char::from(letter)))
            .collect()
    }
}

impl FromStr for MuscleGroupKind {
    type Err = RigError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| RigError::UnknownGroupKind {
                tag: tag.to_string(),
            })
    }
}

impl std::fmt::Display for MuscleGroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// World-space placement of one muscle unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MuscleUnit {
    /// Unit name, e.g. `L_trapA`.
    pub name: String,
    /// Origin joint position.
    pub origin: Point3<f64>,
    /// Insertion joint position.
    pub insertion: Point3<f64>,
    /// Center joint position.
    pub center: Point3<f64>,
}

impl MuscleUnit {
    /// Create a unit placement.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        origin: Point3<f64>,
        insertion: Point3<f64>,
        center: Point3<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            insertion,
            center,
        }
    }

    /// Name of the origin joint.
    #[must_use]
    pub fn origin_joint(&self) -> String {
        format!("{}{ORIGIN_SUFFIX}", self.name)
    }

    /// Name of the insertion joint.
    #[must_use]
    pub fn insertion_joint(&self) -> String {
        format!("{}{INSERTION_SUFFIX}", self.name)
    }

    /// Name of the center joint.
    #[must_use]
    pub fn center_joint(&self) -> String {
        format!("{}{CENTER_SUFFIX}", self.name)
    }

    /// Rest length between origin and insertion.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.insertion - self.origin).norm()
    }
}
