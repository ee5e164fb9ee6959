//! Left/right sides, mirroring, and joint placement helpers.
//!
//! Rig joints carry their side in a name prefix (`L_clavicle`, `R_clavicle`).
//! Mirroring a rig swaps that prefix and reflects world-space positions
//! across the plane normal to the mirror axis.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side of a bilaterally symmetric rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Left side, `L_` prefix.
    Left,
    /// Right side, `R_` prefix.
    Right,
}

impl Side {
    /// The name prefix for this side, including the trailing underscore.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Left => "L_",
            Self::Right => "R_",
        }
    }

    /// The mirrored side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Detect the side from a joint name prefix.
    #[must_use]
    pub fn of_name(name: &str) -> Option<Self> {
        if name.starts_with(Self::Left.prefix()) {
            Some(Self::Left)
        } else if name.starts_with(Self::Right.prefix()) {
            Some(Self::Right)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "L"),
            Self::Right => write!(f, "R"),
        }
    }
}

/// World axis across which a rig is mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MirrorAxis {
    /// Reflect across the YZ plane (negate X).
    #[default]
    X,
    /// Reflect across the XZ plane (negate Y).
    Y,
    /// Reflect across the XY plane (negate Z).
    Z,
}

impl MirrorAxis {
    /// Index of the negated coordinate.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Reflect a point across this axis' mirror plane.
    #[must_use]
    pub fn reflect(self, point: &Point3<f64>) -> Point3<f64> {
        let mut mirrored = *point;
        mirrored[self.index()] = -mirrored[self.index()];
        mirrored
    }
}

/// Swap every `from` side prefix in `name` for the opposite side's prefix.
///
/// Names without the prefix are returned unchanged, so center joints such as
/// `spine_02` survive a mirror pass untouched.
///
/// ```
/// use rig_types::{mirror_name, Side};
///
/// assert_eq!(mirror_name("L_deltoidA_muscleOrigin", Side::Left), "R_deltoidA_muscleOrigin");
/// assert_eq!(mirror_name("spine_02", Side::Left), "spine_02");
/// ```
#[must_use]
pub fn mirror_name(name: &str, from: Side) -> String {
    name.replace(from.prefix(), from.opposite().prefix())
}

/// Place a point along the segment from `start` to `end`.
///
/// `factor` 0 gives `start`, 1 gives `end`; values outside `[0, 1]`
/// extrapolate along the same line.
#[must_use]
pub fn place_between(start: &Point3<f64>, end: &Point3<f64>, factor: f64) -> Point3<f64> {
    start + (end - start) * factor
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_side_prefix() {
        assert_eq!(Side::Left.prefix(), "L_");
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::of_name("R_upperArm"), Some(Side::Right));
        assert_eq!(Side::of_name("neck"), None);
    }

    #[test]
    fn test_reflect() {
        let p = Point3::new(3.0, 4.0, 5.0);
        assert_eq!(MirrorAxis::X.reflect(&p), Point3::new(-3.0, 4.0, 5.0));
        assert_eq!(MirrorAxis::Y.reflect(&p), Point3::new(3.0, -4.0, 5.0));
        assert_eq!(MirrorAxis::Z.reflect(&p), Point3::new(3.0, 4.0, -5.0));

        // Reflection is an involution.
        assert_eq!(MirrorAxis::X.reflect(&MirrorAxis::X.reflect(&p)), p);
    }

    #[test]
    fn test_mirror_name_right_to_left() {
        assert_eq!(mirror_name("R_clavicle", Side::Right), "L_clavicle");
        // Only the `from` side is swapped.
        assert_eq!(mirror_name("L_clavicle", Side::Right), "L_clavicle");
    }

    #[test]
    fn test_place_between() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(0.0, 6.0, 0.0);

        let p = place_between(&start, &end, 5.0 / 6.0);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-12);

        assert_eq!(place_between(&start, &end, 0.0), start);
        assert_eq!(place_between(&start, &end, 1.0), end);
    }
}
