//! Shared types for the rig toolkit.
//!
//! - [`RigError`] - Error type shared by every rig crate
//! - [`Side`], [`MirrorAxis`] - Left/right naming and reflection
//! - [`MuscleGroupKind`], [`MuscleUnit`] - Muscle group registry and unit placement
//! - [`RigData`] - Muscle rig data files (`serde` feature)
//!
//! # Layer 0
//!
//! No host application or UI dependencies. The toolkit's scene-graph wiring
//! lives in the host; this crate only carries the data that flows in and out
//! of it.
//!
//! # Example
//!
//! ```
//! use rig_types::{MirrorAxis, MuscleGroupKind, MuscleUnit, Point3, Side};
//!
//! let unit = MuscleUnit::new(
//!     "L_deltoidA",
//!     Point3::new(10.0, 140.0, 0.0),
//!     Point3::new(16.0, 128.0, 1.0),
//!     Point3::new(13.0, 134.0, 0.5),
//! );
//!
//! let mirrored = MirrorAxis::X.reflect(&unit.origin);
//! assert_eq!(mirrored.x, -10.0);
//! assert_eq!(MuscleGroupKind::DeltoidGroup.unit_count(), 3);
//! assert_eq!(Side::Left.opposite(), Side::Right);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

#[cfg(feature = "serde")]
mod data;
mod error;
mod mirror;
mod muscle;

#[cfg(feature = "serde")]
pub use data::{MuscleGroupRecord, RigData};
pub use error::RigError;
pub use mirror::{MirrorAxis, Side, mirror_name, place_between};
pub use muscle::{CENTER_SUFFIX, INSERTION_SUFFIX, MuscleGroupKind, MuscleUnit, ORIGIN_SUFFIX};

// Re-export math types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

/// Result type for rig operations.
pub type Result<T> = std::result::Result<T, RigError>;
