//! Error types for rig operations.

use thiserror::Error;

/// Errors that can occur while configuring rigs or reading rig data.
#[derive(Debug, Error)]
pub enum RigError {
    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A parameter was `NaN` or infinite.
    #[error("parameter {name} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending parameter.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// Attribute name not known to the node.
    #[error("unknown attribute: {name}")]
    UnknownAttribute {
        /// The attribute name that was looked up.
        name: String,
    },

    /// Muscle group tag not in the registry.
    #[error("unknown muscle group kind: {tag}")]
    UnknownGroupKind {
        /// The tag read from the data.
        tag: String,
    },

    /// Muscle group not found in rig data.
    #[error("muscle group not found: {name}")]
    GroupNotFound {
        /// Name of the missing group.
        name: String,
    },

    /// Mirroring would not rename the group, so the result would overwrite
    /// the source.
    #[error("group {name} has no {prefix} prefix to mirror from")]
    NotSided {
        /// Group name.
        name: String,
        /// The side prefix that was expected.
        prefix: String,
    },

    /// A muscle group is missing a required input joint.
    #[error("muscle group {group} is missing input {input}")]
    MissingInput {
        /// Group name.
        group: String,
        /// Name of the missing input.
        input: String,
    },

    /// A muscle unit is missing one of its origin/insertion/center joints.
    #[error("muscle unit {unit} is missing joint {joint}")]
    IncompleteUnit {
        /// Unit name.
        unit: String,
        /// Name of the missing joint.
        joint: String,
    },

    /// Number of per-joint inputs does not match the number of joints.
    #[error("input count mismatch: expected {expected}, got {actual}")]
    InputCountMismatch {
        /// Number of joints.
        expected: usize,
        /// Number of inputs provided.
        actual: usize,
    },

    /// I/O error while reading or writing rig data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed rig data.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RigError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a non-finite parameter error.
    #[must_use]
    pub fn non_finite(name: impl Into<String>, value: f64) -> Self {
        Self::NonFinite {
            name: name.into(),
            value,
        }
    }

    /// Create an unknown attribute error.
    #[must_use]
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }

    /// Check that `value` is finite, naming it in the error otherwise.
    pub fn check_finite(name: &str, value: f64) -> crate::Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::non_finite(name, value))
        }
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::NonFinite { .. })
    }

    /// Check if this error came from reading or parsing rig data.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::Io(_)
            | Self::UnknownGroupKind { .. }
            | Self::MissingInput { .. }
            | Self::IncompleteUnit { .. } => true,
            #[cfg(feature = "serde")]
            Self::Json(_) => true,
            _ => false,
        }
    }
}
