//! Hard failures of the habitat model.
//!
//! The model never fails on "bad but structurally valid" numbers (zero or
//! negative dimensions, empty designs). It only fails when a design refers
//! to something that does not exist: a module kind missing from the catalog
//! or a shape key with no formula. Soft design problems are reported by
//! [`crate::validation`] instead.

use std::fmt;

/// A design references a module kind or shape the model does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Module kind is not present in the catalog.
    UnknownModuleKind(String),
    /// Shape key does not name any module solid.
    UnknownShape(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownModuleKind(kind) => {
                write!(f, "Unknown module kind: {kind:?}")
            }
            ConfigurationError::UnknownShape(shape) => write!(f, "Unknown module shape: {shape:?}"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_kind() {
        let err = ConfigurationError::UnknownModuleKind("Hot Tub".to_string());
        assert_eq!(err.to_string(), "Unknown module kind: \"Hot Tub\"");
    }

    #[test]
    fn message_names_the_shape() {
        let err = ConfigurationError::UnknownShape("torus".to_string());
        assert!(err.to_string().contains("torus"));
    }
}
