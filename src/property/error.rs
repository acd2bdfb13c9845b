//! Property-engine error types.

use crate::property::source::SourceInfo;
use thiserror::Error;

/// Errors that can occur within the property engine.
#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("Property '{key}'@{source_info} is not set")]
    NotSet {
        key: String,
        source_info: SourceInfo,
    },

    #[error("Property '{key}'@{source_info} is already registered")]
    DuplicateKey {
        key: String,
        source_info: SourceInfo,
    },

    #[error("No property '{key}'@{source_info} is registered")]
    UnknownProperty {
        key: String,
        source_info: SourceInfo,
    },

    #[error("Property '{key}' holds {actual} values, not {requested}")]
    TypeMismatch {
        key: String,
        requested: &'static str,
        actual: &'static str,
    },

    #[error("Resolver '{resolver}' wrote '{property}' outside its declared outputs")]
    UndeclaredWrite { resolver: String, property: String },

    #[error("Resolution did not converge after {iterations} sweeps (still changing: {pending:?})")]
    Convergence {
        iterations: usize,
        pending: Vec<String>,
    },

    #[error("Resolver '{resolver}' failed: {source}")]
    Resolver {
        resolver: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type PropertyResult<T> = std::result::Result<T, PropertyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::source::SourceKind;

    #[test]
    fn test_not_set_display() {
        let err = PropertyError::NotSet {
            key: "mtu".to_string(),
            source_info: SourceInfo::new(SourceKind::OutputEdge, 3),
        };
        assert_eq!(err.to_string(), "Property 'mtu'@OUTPUT_EDGE:3 is not set");
    }

    #[test]
    fn test_convergence_lists_pending() {
        let err = PropertyError::Convergence {
            iterations: 32,
            pending: vec!["counter@USER:0".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("32 sweeps"));
        assert!(msg.contains("counter@USER:0"));
    }
}
