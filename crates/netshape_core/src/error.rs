//! Error types for netshape core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or exporting a network graph.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node feature carried a geometry other than a point.
    #[error("wrong geometry type {found} (should be 'Point')")]
    GeometryTypeMismatch {
        /// Geometry type that was found.
        found: String,
    },

    /// A link feature geometry cannot describe a path.
    #[error("invalid link geometry: {message}")]
    InvalidGeometry {
        /// Description of the problem.
        message: String,
    },

    /// A link endpoint did not match any node at any allowed precision.
    #[error("no node found at ({x}, {y}) down to {min_decimals} decimal(s)")]
    UnresolvedCoordinate {
        /// Endpoint x coordinate.
        x: f64,
        /// Endpoint y coordinate.
        y: f64,
        /// Lowest precision that was tried.
        min_decimals: u32,
    },

    /// Two inferred field types were observed for one attribute in a class.
    #[error("ambiguous data type for attribute '{attribute}' in class '{class}'")]
    AmbiguousSchema {
        /// Entity class being exported.
        class: String,
        /// Attribute with conflicting types.
        attribute: String,
    },

    /// Two fields truncate to the same short field identifier.
    #[error("fields '{first}' and '{second}' both truncate to '{short_name}' in class '{class}'")]
    FieldNameCollision {
        /// Entity class being exported.
        class: String,
        /// First field name.
        first: String,
        /// Second field name.
        second: String,
        /// Shared truncated identifier.
        short_name: String,
    },

    /// A link referenced a node that is not part of the network.
    #[error("unknown node {node_id}")]
    UnknownNode {
        /// The missing node identity.
        node_id: i64,
    },

    /// A remote payload could not be turned into graph entities.
    #[error("invalid payload: {message}")]
    InvalidPayload {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a geometry type mismatch error.
    pub fn geometry_type_mismatch(found: impl Into<String>) -> Self {
        Self::GeometryTypeMismatch {
            found: found.into(),
        }
    }

    /// Creates an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Creates an ambiguous schema error.
    pub fn ambiguous_schema(class: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::AmbiguousSchema {
            class: class.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_schema_names_attribute() {
        let err = CoreError::ambiguous_schema("Generic node", "depth");
        let msg = err.to_string();
        assert!(msg.contains("'depth'"));
        assert!(msg.contains("Generic node"));
    }

    #[test]
    fn geometry_mismatch_display() {
        let err = CoreError::geometry_type_mismatch("LineString");
        assert_eq!(
            err.to_string(),
            "wrong geometry type LineString (should be 'Point')"
        );
    }
}
