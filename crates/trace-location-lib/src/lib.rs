//! Trace Location Library - Asset Schema Resolution for Utility Networks
//!
//! This library classifies utility network features against the network's schema
//! definition and builds the trace locations (starting points and barriers) that an
//! external trace service consumes. It also groups trace results back into per-layer
//! buckets so callers can fetch the matching features with one query per layer.
//!
//! # Architecture
//!
//! - **[`SchemaDefinition`]**: Immutable, typed copy of the network's data element
//! - **[`SchemaIndex`]**: Read-only lookups over the schema (sources, groups, types, terminals)
//! - **[`AssetResolver`]**: Classifies a (layer, asset group, asset type) triple
//! - **[`PercentAlongCalculator`]**: Fractional position of a point along a line
//! - **[`TraceLocationBuilder`]**: Produces trace locations for a located feature
//! - **[`AssetGrouper`]**: Buckets trace result elements by network, source, group and type
//!
//! Geometry work is delegated to a [`GeometryOps`] provider. [`PlanarGeometryOps`] is an
//! in-process implementation built on `geo`.

mod feature;
pub mod geometry;
mod grouper;
mod index;
mod percent_along;
mod resolver;
mod schema;
mod trace_location;
pub mod utils;

// Public API exports
pub use feature::{FeatureLayer, FieldInfo, LayerFields, LocatedFeature};
pub use geometry::planar::PlanarGeometryOps;
pub use geometry::{
    Geometry, GeometryOps, LinearUnit, NearestCoordinate, PointGeometry, PolygonGeometry,
    PolylineGeometry, SpatialReference,
};
pub use grouper::{AssetGrouper, ElementBucket, GroupedElements, LayerQuery, NetworkElement};
pub use index::SchemaIndex;
pub use percent_along::{PercentAlongCalculator, PercentAlongConfig};
pub use resolver::{AssetResolver, ResolvedAsset};
pub use schema::{
    AssetGroup, AssetSource, AssetType, DomainNetwork, SchemaDefinition, ShapeType, SourceKind,
    Terminal, TerminalConfiguration,
};
pub use trace_location::{TraceLocation, TraceLocationBuilder, TraceLocationType, TracePosition};

use std::fmt;

/// A schema lookup that produced no result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLookup {
    /// No asset source is backed by this layer
    Layer(i64),
    /// The asset group code does not exist under the layer's source
    AssetGroup { layer_id: i64, asset_group_code: i64 },
    /// The asset type code does not exist under the asset group
    AssetType {
        layer_id: i64,
        asset_group_code: i64,
        asset_type_code: i64,
    },
}

impl fmt::Display for SchemaLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLookup::Layer(layer_id) => write!(f, "layer {layer_id}"),
            SchemaLookup::AssetGroup {
                layer_id,
                asset_group_code,
            } => write!(f, "asset group {asset_group_code} on layer {layer_id}"),
            SchemaLookup::AssetType {
                layer_id,
                asset_group_code,
                asset_type_code,
            } => write!(
                f,
                "asset type {asset_type_code} in asset group {asset_group_code} on layer {layer_id}"
            ),
        }
    }
}

/// Error types for schema resolution and trace location construction
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("Asset not recognized in schema: {0}")]
    NotFound(SchemaLookup),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Geometry failure: {0}")]
    GeometryFailure(String),

    #[error("Schema parsing error: {0}")]
    SchemaParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Whether this error means "the feature is not part of this network"
    pub fn is_not_found(&self) -> bool {
        matches!(self, TraceError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn() -> PercentAlongConfig = PercentAlongConfig::default;
        let _: fn() -> PlanarGeometryOps = PlanarGeometryOps::new;
    }

    #[test]
    fn test_not_found_message() {
        let err = TraceError::NotFound(SchemaLookup::AssetType {
            layer_id: 913,
            asset_group_code: 45,
            asset_type_code: 99,
        });
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Asset not recognized in schema: asset type 99 in asset group 45 on layer 913"
        );
    }

    #[test]
    fn test_other_errors_are_not_not_found() {
        assert!(!TraceError::MissingField("globalid".into()).is_not_found());
        assert!(!TraceError::GeometryFailure("empty cut".into()).is_not_found());
    }
}
