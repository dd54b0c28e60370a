//! Trace locations and their construction from located features

use crate::feature::{LayerFields, LocatedFeature};
use crate::geometry::{Geometry, GeometryOps, PointGeometry};
use crate::index::SchemaIndex;
use crate::percent_along::{PercentAlongCalculator, PercentAlongConfig};
use crate::resolver::{AssetResolver, ResolvedAsset};
use crate::{Result, TraceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Role of a trace location in a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraceLocationType {
    #[default]
    StartingPoint,
    Barrier,
}

/// Where on the feature the trace location sits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TracePosition {
    /// A terminal of a point feature
    TerminalId(i64),
    /// Fractional position along a line feature
    PercentAlong(f64),
}

/// A feature location where a trace starts or stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceLocation {
    pub trace_location_type: TraceLocationType,
    pub global_id: String,
    pub layer_id: i64,
    pub asset_group_code: i64,
    pub asset_type_code: i64,
    pub is_terminal_configuration_supported: bool,
    #[serde(flatten)]
    pub position: TracePosition,
}

impl TraceLocation {
    fn for_asset(
        location_type: TraceLocationType,
        global_id: &str,
        asset: &ResolvedAsset,
        position: TracePosition,
    ) -> Self {
        Self {
            trace_location_type: location_type,
            global_id: global_id.to_string(),
            layer_id: asset.layer_id,
            asset_group_code: asset.asset_group_code,
            asset_type_code: asset.asset_type_code(),
            is_terminal_configuration_supported: asset.is_terminal_configuration_supported(),
            position,
        }
    }

    pub fn terminal_id(&self) -> Option<i64> {
        match self.position {
            TracePosition::TerminalId(id) => Some(id),
            TracePosition::PercentAlong(_) => None,
        }
    }

    pub fn percent_along(&self) -> Option<f64> {
        match self.position {
            TracePosition::PercentAlong(percent) => Some(percent),
            TracePosition::TerminalId(_) => None,
        }
    }
}

/// Builds trace locations for located features
///
/// Holds only shared, read-only state, so one builder can serve many concurrent
/// builds.
#[derive(Debug, Clone)]
pub struct TraceLocationBuilder {
    resolver: AssetResolver,
    percent_along: PercentAlongCalculator,
}

impl TraceLocationBuilder {
    pub fn new(index: SchemaIndex, ops: Arc<dyn GeometryOps>) -> Self {
        Self::with_config(index, ops, PercentAlongConfig::default())
    }

    pub fn with_config(
        index: SchemaIndex,
        ops: Arc<dyn GeometryOps>,
        config: PercentAlongConfig,
    ) -> Self {
        Self {
            resolver: AssetResolver::new(index),
            percent_along: PercentAlongCalculator::with_config(ops, config),
        }
    }

    #[inline]
    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    /// Build trace locations, discovering the classification fields from the feature's layer
    pub async fn build(
        &self,
        feature: &LocatedFeature,
        location_type: TraceLocationType,
        near_point: &PointGeometry,
    ) -> Result<Vec<TraceLocation>> {
        let fields = LayerFields::discover(&feature.layer)?;
        self.build_with_fields(feature, location_type, near_point, &fields)
            .await
    }

    /// Build trace locations using explicit classification fields
    ///
    /// A line feature yields one location positioned by percent along. A point feature
    /// yields one location per terminal of its asset type's terminal configuration, and
    /// none when the asset type has no known terminal configuration.
    pub async fn build_with_fields(
        &self,
        feature: &LocatedFeature,
        location_type: TraceLocationType,
        near_point: &PointGeometry,
        fields: &LayerFields,
    ) -> Result<Vec<TraceLocation>> {
        let global_id = feature.text(&fields.global_id_field)?;
        let asset_group_code = feature.code(&fields.asset_group_field)?;
        let asset_type_code = feature.code(&fields.asset_type_field)?;

        let asset = self
            .resolver
            .resolve(fields.layer_id, asset_group_code, asset_type_code)?;

        match &feature.geometry {
            Geometry::Polyline(line) => {
                let percent = self.percent_along.percent_along(line, near_point).await;
                Ok(vec![TraceLocation::for_asset(
                    location_type,
                    &global_id,
                    &asset,
                    TracePosition::PercentAlong(percent),
                )])
            }
            Geometry::Point(_) => {
                let configuration = asset.terminal_configuration_id().and_then(|id| {
                    self.resolver.index().find_terminal_configuration(id)
                });

                let Some(configuration) = configuration else {
                    tracing::debug!(
                        "No terminal configuration for {global_id} (asset type {asset_type_code}), no trace locations"
                    );
                    return Ok(Vec::new());
                };

                Ok(configuration
                    .terminals
                    .iter()
                    .map(|terminal| {
                        TraceLocation::for_asset(
                            location_type,
                            &global_id,
                            &asset,
                            TracePosition::TerminalId(terminal.terminal_id),
                        )
                    })
                    .collect())
            }
            Geometry::Polygon(_) => Err(TraceError::GeometryFailure(format!(
                "{global_id} is a polygon and cannot hold a trace location"
            ))),
        }
    }

    /// Build trace locations for several features concurrently
    ///
    /// Results are returned in input order and are independent of each other.
    pub async fn build_all(
        &self,
        requests: &[(LocatedFeature, PointGeometry)],
        location_type: TraceLocationType,
    ) -> Vec<Result<Vec<TraceLocation>>> {
        futures::future::join_all(
            requests
                .iter()
                .map(|(feature, near_point)| self.build(feature, location_type, near_point)),
        )
        .await
    }
}
