//! Fractional position of a point along a line
//!
//! The position is found by splitting the line where the point projects onto it:
//! a short piece of the line around the nearest location is rotated into a cross-cut,
//! the line is cut with it, and the length of the piece that keeps the line's origin is
//! compared with the full length. Only the first path's origin is considered, so
//! multi-part lines should be split by the caller.

use crate::geometry::{Geometry, GeometryOps, LinearUnit, PointGeometry, PolylineGeometry};
use crate::{Result, TraceError, utils};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Coordinates closer than this match the line origin
const ORIGIN_TOLERANCE: f64 = 1e-9;

/// Policy constants of the percent-along computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentAlongConfig {
    /// Radius of the buffer around the nearest location on the line.
    /// Default: 20 feet
    pub buffer_distance: f64,
    /// Unit of `buffer_distance`
    pub buffer_unit: LinearUnit,
    /// Rotation applied to the buffered piece to turn it into a cross-cut.
    /// Default: 90 degrees
    pub rotation_degrees: f64,
    /// Result used when the line cannot be split. Default: 0.5 (the midpoint)
    pub fallback_percent: f64,
    /// Unit used to measure lengths; it cancels out of the ratio
    pub length_unit: LinearUnit,
}

impl Default for PercentAlongConfig {
    fn default() -> Self {
        Self {
            buffer_distance: 20.0,
            buffer_unit: LinearUnit::Feet,
            rotation_degrees: 90.0,
            fallback_percent: 0.5,
            length_unit: LinearUnit::Meters,
        }
    }
}

/// Computes percent-along values through a [`GeometryOps`] provider
#[derive(Clone)]
pub struct PercentAlongCalculator {
    ops: Arc<dyn GeometryOps>,
    config: PercentAlongConfig,
}

impl std::fmt::Debug for PercentAlongCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PercentAlongCalculator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PercentAlongCalculator {
    pub fn new(ops: Arc<dyn GeometryOps>) -> Self {
        Self::with_config(ops, PercentAlongConfig::default())
    }

    pub fn with_config(ops: Arc<dyn GeometryOps>, config: PercentAlongConfig) -> Self {
        Self { ops, config }
    }

    #[inline]
    pub fn config(&self) -> &PercentAlongConfig {
        &self.config
    }

    /// Percent along `line` of `near_point`, in `[0, 1]`
    ///
    /// Never fails: an unsplittable line or any geometry failure yields
    /// [`PercentAlongConfig::fallback_percent`].
    pub async fn percent_along(&self, line: &PolylineGeometry, near_point: &PointGeometry) -> f64 {
        #[cfg(feature = "profiling")]
        profiling::scope!("percent_along::percent_along");

        match self.try_percent_along(line, near_point).await {
            Ok(Some(percent)) => percent,
            Ok(None) => {
                tracing::debug!(
                    "Cut produced no pieces, using fallback {}",
                    self.config.fallback_percent
                );
                self.config.fallback_percent
            }
            Err(err) => {
                tracing::warn!(
                    "Percent along failed ({err}), using fallback {}",
                    self.config.fallback_percent
                );
                self.config.fallback_percent
            }
        }
    }

    /// Percent along `line` of `near_point`, or `None` when cutting yields no pieces
    ///
    /// Provider calls run strictly one after another.
    pub async fn try_percent_along(
        &self,
        line: &PolylineGeometry,
        near_point: &PointGeometry,
    ) -> Result<Option<f64>> {
        let projected = self
            .ops
            .project(&Geometry::Polyline(line.clone()), &near_point.spatial_reference)
            .await?;
        let projected_line = projected
            .as_polyline()
            .ok_or_else(|| failure("projection did not return a polyline"))?;

        let nearest = self.ops.nearest_coordinate(projected_line, near_point).await?;
        if nearest.is_empty {
            return Err(failure("line has no coordinates"));
        }

        let buffer = self
            .ops
            .geodesic_buffer(
                &Geometry::Point(nearest.coordinate),
                self.config.buffer_distance,
                self.config.buffer_unit,
            )
            .await?;

        let local_piece = self
            .ops
            .intersect(&Geometry::Polygon(buffer), &projected)
            .await?
            .ok_or_else(|| failure("buffer does not intersect the line"))?;

        let rotated = self
            .ops
            .rotate(&local_piece, self.config.rotation_degrees)
            .await?;
        let cutter = rotated
            .as_polyline()
            .ok_or_else(|| failure("rotated cutter is not a polyline"))?;

        let pieces = self.ops.cut(&projected, cutter).await?;
        if pieces.is_empty() {
            return Ok(None);
        }

        let total_length = self
            .ops
            .planar_length(&projected, self.config.length_unit)
            .await?;
        if total_length.partial_cmp(&0.0) != Some(Ordering::Greater) {
            return Err(failure("line has no length"));
        }

        let origin = projected_line
            .first_coord()
            .ok_or_else(|| failure("line has no coordinates"))?;
        let origin_piece = pieces
            .iter()
            .find(|piece| {
                piece
                    .as_polyline()
                    .and_then(PolylineGeometry::first_coord)
                    .is_some_and(|start| utils::coords_equal(start, origin, ORIGIN_TOLERANCE))
            })
            .ok_or_else(|| failure("no cut piece starts at the line origin"))?;

        let piece_length = self
            .ops
            .planar_length(origin_piece, self.config.length_unit)
            .await?;

        Ok(Some((piece_length / total_length).clamp(0.0, 1.0)))
    }
}

fn failure(reason: &str) -> TraceError {
    TraceError::GeometryFailure(reason.to_string())
}
