//! In-process geometry provider backed by `geo`
//!
//! Supports WGS84 and Web Mercator. Buffers are circles built in the geometry's own
//! coordinate space and scaled so that the radius matches the requested ground
//! distance at the buffered location.

use super::{
    Geometry, GeometryOps, LinearUnit, NearestCoordinate, PointGeometry, PolygonGeometry,
    PolylineGeometry, SpatialReference,
};
use crate::{Result, TraceError, utils};
use async_trait::async_trait;
use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{BooleanOps, Coord, Intersects, Line, LineString, MultiLineString, Point, Polygon, Rotate};
use std::cmp::Ordering;

/// Default number of vertices used to approximate buffer circles
const DEFAULT_CIRCLE_SEGMENTS: usize = 64;

/// Two split locations closer than this are the same split
const SPLIT_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinateSystem {
    Geographic,
    WebMercator,
}

fn coordinate_system(spatial_reference: &SpatialReference) -> Result<CoordinateSystem> {
    match spatial_reference.effective_wkid() {
        Some(utils::WKID_WGS84) => Ok(CoordinateSystem::Geographic),
        Some(wkid) if utils::is_web_mercator(wkid) => Ok(CoordinateSystem::WebMercator),
        other => Err(TraceError::GeometryFailure(format!(
            "unsupported spatial reference: {other:?}"
        ))),
    }
}

fn ensure_same_reference(a: &SpatialReference, b: &SpatialReference) -> Result<()> {
    if a.is_equivalent(b) {
        Ok(())
    } else {
        Err(TraceError::GeometryFailure(format!(
            "spatial references differ: {:?} vs {:?}",
            a.effective_wkid(),
            b.effective_wkid()
        )))
    }
}

fn map_coords(
    geometry: &Geometry,
    spatial_reference: SpatialReference,
    f: impl Fn(Coord<f64>) -> Coord<f64>,
) -> Geometry {
    let map_parts = |parts: &[Vec<Coord<f64>>]| -> Vec<Vec<Coord<f64>>> {
        parts
            .iter()
            .map(|part| part.iter().map(|&c| f(c)).collect())
            .collect()
    };

    match geometry {
        Geometry::Point(point) => {
            let c = f(point.coord());
            Geometry::Point(PointGeometry::new(c.x, c.y, spatial_reference))
        }
        Geometry::Polyline(line) => {
            Geometry::Polyline(PolylineGeometry::new(map_parts(&line.paths), spatial_reference))
        }
        Geometry::Polygon(polygon) => {
            Geometry::Polygon(PolygonGeometry::new(map_parts(&polygon.rings), spatial_reference))
        }
    }
}

fn find_coord(geometry: &Geometry, f: impl Fn(Coord<f64>) -> bool) -> Option<Coord<f64>> {
    match geometry {
        Geometry::Point(point) => Some(point.coord()).filter(|&c| f(c)),
        Geometry::Polyline(line) => line.paths.iter().flatten().copied().find(|&c| f(c)),
        Geometry::Polygon(polygon) => polygon.rings.iter().flatten().copied().find(|&c| f(c)),
    }
}

fn to_multi_line_string(line: &PolylineGeometry) -> MultiLineString<f64> {
    MultiLineString::new(
        line.paths
            .iter()
            .map(|path| LineString::new(path.clone()))
            .collect(),
    )
}

fn from_multi_line_string(
    lines: MultiLineString<f64>,
    spatial_reference: SpatialReference,
) -> PolylineGeometry {
    PolylineGeometry::new(
        lines
            .into_iter()
            .map(|line| line.into_inner())
            .filter(|path| path.len() >= 2)
            .collect(),
        spatial_reference,
    )
}

fn to_polygon(polygon: &PolygonGeometry) -> Polygon<f64> {
    let mut rings = polygon
        .rings
        .iter()
        .map(|ring| LineString::new(ring.clone()));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

fn from_polygon(polygon: Polygon<f64>, spatial_reference: SpatialReference) -> PolygonGeometry {
    let (exterior, interiors) = polygon.into_inner();
    let rings = std::iter::once(exterior)
        .chain(interiors)
        .map(|ring| ring.into_inner())
        .collect();
    PolygonGeometry::new(rings, spatial_reference)
}

#[inline]
fn segment_length(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

fn path_length(path: &[Coord<f64>]) -> f64 {
    path.windows(2).map(|w| segment_length(w[0], w[1])).sum()
}

/// Position of `p` along segment `a`->`b`, as a fraction of the segment
fn segment_param(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dx.abs() >= dy.abs() {
        if dx == 0.0 { 0.0 } else { (p.x - a.x) / dx }
    } else {
        (p.y - a.y) / dy
    }
}

/// Split locations of one path: (segment index, fraction, coordinate), in path order
fn split_locations(path: &[Coord<f64>], cutter: &[Line<f64>]) -> Vec<(usize, f64, Coord<f64>)> {
    let last_segment = path.len().saturating_sub(2);
    let mut splits: Vec<(usize, f64, Coord<f64>)> = Vec::new();

    for (segment_index, window) in path.windows(2).enumerate() {
        let segment = Line::new(window[0], window[1]);
        for cut_line in cutter {
            // Collinear overlaps do not define a single cut location
            if let Some(LineIntersection::SinglePoint { intersection, .. }) =
                line_intersection(segment, *cut_line)
            {
                let t = segment_param(window[0], window[1], intersection).clamp(0.0, 1.0);
                let at_path_start = segment_index == 0 && t <= 0.0;
                let at_path_end = segment_index == last_segment && t >= 1.0;
                if !at_path_start && !at_path_end {
                    splits.push((segment_index, t, intersection));
                }
            }
        }
    }

    splits.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    splits.dedup_by(|next, prev| utils::coords_equal(next.2, prev.2, SPLIT_TOLERANCE));
    splits
}

/// Cut one path into pieces at the given split locations
fn split_path(
    path: &[Coord<f64>],
    splits: &[(usize, f64, Coord<f64>)],
) -> Vec<Vec<Coord<f64>>> {
    let mut pieces = Vec::with_capacity(splits.len() + 1);
    let mut current = vec![path[0]];
    let mut pending = splits.iter().peekable();

    for (segment_index, window) in path.windows(2).enumerate() {
        while let Some((_, _, split)) = pending.next_if(|(index, _, _)| *index == segment_index) {
            if !utils::coords_equal(*current.last().unwrap_or(split), *split, SPLIT_TOLERANCE) {
                current.push(*split);
            }
            if current.len() >= 2 {
                pieces.push(std::mem::replace(&mut current, vec![*split]));
            }
        }
        if !current
            .last()
            .is_some_and(|last| utils::coords_equal(*last, window[1], SPLIT_TOLERANCE))
        {
            current.push(window[1]);
        }
    }

    if current.len() >= 2 {
        pieces.push(current);
    }
    pieces
}

/// [`GeometryOps`] implementation that runs in-process on `geo`
#[derive(Debug, Clone, Copy)]
pub struct PlanarGeometryOps {
    circle_segments: usize,
}

impl Default for PlanarGeometryOps {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanarGeometryOps {
    pub fn new() -> Self {
        Self {
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }

    /// Use a different number of vertices for buffer circles (minimum 8)
    pub fn with_circle_segments(circle_segments: usize) -> Self {
        Self {
            circle_segments: circle_segments.max(8),
        }
    }

    /// Closed ellipse ring with vertices offset by half a step from the axes
    fn ellipse_ring(&self, center: Coord<f64>, rx: f64, ry: f64) -> Vec<Coord<f64>> {
        let step = std::f64::consts::TAU / self.circle_segments as f64;
        let mut ring: Vec<Coord<f64>> = (0..self.circle_segments)
            .map(|k| {
                let angle = (k as f64 + 0.5) * step;
                Coord {
                    x: center.x + rx * angle.cos(),
                    y: center.y + ry * angle.sin(),
                }
            })
            .collect();
        ring.push(ring[0]);
        ring
    }
}

#[async_trait]
impl GeometryOps for PlanarGeometryOps {
    async fn project(&self, geometry: &Geometry, target: &SpatialReference) -> Result<Geometry> {
        let source = geometry.spatial_reference();
        if source.is_equivalent(target) {
            return Ok(map_coords(geometry, *target, |c| c));
        }

        match (coordinate_system(&source)?, coordinate_system(target)?) {
            (CoordinateSystem::Geographic, CoordinateSystem::WebMercator) => {
                Ok(map_coords(geometry, *target, utils::wgs84_to_mercator))
            }
            (CoordinateSystem::WebMercator, CoordinateSystem::Geographic) => {
                if let Some(c) = find_coord(geometry, |c| !utils::is_valid_mercator(c)) {
                    return Err(TraceError::GeometryFailure(format!(
                        "coordinate ({}, {}) is outside Web Mercator bounds",
                        c.x, c.y
                    )));
                }
                Ok(map_coords(geometry, *target, utils::mercator_to_wgs84))
            }
            _ => Ok(map_coords(geometry, *target, |c| c)),
        }
    }

    async fn nearest_coordinate(
        &self,
        line: &PolylineGeometry,
        point: &PointGeometry,
    ) -> Result<NearestCoordinate> {
        ensure_same_reference(&line.spatial_reference, &point.spatial_reference)?;

        let p = point.coord();
        let mut best: Option<NearestCoordinate> = None;
        let mut vertex_offset = 0;

        for path in &line.paths {
            if path.len() == 1 {
                let distance = segment_length(path[0], p);
                if best.is_none_or(|b| distance < b.distance) {
                    best = Some(NearestCoordinate {
                        coordinate: PointGeometry::new(path[0].x, path[0].y, line.spatial_reference),
                        distance,
                        vertex_index: vertex_offset,
                        is_right_side: false,
                        is_empty: false,
                    });
                }
            }

            for (i, window) in path.windows(2).enumerate() {
                let (a, b) = (window[0], window[1]);
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let len2 = dx * dx + dy * dy;
                let t = if len2 == 0.0 {
                    0.0
                } else {
                    (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
                };
                let closest = Coord {
                    x: a.x + t * dx,
                    y: a.y + t * dy,
                };
                let distance = segment_length(closest, p);

                if best.is_none_or(|b| distance < b.distance) {
                    let cross = dx * (p.y - a.y) - dy * (p.x - a.x);
                    best = Some(NearestCoordinate {
                        coordinate: PointGeometry::new(closest.x, closest.y, line.spatial_reference),
                        distance,
                        vertex_index: vertex_offset + i,
                        is_right_side: cross < 0.0,
                        is_empty: false,
                    });
                }
            }
            vertex_offset += path.len();
        }

        Ok(best.unwrap_or(NearestCoordinate {
            coordinate: *point,
            distance: f64::INFINITY,
            vertex_index: 0,
            is_right_side: false,
            is_empty: true,
        }))
    }

    async fn geodesic_buffer(
        &self,
        geometry: &Geometry,
        distance: f64,
        unit: LinearUnit,
    ) -> Result<PolygonGeometry> {
        let point = geometry.as_point().ok_or_else(|| {
            TraceError::GeometryFailure(format!(
                "geodesic buffer of {} is not supported",
                geometry.type_name()
            ))
        })?;
        let meters = unit.to_meters(distance);
        if meters.partial_cmp(&0.0) != Some(Ordering::Greater) {
            return Err(TraceError::GeometryFailure(format!(
                "buffer distance must be positive, got {distance}"
            )));
        }

        let center = point.coord();
        let (rx, ry) = match coordinate_system(&point.spatial_reference)? {
            CoordinateSystem::WebMercator => {
                let latitude = utils::mercator_to_wgs84(center).y;
                let r = meters * utils::mercator_scale_factor(latitude);
                (r, r)
            }
            CoordinateSystem::Geographic => {
                let ry = meters / utils::meters_per_degree();
                (ry * utils::mercator_scale_factor(center.y), ry)
            }
        };

        Ok(PolygonGeometry::new(
            vec![self.ellipse_ring(center, rx, ry)],
            point.spatial_reference,
        ))
    }

    async fn intersect(&self, a: &Geometry, b: &Geometry) -> Result<Option<Geometry>> {
        ensure_same_reference(&a.spatial_reference(), &b.spatial_reference())?;
        let spatial_reference = a.spatial_reference();

        match (a, b) {
            (Geometry::Polygon(polygon), Geometry::Polyline(line))
            | (Geometry::Polyline(line), Geometry::Polygon(polygon)) => {
                let clipped = to_polygon(polygon).clip(&to_multi_line_string(line), false);
                let clipped = from_multi_line_string(clipped, spatial_reference);
                Ok((!clipped.is_empty()).then_some(Geometry::Polyline(clipped)))
            }
            (Geometry::Polygon(polygon), Geometry::Point(point))
            | (Geometry::Point(point), Geometry::Polygon(polygon)) => {
                let inside = to_polygon(polygon).intersects(&Point::from(point.coord()));
                Ok(inside.then_some(Geometry::Point(*point)))
            }
            (Geometry::Point(p), Geometry::Point(q)) => Ok(utils::coords_equal(
                p.coord(),
                q.coord(),
                SPLIT_TOLERANCE,
            )
            .then_some(Geometry::Point(*p))),
            _ => Err(TraceError::GeometryFailure(format!(
                "intersection of {} and {} is not supported",
                a.type_name(),
                b.type_name()
            ))),
        }
    }

    async fn rotate(&self, geometry: &Geometry, angle_degrees: f64) -> Result<Geometry> {
        let spatial_reference = geometry.spatial_reference();
        Ok(match geometry {
            Geometry::Point(point) => Geometry::Point(*point),
            Geometry::Polyline(line) => Geometry::Polyline(from_multi_line_string(
                to_multi_line_string(line).rotate_around_centroid(angle_degrees),
                spatial_reference,
            )),
            Geometry::Polygon(polygon) => Geometry::Polygon(from_polygon(
                to_polygon(polygon).rotate_around_centroid(angle_degrees),
                spatial_reference,
            )),
        })
    }

    async fn cut(&self, geometry: &Geometry, cutter: &PolylineGeometry) -> Result<Vec<Geometry>> {
        let line = geometry.as_polyline().ok_or_else(|| {
            TraceError::GeometryFailure(format!("cutting {} is not supported", geometry.type_name()))
        })?;
        ensure_same_reference(&line.spatial_reference, &cutter.spatial_reference)?;

        let cutter_lines: Vec<Line<f64>> = cutter
            .paths
            .iter()
            .flat_map(|path| path.windows(2).map(|w| Line::new(w[0], w[1])))
            .collect();

        let mut pieces = Vec::new();
        let mut any_split = false;
        for path in line.paths.iter().filter(|path| path.len() >= 2) {
            let splits = split_locations(path, &cutter_lines);
            any_split |= !splits.is_empty();
            pieces.extend(split_path(path, &splits));
        }

        if !any_split {
            return Ok(Vec::new());
        }

        Ok(pieces
            .into_iter()
            .map(|piece| {
                Geometry::Polyline(PolylineGeometry::new(vec![piece], line.spatial_reference))
            })
            .collect())
    }

    async fn planar_length(&self, geometry: &Geometry, unit: LinearUnit) -> Result<f64> {
        let line = geometry.as_polyline().ok_or_else(|| {
            TraceError::GeometryFailure(format!(
                "length of {} is not supported",
                geometry.type_name()
            ))
        })?;

        let length: f64 = match coordinate_system(&line.spatial_reference)? {
            CoordinateSystem::WebMercator => line.paths.iter().map(|p| path_length(p)).sum(),
            CoordinateSystem::Geographic => line
                .paths
                .iter()
                .map(|path| {
                    let projected: Vec<Coord<f64>> =
                        path.iter().map(|&c| utils::wgs84_to_mercator(c)).collect();
                    path_length(&projected)
                })
                .sum(),
        };

        Ok(unit.from_meters(length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mercator_line(coords: &[(f64, f64)]) -> PolylineGeometry {
        PolylineGeometry::new(
            vec![coords.iter().map(|&(x, y)| Coord { x, y }).collect()],
            SpatialReference::web_mercator(),
        )
    }

    fn mercator_point(x: f64, y: f64) -> PointGeometry {
        PointGeometry::new(x, y, SpatialReference::web_mercator())
    }

    #[tokio::test]
    async fn test_project_roundtrip() {
        let ops = PlanarGeometryOps::new();
        let point: Geometry =
            PointGeometry::new(-117.19, 34.05, SpatialReference::wgs84()).into();

        let projected = ops
            .project(&point, &SpatialReference::web_mercator())
            .await
            .unwrap();
        assert_eq!(
            projected.spatial_reference(),
            SpatialReference::web_mercator()
        );

        let back = ops
            .project(&projected, &SpatialReference::wgs84())
            .await
            .unwrap();
        let back = back.as_point().unwrap();
        assert!((back.x + 117.19).abs() < 1e-9);
        assert!((back.y - 34.05).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_project_rejects_out_of_bounds_mercator() {
        let ops = PlanarGeometryOps::new();
        let line: Geometry = mercator_line(&[
            (0.0, 0.0),
            (utils::EARTH_MERCATOR_MAX + 10.0, 0.0),
        ])
        .into();

        let result = ops.project(&line, &SpatialReference::wgs84()).await;
        assert!(matches!(result, Err(TraceError::GeometryFailure(_))));

        let inside: Geometry = mercator_line(&[(0.0, 0.0), (1000.0, 1000.0)]).into();
        assert!(ops.project(&inside, &SpatialReference::wgs84()).await.is_ok());
    }

    #[tokio::test]
    async fn test_project_unsupported_reference() {
        let ops = PlanarGeometryOps::new();
        let point: Geometry = PointGeometry::new(1.0, 2.0, SpatialReference::from_wkid(2230)).into();
        let result = ops.project(&point, &SpatialReference::wgs84()).await;
        assert!(matches!(result, Err(TraceError::GeometryFailure(_))));
    }

    #[tokio::test]
    async fn test_nearest_coordinate() {
        let ops = PlanarGeometryOps::new();
        let line = mercator_line(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);

        let below = ops
            .nearest_coordinate(&line, &mercator_point(30.0, -5.0))
            .await
            .unwrap();
        assert!(utils::coords_equal(below.coordinate.coord(), Coord { x: 30.0, y: 0.0 }, 1e-9));
        assert!((below.distance - 5.0).abs() < 1e-12);
        assert_eq!(below.vertex_index, 0);
        assert!(below.is_right_side);
        assert!(!below.is_empty);

        let beside = ops
            .nearest_coordinate(&line, &mercator_point(90.0, 60.0))
            .await
            .unwrap();
        assert!(utils::coords_equal(beside.coordinate.coord(), Coord { x: 100.0, y: 60.0 }, 1e-9));
        assert_eq!(beside.vertex_index, 1);
        assert!(!beside.is_right_side);
    }

    #[tokio::test]
    async fn test_nearest_coordinate_on_empty_line() {
        let ops = PlanarGeometryOps::new();
        let line = PolylineGeometry::new(Vec::new(), SpatialReference::web_mercator());
        let nearest = ops
            .nearest_coordinate(&line, &mercator_point(1.0, 1.0))
            .await
            .unwrap();
        assert!(nearest.is_empty);
    }

    #[tokio::test]
    async fn test_nearest_coordinate_requires_same_reference() {
        let ops = PlanarGeometryOps::new();
        let line = mercator_line(&[(0.0, 0.0), (1.0, 0.0)]);
        let point = PointGeometry::new(0.0, 0.0, SpatialReference::wgs84());
        assert!(ops.nearest_coordinate(&line, &point).await.is_err());
    }

    #[tokio::test]
    async fn test_geodesic_buffer_radius_at_equator() {
        let ops = PlanarGeometryOps::new();
        let buffer = ops
            .geodesic_buffer(&mercator_point(0.0, 0.0).into(), 20.0, LinearUnit::Feet)
            .await
            .unwrap();

        let ring = &buffer.rings[0];
        assert_eq!(ring.len(), DEFAULT_CIRCLE_SEGMENTS + 1);
        assert_eq!(ring.first(), ring.last());
        for c in ring {
            assert!((c.x.hypot(c.y) - 6.096).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_geodesic_buffer_rejects_non_positive_distance() {
        let ops = PlanarGeometryOps::new();
        let point: Geometry = PointGeometry::new(0.0, 0.0, SpatialReference::web_mercator()).into();
        for distance in [0.0, -5.0, f64::NAN] {
            let result = ops.geodesic_buffer(&point, distance, LinearUnit::Feet).await;
            assert!(matches!(result, Err(TraceError::GeometryFailure(_))), "{distance}");
        }
    }

    #[tokio::test]
    async fn test_geodesic_buffer_rejects_lines() {
        let ops = PlanarGeometryOps::new();
        let line: Geometry = mercator_line(&[(0.0, 0.0), (1.0, 0.0)]).into();
        assert!(ops.geodesic_buffer(&line, 1.0, LinearUnit::Meters).await.is_err());
    }

    #[tokio::test]
    async fn test_intersect_buffer_with_line() {
        let ops = PlanarGeometryOps::new();
        let buffer = ops
            .geodesic_buffer(&mercator_point(50.0, 0.0).into(), 5.0, LinearUnit::Meters)
            .await
            .unwrap();
        let line: Geometry = mercator_line(&[(0.0, 0.0), (100.0, 0.0)]).into();

        let piece = ops
            .intersect(&buffer.into(), &line)
            .await
            .unwrap()
            .unwrap();
        let length = ops.planar_length(&piece, LinearUnit::Meters).await.unwrap();
        assert!((length - 10.0).abs() < 0.05);
    }

    #[tokio::test]
    async fn test_intersect_disjoint_is_none() {
        let ops = PlanarGeometryOps::new();
        let buffer = ops
            .geodesic_buffer(&mercator_point(50.0, 50.0).into(), 5.0, LinearUnit::Meters)
            .await
            .unwrap();
        let line: Geometry = mercator_line(&[(0.0, 0.0), (100.0, 0.0)]).into();
        assert!(ops.intersect(&buffer.into(), &line).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rotate_quarter_turn() {
        let ops = PlanarGeometryOps::new();
        let segment: Geometry = mercator_line(&[(-1.0, 0.0), (1.0, 0.0)]).into();

        let rotated = ops.rotate(&segment, 90.0).await.unwrap();
        let path = &rotated.as_polyline().unwrap().paths[0];
        assert!(path[0].x.abs() < 1e-12);
        assert!(path[1].x.abs() < 1e-12);
        assert!(((path[0].y - path[1].y).abs() - 2.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_cut_into_two_pieces() {
        let ops = PlanarGeometryOps::new();
        let line: Geometry = mercator_line(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]).into();
        let cutter = mercator_line(&[(4.0, -1.0), (4.0, 1.0)]);

        let pieces = ops.cut(&line, &cutter).await.unwrap();
        assert_eq!(pieces.len(), 2);

        let first = pieces[0].as_polyline().unwrap();
        assert_eq!(first.first_coord(), Some(Coord { x: 0.0, y: 0.0 }));
        let lengths = [
            ops.planar_length(&pieces[0], LinearUnit::Meters).await.unwrap(),
            ops.planar_length(&pieces[1], LinearUnit::Meters).await.unwrap(),
        ];
        assert!((lengths[0] - 4.0).abs() < 1e-9);
        assert!((lengths[1] - 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_cut_through_vertex_splits_once() {
        let ops = PlanarGeometryOps::new();
        let line: Geometry = mercator_line(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]).into();
        let cutter = mercator_line(&[(5.0, -1.0), (5.0, 1.0)]);

        let pieces = ops.cut(&line, &cutter).await.unwrap();
        assert_eq!(pieces.len(), 2);
    }

    #[tokio::test]
    async fn test_cut_without_crossing_is_empty() {
        let ops = PlanarGeometryOps::new();
        let line: Geometry = mercator_line(&[(0.0, 0.0), (10.0, 0.0)]).into();
        let cutter = mercator_line(&[(20.0, -1.0), (20.0, 1.0)]);
        assert!(ops.cut(&line, &cutter).await.unwrap().is_empty());

        // Touching only the start does not split the line
        let cutter = mercator_line(&[(0.0, -1.0), (0.0, 1.0)]);
        assert!(ops.cut(&line, &cutter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_planar_length_units() {
        let ops = PlanarGeometryOps::new();
        let line: Geometry = mercator_line(&[(0.0, 0.0), (3.048, 0.0)]).into();
        let feet = ops.planar_length(&line, LinearUnit::Feet).await.unwrap();
        assert!((feet - 10.0).abs() < 1e-9);
    }
}
