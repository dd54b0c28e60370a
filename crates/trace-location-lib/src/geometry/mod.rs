//! Geometry values and the geometry provider contract
//!
//! Geometries use the Esri JSON shape (`x`/`y`, `paths`, `rings`, `spatialReference`)
//! so that features from a feature service can be passed straight through.

pub mod planar;

use crate::Result;
use async_trait::async_trait;
use geo::Coord;
use serde::{Deserialize, Serialize};

/// Spatial reference of a geometry, identified by well-known id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<i32>,
}

impl SpatialReference {
    pub fn from_wkid(wkid: i32) -> Self {
        Self {
            wkid: Some(wkid),
            latest_wkid: None,
        }
    }

    pub fn wgs84() -> Self {
        Self::from_wkid(crate::utils::WKID_WGS84)
    }

    pub fn web_mercator() -> Self {
        Self::from_wkid(crate::utils::WKID_WEB_MERCATOR)
    }

    /// The most specific wkid available
    pub fn effective_wkid(&self) -> Option<i32> {
        self.latest_wkid.or(self.wkid)
    }

    /// Whether both references describe the same coordinate system
    pub fn is_equivalent(&self, other: &SpatialReference) -> bool {
        match (self.effective_wkid(), other.effective_wkid()) {
            (Some(a), Some(b)) => {
                a == b || (crate::utils::is_web_mercator(a) && crate::utils::is_web_mercator(b))
            }
            (None, None) => true,
            _ => false,
        }
    }
}

/// A single location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointGeometry {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub spatial_reference: SpatialReference,
}

impl PointGeometry {
    pub fn new(x: f64, y: f64, spatial_reference: SpatialReference) -> Self {
        Self {
            x,
            y,
            spatial_reference,
        }
    }

    #[inline]
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

/// A line made of one or more paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolylineGeometry {
    #[serde(with = "esri_coords")]
    pub paths: Vec<Vec<Coord<f64>>>,
    #[serde(default)]
    pub spatial_reference: SpatialReference,
}

impl PolylineGeometry {
    pub fn new(paths: Vec<Vec<Coord<f64>>>, spatial_reference: SpatialReference) -> Self {
        Self {
            paths,
            spatial_reference,
        }
    }

    /// Starting coordinate of the first path
    pub fn first_coord(&self) -> Option<Coord<f64>> {
        self.paths.first().and_then(|path| path.first()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(|path| path.is_empty())
    }
}

/// An area bounded by one or more rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonGeometry {
    #[serde(with = "esri_coords")]
    pub rings: Vec<Vec<Coord<f64>>>,
    #[serde(default)]
    pub spatial_reference: SpatialReference,
}

impl PolygonGeometry {
    pub fn new(rings: Vec<Vec<Coord<f64>>>, spatial_reference: SpatialReference) -> Self {
        Self {
            rings,
            spatial_reference,
        }
    }
}

/// Any geometry a feature or provider can produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Point(PointGeometry),
    Polyline(PolylineGeometry),
    Polygon(PolygonGeometry),
}

impl Geometry {
    pub fn spatial_reference(&self) -> SpatialReference {
        match self {
            Geometry::Point(point) => point.spatial_reference,
            Geometry::Polyline(line) => line.spatial_reference,
            Geometry::Polygon(polygon) => polygon.spatial_reference,
        }
    }

    pub fn as_point(&self) -> Option<&PointGeometry> {
        match self {
            Geometry::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&PolylineGeometry> {
        match self {
            Geometry::Polyline(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonGeometry> {
        match self {
            Geometry::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    }

    /// Esri geometry type name, used in log and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "esriGeometryPoint",
            Geometry::Polyline(_) => "esriGeometryPolyline",
            Geometry::Polygon(_) => "esriGeometryPolygon",
        }
    }
}

impl From<PointGeometry> for Geometry {
    fn from(point: PointGeometry) -> Self {
        Geometry::Point(point)
    }
}

impl From<PolylineGeometry> for Geometry {
    fn from(line: PolylineGeometry) -> Self {
        Geometry::Polyline(line)
    }
}

impl From<PolygonGeometry> for Geometry {
    fn from(polygon: PolygonGeometry) -> Self {
        Geometry::Polygon(polygon)
    }
}

/// Linear units accepted by buffer and length operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinearUnit {
    #[default]
    Meters,
    Feet,
}

impl LinearUnit {
    #[inline]
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            LinearUnit::Meters => value,
            LinearUnit::Feet => value * crate::utils::METERS_PER_FOOT,
        }
    }

    #[inline]
    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            LinearUnit::Meters => meters,
            LinearUnit::Feet => meters / crate::utils::METERS_PER_FOOT,
        }
    }
}

impl std::str::FromStr for LinearUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meters" | "meter" | "m" => Ok(LinearUnit::Meters),
            "feet" | "foot" | "ft" => Ok(LinearUnit::Feet),
            other => Err(format!("unknown linear unit: {other}")),
        }
    }
}

/// Result of a nearest-coordinate-on-line query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestCoordinate {
    /// Closest location on the line
    pub coordinate: PointGeometry,
    /// Distance from the query point, in the line's coordinate units
    pub distance: f64,
    /// Index of the vertex that starts the closest segment
    pub vertex_index: usize,
    /// Whether the query point lies right of the line's direction
    pub is_right_side: bool,
    /// Set when the line had no coordinates to snap to
    pub is_empty: bool,
}

/// Geometry provider consumed by percent-along computation
///
/// Every call may be remote; callers run them strictly in sequence.
#[async_trait]
pub trait GeometryOps: Send + Sync {
    /// Re-express a geometry in another spatial reference
    async fn project(&self, geometry: &Geometry, target: &SpatialReference) -> Result<Geometry>;

    /// Closest location on `line` to `point`
    async fn nearest_coordinate(
        &self,
        line: &PolylineGeometry,
        point: &PointGeometry,
    ) -> Result<NearestCoordinate>;

    /// Polygon covering every location within a ground distance of the geometry
    async fn geodesic_buffer(
        &self,
        geometry: &Geometry,
        distance: f64,
        unit: LinearUnit,
    ) -> Result<PolygonGeometry>;

    /// Shared part of two geometries, `None` when they do not overlap
    async fn intersect(&self, a: &Geometry, b: &Geometry) -> Result<Option<Geometry>>;

    /// Rotate counter-clockwise about the geometry's own centroid
    async fn rotate(&self, geometry: &Geometry, angle_degrees: f64) -> Result<Geometry>;

    /// Split a geometry with a cutter line; empty when the cutter does not cross it
    async fn cut(&self, geometry: &Geometry, cutter: &PolylineGeometry) -> Result<Vec<Geometry>>;

    /// Planar length of a line
    async fn planar_length(&self, geometry: &Geometry, unit: LinearUnit) -> Result<f64>;
}

/// Serde adapter for Esri coordinate arrays, tolerating z and m values
mod esri_coords {
    use geo::Coord;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        parts: &[Vec<Coord<f64>>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let raw: Vec<Vec<[f64; 2]>> = parts
            .iter()
            .map(|part| part.iter().map(|c| [c.x, c.y]).collect())
            .collect();
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<Coord<f64>>>, D::Error> {
        let raw = Vec::<Vec<Vec<f64>>>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|part| {
                part.into_iter()
                    .map(|values| match values.as_slice() {
                        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
                        _ => Err(D::Error::custom("coordinate needs at least x and y")),
                    })
                    .collect()
            })
            .collect()
    }
}
