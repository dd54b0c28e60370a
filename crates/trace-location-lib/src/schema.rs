//! Network schema data model
//!
//! Typed records for the utility network data element: domain networks own edge and
//! junction asset sources, sources own asset groups, groups own asset types, and asset
//! types reference terminal configurations by id. The JSON is parsed once at load time.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether an asset source holds edges (lines) or junctions (points)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    #[default]
    Edge,
    Junction,
}

/// Geometry type of the features stored in an asset source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeType {
    #[serde(rename = "esriGeometryPoint")]
    Point,
    #[serde(rename = "esriGeometryPolyline")]
    Polyline,
    #[serde(rename = "esriGeometryPolygon")]
    Polygon,
    #[default]
    #[serde(other, rename = "esriGeometryNull")]
    Unknown,
}

/// A single connection port of a terminal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    pub terminal_id: i64,
    #[serde(default)]
    pub terminal_name: String,
    #[serde(default)]
    pub is_upstream_terminal: bool,
}

/// A named set of terminals applicable to some junction asset types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalConfiguration {
    pub terminal_configuration_id: i64,
    #[serde(default)]
    pub terminal_configuration_name: String,
    #[serde(default)]
    pub terminals: Vec<Terminal>,
}

/// Second classification level of a network feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetType {
    pub asset_type_code: i64,
    #[serde(default)]
    pub asset_type_name: String,
    /// Weak reference into [`SchemaDefinition::terminal_configurations`]
    #[serde(default)]
    pub terminal_configuration_id: Option<i64>,
    #[serde(default)]
    pub is_terminal_configuration_supported: bool,
}

/// First classification level of a network feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroup {
    pub asset_group_code: i64,
    #[serde(default)]
    pub asset_group_name: String,
    #[serde(default)]
    pub asset_types: Vec<AssetType>,
}

/// A layer-backed feature class participating in a domain network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSource {
    pub source_id: i64,
    pub layer_id: i64,
    #[serde(default)]
    pub shape_type: ShapeType,
    /// Raw usage type, e.g. `esriUNFCUTDevice`
    #[serde(default, rename = "utilityNetworkFeatureClassUsageType")]
    pub usage_type: String,
    #[serde(default)]
    pub asset_groups: Vec<AssetGroup>,
    /// Assigned from the owning sequence when the schema is loaded
    #[serde(skip)]
    pub kind: SourceKind,
}

impl AssetSource {
    /// Short usage tag, e.g. `device` for `esriUNFCUTDevice`
    pub fn usage_tag(&self) -> String {
        self.usage_type
            .strip_prefix("esriUNFCUT")
            .unwrap_or(&self.usage_type)
            .to_lowercase()
    }
}

/// A named partition of the network schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainNetwork {
    pub domain_network_id: i64,
    #[serde(default)]
    pub domain_network_name: String,
    #[serde(default)]
    pub edge_sources: Vec<AssetSource>,
    #[serde(default)]
    pub junction_sources: Vec<AssetSource>,
}

/// Root of the network schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    #[serde(default)]
    pub domain_networks: Vec<DomainNetwork>,
    #[serde(default)]
    pub terminal_configurations: Vec<TerminalConfiguration>,
}

impl SchemaDefinition {
    /// Parse a schema from JSON
    ///
    /// Accepts either a bare data element or a `queryDataElements` response, in which
    /// case the first data element carrying domain networks is used.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let mut schema = match value.get("layerDataElements") {
            Some(elements) => {
                let elements: Vec<LayerDataElement> = serde_json::from_value(elements.clone())?;
                elements
                    .into_iter()
                    .map(|element| element.data_element)
                    .find(|element| !element.domain_networks.is_empty())
                    .ok_or_else(|| {
                        <serde_json::Error as serde::de::Error>::custom(
                            "no data element with domain networks",
                        )
                    })?
            }
            None => serde_json::from_value(value)?,
        };

        schema.tag_source_kinds();
        tracing::debug!(
            "Loaded schema with {} domain networks and {} terminal configurations",
            schema.domain_networks.len(),
            schema.terminal_configurations.len()
        );
        Ok(schema)
    }

    /// Read and parse a schema file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    fn tag_source_kinds(&mut self) {
        for network in &mut self.domain_networks {
            for source in &mut network.edge_sources {
                source.kind = SourceKind::Edge;
            }
            for source in &mut network.junction_sources {
                source.kind = SourceKind::Junction;
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerDataElement {
    data_element: SchemaDefinition,
}
