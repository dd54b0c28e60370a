//! Located features and the layer fields that classify them

use crate::geometry::Geometry;
use crate::{Result, TraceError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field type that marks the global id column of a layer
const GLOBAL_ID_FIELD_TYPE: &str = "esriFieldTypeGlobalID";

const GLOBAL_ID_FIELD_NAME: &str = "globalid";
const ASSET_GROUP_FIELD_NAME: &str = "assetgroup";
const ASSET_TYPE_FIELD_NAME: &str = "assettype";

/// A field declared by a feature layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(default, rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            alias: None,
        }
    }
}

/// The layer a feature was queried from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureLayer {
    pub layer_id: i64,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
}

impl FeatureLayer {
    pub fn new(layer_id: i64, fields: Vec<FieldInfo>) -> Self {
        Self { layer_id, fields }
    }

    /// Find a field by name, ignoring case
    pub fn find_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

/// Names of the columns that identify and classify features of one layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerFields {
    pub layer_id: i64,
    pub global_id_field: String,
    pub asset_group_field: String,
    pub asset_type_field: String,
}

impl LayerFields {
    pub fn new(
        layer_id: i64,
        global_id_field: impl Into<String>,
        asset_group_field: impl Into<String>,
        asset_type_field: impl Into<String>,
    ) -> Self {
        Self {
            layer_id,
            global_id_field: global_id_field.into(),
            asset_group_field: asset_group_field.into(),
            asset_type_field: asset_type_field.into(),
        }
    }

    /// Locate the global id, asset group and asset type fields of a layer
    ///
    /// The global id field is found by type first, then by name.
    pub fn discover(layer: &FeatureLayer) -> Result<Self> {
        let global_id = layer
            .fields
            .iter()
            .find(|field| field.field_type == GLOBAL_ID_FIELD_TYPE)
            .or_else(|| layer.find_field(GLOBAL_ID_FIELD_NAME));

        let missing = |what: &str| {
            TraceError::MissingField(format!("layer {} has no {what} field", layer.layer_id))
        };

        Ok(Self {
            layer_id: layer.layer_id,
            global_id_field: global_id.ok_or_else(|| missing("global id"))?.name.clone(),
            asset_group_field: layer
                .find_field(ASSET_GROUP_FIELD_NAME)
                .ok_or_else(|| missing("asset group"))?
                .name
                .clone(),
            asset_type_field: layer
                .find_field(ASSET_TYPE_FIELD_NAME)
                .ok_or_else(|| missing("asset type"))?
                .name
                .clone(),
        })
    }
}

/// A feature picked by the user, with its geometry and attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedFeature {
    pub geometry: Geometry,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    pub layer: FeatureLayer,
}

impl LocatedFeature {
    pub fn new(geometry: Geometry, attributes: Map<String, Value>, layer: FeatureLayer) -> Self {
        Self {
            geometry,
            attributes,
            layer,
        }
    }

    /// Attribute value by field name; exact match first, then ignoring case
    ///
    /// Null values count as absent.
    pub fn attribute(&self, field: &str) -> Option<&Value> {
        self.attributes
            .get(field)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(field))
                    .map(|(_, value)| value)
            })
            .filter(|value| !value.is_null())
    }

    /// Integer code stored in a field, accepting numbers or numeric strings
    pub fn code(&self, field: &str) -> Result<i64> {
        let value = self
            .attribute(field)
            .ok_or_else(|| TraceError::MissingField(format!("feature has no {field} value")))?;

        let code = match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        };
        code.ok_or_else(|| TraceError::MissingField(format!("{field} is not an integer code: {value}")))
    }

    /// Text stored in a field
    pub fn text(&self, field: &str) -> Result<String> {
        match self.attribute(field) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(TraceError::MissingField(format!(
                "feature has no {field} value"
            ))),
        }
    }
}
