//! Classification of features against the schema

use crate::index::SchemaIndex;
use crate::schema::{AssetType, SourceKind};
use crate::{Result, SchemaLookup, TraceError};

/// An asset type together with the context it was resolved in
///
/// This is a new value composed from the schema records; the schema itself is never
/// annotated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAsset {
    pub domain_network_id: i64,
    pub source_id: i64,
    pub layer_id: i64,
    pub source_kind: SourceKind,
    pub asset_group_code: i64,
    /// Name of the owning asset group
    pub asset_group_name: String,
    /// Usage tag of the owning source, e.g. `device` or `line`
    pub usage_type: String,
    pub asset_type: AssetType,
}

impl ResolvedAsset {
    #[inline]
    pub fn asset_type_code(&self) -> i64 {
        self.asset_type.asset_type_code
    }

    #[inline]
    pub fn asset_type_name(&self) -> &str {
        &self.asset_type.asset_type_name
    }

    #[inline]
    pub fn terminal_configuration_id(&self) -> Option<i64> {
        self.asset_type.terminal_configuration_id
    }

    #[inline]
    pub fn is_terminal_configuration_supported(&self) -> bool {
        self.asset_type.is_terminal_configuration_supported
    }
}

/// Resolves (layer, asset group, asset type) triples to full asset type records
#[derive(Debug, Clone)]
pub struct AssetResolver {
    index: SchemaIndex,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl AssetResolver {
    pub fn new(index: SchemaIndex) -> Self {
        Self { index }
    }

    #[inline]
    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    /// Resolve an asset type by layer and codes
    ///
    /// Junction sources are scanned before edge sources, and domain networks in
    /// declaration order; the first source with a matching layer id is the only one
    /// consulted for the group and type codes.
    pub fn resolve(
        &self,
        layer_id: i64,
        asset_group_code: i64,
        asset_type_code: i64,
    ) -> Result<ResolvedAsset> {
        let (network, source) = self
            .index
            .schema()
            .domain_networks
            .iter()
            .find_map(|network| {
                network
                    .junction_sources
                    .iter()
                    .chain(&network.edge_sources)
                    .find(|source| source.layer_id == layer_id)
                    .map(|source| (network, source))
            })
            .ok_or_else(|| {
                tracing::debug!("Layer {layer_id} is not part of the network schema");
                TraceError::NotFound(SchemaLookup::Layer(layer_id))
            })?;

        let group = self
            .index
            .find_asset_group(source, asset_group_code)
            .ok_or(TraceError::NotFound(SchemaLookup::AssetGroup {
                layer_id,
                asset_group_code,
            }))?;

        let asset_type = self
            .index
            .find_asset_type(group, asset_type_code)
            .ok_or(TraceError::NotFound(SchemaLookup::AssetType {
                layer_id,
                asset_group_code,
                asset_type_code,
            }))?;

        Ok(ResolvedAsset {
            domain_network_id: network.domain_network_id,
            source_id: source.source_id,
            layer_id,
            source_kind: source.kind,
            asset_group_code,
            asset_group_name: group.asset_group_name.clone(),
            usage_type: source.usage_tag(),
            asset_type: asset_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_resolver() -> AssetResolver {
        AssetResolver::new(
            SchemaIndex::from_json(include_str!("../tests/fixtures/schema.json")).unwrap(),
        )
    }

    #[test]
    fn test_resolve_junction() {
        let resolver = fixture_resolver();
        let asset = resolver.resolve(913, 45, 6).unwrap();

        assert_eq!(asset.domain_network_id, 7);
        assert_eq!(asset.source_id, 9);
        assert_eq!(asset.source_kind, SourceKind::Junction);
        assert_eq!(asset.asset_group_name, "Splice Closure");
        assert_eq!(asset.usage_type, "device");
        assert_eq!(asset.asset_type_code(), 6);
        assert_eq!(asset.terminal_configuration_id(), Some(0));
        assert!(asset.is_terminal_configuration_supported());
    }

    #[test]
    fn test_resolve_edge() {
        let resolver = fixture_resolver();
        let asset = resolver.resolve(916, 45, 3).unwrap();

        assert_eq!(asset.source_kind, SourceKind::Edge);
        assert_eq!(asset.asset_group_name, "Fiber Cable");
        assert_eq!(asset.usage_type, "line");
        assert!(!asset.is_terminal_configuration_supported());
    }

    #[test]
    fn test_group_name_matches_owner_for_every_declared_pair() {
        let resolver = fixture_resolver();
        let index = resolver.index().clone();

        for (_, source) in index.asset_sources() {
            for group in &source.asset_groups {
                for asset_type in &group.asset_types {
                    let asset = resolver
                        .resolve(
                            source.layer_id,
                            group.asset_group_code,
                            asset_type.asset_type_code,
                        )
                        .unwrap();
                    assert_eq!(asset.asset_group_name, group.asset_group_name);
                    assert_eq!(&asset.asset_type, asset_type);
                }
            }
        }
    }

    #[test]
    fn test_unknown_layer_is_not_found() {
        let err = fixture_resolver().resolve(1, 45, 6).unwrap_err();
        assert!(matches!(err, TraceError::NotFound(SchemaLookup::Layer(1))));
    }

    #[test]
    fn test_unknown_codes_are_not_found() {
        let resolver = fixture_resolver();

        let err = resolver.resolve(913, 44, 6).unwrap_err();
        assert!(matches!(
            err,
            TraceError::NotFound(SchemaLookup::AssetGroup { .. })
        ));

        let err = resolver.resolve(913, 45, 5).unwrap_err();
        assert!(matches!(
            err,
            TraceError::NotFound(SchemaLookup::AssetType { .. })
        ));
    }

    #[test]
    fn test_duplicated_layer_prefers_junction_source() {
        let json = r#"{
            "domainNetworks": [{
                "domainNetworkId": 1,
                "edgeSources": [{"sourceId": 1, "layerId": 50, "assetGroups": [
                    {"assetGroupCode": 1, "assetGroupName": "Edge Group",
                     "assetTypes": [{"assetTypeCode": 1}]}
                ]}],
                "junctionSources": [{"sourceId": 2, "layerId": 50, "assetGroups": [
                    {"assetGroupCode": 1, "assetGroupName": "Junction Group",
                     "assetTypes": [{"assetTypeCode": 1}]}
                ]}]
            }]
        }"#;
        let resolver = AssetResolver::new(SchemaIndex::from_json(json).unwrap());

        let asset = resolver.resolve(50, 1, 1).unwrap();
        assert_eq!(asset.source_id, 2);
        assert_eq!(asset.asset_group_name, "Junction Group");
    }

    #[test]
    fn test_resolve_does_not_mutate_schema() {
        let resolver = fixture_resolver();
        let before = resolver.index().schema().clone();
        let _ = resolver.resolve(913, 45, 6).unwrap();
        assert_eq!(resolver.index().schema(), &before);
    }
}
