//! Read-only lookups over a loaded schema
//!
//! Most lookups are linear scans in declaration order, which keeps tie-breaks between
//! (incorrectly) duplicated layer ids deterministic. The source id to domain network
//! mapping is precomputed because trace result grouping calls it once per element.

use crate::schema::{
    AssetGroup, AssetSource, AssetType, DomainNetwork, SchemaDefinition, Terminal,
    TerminalConfiguration,
};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, immutable index over a [`SchemaDefinition`]
///
/// Cloning is cheap; clones share the same schema.
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    schema: Arc<SchemaDefinition>,
    /// Source id -> position of the owning domain network (first declaration wins)
    network_by_source: Arc<HashMap<i64, usize>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl SchemaIndex {
    /// Build the index, taking ownership of the schema
    pub fn new(schema: SchemaDefinition) -> Self {
        let mut network_by_source = HashMap::new();
        for (position, network) in schema.domain_networks.iter().enumerate() {
            for source in network.edge_sources.iter().chain(&network.junction_sources) {
                network_by_source.entry(source.source_id).or_insert(position);
            }
        }

        Self {
            schema: Arc::new(schema),
            network_by_source: Arc::new(network_by_source),
        }
    }

    /// Parse a schema from JSON and index it
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(SchemaDefinition::from_json(json)?))
    }

    /// Access the underlying schema
    #[inline]
    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    /// Every (domain network, asset source) pair, edge sources before junction sources
    pub fn asset_sources(&self) -> impl Iterator<Item = (&DomainNetwork, &AssetSource)> {
        self.schema.domain_networks.iter().flat_map(|network| {
            network
                .edge_sources
                .iter()
                .chain(&network.junction_sources)
                .map(move |source| (network, source))
        })
    }

    /// Every layer id backing an asset source, in declaration order
    pub fn layer_ids(&self) -> Vec<i64> {
        self.asset_sources()
            .map(|(_, source)| source.layer_id)
            .collect()
    }

    /// Find the asset source backed by a layer
    ///
    /// Scans edge sources, then junction sources, of every domain network. `None` means
    /// the layer does not belong to this network.
    pub fn find_asset_source_by_layer_id(&self, layer_id: i64) -> Option<&AssetSource> {
        self.asset_sources()
            .map(|(_, source)| source)
            .find(|source| source.layer_id == layer_id)
    }

    /// Find the domain network that owns the source with this id
    pub fn find_domain_network(&self, source_id: i64) -> Option<&DomainNetwork> {
        self.network_by_source
            .get(&source_id)
            .and_then(|&position| self.schema.domain_networks.get(position))
    }

    /// Find an asset group of a source by exact code
    pub fn find_asset_group<'a>(
        &self,
        asset_source: &'a AssetSource,
        asset_group_code: i64,
    ) -> Option<&'a AssetGroup> {
        asset_source
            .asset_groups
            .iter()
            .find(|group| group.asset_group_code == asset_group_code)
    }

    /// Find an asset type of a group by exact code
    pub fn find_asset_type<'a>(
        &self,
        asset_group: &'a AssetGroup,
        asset_type_code: i64,
    ) -> Option<&'a AssetType> {
        asset_group
            .asset_types
            .iter()
            .find(|asset_type| asset_type.asset_type_code == asset_type_code)
    }

    /// Map a (domain network, source) pair back to its layer, edge sources first
    pub fn find_layer_id(&self, domain_network_id: i64, source_id: i64) -> Option<i64> {
        let network = self
            .schema
            .domain_networks
            .iter()
            .find(|network| network.domain_network_id == domain_network_id)?;

        network
            .edge_sources
            .iter()
            .chain(&network.junction_sources)
            .find(|source| source.source_id == source_id)
            .map(|source| source.layer_id)
    }

    /// Find a terminal configuration by id
    pub fn find_terminal_configuration(
        &self,
        terminal_configuration_id: i64,
    ) -> Option<&TerminalConfiguration> {
        self.schema
            .terminal_configurations
            .iter()
            .find(|config| config.terminal_configuration_id == terminal_configuration_id)
    }

    /// Find a single terminal inside a terminal configuration
    pub fn find_terminal(
        &self,
        terminal_configuration_id: i64,
        terminal_id: i64,
    ) -> Option<&Terminal> {
        self.find_terminal_configuration(terminal_configuration_id)?
            .terminals
            .iter()
            .find(|terminal| terminal.terminal_id == terminal_id)
    }
}

impl From<SchemaDefinition> for SchemaIndex {
    fn from(schema: SchemaDefinition) -> Self {
        Self::new(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SourceKind;

    fn fixture_index() -> SchemaIndex {
        SchemaIndex::from_json(include_str!("../tests/fixtures/schema.json")).unwrap()
    }

    #[test]
    fn test_every_source_is_found_by_its_layer() {
        let index = fixture_index();
        for (_, source) in index.asset_sources() {
            let found = index.find_asset_source_by_layer_id(source.layer_id).unwrap();
            assert_eq!(found, source);
        }
    }

    #[test]
    fn test_unknown_layer_is_none() {
        let index = fixture_index();
        assert!(index.find_asset_source_by_layer_id(12345).is_none());
    }

    #[test]
    fn test_find_domain_network() {
        let index = fixture_index();
        assert_eq!(index.find_domain_network(9).unwrap().domain_network_id, 7);
        assert_eq!(index.find_domain_network(4).unwrap().domain_network_id, 2);
        assert!(index.find_domain_network(77).is_none());
    }

    #[test]
    fn test_find_group_and_type() {
        let index = fixture_index();
        let source = index.find_asset_source_by_layer_id(913).unwrap();

        let group = index.find_asset_group(source, 45).unwrap();
        assert_eq!(group.asset_group_name, "Splice Closure");
        assert!(index.find_asset_group(source, 46).is_none());

        let asset_type = index.find_asset_type(group, 6).unwrap();
        assert_eq!(asset_type.terminal_configuration_id, Some(0));
        assert!(index.find_asset_type(group, 7).is_none());
    }

    #[test]
    fn test_find_layer_id() {
        let index = fixture_index();
        assert_eq!(index.find_layer_id(7, 10), Some(916));
        assert_eq!(index.find_layer_id(7, 9), Some(913));
        // Source exists, but in a different domain network
        assert_eq!(index.find_layer_id(2, 9), None);
        assert_eq!(index.find_layer_id(99, 9), None);
    }

    #[test]
    fn test_find_terminal_configuration() {
        let index = fixture_index();
        assert_eq!(
            index.find_terminal_configuration(2).unwrap().terminals.len(),
            2
        );
        assert!(index.find_terminal_configuration(99).is_none());
        assert_eq!(index.find_terminal(2, 2).unwrap().terminal_name, "Low");
        assert!(index.find_terminal(2, 3).is_none());
    }

    #[test]
    fn test_network_without_sources() {
        let index = SchemaIndex::from_json(
            r#"{"domainNetworks": [{"domainNetworkId": 1}], "terminalConfigurations": []}"#,
        )
        .unwrap();
        assert!(index.find_asset_source_by_layer_id(1).is_none());
        assert!(index.find_layer_id(1, 1).is_none());
        assert!(index.layer_ids().is_empty());
    }

    #[test]
    fn test_layer_ids() {
        let index = fixture_index();
        assert_eq!(index.layer_ids(), vec![100, 101, 916, 913]);
    }

    #[test]
    fn test_duplicated_layer_prefers_edge_source() {
        let index = SchemaIndex::from_json(
            r#"{
                "domainNetworks": [{
                    "domainNetworkId": 1,
                    "edgeSources": [{"sourceId": 1, "layerId": 50}],
                    "junctionSources": [
                        {"sourceId": 2, "layerId": 50},
                        {"sourceId": 1, "layerId": 60}
                    ]
                }]
            }"#,
        )
        .unwrap();

        let source = index.find_asset_source_by_layer_id(50).unwrap();
        assert_eq!(source.source_id, 1);
        assert_eq!(source.kind, SourceKind::Edge);

        // Source id 1 is declared as both an edge and a junction source
        assert_eq!(index.find_layer_id(1, 1), Some(50));
        assert_eq!(index.find_layer_id(1, 2), Some(50));
    }

    #[test]
    fn test_clones_share_schema() {
        let index = fixture_index();
        let clone = index.clone();
        assert!(std::ptr::eq(index.schema(), clone.schema()));
    }
}
