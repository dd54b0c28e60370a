//! Grouping of trace result elements into per-layer buckets

use crate::index::SchemaIndex;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// One element of a trace result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkElement {
    pub network_source_id: i64,
    #[serde(default)]
    pub global_id: String,
    #[serde(default)]
    pub object_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_id: Option<i64>,
    pub asset_group_code: i64,
    pub asset_type_code: i64,
}

/// Elements sharing one asset type, with the layer they live in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBucket {
    pub layer_id: i64,
    pub elements: Vec<NetworkElement>,
}

/// Asset type code -> bucket
pub type TypeBuckets = BTreeMap<i64, ElementBucket>;
/// Asset group code -> asset type buckets
pub type GroupBuckets = BTreeMap<i64, TypeBuckets>;
/// Source id -> asset group buckets
pub type SourceBuckets = BTreeMap<i64, GroupBuckets>;

/// Features needed from one layer to display a trace result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerQuery {
    pub layer_id: i64,
    pub object_ids: Vec<i64>,
    pub global_ids: Vec<String>,
}

/// Elements nested by domain network, source, asset group and asset type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedElements {
    networks: BTreeMap<i64, SourceBuckets>,
}

impl GroupedElements {
    /// Domain network id -> source buckets
    #[inline]
    pub fn networks(&self) -> &BTreeMap<i64, SourceBuckets> {
        &self.networks
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Bucket for one fully qualified asset type
    pub fn bucket(
        &self,
        domain_network_id: i64,
        source_id: i64,
        asset_group_code: i64,
        asset_type_code: i64,
    ) -> Option<&ElementBucket> {
        self.networks
            .get(&domain_network_id)?
            .get(&source_id)?
            .get(&asset_group_code)?
            .get(&asset_type_code)
    }

    /// Every leaf bucket, in key order
    pub fn buckets(&self) -> impl Iterator<Item = &ElementBucket> {
        self.networks
            .values()
            .flat_map(|sources| sources.values())
            .flat_map(|groups| groups.values())
            .flat_map(|types| types.values())
    }

    /// Number of elements across all buckets
    pub fn element_count(&self) -> usize {
        self.buckets().map(|bucket| bucket.elements.len()).sum()
    }

    /// One query per distinct layer, ordered by layer id
    ///
    /// Object ids and global ids are sorted and deduplicated; an element reached through
    /// several terminals is only requested once.
    pub fn layer_queries(&self) -> Vec<LayerQuery> {
        let mut by_layer: BTreeMap<i64, LayerQuery> = BTreeMap::new();

        for bucket in self.buckets() {
            let query = by_layer
                .entry(bucket.layer_id)
                .or_insert_with(|| LayerQuery {
                    layer_id: bucket.layer_id,
                    object_ids: Vec::new(),
                    global_ids: Vec::new(),
                });
            for element in &bucket.elements {
                query.object_ids.push(element.object_id);
                if !element.global_id.is_empty() {
                    query.global_ids.push(element.global_id.clone());
                }
            }
        }

        by_layer
            .into_values()
            .map(|mut query| {
                query.object_ids.sort_unstable();
                query.object_ids.dedup();
                query.global_ids.sort_unstable();
                query.global_ids.dedup();
                query
            })
            .collect()
    }
}

/// Buckets trace result elements so each layer can be fetched with one query
#[derive(Debug, Clone)]
pub struct AssetGrouper {
    index: SchemaIndex,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl AssetGrouper {
    pub fn new(index: SchemaIndex) -> Self {
        Self { index }
    }

    /// Group elements by domain network, source, asset group and asset type
    ///
    /// Elements whose source is not part of the schema are skipped, as are elements whose
    /// new bucket has no layer to map to. Neither case is an error.
    pub fn group(&self, elements: &[NetworkElement]) -> GroupedElements {
        let mut grouped = GroupedElements::default();
        let mut skipped = 0usize;

        for element in elements {
            let Some(network) = self.index.find_domain_network(element.network_source_id) else {
                skipped += 1;
                continue;
            };
            let domain_network_id = network.domain_network_id;

            let types = grouped
                .networks
                .entry(domain_network_id)
                .or_default()
                .entry(element.network_source_id)
                .or_default()
                .entry(element.asset_group_code)
                .or_default();

            match types.entry(element.asset_type_code) {
                Entry::Occupied(mut bucket) => bucket.get_mut().elements.push(element.clone()),
                Entry::Vacant(slot) => {
                    match self
                        .index
                        .find_layer_id(domain_network_id, element.network_source_id)
                    {
                        Some(layer_id) => {
                            slot.insert(ElementBucket {
                                layer_id,
                                elements: vec![element.clone()],
                            });
                        }
                        None => {
                            tracing::debug!(
                                "No layer for source {} in domain network {domain_network_id}, dropping element",
                                element.network_source_id
                            );
                            skipped += 1;
                        }
                    }
                }
            }
        }

        // A dropped first element can leave empty branches behind
        grouped.networks.retain(|_, sources| {
            sources.retain(|_, groups| {
                groups.retain(|_, types| !types.is_empty());
                !groups.is_empty()
            });
            !sources.is_empty()
        });

        if skipped > 0 {
            tracing::debug!(
                "Grouped {} of {} trace elements, {skipped} not part of the schema",
                elements.len() - skipped,
                elements.len()
            );
        }

        grouped
    }
}
