//! Command implementations

use super::cli::{Command, GroupArgs, LocateArgs, Settings};
use anyhow::{Context, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use trace_location_lib::{
    AssetGrouper, Geometry, LayerQuery, LocatedFeature, NetworkElement, PlanarGeometryOps,
    PointGeometry, SchemaDefinition, SchemaIndex, SpatialReference, TraceLocation,
    TraceLocationBuilder,
};

/// One feature or several
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureInput {
    One(Box<LocatedFeature>),
    Many(Vec<LocatedFeature>),
}

impl FeatureInput {
    fn into_vec(self) -> Vec<LocatedFeature> {
        match self {
            FeatureInput::One(feature) => vec![*feature],
            FeatureInput::Many(features) => features,
        }
    }
}

/// A bare element array or a trace result carrying one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ElementInput {
    Bare(Vec<NetworkElement>),
    TraceResult { elements: Vec<NetworkElement> },
}

impl ElementInput {
    fn into_vec(self) -> Vec<NetworkElement> {
        match self {
            ElementInput::Bare(elements) | ElementInput::TraceResult { elements } => elements,
        }
    }
}

pub async fn run(settings: Settings) -> anyhow::Result<()> {
    profiling::scope!("run");
    let output = match &settings.command {
        Command::Locate(args) => serde_json::to_value(locate(args).await?)?,
        Command::Group(args) => serde_json::to_value(group(args)?)?,
    };

    let rendered = if settings.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

fn load_schema(path: &Path) -> anyhow::Result<SchemaIndex> {
    let schema = SchemaDefinition::from_path(path)
        .with_context(|| format!("Failed to load schema from {}", path.display()))?;
    Ok(SchemaIndex::new(schema))
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {what} in {}", path.display()))
}

async fn locate(args: &LocateArgs) -> anyhow::Result<Vec<TraceLocation>> {
    let index = load_schema(&args.schema)?;
    let features = load_json::<FeatureInput>(&args.feature, "features")?.into_vec();
    tracing::info!("Locating {} feature(s)", features.len());
    locate_features(index, features, args).await
}

/// Build trace locations for every feature, skipping features outside the network
async fn locate_features(
    index: SchemaIndex,
    features: Vec<LocatedFeature>,
    args: &LocateArgs,
) -> anyhow::Result<Vec<TraceLocation>> {
    let builder = TraceLocationBuilder::with_config(
        index,
        Arc::new(PlanarGeometryOps::new()),
        args.percent_along_config(),
    );

    let requests = features
        .into_iter()
        .map(|feature| {
            let near = near_point(&feature, args)?;
            Ok((feature, near))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let results = builder.build_all(&requests, args.location_type()).await;

    let mut locations = Vec::new();
    for ((feature, _), result) in requests.iter().zip(results) {
        match result {
            Ok(built) => locations.extend(built),
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    "Feature on layer {} is not part of this network: {err}",
                    feature.layer.layer_id
                );
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to build trace locations on layer {}", feature.layer.layer_id)
                });
            }
        }
    }

    tracing::info!("Built {} trace location(s)", locations.len());
    Ok(locations)
}

/// The picked location for a feature; points default to their own location
fn near_point(feature: &LocatedFeature, args: &LocateArgs) -> anyhow::Result<PointGeometry> {
    if let (Some(x), Some(y)) = (args.near_x, args.near_y) {
        let spatial_reference = args
            .near_wkid
            .map(SpatialReference::from_wkid)
            .unwrap_or_else(|| feature.geometry.spatial_reference());
        return Ok(PointGeometry::new(x, y, spatial_reference));
    }

    match &feature.geometry {
        Geometry::Point(point) => Ok(*point),
        other => bail!(
            "A near point (--near-x/--near-y) is required for {} features",
            other.type_name()
        ),
    }
}

fn group(args: &GroupArgs) -> anyhow::Result<Vec<LayerQuery>> {
    let index = load_schema(&args.schema)?;
    let elements = load_json::<ElementInput>(&args.elements, "trace elements")?.into_vec();

    let grouped = AssetGrouper::new(index).group(&elements);
    tracing::info!(
        "Grouped {} of {} element(s) into {} bucket(s)",
        grouped.element_count(),
        elements.len(),
        grouped.buckets().count()
    );
    Ok(grouped.layer_queries())
}
