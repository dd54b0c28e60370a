use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use trace_location_lib::{LinearUnit, PercentAlongConfig, TraceLocationType};

/// Resolve utility network features against their schema and build trace locations
#[derive(Parser, Debug, Clone)]
#[command(name = "utility-trace-locator", version, about)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Command,

    /// Pretty-print the JSON written to stdout
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build trace locations for one or more located features
    Locate(LocateArgs),
    /// Group trace result elements into one query per layer
    Group(GroupArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LocateArgs {
    /// Schema data element (or queryDataElements response) as JSON
    #[arg(long)]
    pub schema: PathBuf,

    /// Located feature, or an array of located features, as JSON
    #[arg(long)]
    pub feature: PathBuf,

    /// X of the picked location; required for line features
    #[arg(long, requires = "near_y", allow_hyphen_values = true)]
    pub near_x: Option<f64>,

    /// Y of the picked location
    #[arg(long, requires = "near_x", allow_hyphen_values = true)]
    pub near_y: Option<f64>,

    /// Spatial reference of the picked location; defaults to the feature's own
    #[arg(long)]
    pub near_wkid: Option<i32>,

    /// Emit barriers instead of starting points
    #[arg(long)]
    pub barrier: bool,

    /// Radius of the buffer used to split lines
    #[arg(long, default_value_t = 20.0)]
    pub buffer_distance: f64,

    /// Unit of the buffer radius (feet or meters)
    #[arg(long, default_value = "feet")]
    pub buffer_unit: LinearUnit,
}

impl LocateArgs {
    pub fn location_type(&self) -> TraceLocationType {
        if self.barrier {
            TraceLocationType::Barrier
        } else {
            TraceLocationType::StartingPoint
        }
    }

    pub fn percent_along_config(&self) -> PercentAlongConfig {
        PercentAlongConfig {
            buffer_distance: self.buffer_distance,
            buffer_unit: self.buffer_unit,
            ..PercentAlongConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GroupArgs {
    /// Schema data element (or queryDataElements response) as JSON
    #[arg(long)]
    pub schema: PathBuf,

    /// Trace result elements, either an array or an object with an `elements` array
    #[arg(long)]
    pub elements: PathBuf,
}
