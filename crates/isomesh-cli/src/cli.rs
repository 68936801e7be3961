use crate::utils::parser::{parse_dims, parse_point};
use clap::{Args, Parser, Subcommand};
use isomesh::core::grid::GridDimensions;
use nalgebra::Point3;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "isomesh - Marching Cubes isosurface extraction for byte volumes and molecular surfaces.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to sample molecular surface grids.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the isosurface of a packed unsigned-byte volume.
    Extract(ExtractArgs),
    /// Mesh the probe-expanded van der Waals surface of an atom list.
    Surface(SurfaceArgs),
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to the raw volume, one unsigned byte per sample.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Sample counts along x, y and z (e.g., 64x64x32).
    #[arg(short, long, value_name = "SXxSYxSZ", value_parser = parse_dims)]
    pub dims: Option<GridDimensions>,

    /// Sample value at which the surface is extracted.
    #[arg(short = 'l', long, value_name = "FLOAT")]
    pub isolevel: Option<f32>,

    /// Edge length of one voxel in world units.
    #[arg(long, value_name = "FLOAT")]
    pub voxel_size: Option<f32>,

    /// World position of the first sample (e.g., 0,0,0). Defaults to centring the volume.
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_point, allow_hyphen_values = true)]
    pub offset: Option<Point3<f32>>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S extract.isolevel=128
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `surface` subcommand.
#[derive(Args, Debug)]
pub struct SurfaceArgs {
    /// Path to a CSV atom list with the header `element,x,y,z[,radius]`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Solvent probe radius added to every van der Waals radius.
    #[arg(short, long, value_name = "FLOAT")]
    pub probe_radius: Option<f32>,

    /// Edge length of one voxel in angstrom.
    #[arg(long, value_name = "FLOAT")]
    pub voxel_size: Option<f32>,

    /// Voxels sampled beyond each expanded atom sphere.
    #[arg(long, value_name = "FLOAT")]
    pub radius_surplus: Option<f32>,

    /// Field value at which the surface is extracted.
    #[arg(short = 'l', long, value_name = "FLOAT")]
    pub isolevel: Option<f32>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S surface.probe-radius=1.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
