use crate::cli::SurfaceArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use isomesh::core::mesh::triangle_mesh::TriangleMesh;
use isomesh::engine::progress::ProgressReporter;
use isomesh::workflows;
use tracing::info;

pub fn run(args: SurfaceArgs, progress: CliProgressHandler) -> Result<String> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_surface(&args)?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let mut mesh = TriangleMesh::new();

    info!(
        probe_radius = config.probe_radius,
        voxel_size = config.voxel_size,
        "Invoking the molecular surface workflow..."
    );
    let result = workflows::surface::run_file(&args.input, &config, &mut mesh, &reporter)?;

    let dims = result.grid_dims;
    Ok(format!(
        "Grid:      {}x{}x{} samples at {} A\n{}",
        dims.sx,
        dims.sy,
        dims.sz,
        config.voxel_size,
        super::format_summary(&mesh, &result.stats)
    ))
}
