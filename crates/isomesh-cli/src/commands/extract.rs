use crate::cli::ExtractArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use isomesh::core::mesh::triangle_mesh::TriangleMesh;
use isomesh::engine::progress::ProgressReporter;
use isomesh::workflows;
use tracing::info;

pub fn run(args: ExtractArgs, progress: CliProgressHandler) -> Result<String> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (dims, config) = partial_config.merge_extract(&args)?;

    if !args.input.is_file() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Volume file does not exist: {}", args.input.display()),
        )));
    }

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let mut mesh = TriangleMesh::new();

    info!(
        isolevel = config.isolevel,
        voxel_size = config.voxel_size,
        "Invoking the volume extraction workflow..."
    );
    let stats = workflows::extract::run_volume(&args.input, dims, &config, &mut mesh, &reporter)?;

    Ok(super::format_summary(&mesh, &stats))
}
