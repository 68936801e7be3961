use crate::cli::{ExtractArgs, SurfaceArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use isomesh::core::grid::GridDimensions;
use isomesh::engine::config as core_config;
use nalgebra::Point3;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialExtractConfig {
    dims: Option<[usize; 3]>,
    isolevel: Option<f32>,
    voxel_size: Option<f32>,
    offset: Option<[f32; 3]>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSurfaceConfig {
    voxel_size: Option<f32>,
    probe_radius: Option<f32>,
    radius_surplus: Option<f32>,
    isolevel: Option<f32>,
}

/// Settings read from an optional TOML file, completed by command-line
/// arguments. Flags win over `--set` values, which win over the file.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    extract: Option<PartialExtractConfig>,
    surface: Option<PartialSurfaceConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_extract(
        mut self,
        args: &ExtractArgs,
    ) -> Result<(GridDimensions, core_config::ExtractionConfig)> {
        self.apply_set_values(&args.set_values)?;
        let file = self.extract.take().unwrap_or_default();

        let dims = args
            .dims
            .or(file.dims.map(|[sx, sy, sz]| GridDimensions::new(sx, sy, sz)))
            .ok_or_else(|| {
                CliError::Config(
                    "`extract.dims` is required either in the config file or via --dims."
                        .to_string(),
                )
            })?;
        if dims.sample_count() == 0 {
            return Err(CliError::Config(
                "`extract.dims` must be at least 1 along every axis.".to_string(),
            ));
        }
        let isolevel = args.isolevel.or(file.isolevel).ok_or_else(|| {
            CliError::Config(
                "`extract.isolevel` is required either in the config file or via --isolevel."
                    .to_string(),
            )
        })?;

        let mut builder = core_config::ExtractionConfigBuilder::new()
            .isolevel(isolevel)
            .offset(args.offset.or(file.offset.map(Point3::from)));
        if let Some(size) = args.voxel_size.or(file.voxel_size) {
            builder = builder.voxel_size(size);
        }
        let config = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
        Ok((dims, config))
    }

    pub fn merge_surface(mut self, args: &SurfaceArgs) -> Result<core_config::SurfaceConfig> {
        self.apply_set_values(&args.set_values)?;
        let file = self.surface.take().unwrap_or_default();

        let mut builder = core_config::SurfaceConfigBuilder::new();
        if let Some(size) = args.voxel_size.or(file.voxel_size) {
            builder = builder.voxel_size(size);
        }
        if let Some(radius) = args.probe_radius.or(file.probe_radius) {
            builder = builder.probe_radius(radius);
        }
        if let Some(voxels) = args.radius_surplus.or(file.radius_surplus) {
            builder = builder.radius_surplus(voxels);
        }
        if let Some(isolevel) = args.isolevel.or(file.isolevel) {
            builder = builder.isolevel(isolevel);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "extract.dims" => {
                    let dims = parser::parse_dims(value_str)
                        .map_err(|e| CliError::Config(e.to_string()))?;
                    self.extract_mut().dims = Some([dims.sx, dims.sy, dims.sz]);
                }
                "extract.offset" => {
                    let p = parser::parse_point(value_str)
                        .map_err(|e| CliError::Config(e.to_string()))?;
                    self.extract_mut().offset = Some([p.x, p.y, p.z]);
                }
                "extract.isolevel" => self.extract_mut().isolevel = Some(parse_value(key, value_str)?),
                "extract.voxel-size" => {
                    self.extract_mut().voxel_size = Some(parse_value(key, value_str)?)
                }
                "surface.voxel-size" => {
                    self.surface_mut().voxel_size = Some(parse_value(key, value_str)?)
                }
                "surface.probe-radius" => {
                    self.surface_mut().probe_radius = Some(parse_value(key, value_str)?)
                }
                "surface.radius-surplus" => {
                    self.surface_mut().radius_surplus = Some(parse_value(key, value_str)?)
                }
                "surface.isolevel" => self.surface_mut().isolevel = Some(parse_value(key, value_str)?),
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn extract_mut(&mut self) -> &mut PartialExtractConfig {
        self.extract.get_or_insert_with(Default::default)
    }

    fn surface_mut(&mut self) -> &mut PartialSurfaceConfig {
        self.surface.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid numeric value for {}: {}", key, value_str))
    })
}
