use nalgebra::Point3;
use thiserror::Error;

/// Isolevel placing molecular surfaces in the middle of the sample value range.
pub const DEFAULT_SURFACE_ISOLEVEL: f32 = 5.0;
/// Solvent probe radius in angstrom.
pub const DEFAULT_PROBE_RADIUS: f32 = 1.4;
/// Extra voxel edge lengths evaluated around each expanded atom sphere.
pub const DEFAULT_RADIUS_SURPLUS: f32 = 1.0;
pub const DEFAULT_SURFACE_VOXEL_SIZE: f32 = 0.5;
pub const DEFAULT_VOXEL_SIZE: f32 = 1.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

fn require_finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a finite number, got {}", value),
        })
    }
}

fn require_positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = require_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be greater than zero, got {}", value),
        })
    }
}

fn require_non_negative(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = require_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must not be negative, got {}", value),
        })
    }
}

/// Parameters for extracting a surface from a byte volume.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub isolevel: f32,
    pub voxel_size: f32,
    /// World position of sample (0, 0, 0). `None` centres the volume on the origin.
    pub offset: Option<Point3<f32>>,
}

#[derive(Default)]
pub struct ExtractionConfigBuilder {
    isolevel: Option<f32>,
    voxel_size: Option<f32>,
    offset: Option<Point3<f32>>,
}

impl ExtractionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isolevel(mut self, isolevel: f32) -> Self {
        self.isolevel = Some(isolevel);
        self
    }
    pub fn voxel_size(mut self, size: f32) -> Self {
        self.voxel_size = Some(size);
        self
    }
    pub fn offset(mut self, offset: Option<Point3<f32>>) -> Self {
        self.offset = offset;
        self
    }

    pub fn build(self) -> Result<ExtractionConfig, ConfigError> {
        let isolevel = require_finite(
            "isolevel",
            self.isolevel.ok_or(ConfigError::MissingParameter("isolevel"))?,
        )?;
        let voxel_size =
            require_positive("voxel_size", self.voxel_size.unwrap_or(DEFAULT_VOXEL_SIZE))?;
        if let Some(offset) = &self.offset {
            if !offset.iter().all(|c| c.is_finite()) {
                return Err(ConfigError::InvalidParameter {
                    name: "offset",
                    reason: "all components must be finite".to_string(),
                });
            }
        }
        Ok(ExtractionConfig {
            isolevel,
            voxel_size,
            offset: self.offset,
        })
    }
}

/// Parameters for building and meshing a probe-expanded van der Waals surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub voxel_size: f32,
    pub probe_radius: f32,
    pub radius_surplus: f32,
    pub isolevel: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            voxel_size: DEFAULT_SURFACE_VOXEL_SIZE,
            probe_radius: DEFAULT_PROBE_RADIUS,
            radius_surplus: DEFAULT_RADIUS_SURPLUS,
            isolevel: DEFAULT_SURFACE_ISOLEVEL,
        }
    }
}

#[derive(Default)]
pub struct SurfaceConfigBuilder {
    voxel_size: Option<f32>,
    probe_radius: Option<f32>,
    radius_surplus: Option<f32>,
    isolevel: Option<f32>,
}

impl SurfaceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voxel_size(mut self, size: f32) -> Self {
        self.voxel_size = Some(size);
        self
    }
    pub fn probe_radius(mut self, radius: f32) -> Self {
        self.probe_radius = Some(radius);
        self
    }
    pub fn radius_surplus(mut self, voxels: f32) -> Self {
        self.radius_surplus = Some(voxels);
        self
    }
    pub fn isolevel(mut self, isolevel: f32) -> Self {
        self.isolevel = Some(isolevel);
        self
    }

    pub fn build(self) -> Result<SurfaceConfig, ConfigError> {
        let defaults = SurfaceConfig::default();
        Ok(SurfaceConfig {
            voxel_size: require_positive(
                "voxel_size",
                self.voxel_size.unwrap_or(defaults.voxel_size),
            )?,
            probe_radius: require_non_negative(
                "probe_radius",
                self.probe_radius.unwrap_or(defaults.probe_radius),
            )?,
            radius_surplus: require_non_negative(
                "radius_surplus",
                self.radius_surplus.unwrap_or(defaults.radius_surplus),
            )?,
            isolevel: require_positive("isolevel", self.isolevel.unwrap_or(defaults.isolevel))?,
        })
    }
}
