//! Dense regular scalar grids sampled on a uniform lattice.

use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Grid dimension along the {axis:?} axis must be at least 1")]
    ZeroDimension { axis: Axis },
    #[error("Expected {expected} samples for the grid dimensions, found {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
    #[error("Voxel size must be a positive finite number (got {0})")]
    InvalidVoxelSize(f32),
}

/// Lattice axis along which a cell edge runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// Integer lattice coordinate of a grid sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub ix: usize,
    pub iy: usize,
    pub iz: usize,
}

impl GridCoord {
    pub const fn new(ix: usize, iy: usize, iz: usize) -> Self {
        Self { ix, iy, iz }
    }

    #[inline]
    pub fn offset(self, dx: usize, dy: usize, dz: usize) -> Self {
        Self::new(self.ix + dx, self.iy + dy, self.iz + dz)
    }

    #[inline]
    pub fn step(self, axis: Axis) -> Self {
        match axis {
            Axis::X => self.offset(1, 0, 0),
            Axis::Y => self.offset(0, 1, 0),
            Axis::Z => self.offset(0, 0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl GridDimensions {
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.sx * self.sy * self.sz
    }

    /// Number of cells with a full set of eight corners.
    pub fn cell_count(&self) -> usize {
        self.sx.saturating_sub(1) * self.sy.saturating_sub(1) * self.sz.saturating_sub(1)
    }

    #[inline]
    pub fn linear_index(&self, coord: GridCoord) -> usize {
        coord.ix * self.sy * self.sz + coord.iy * self.sz + coord.iz
    }

    /// Distance in the flat sample array between neighbours along `axis`.
    #[inline]
    pub fn stride(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.sy * self.sz,
            Axis::Y => self.sz,
            Axis::Z => 1,
        }
    }

    pub fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.sx,
            Axis::Y => self.sy,
            Axis::Z => self.sz,
        }
    }

    fn validate(&self) -> Result<(), GridError> {
        for axis in Axis::ALL {
            if self.along(axis) == 0 {
                return Err(GridError::ZeroDimension { axis });
            }
        }
        Ok(())
    }
}

/// A read-only scalar field on a regular lattice.
///
/// Sample `(ix, iy, iz)` sits at `offset + voxel_size * (ix, iy, iz)` in world
/// space and is stored at `ix * sy * sz + iy * sz + iz`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    dims: GridDimensions,
    samples: Vec<f32>,
    voxel_size: f32,
    offset: Point3<f32>,
}

impl ScalarGrid {
    pub fn new(
        dims: GridDimensions,
        samples: Vec<f32>,
        voxel_size: f32,
        offset: Point3<f32>,
    ) -> Result<Self, GridError> {
        dims.validate()?;
        if samples.len() != dims.sample_count() {
            return Err(GridError::SampleCountMismatch {
                expected: dims.sample_count(),
                actual: samples.len(),
            });
        }
        if !(voxel_size.is_finite() && voxel_size > 0.0) {
            return Err(GridError::InvalidVoxelSize(voxel_size));
        }
        Ok(Self {
            dims,
            samples,
            voxel_size,
            offset,
        })
    }

    /// A grid with every sample set to `value`.
    pub fn filled(
        dims: GridDimensions,
        value: f32,
        voxel_size: f32,
        offset: Point3<f32>,
    ) -> Result<Self, GridError> {
        dims.validate()?;
        Self::new(dims, vec![value; dims.sample_count()], voxel_size, offset)
    }

    /// Builds a grid by evaluating `field` at every lattice coordinate.
    pub fn from_fn(
        dims: GridDimensions,
        voxel_size: f32,
        offset: Point3<f32>,
        mut field: impl FnMut(GridCoord) -> f32,
    ) -> Result<Self, GridError> {
        dims.validate()?;
        let mut samples = Vec::with_capacity(dims.sample_count());
        for ix in 0..dims.sx {
            for iy in 0..dims.sy {
                for iz in 0..dims.sz {
                    samples.push(field(GridCoord::new(ix, iy, iz)));
                }
            }
        }
        Self::new(dims, samples, voxel_size, offset)
    }

    /// Offset that places the centre of the sample block at the origin.
    pub fn centered_offset(dims: GridDimensions, voxel_size: f32) -> Point3<f32> {
        Point3::new(
            -voxel_size * dims.sx as f32 / 2.0,
            -voxel_size * dims.sy as f32 / 2.0,
            -voxel_size * dims.sz as f32 / 2.0,
        )
    }

    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    pub fn offset(&self) -> Point3<f32> {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point3<f32>) {
        self.offset = offset;
    }

    #[inline]
    pub fn value(&self, coord: GridCoord) -> f32 {
        self.samples[self.dims.linear_index(coord)]
    }

    #[inline]
    pub fn value_at_index(&self, index: usize) -> f32 {
        self.samples[index]
    }

    /// World-space position of a fractional lattice coordinate.
    #[inline]
    pub fn world_position(&self, lattice: Point3<f32>) -> Point3<f32> {
        self.offset + lattice.coords * self.voxel_size
    }

    /// Smallest and largest sample value, or `None` if any sample is NaN.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.samples.iter().try_fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), &v| {
                if v.is_nan() {
                    None
                } else {
                    Some((min.min(v), max.max(v)))
                }
            },
        )
    }
}
