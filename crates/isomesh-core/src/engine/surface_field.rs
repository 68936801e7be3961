use super::config::SurfaceConfig;
use super::error::EngineError;
use crate::core::grid::{GridDimensions, ScalarGrid};
use crate::core::models::atom::Atom;
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Upper bound on the number of samples a surface grid may allocate.
pub const MAX_SURFACE_SAMPLES: usize = 1 << 28;

/// Sphere of influence of one atom on the lattice.
#[derive(Debug, Clone, Copy)]
struct Footprint {
    /// Atom centre in lattice units.
    center: Point3<f32>,
    /// Expanded radius in lattice units.
    radius: f32,
    /// Cutoff beyond which the atom does not write, in lattice units.
    reach: f32,
}

impl Footprint {
    fn span(center: f32, reach: f32, len: usize) -> std::ops::Range<usize> {
        let lo = (center - reach).ceil().max(0.0) as usize;
        let hi = ((center + reach).floor() + 1.0).clamp(0.0, len as f32) as usize;
        lo..hi.max(lo)
    }
}

/// Value of a sample at distance `d` from an atom with expanded radius `r`.
///
/// Equals `isolevel` on the sphere surface, `2 * isolevel` at the centre and
/// falls to zero at twice the radius.
#[inline]
pub fn sphere_value(d: f32, r: f32, isolevel: f32) -> f32 {
    2.0 * isolevel * (1.0 - d / (2.0 * r))
}

/// Samples the probe-expanded van der Waals spheres of `atoms` on a grid
/// whose isosurface at `config.isolevel` is the molecular surface.
///
/// The grid covers every atom with a margin of its expanded radius plus
/// `radius_surplus` voxels, so all boundary samples lie outside the surface.
#[instrument(skip_all, name = "surface_field", fields(atoms = atoms.len()))]
pub fn build_surface_grid(atoms: &[Atom], config: &SurfaceConfig) -> Result<ScalarGrid, EngineError> {
    let first = atoms.first().ok_or(EngineError::EmptyAtomSet)?;
    let voxel = config.voxel_size;
    let surplus = config.radius_surplus * voxel;

    let (mut min, mut max) = (first.position, first.position);
    let mut max_radius = 0.0f32;
    for atom in atoms {
        min = min.inf(&atom.position);
        max = max.sup(&atom.position);
        max_radius = max_radius.max(atom.radius + config.probe_radius);
    }

    let padding = Vector3::repeat(max_radius + surplus);
    let origin = min - padding;
    let extent = (max + padding) - origin;
    let axis_len = |e: f32| ((e / voxel).ceil() as usize).saturating_add(1);
    let dims = GridDimensions::new(axis_len(extent.x), axis_len(extent.y), axis_len(extent.z));
    let sample_count = dims
        .sx
        .checked_mul(dims.sy)
        .and_then(|n| n.checked_mul(dims.sz))
        .unwrap_or(usize::MAX);
    if sample_count > MAX_SURFACE_SAMPLES {
        return Err(EngineError::GridTooLarge {
            samples: sample_count,
            limit: MAX_SURFACE_SAMPLES,
        });
    }
    debug!(sx = dims.sx, sy = dims.sy, sz = dims.sz, "Sized surface grid.");

    let footprints: Vec<Footprint> = atoms
        .iter()
        .map(|atom| {
            let radius = atom.radius + config.probe_radius;
            Footprint {
                center: Point3::from((atom.position - origin) / voxel),
                radius: radius / voxel,
                reach: (radius + surplus) / voxel,
            }
        })
        .collect();

    let mut samples = vec![0.0f32; sample_count];
    let slab_len = dims.sy * dims.sz;

    #[cfg(not(feature = "parallel"))]
    let slabs = samples.chunks_mut(slab_len);

    #[cfg(feature = "parallel")]
    let slabs = samples.par_chunks_mut(slab_len);

    slabs
        .enumerate()
        .for_each(|(ix, slab)| fill_slab(slab, ix, &dims, &footprints, config.isolevel));

    Ok(ScalarGrid::new(dims, samples, voxel, origin)?)
}

fn fill_slab(slab: &mut [f32], ix: usize, dims: &GridDimensions, footprints: &[Footprint], isolevel: f32) {
    let x = ix as f32;
    for fp in footprints {
        let dx = x - fp.center.x;
        if dx.abs() > fp.reach {
            continue;
        }
        for iy in Footprint::span(fp.center.y, fp.reach, dims.sy) {
            let dy = iy as f32 - fp.center.y;
            for iz in Footprint::span(fp.center.z, fp.reach, dims.sz) {
                let dz = iz as f32 - fp.center.z;
                let d = (dx * dx + dy * dy + dz * dz).sqrt();
                if d > fp.reach {
                    continue;
                }
                let value = sphere_value(d, fp.radius, isolevel);
                let sample = &mut slab[iy * dims.sz + iz];
                if value > *sample {
                    *sample = value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridCoord;
    use crate::engine::config::SurfaceConfigBuilder;

    fn config() -> SurfaceConfig {
        SurfaceConfigBuilder::new()
            .voxel_size(0.5)
            .probe_radius(1.0)
            .radius_surplus(1.0)
            .build()
            .unwrap()
    }

    fn lattice_position(grid: &ScalarGrid, c: GridCoord) -> Point3<f32> {
        grid.world_position(Point3::new(c.ix as f32, c.iy as f32, c.iz as f32))
    }

    #[test]
    fn sphere_value_crosses_isolevel_at_radius() {
        assert_eq!(sphere_value(2.0, 2.0, 5.0), 5.0);
        assert_eq!(sphere_value(0.0, 2.0, 5.0), 10.0);
        assert_eq!(sphere_value(4.0, 2.0, 5.0), 0.0);
    }

    #[test]
    fn empty_atom_set_is_rejected() {
        let result = build_surface_grid(&[], &config());
        assert!(matches!(result, Err(EngineError::EmptyAtomSet)));
    }

    #[test]
    fn grid_covers_atoms_with_margin() {
        let atoms = vec![Atom::with_radius("C", Point3::new(1.0, 2.0, 3.0), 1.0)];
        let grid = build_surface_grid(&atoms, &config()).unwrap();

        // Expanded radius 2.0 plus one voxel of surplus on each side.
        assert_eq!(grid.offset(), Point3::new(-1.5, -0.5, 0.5));
        assert_eq!(grid.dims(), GridDimensions::new(11, 11, 11));
        assert_eq!(grid.voxel_size(), 0.5);
    }

    #[test]
    fn samples_follow_distance_to_nearest_atom() {
        let atoms = vec![Atom::with_radius("C", Point3::new(0.0, 0.0, 0.0), 1.0)];
        let grid = build_surface_grid(&atoms, &config()).unwrap();
        let dims = grid.dims();

        for ix in 0..dims.sx {
            for iy in 0..dims.sy {
                for iz in 0..dims.sz {
                    let c = GridCoord::new(ix, iy, iz);
                    let d = lattice_position(&grid, c).coords.norm();
                    let value = grid.value(c);
                    if d < 2.0 - 1e-4 {
                        assert!(value > 5.0, "inside sample {c:?} has {value}");
                    } else if d > 2.0 + 1e-4 {
                        assert!(value < 5.0, "outside sample {c:?} has {value}");
                    }
                }
            }
        }
    }

    #[test]
    fn boundary_samples_are_outside() {
        let atoms = vec![
            Atom::with_radius("C", Point3::new(0.0, 0.0, 0.0), 1.2),
            Atom::with_radius("O", Point3::new(1.3, 0.4, -0.2), 1.5),
        ];
        let grid = build_surface_grid(&atoms, &config()).unwrap();
        let dims = grid.dims();
        for iy in 0..dims.sy {
            for iz in 0..dims.sz {
                assert!(grid.value(GridCoord::new(0, iy, iz)) < 5.0);
                assert!(grid.value(GridCoord::new(dims.sx - 1, iy, iz)) < 5.0);
            }
        }
    }

    #[test]
    fn overlapping_atoms_keep_the_maximum() {
        let atoms = vec![
            Atom::with_radius("C", Point3::new(0.0, 0.0, 0.0), 1.0),
            Atom::with_radius("C", Point3::new(1.0, 0.0, 0.0), 1.0),
        ];
        let grid = build_surface_grid(&atoms, &config()).unwrap();
        let center_of_second = GridCoord::new(
            ((1.0 - grid.offset().x) / 0.5).round() as usize,
            (-grid.offset().y / 0.5).round() as usize,
            (-grid.offset().z / 0.5).round() as usize,
        );
        assert!((grid.value(center_of_second) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let atoms = vec![
            Atom::with_radius("C", Point3::new(0.0, 0.0, 0.0), 1.0),
            Atom::with_radius("C", Point3::new(1000.0, 1000.0, 1000.0), 1.0),
        ];
        let result = build_surface_grid(&atoms, &config());
        assert!(matches!(result, Err(EngineError::GridTooLarge { .. })));
    }
}
