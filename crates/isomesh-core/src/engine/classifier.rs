use crate::core::grid::{Axis, GridCoord, ScalarGrid};
use crate::core::tables::{EDGE_TABLE, TRIANGLE_TABLE};

/// Comparison deciding whether a corner lies inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsideTest {
    Below,
    AtOrBelow,
}

impl InsideTest {
    #[inline]
    pub fn is_inside(self, value: f32, isolevel: f32) -> bool {
        match self {
            InsideTest::Below => value < isolevel,
            InsideTest::AtOrBelow => value <= isolevel,
        }
    }
}

/// Lattice offset of each cube corner from the cell's lowest corner.
pub const CORNER_OFFSETS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 0, 1),
    (0, 0, 1),
    (0, 1, 0),
    (1, 1, 0),
    (1, 1, 1),
    (0, 1, 1),
];

/// Per-corner inside test. Samples exactly on the isolevel count as inside
/// only when they occupy corners 2, 5, 6 or 7; changing this alters the
/// topology of meshes with samples on the isolevel.
pub const CORNER_TESTS: [InsideTest; 8] = [
    InsideTest::Below,
    InsideTest::Below,
    InsideTest::AtOrBelow,
    InsideTest::Below,
    InsideTest::Below,
    InsideTest::AtOrBelow,
    InsideTest::AtOrBelow,
    InsideTest::AtOrBelow,
];

/// Each cube edge as its lower lattice endpoint (offset from the cell's
/// lowest corner) and the axis it runs along.
pub const EDGE_LATTICE: [((usize, usize, usize), Axis); 12] = [
    ((0, 0, 0), Axis::X),
    ((1, 0, 0), Axis::Z),
    ((0, 0, 1), Axis::X),
    ((0, 0, 0), Axis::Z),
    ((0, 1, 0), Axis::X),
    ((1, 1, 0), Axis::Z),
    ((0, 1, 1), Axis::X),
    ((0, 1, 0), Axis::Z),
    ((0, 0, 0), Axis::Y),
    ((1, 0, 0), Axis::Y),
    ((1, 0, 1), Axis::Y),
    ((0, 0, 1), Axis::Y),
];

/// The inside/outside pattern of one cell's eight corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeCase(u8);

impl CubeCase {
    pub const fn from_index(index: u8) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Bit mask of crossed edges.
    #[inline]
    pub fn edge_mask(self) -> u16 {
        EDGE_TABLE[self.index()]
    }

    /// True when the cell is entirely inside or entirely outside.
    #[inline]
    pub fn is_trivial(self) -> bool {
        self.edge_mask() == 0
    }

    pub fn crossed_edges(self) -> impl Iterator<Item = usize> {
        let mask = self.edge_mask();
        (0..12).filter(move |edge| mask & (1 << edge) != 0)
    }

    /// Triangles of this case as triples of cube-local edge numbers.
    pub fn triangles(self) -> impl Iterator<Item = [usize; 3]> {
        TRIANGLE_TABLE[self.index()]
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    pub fn triangle_count(self) -> usize {
        TRIANGLE_TABLE[self.index()].len() / 3
    }
}

/// Classifies the cell whose lowest corner is `base`.
///
/// `base` must satisfy `base + (1, 1, 1)` lying inside the grid.
pub fn classify(grid: &ScalarGrid, base: GridCoord, isolevel: f32) -> CubeCase {
    let dims = grid.dims();
    let base_index = dims.linear_index(base);
    let mut case = 0u8;
    for (corner, &(dx, dy, dz)) in CORNER_OFFSETS.iter().enumerate() {
        let index = base_index
            + dx * dims.stride(Axis::X)
            + dy * dims.stride(Axis::Y)
            + dz * dims.stride(Axis::Z);
        if CORNER_TESTS[corner].is_inside(grid.value_at_index(index), isolevel) {
            case |= 1 << corner;
        }
    }
    CubeCase(case)
}
