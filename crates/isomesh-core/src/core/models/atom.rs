use super::elements;
use nalgebra::Point3;

/// A sphere contributing to a molecular surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: String,
    pub position: Point3<f32>,
    pub radius: f32,
}

impl Atom {
    /// Creates an atom whose radius is the van der Waals radius of `element`.
    pub fn new(element: &str, position: Point3<f32>) -> Self {
        Self {
            element: element.trim().to_string(),
            position,
            radius: elements::vdw_radius_or_default(element),
        }
    }

    pub fn with_radius(element: &str, position: Point3<f32>, radius: f32) -> Self {
        Self {
            element: element.trim().to_string(),
            position,
            radius,
        }
    }
}
