use crate::core::models::atom::Atom;
use nalgebra::Point3;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomFileError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Record {record} has an empty element symbol")]
    MissingElement { record: usize },
    #[error("Record {record} has a non-finite coordinate or radius")]
    NonFinite { record: usize },
}

#[derive(Debug, Deserialize)]
struct AtomRecord {
    element: String,
    x: f32,
    y: f32,
    z: f32,
    #[serde(default)]
    radius: Option<f32>,
}

/// Atom lists stored as CSV with the header `element,x,y,z` and an optional
/// `radius` column overriding the element's van der Waals radius.
pub struct AtomCsvFile;

impl AtomCsvFile {
    pub fn read_from(reader: impl Read) -> Result<Vec<Atom>, AtomFileError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut atoms = Vec::new();
        for (i, result) in csv_reader.deserialize::<AtomRecord>().enumerate() {
            let record = result?;
            let index = i + 1;
            if record.element.is_empty() {
                return Err(AtomFileError::MissingElement { record: index });
            }
            let position = Point3::new(record.x, record.y, record.z);
            if !position.iter().all(|c| c.is_finite())
                || record.radius.is_some_and(|r| !r.is_finite() || r <= 0.0)
            {
                return Err(AtomFileError::NonFinite { record: index });
            }
            atoms.push(match record.radius {
                Some(radius) => Atom::with_radius(&record.element, position, radius),
                None => Atom::new(&record.element, position),
            });
        }
        Ok(atoms)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Atom>, AtomFileError> {
        let reader = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::read_from(std::io::BufReader::new(reader))
    }
}
