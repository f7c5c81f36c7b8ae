//! Read-only tables of physical activities, indexed
//! by contiguous integers starting at 0.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A single physical activity and its intensity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub category: String,
    /// Metabolic equivalent of task.
    pub met: f64,
}

/// An error type indicating a failure to load
/// or query a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("activity index {index} out of bounds for catalog of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },
    #[error("catalog contains no activities")]
    Empty,
    #[error("activity {index} has an invalid MET value")]
    InvalidIntensity { index: usize },
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unable to read catalog: {0}")]
    Io(#[from] io::Error),
}

/// A source of activities.
pub trait Catalog {
    /// Returns the number of activities.
    fn size(&self) -> usize;

    /// Returns the activity at `index`.
    ///
    /// # Errors
    /// Returns an error if `index >= self.size()`.
    fn item_at(&self, index: usize) -> Result<&Activity, CatalogError>;

    /// Returns the lowest MET value rounded down and
    /// the highest MET value rounded up.
    fn intensity_range(&self) -> (i64, i64);
}

/// An in-memory catalog.
///
/// Serialized as a JSON array of activities:
/// ```json
/// [{ "name": "running", "category": "running", "met": 8.0 }]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Activity>", into = "Vec<Activity>")]
pub struct ExerciseTable {
    activities: Vec<Activity>,
}

impl ExerciseTable {
    /// Returns a table holding the given activities,
    /// indexed in order.
    ///
    /// # Errors
    /// Returns an error if `activities` is empty, or if
    /// any MET value is negative or not finite.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::{Activity, Catalog, ExerciseTable};
    ///
    /// let table = ExerciseTable::new(vec![
    ///     Activity { name: "yoga".into(), category: "conditioning".into(), met: 2.5 },
    ///     Activity { name: "running".into(), category: "running".into(), met: 9.8 },
    /// ]).unwrap();
    ///
    /// assert_eq!(table.size(), 2);
    /// assert_eq!(table.item_at(1).unwrap().name, "running");
    /// assert_eq!(table.intensity_range(), (2, 10));
    /// assert!(table.item_at(2).is_err());
    /// ```
    pub fn new(activities: Vec<Activity>) -> Result<ExerciseTable, CatalogError> {
        if activities.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(index) = activities
            .iter()
            .position(|a| !a.met.is_finite() || a.met < 0.0)
        {
            return Err(CatalogError::InvalidIntensity { index });
        }
        Ok(ExerciseTable { activities })
    }

    /// Parses a table from a JSON string.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::{Catalog, ExerciseTable};
    ///
    /// let table = ExerciseTable::from_json(
    ///     r#"[{ "name": "walking", "category": "walking", "met": 3.5 }]"#,
    /// ).unwrap();
    /// assert_eq!(table.size(), 1);
    ///
    /// assert!(ExerciseTable::from_json("[]").is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<ExerciseTable, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a table from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<ExerciseTable, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads a table from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ExerciseTable, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Iterate over all activities in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }
}

impl Catalog for ExerciseTable {
    fn size(&self) -> usize {
        self.activities.len()
    }

    fn item_at(&self, index: usize) -> Result<&Activity, CatalogError> {
        self.activities
            .get(index)
            .ok_or(CatalogError::IndexOutOfBounds {
                index,
                size: self.activities.len(),
            })
    }

    fn intensity_range(&self) -> (i64, i64) {
        let (min, max) = self
            .activities
            .iter()
            .fold((f64::MAX, f64::MIN), |(min, max), a| {
                (min.min(a.met), max.max(a.met))
            });
        (min.floor() as i64, max.ceil() as i64)
    }
}

impl TryFrom<Vec<Activity>> for ExerciseTable {
    type Error = CatalogError;

    fn try_from(activities: Vec<Activity>) -> Result<ExerciseTable, CatalogError> {
        ExerciseTable::new(activities)
    }
}

impl From<ExerciseTable> for Vec<Activity> {
    fn from(table: ExerciseTable) -> Vec<Activity> {
        table.activities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(name: &str, met: f64) -> Activity {
        Activity {
            name: name.into(),
            category: "test".into(),
            met,
        }
    }

    #[test]
    fn intensity_range_of_whole_values() {
        let table = ExerciseTable::new(vec![activity("a", 3.0), activity("b", 8.0)]).unwrap();
        assert_eq!(table.intensity_range(), (3, 8));
    }

    #[test]
    fn single_entry_range() {
        let table = ExerciseTable::new(vec![activity("a", 5.0)]).unwrap();
        assert_eq!(table.intensity_range(), (5, 5));
    }

    #[test]
    fn rejects_invalid_intensities() {
        for met in [f64::NAN, f64::INFINITY, -1.0] {
            assert!(matches!(
                ExerciseTable::new(vec![activity("a", 1.0), activity("b", met)]),
                Err(CatalogError::InvalidIntensity { index: 1 })
            ));
        }
    }

    #[test]
    fn json_round_trip() {
        let table = ExerciseTable::new(vec![activity("a", 1.5), activity("b", 7.0)]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(ExerciseTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn empty_json_is_rejected() {
        assert!(matches!(
            ExerciseTable::from_reader("[]".as_bytes()),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn out_of_bounds_lookup() {
        let table = ExerciseTable::new(vec![activity("a", 1.5)]).unwrap();
        assert!(matches!(
            table.item_at(3),
            Err(CatalogError::IndexOutOfBounds { index: 3, size: 1 })
        ));
    }
}
