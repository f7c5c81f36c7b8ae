//! Behavioural descriptors and their discretization
//! into archive cells.
use serde::{Deserialize, Serialize};

use std::fmt;

/// The three scalar behavioural descriptors of a phenotype.
pub type Features = [f64; 3];

/// The nominal range of a single behavioural descriptor.
///
/// Ranges follow a half-open convention: `max` is one past
/// the largest nominal value, and the bin width is computed
/// over `max + 1 - min` so that `max` itself still maps into
/// the last bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    /// Returns a new range spanning `min..max`.
    ///
    /// # Examples
    /// ```
    /// use fitmap::FeatureRange;
    ///
    /// let range = FeatureRange::new(0.0, 8.0);
    /// assert_eq!(range.min, 0.0);
    /// assert_eq!(range.max, 8.0);
    /// ```
    pub fn new(min: f64, max: f64) -> FeatureRange {
        FeatureRange { min, max }
    }

    /// Maps `value` into a 1-based bin index in `[1, bins]`.
    ///
    /// Returns `None` if the value extrapolates beyond the
    /// range, i.e. the computed bin falls outside `[1, bins]`.
    ///
    /// # Examples
    /// ```
    /// use fitmap::FeatureRange;
    ///
    /// let range = FeatureRange::new(0.0, 8.0);
    ///
    /// // Width of each bin is (8 + 1 - 0) / 20 = 0.45.
    /// assert_eq!(range.bin(0.0, 20), Some(1));
    /// assert_eq!(range.bin(7.0, 20), Some(16));
    /// assert_eq!(range.bin(-1.0, 20), None);
    /// assert_eq!(range.bin(9.0, 20), None);
    /// ```
    pub fn bin(&self, value: f64, bins: usize) -> Option<usize> {
        let width = (self.max + 1.0 - self.min) / bins as f64;
        if !(width > 0.0) {
            return None;
        }
        let bin = ((value - self.min) / width).floor() + 1.0;
        if bin.is_finite() && bin >= 1.0 && bin <= bins as f64 {
            Some(bin as usize)
        } else {
            None
        }
    }
}

/// Coordinates of an archive cell. Each component
/// is a 1-based bin index in `[1, bins]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell(pub usize, pub usize, pub usize);

impl Cell {
    /// Returns the cell as an array of bin indices.
    pub fn to_array(self) -> [usize; 3] {
        [self.0, self.1, self.2]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Scales a feature vector into the cell it occupies in
/// an archive with `bins` bins per dimension.
///
/// Returns `None` if any of the descriptors falls outside
/// its range.
///
/// # Examples
/// ```
/// use fitmap::{scale_features, Cell, FeatureRange};
///
/// let ranges = [
///     FeatureRange::new(1.0, 23.0),
///     FeatureRange::new(0.0, 481.0),
///     FeatureRange::new(0.0, 8.0),
/// ];
///
/// assert_eq!(scale_features(&[1.0, 0.0, 0.0], &ranges, 20), Some(Cell(1, 1, 1)));
/// assert_eq!(scale_features(&[1.0, 600.0, 0.0], &ranges, 20), None);
/// ```
pub fn scale_features(features: &Features, ranges: &[FeatureRange; 3], bins: usize) -> Option<Cell> {
    let x = ranges[0].bin(features[0], bins)?;
    let y = ranges[1].bin(features[1], bins)?;
    let z = ranges[2].bin(features[2], bins)?;
    Some(Cell(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_whole_range() {
        let range = FeatureRange::new(0.0, 481.0);
        for bins in 1..=30 {
            assert_eq!(range.bin(0.0, bins), Some(1));
            assert_eq!(range.bin(481.0, bins), Some(bins));
        }
    }

    #[test]
    fn bin_boundaries() {
        // Width = (4 + 1 - 0) / 5 = 1.0
        let range = FeatureRange::new(0.0, 4.0);
        assert_eq!(range.bin(0.999, 5), Some(1));
        assert_eq!(range.bin(1.0, 5), Some(2));
        assert_eq!(range.bin(4.999, 5), Some(5));
        assert_eq!(range.bin(5.0, 5), None);
    }

    #[test]
    fn values_below_minimum_are_rejected() {
        let range = FeatureRange::new(2.0, 10.0);
        assert_eq!(range.bin(1.999, 20), None);
        assert_eq!(range.bin(2.0, 20), Some(1));
    }

    #[test]
    fn single_bin_single_value_range() {
        let range = FeatureRange::new(5.0, 5.0);
        assert_eq!(range.bin(5.0, 1), Some(1));
        assert_eq!(range.bin(5.5, 1), Some(1));
        assert_eq!(range.bin(6.0, 1), None);
    }

    #[test]
    fn nan_is_rejected() {
        let range = FeatureRange::new(0.0, 8.0);
        assert_eq!(range.bin(f64::NAN, 20), None);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        let range = FeatureRange::new(10.0, 5.0);
        assert_eq!(range.bin(7.0, 20), None);
    }

    #[test]
    fn scale_rejects_any_out_of_range_dimension() {
        let ranges = [
            FeatureRange::new(0.0, 10.0),
            FeatureRange::new(0.0, 10.0),
            FeatureRange::new(0.0, 10.0),
        ];
        assert_eq!(scale_features(&[1.0, 2.0, 3.0], &ranges, 11), Some(Cell(2, 3, 4)));
        assert_eq!(scale_features(&[11.0, 2.0, 3.0], &ranges, 11), None);
        assert_eq!(scale_features(&[1.0, 11.0, 3.0], &ranges, 11), None);
        assert_eq!(scale_features(&[1.0, 2.0, 11.0], &ranges, 11), None);
    }
}
