use crate::features::Cell;
use crate::genome::Phenotype;
use crate::search::{Phase, Search};

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones every archived elite.
    AllElites,
    /// Clones only the best elite.
    Champion,
    /// Clones no elites.
    NoElites,
}

/// A snapshot of a search.
#[derive(Clone, Debug)]
pub struct Snapshot<P> {
    pub evaluation: usize,
    pub phase: Phase,
    pub occupied: usize,
    pub skipped: usize,
    pub coverage: f64,
    pub sample: ArchiveRecord<P>,
    pub elite_stats: Vec<(String, Stats)>,
}

impl<P> fmt::Display for Snapshot<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot {{\n\
            \tevaluation: {:?}\n\
            \tphase: {:?}\n\
            \toccupied: {:?}\n\
            \tskipped: {:?}\n\
            \tcoverage: {:.4}\n\
            {}\
            }}",
            &self.evaluation,
            &self.phase,
            &self.occupied,
            &self.skipped,
            &self.coverage,
            self.elite_stats
                .iter()
                .map(|(name, stats)| format!("\t{}: {}\n", name, stats))
                .collect::<Vec<_>>()
                .join("")
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    ///
    /// All values are NaN if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use fitmap::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// let stats = Stats::from([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].iter().copied());
    /// assert_eq!(stats.median, 4.5);
    /// assert_eq!(stats.std_dev, 2.0);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Stats {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: f64::NAN,
                minimum: f64::NAN,
                mean: f64::NAN,
                median: f64::NAN,
                std_dev: f64::NAN,
            };
        }
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let n = data.len() as f64;
        let mean = sum / n;
        let std_dev = (data.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt();

        data.sort_unstable_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("uncomparable value in statistics"))
        });
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
            std_dev,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean {:.2} ± {:.2}, median {:.2}, range [{:.2}, {:.2}]",
            self.mean, self.std_dev, self.median, self.minimum, self.maximum
        )
    }
}

/// A reporting-level dependant store
/// of elites from an archive.
#[derive(Clone, Debug)]
pub enum ArchiveRecord<P> {
    /// Every elite with its cell and fitness.
    Elites(Vec<(Cell, P, f64)>),
    /// Only the best elite.
    Champion(Option<(Cell, P, f64)>),
    /// Empty.
    None,
}

/// A log of the progress of a search over time.
#[derive(Clone, Debug)]
pub struct SearchLogger<P> {
    reporting_level: ReportingLevel,
    snapshots: Vec<Snapshot<P>>,
}

impl<P: Phenotype + Clone> SearchLogger<P> {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> SearchLogger<P> {
        SearchLogger {
            reporting_level,
            snapshots: vec![],
        }
    }

    /// Store a snapshot of a search.
    ///
    /// The `elite_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the archived elites,
    /// where each statistic is named by `stat_names`.
    pub fn log<E, const N: usize>(
        &mut self,
        search: &Search<P>,
        elite_stat_extractor: &E,
        stat_names: [&str; N],
    ) where
        E: Fn(&P) -> [f64; N],
    {
        let archive = search.archive();
        let stats: Vec<[f64; N]> = archive.solutions().map(elite_stat_extractor).collect();
        let elite_stats = stat_names
            .iter()
            .cloned()
            .map(String::from)
            .zip(unzip_n_vecs(stats.into_iter()))
            .map(|(name, data)| (name, Stats::from(data.into_iter())))
            .collect();
        self.snapshots.push(Snapshot {
            evaluation: search.evaluations(),
            phase: search.phase(),
            occupied: archive.len(),
            skipped: search.skipped(),
            coverage: archive.coverage(),
            sample: match self.reporting_level {
                ReportingLevel::AllElites => ArchiveRecord::Elites(
                    archive
                        .elites()
                        .map(|(cell, p, fitness)| (cell, p.clone(), fitness))
                        .collect(),
                ),
                ReportingLevel::Champion => ArchiveRecord::Champion(
                    archive
                        .best()
                        .map(|(cell, p, fitness)| (cell, p.clone(), fitness)),
                ),
                ReportingLevel::NoElites => ArchiveRecord::None,
            },
            elite_stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot<P>> {
        self.snapshots.iter()
    }

    /// Returns the most recent snapshot.
    pub fn last(&self) -> Option<&Snapshot<P>> {
        self.snapshots.last()
    }
}

fn unzip_n_vecs<T: Clone, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs = vec![Vec::default(); N];
    for items in iter {
        for (i, item) in items.into_iter().enumerate() {
            vecs[i].push(item);
        }
    }
    vecs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_are_nan() {
        let stats = Stats::from(std::iter::empty());
        assert!(stats.mean.is_nan());
        assert!(stats.median.is_nan());
    }

    #[test]
    fn single_value_stats() {
        let stats = Stats::from(std::iter::once(3.5));
        assert_eq!(
            stats,
            Stats {
                maximum: 3.5,
                minimum: 3.5,
                mean: 3.5,
                median: 3.5,
                std_dev: 0.0,
            }
        );
    }

    #[test]
    fn unzip() {
        let vecs = unzip_n_vecs(vec![[1, 2], [3, 4], [5, 6]].into_iter());
        assert_eq!(vecs, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    }
}
