use super::errors::ConfigError;
use crate::catalog::Catalog;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::NonZeroUsize;

/// Step of exercise and daily durations, in minutes.
pub const DURATION_STEP: usize = 15;
/// Largest valid weekly mask, every day of the week.
pub const FULL_WEEK: usize = 0b111_1111;

/// An inclusive range of evenly spaced integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StepRangeFields")]
pub struct StepRange {
    lo: usize,
    hi: usize,
    step: usize,
}

impl StepRange {
    /// Returns the range `lo, lo + step, ..., hi`.
    ///
    /// # Errors
    /// Returns an error if `step` is zero, if `hi < lo`,
    /// or if either bound is not divisible by `step`.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::StepRange;
    ///
    /// let range = StepRange::new(15, 60, 15).unwrap();
    /// assert_eq!(range.len(), 4);
    /// assert!(range.contains(45));
    /// assert!(!range.contains(50));
    ///
    /// assert!(StepRange::new(60, 15, 15).is_err());
    /// assert!(StepRange::new(10, 60, 15).is_err());
    /// ```
    pub fn new(lo: usize, hi: usize, step: usize) -> Result<StepRange, ConfigError> {
        let range = StepRange { lo, hi, step };
        range.validate()?;
        Ok(range)
    }

    const fn unchecked(lo: usize, hi: usize, step: usize) -> StepRange {
        StepRange { lo, hi, step }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.hi < self.lo {
            return Err(ConfigError::InvalidRange {
                lo: self.lo,
                hi: self.hi,
            });
        }
        if self.lo % self.step != 0 || self.hi % self.step != 0 {
            return Err(ConfigError::NotDivisible {
                lo: self.lo,
                hi: self.hi,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Returns the lowest value in the range.
    pub fn lo(&self) -> usize {
        self.lo
    }

    /// Returns the highest value in the range.
    pub fn hi(&self) -> usize {
        self.hi
    }

    /// Returns the distance between consecutive values.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the number of values in the range.
    pub fn len(&self) -> usize {
        (self.hi - self.lo) / self.step + 1
    }

    /// Always false; ranges hold at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns whether `value` is one of the range's values.
    pub fn contains(&self, value: usize) -> bool {
        (self.lo..=self.hi).contains(&value) && (value - self.lo) % self.step == 0
    }

    /// Returns a uniformly chosen value from the range.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        self.lo + self.step * rng.gen_range(0..self.len())
    }

    /// Returns a uniformly chosen value from the range
    /// other than `current`.
    ///
    /// Falls back to [`StepRange::sample`] if `current` is
    /// not in the range, or is the range's only value.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::StepRange;
    ///
    /// let range = StepRange::new(15, 45, 15).unwrap();
    /// let mut rng = fitmap::rng::seeded(Some(2));
    /// for _ in 0..100 {
    ///     let value = range.sample_other(30, &mut rng);
    ///     assert!(value == 15 || value == 45);
    /// }
    /// ```
    pub fn sample_other<R: Rng>(&self, current: usize, rng: &mut R) -> usize {
        if self.len() < 2 || !self.contains(current) {
            return self.sample(rng);
        }
        let value = self.lo + self.step * rng.gen_range(0..self.len() - 1);
        if value >= current {
            value + self.step
        } else {
            value
        }
    }

    /// Iterate over the range's values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        (self.lo..=self.hi).step_by(self.step)
    }
}

#[derive(Deserialize)]
struct StepRangeFields {
    lo: usize,
    hi: usize,
    step: usize,
}

impl TryFrom<StepRangeFields> for StepRange {
    type Error = ConfigError;

    fn try_from(fields: StepRangeFields) -> Result<StepRange, ConfigError> {
        StepRange::new(fields.lo, fields.hi, fields.step)
    }
}

impl fmt::Display for StepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == 1 {
            write!(f, "{}..={}", self.lo, self.hi)
        } else {
            write!(f, "{}..={} step {}", self.lo, self.hi, self.step)
        }
    }
}

/// Configuration data for schedule generation
/// and mutation.
///
/// Ranges are set through validating setters,
/// which leave the configuration untouched on
/// failure. Deserialization runs the same checks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeneticConfigFields")]
pub struct GeneticConfig {
    exercise_index_range: StepRange,
    exercise_duration_range: StepRange,
    weekly_mask_range: StepRange,
    daily_exercise_count_range: StepRange,
    rest_days: bool,
    daily_duration_range: StepRange,
    mutation_rate: f64,
    alteration_rate: f64,
    addition_rate: f64,
    deletion_rate: f64,
    max_genes: NonZeroUsize,
    initial_genes: NonZeroUsize,
}

#[derive(Deserialize)]
struct GeneticConfigFields {
    exercise_index_range: StepRange,
    exercise_duration_range: StepRange,
    weekly_mask_range: StepRange,
    daily_exercise_count_range: StepRange,
    rest_days: bool,
    daily_duration_range: StepRange,
    mutation_rate: f64,
    alteration_rate: f64,
    addition_rate: f64,
    deletion_rate: f64,
    max_genes: NonZeroUsize,
    initial_genes: NonZeroUsize,
}

impl TryFrom<GeneticConfigFields> for GeneticConfig {
    type Error = ConfigError;

    fn try_from(fields: GeneticConfigFields) -> Result<GeneticConfig, ConfigError> {
        let config = GeneticConfig {
            exercise_index_range: fields.exercise_index_range,
            exercise_duration_range: fields.exercise_duration_range,
            weekly_mask_range: fields.weekly_mask_range,
            daily_exercise_count_range: fields.daily_exercise_count_range,
            rest_days: fields.rest_days,
            daily_duration_range: fields.daily_duration_range,
            mutation_rate: fields.mutation_rate,
            alteration_rate: fields.alteration_rate,
            addition_rate: fields.addition_rate,
            deletion_rate: fields.deletion_rate,
            max_genes: fields.max_genes,
            initial_genes: fields.initial_genes,
        };
        config.validate()?;
        Ok(config)
    }
}

impl GeneticConfig {
    /// Returns the default configuration for a
    /// catalog of `catalog_size` activities.
    ///
    /// | Setting | Default |
    /// |---|---|
    /// | exercise index | `0..catalog_size` |
    /// | exercise duration | `15..=720` minutes, step 15 |
    /// | weekly mask | `1..=127` |
    /// | daily exercise count | `10..=10`, plus rest days |
    /// | daily duration | `0..=480` minutes |
    /// | mutation rate | 0.7 |
    /// | alteration / addition / deletion | 0.6 / 0.2 / 0.2 |
    /// | maximum genes | 10 |
    /// | initial genes | 5 |
    pub fn new(catalog_size: NonZeroUsize) -> GeneticConfig {
        GeneticConfig {
            exercise_index_range: StepRange::unchecked(0, catalog_size.get() - 1, 1),
            exercise_duration_range: StepRange::unchecked(15, 12 * 60, DURATION_STEP),
            weekly_mask_range: StepRange::unchecked(1, FULL_WEEK, 1),
            daily_exercise_count_range: StepRange::unchecked(10, 10, 1),
            rest_days: true,
            daily_duration_range: StepRange::unchecked(0, 8 * 60, 1),
            mutation_rate: 0.7,
            alteration_rate: 0.6,
            addition_rate: 0.2,
            deletion_rate: 0.2,
            // SAFETY: 10 and 5 are valid NonZeroUsizes.
            max_genes: unsafe { NonZeroUsize::new_unchecked(10) },
            initial_genes: unsafe { NonZeroUsize::new_unchecked(5) },
        }
    }

    /// Returns the default configuration for `catalog`.
    ///
    /// # Errors
    /// Returns an error if the catalog is empty.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::{Activity, ExerciseTable};
    /// use fitmap_schedules::genomics::GeneticConfig;
    ///
    /// let table = ExerciseTable::new(vec![
    ///     Activity { name: "rowing".into(), category: "water".into(), met: 7.0 },
    ///     Activity { name: "cycling".into(), category: "bicycling".into(), met: 6.8 },
    /// ]).unwrap();
    ///
    /// let config = GeneticConfig::for_catalog(&table).unwrap();
    /// assert_eq!(config.exercise_index_range().hi(), 1);
    /// assert_eq!(config.max_genes(), 10);
    /// ```
    pub fn for_catalog<C: Catalog + ?Sized>(catalog: &C) -> Result<GeneticConfig, ConfigError> {
        NonZeroUsize::new(catalog.size())
            .map(GeneticConfig::new)
            .ok_or(ConfigError::EmptyCatalog)
    }

    /// Checks every value of the configuration, as the
    /// setters would.
    ///
    /// # Errors
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exercise_index_range.validate()?;
        self.exercise_duration_range.validate()?;
        self.daily_exercise_count_range.validate()?;
        self.daily_duration_range.validate()?;
        Self::check_mask_range(&self.weekly_mask_range)?;
        Self::check_rates(
            self.mutation_rate,
            self.alteration_rate,
            self.addition_rate,
            self.deletion_rate,
        )?;
        Self::check_gene_counts(self.initial_genes.get(), self.max_genes.get())?;
        Ok(())
    }

    /// Sets the range of activity indices genes may hold.
    ///
    /// # Errors
    /// Returns an error if `hi < lo`.
    pub fn set_exercise_index_range(&mut self, lo: usize, hi: usize) -> Result<(), ConfigError> {
        self.exercise_index_range = StepRange::new(lo, hi, 1)?;
        Ok(())
    }

    /// Sets the range of single exercise durations,
    /// in minutes.
    ///
    /// # Errors
    /// Returns an error if `hi < lo`, or if either
    /// bound is not a multiple of 15.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let mut config = GeneticConfig::new(NonZeroUsize::new(3).unwrap());
    ///
    /// config.set_exercise_duration_range(30, 90).unwrap();
    /// assert_eq!(config.exercise_duration_range().len(), 5);
    ///
    /// assert!(config.set_exercise_duration_range(30, 100).is_err());
    /// assert_eq!(config.exercise_duration_range().hi(), 90);
    /// ```
    pub fn set_exercise_duration_range(&mut self, lo: usize, hi: usize) -> Result<(), ConfigError> {
        self.exercise_duration_range = StepRange::new(lo, hi, DURATION_STEP)?;
        Ok(())
    }

    /// Sets the range of weekly masks genes may hold.
    ///
    /// # Errors
    /// Returns an error if `hi < lo`, if `lo` is 0,
    /// or if `hi` exceeds 127.
    pub fn set_weekly_mask_range(&mut self, lo: usize, hi: usize) -> Result<(), ConfigError> {
        let range = StepRange::new(lo, hi, 1)?;
        Self::check_mask_range(&range)?;
        self.weekly_mask_range = range;
        Ok(())
    }

    /// Sets the range of total exercise minutes per day.
    ///
    /// # Errors
    /// Returns an error if `hi < lo`, or if either
    /// bound is not a multiple of 15.
    pub fn set_daily_duration_range(&mut self, lo: usize, hi: usize) -> Result<(), ConfigError> {
        self.daily_duration_range = StepRange::new(lo, hi, DURATION_STEP)?;
        Ok(())
    }

    /// Sets the range of exercise counts per day. If
    /// `rest_days` is set, days without exercise are
    /// allowed as well.
    ///
    /// # Errors
    /// Returns an error if `hi < lo`.
    pub fn set_daily_exercise_count_range(
        &mut self,
        lo: usize,
        hi: usize,
        rest_days: bool,
    ) -> Result<(), ConfigError> {
        self.daily_exercise_count_range = StepRange::new(lo, hi, 1)?;
        self.rest_days = rest_days;
        Ok(())
    }

    /// Sets the chance of a mutation taking place, and
    /// the relative weights of the alteration, addition
    /// and deletion sub-mutations.
    ///
    /// # Errors
    /// Returns an error if `mutation` lies outside `[0, 1]`,
    /// if any sub-mutation rate lies outside `[0, 1)`, or
    /// if all sub-mutation rates are zero.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let mut config = GeneticConfig::new(NonZeroUsize::new(3).unwrap());
    ///
    /// config.set_mutation_rates(1.0, 0.5, 0.25, 0.25).unwrap();
    /// assert_eq!(config.mutation_rate(), 1.0);
    ///
    /// assert!(config.set_mutation_rates(0.5, 0.0, 0.0, 0.0).is_err());
    /// assert!(config.set_mutation_rates(0.5, 1.0, 0.0, 0.0).is_err());
    /// assert_eq!(config.alteration_rate(), 0.5);
    /// ```
    pub fn set_mutation_rates(
        &mut self,
        mutation: f64,
        alteration: f64,
        addition: f64,
        deletion: f64,
    ) -> Result<(), ConfigError> {
        Self::check_rates(mutation, alteration, addition, deletion)?;
        self.mutation_rate = mutation;
        self.alteration_rate = alteration;
        self.addition_rate = addition;
        self.deletion_rate = deletion;
        Ok(())
    }

    /// Sets the number of genes in newly generated
    /// chromosomes, and the maximum number of genes
    /// addition mutations may grow a chromosome to.
    ///
    /// # Errors
    /// Returns an error if `initial` is 0 or greater than `max`.
    pub fn set_gene_counts(&mut self, initial: usize, max: usize) -> Result<(), ConfigError> {
        let (initial, max) = Self::check_gene_counts(initial, max)?;
        self.initial_genes = initial;
        self.max_genes = max;
        Ok(())
    }

    fn check_mask_range(range: &StepRange) -> Result<(), ConfigError> {
        for value in [range.lo(), range.hi()] {
            if !(1..=FULL_WEEK).contains(&value) {
                return Err(ConfigError::OutOfBounds {
                    name: "weekly mask",
                    value,
                    lo: 1,
                    hi: FULL_WEEK,
                });
            }
        }
        Ok(())
    }

    fn check_rates(
        mutation: f64,
        alteration: f64,
        addition: f64,
        deletion: f64,
    ) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&mutation) {
            return Err(ConfigError::InvalidRate {
                name: "mutation",
                rate: mutation,
            });
        }
        for (name, rate) in [
            ("alteration", alteration),
            ("addition", addition),
            ("deletion", deletion),
        ] {
            if !(0.0..1.0).contains(&rate) {
                return Err(ConfigError::InvalidRate { name, rate });
            }
        }
        if alteration + addition + deletion == 0.0 {
            return Err(ConfigError::DegenerateRates);
        }
        Ok(())
    }

    fn check_gene_counts(
        initial: usize,
        max: usize,
    ) -> Result<(NonZeroUsize, NonZeroUsize), ConfigError> {
        match (NonZeroUsize::new(initial), NonZeroUsize::new(max)) {
            (Some(initial), Some(max)) if initial <= max => Ok((initial, max)),
            _ => Err(ConfigError::InvalidGeneCount {
                count: initial,
                max,
            }),
        }
    }

    /// Returns the range of catalog indices a gene may refer to.
    pub fn exercise_index_range(&self) -> StepRange {
        self.exercise_index_range
    }

    /// Returns the range of single exercise durations, in minutes.
    pub fn exercise_duration_range(&self) -> StepRange {
        self.exercise_duration_range
    }

    /// Returns the range of weekly masks a gene may carry.
    pub fn weekly_mask_range(&self) -> StepRange {
        self.weekly_mask_range
    }

    /// Returns the range of total exercise minutes allowed in a day.
    pub fn daily_duration_range(&self) -> StepRange {
        self.daily_duration_range
    }

    /// Returns the range of exercises allowed in a day.
    pub fn daily_exercise_count_range(&self) -> StepRange {
        self.daily_exercise_count_range
    }

    /// Returns whether days without exercise are allowed.
    pub fn rest_days(&self) -> bool {
        self.rest_days
    }

    /// Returns every allowed number of exercises per day,
    /// in ascending order.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::GeneticConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let mut config = GeneticConfig::new(NonZeroUsize::new(3).unwrap());
    /// assert_eq!(config.daily_exercise_counts(), vec![0, 10]);
    ///
    /// config.set_daily_exercise_count_range(1, 3, false).unwrap();
    /// assert_eq!(config.daily_exercise_counts(), vec![1, 2, 3]);
    /// ```
    pub fn daily_exercise_counts(&self) -> Vec<usize> {
        let rest = if self.rest_days && self.daily_exercise_count_range.lo() > 0 {
            Some(0)
        } else {
            None
        };
        rest.into_iter()
            .chain(self.daily_exercise_count_range.iter())
            .collect()
    }

    /// Returns the chance of a mutation taking place.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Returns the relative weight of gene alteration among mutations.
    pub fn alteration_rate(&self) -> f64 {
        self.alteration_rate
    }

    /// Returns the relative weight of gene addition among mutations.
    pub fn addition_rate(&self) -> f64 {
        self.addition_rate
    }

    /// Returns the relative weight of gene deletion among mutations.
    pub fn deletion_rate(&self) -> f64 {
        self.deletion_rate
    }

    /// Returns the maximum number of genes in a chromosome.
    pub fn max_genes(&self) -> usize {
        self.max_genes.get()
    }

    /// Returns the number of genes in a newly generated chromosome.
    pub fn initial_genes(&self) -> usize {
        self.initial_genes.get()
    }
}

impl fmt::Display for GeneticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "exercise index range: {}", self.exercise_index_range)?;
        writeln!(f, "exercise duration range: {}", self.exercise_duration_range)?;
        writeln!(f, "weekly mask range: {}", self.weekly_mask_range)?;
        writeln!(f, "daily duration range: {}", self.daily_duration_range)?;
        writeln!(f, "daily exercise counts: {:?}", self.daily_exercise_counts())?;
        writeln!(
            f,
            "mutation rates: {} (alteration {}, addition {}, deletion {})",
            self.mutation_rate, self.alteration_rate, self.addition_rate, self.deletion_rate
        )?;
        write!(
            f,
            "genes: {} initial, {} maximum",
            self.initial_genes, self.max_genes
        )
    }
}
