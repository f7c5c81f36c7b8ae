use super::errors::ConfigError;
use super::GeneticConfig;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Names of the days of the week, starting on Monday.
pub const WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Genes are the components of chromosomes.
/// Each describes one activity, how long it
/// lasts, and on which days of the week it
/// takes place.
///
/// The weekly mask uses 7 bits, with the most
/// significant one standing for Monday and the
/// least significant one for Sunday.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "GeneFields")]
pub struct Gene {
    exercise_index: usize,
    duration: usize,
    weekly_mask: u8,
}

/// The fields of a [`Gene`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum GeneField {
    ExerciseIndex,
    Duration,
    WeeklyMask,
}

impl Gene {
    /// Returns a new gene with the specified parameters.
    ///
    /// # Panics
    /// Panics if `weekly_mask` is 0 or uses more than 7 bits.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::Gene;
    ///
    /// let gene = Gene::new(3, 45, 0b1010101);
    /// ```
    pub fn new(exercise_index: usize, duration: usize, weekly_mask: u8) -> Gene {
        assert!(
            weekly_mask != 0 && weekly_mask as usize <= super::FULL_WEEK,
            "invalid weekly mask {:#b}",
            weekly_mask
        );
        Gene {
            exercise_index,
            duration,
            weekly_mask,
        }
    }

    /// Returns a gene with every field drawn uniformly
    /// from its range in `config`.
    pub fn random<R: Rng>(config: &GeneticConfig, rng: &mut R) -> Gene {
        Gene {
            exercise_index: config.exercise_index_range().sample(rng),
            duration: config.exercise_duration_range().sample(rng),
            weekly_mask: config.weekly_mask_range().sample(rng) as u8,
        }
    }

    /// Replaces one uniformly chosen field with a different
    /// value from its range, returning which. The other two
    /// fields are left untouched.
    ///
    /// Only fields whose range holds more than one value are
    /// candidates. If no field can change, a field is reported
    /// and the gene is left as is.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::{Gene, GeneField, GeneticConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(NonZeroUsize::new(20).unwrap());
    /// let mut rng = fitmap::rng::seeded(Some(3));
    ///
    /// let original = Gene::new(3, 45, 0b1010101);
    /// let mut gene = original;
    /// match gene.alter(&config, &mut rng) {
    ///     GeneField::ExerciseIndex => assert_ne!(gene.exercise_index(), 3),
    ///     GeneField::Duration => assert_ne!(gene.duration(), 45),
    ///     GeneField::WeeklyMask => assert_ne!(gene.weekly_mask(), 0b1010101),
    /// }
    /// ```
    pub fn alter<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) -> GeneField {
        let fields = [
            (GeneField::ExerciseIndex, config.exercise_index_range()),
            (GeneField::Duration, config.exercise_duration_range()),
            (GeneField::WeeklyMask, config.weekly_mask_range()),
        ];
        let mutable: Vec<_> = fields.iter().filter(|(_, range)| range.len() > 1).collect();
        let &(field, range) = if mutable.is_empty() {
            &fields[rng.gen_range(0..fields.len())]
        } else {
            mutable[rng.gen_range(0..mutable.len())]
        };
        match field {
            GeneField::ExerciseIndex => {
                self.exercise_index = range.sample_other(self.exercise_index, rng);
            }
            GeneField::Duration => {
                self.duration = range.sample_other(self.duration, rng);
            }
            GeneField::WeeklyMask => {
                self.weekly_mask = range.sample_other(self.weekly_mask as usize, rng) as u8;
            }
        }
        field
    }

    /// Checks that every field lies within its range in `config`.
    ///
    /// # Errors
    /// Returns an error naming the first field out of range.
    pub fn check(&self, config: &GeneticConfig) -> Result<(), ConfigError> {
        for (name, value, range) in [
            (
                "exercise index",
                self.exercise_index,
                config.exercise_index_range(),
            ),
            ("duration", self.duration, config.exercise_duration_range()),
            (
                "weekly mask",
                self.weekly_mask as usize,
                config.weekly_mask_range(),
            ),
        ] {
            if !range.contains(value) {
                return Err(ConfigError::OutOfBounds {
                    name,
                    value,
                    lo: range.lo(),
                    hi: range.hi(),
                });
            }
        }
        Ok(())
    }

    /// Returns the index of the gene's activity.
    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    /// Returns the gene's duration in minutes.
    pub fn duration(&self) -> usize {
        self.duration
    }

    /// Returns the gene's weekly mask.
    pub fn weekly_mask(&self) -> u8 {
        self.weekly_mask
    }

    /// Returns whether the gene's activity takes place
    /// on `day`, where 0 is Monday.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::Gene;
    ///
    /// let gene = Gene::new(0, 15, 0b1000001);
    /// assert!(gene.is_scheduled_on(0));
    /// assert!(!gene.is_scheduled_on(1));
    /// assert!(gene.is_scheduled_on(6));
    /// ```
    pub fn is_scheduled_on(&self, day: usize) -> bool {
        day < 7 && self.weekly_mask & (1 << (6 - day)) != 0
    }

    /// Returns the weekly mask as a 7 character
    /// binary string, Monday first.
    pub fn schedule_to_base2(&self) -> String {
        format!("{:07b}", self.weekly_mask)
    }

    /// Returns the names of the days the gene's
    /// activity takes place, in week order.
    pub fn exercise_days(&self) -> Vec<&'static str> {
        (0..7)
            .filter(|&day| self.is_scheduled_on(day))
            .map(|day| WEEK[day])
            .collect()
    }

    /// Returns the number of days per week the
    /// gene's activity takes place.
    pub fn frequency(&self) -> u32 {
        self.weekly_mask.count_ones()
    }

    /// Returns the gene as `[exercise_index, duration, weekly_mask]`.
    pub fn to_array(&self) -> [usize; 3] {
        [
            self.exercise_index,
            self.duration,
            self.weekly_mask as usize,
        ]
    }
}

#[derive(Deserialize)]
struct GeneFields {
    exercise_index: usize,
    duration: usize,
    weekly_mask: u8,
}

impl TryFrom<GeneFields> for Gene {
    type Error = ConfigError;

    fn try_from(fields: GeneFields) -> Result<Gene, ConfigError> {
        let mask = fields.weekly_mask as usize;
        if mask == 0 || mask > super::FULL_WEEK {
            return Err(ConfigError::OutOfBounds {
                name: "weekly mask",
                value: mask,
                lo: 1,
                hi: super::FULL_WEEK,
            });
        }
        Ok(Gene::new(fields.exercise_index, fields.duration, fields.weekly_mask))
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_array())
    }
}
