use crate::catalog::Catalog;
use crate::genomics::{ConfigError, GeneticConfig};
use crate::phenotypes::WeightGoal;

use fitmap::FeatureRange;
use log::debug;

/// Everything needed to generate, mutate, decode
/// and evaluate schedules.
pub struct PlanningContext {
    catalog: Box<dyn Catalog>,
    goal: WeightGoal,
    genetic: GeneticConfig,
}

impl PlanningContext {
    /// Returns a context using the default [`GeneticConfig`]
    /// for `catalog`.
    ///
    /// # Errors
    /// Returns an error if the catalog is empty or the
    /// goal is invalid.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::{Activity, ExerciseTable, PlanningContext};
    /// use fitmap_schedules::phenotypes::WeightGoal;
    ///
    /// let table = ExerciseTable::new(vec![
    ///     Activity { name: "hiking".into(), category: "walking".into(), met: 5.3 },
    ///     Activity { name: "tennis".into(), category: "sports".into(), met: 7.3 },
    /// ]).unwrap();
    ///
    /// let context = PlanningContext::new(table, WeightGoal::new(80.0, 75.0, 4).unwrap()).unwrap();
    /// let [intensity, duration, frequency] = context.feature_ranges();
    ///
    /// assert_eq!((intensity.min, intensity.max), (5.0, 8.0));
    /// assert_eq!((duration.min, duration.max), (0.0, 721.0));
    /// assert_eq!((frequency.min, frequency.max), (0.0, 8.0));
    /// ```
    pub fn new<C: Catalog + 'static>(
        catalog: C,
        goal: WeightGoal,
    ) -> Result<PlanningContext, ConfigError> {
        let genetic = GeneticConfig::for_catalog(&catalog)?;
        PlanningContext::with_genetic_config(catalog, goal, genetic)
    }

    /// Returns a context using a custom [`GeneticConfig`].
    ///
    /// # Errors
    /// Returns an error if the goal or the configuration
    /// is invalid, or if the configuration allows activity
    /// indices the catalog does not hold.
    pub fn with_genetic_config<C: Catalog + 'static>(
        catalog: C,
        goal: WeightGoal,
        genetic: GeneticConfig,
    ) -> Result<PlanningContext, ConfigError> {
        goal.validate()?;
        genetic.validate()?;
        let size = catalog.size();
        if size == 0 {
            return Err(ConfigError::EmptyCatalog);
        }
        let highest = genetic.exercise_index_range().hi();
        if highest >= size {
            return Err(ConfigError::OutOfBounds {
                name: "exercise index",
                value: highest,
                lo: 0,
                hi: size - 1,
            });
        }
        debug!(
            "planning over {} activities, {} weeks from {} to {}",
            size, goal.period, goal.initial_weight, goal.target_weight
        );
        Ok(PlanningContext {
            catalog: Box::new(catalog),
            goal,
            genetic,
        })
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn goal(&self) -> &WeightGoal {
        &self.goal
    }

    pub fn genetic_config(&self) -> &GeneticConfig {
        &self.genetic
    }

    /// Returns the ranges of the intensity, duration
    /// and frequency descriptors.
    ///
    /// Intensities range over the catalog's rounded MET
    /// values and frequencies over the days of the week.
    /// Durations range over the daily duration range,
    /// widened to hold every single exercise duration, so
    /// that any mean occurrence duration can be binned.
    pub fn feature_ranges(&self) -> [FeatureRange; 3] {
        let (min_met, max_met) = self.catalog.intensity_range();
        let daily = self.genetic.daily_duration_range();
        let single = self.genetic.exercise_duration_range();
        let lo = daily.lo().min(single.lo());
        let hi = daily.hi().max(single.hi());
        [
            FeatureRange::new(min_met as f64, max_met as f64),
            FeatureRange::new(lo as f64, (hi + 1) as f64),
            FeatureRange::new(0.0, 8.0),
        ]
    }
}
