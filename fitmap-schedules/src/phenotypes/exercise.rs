use crate::catalog::{Activity, Catalog, CatalogError};
use crate::genomics::{Gene, GeneField, GeneticConfig};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// The phenotype of a single [`Gene`]: the gene
/// bound to the catalog activity it refers to.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Exercise {
    gene: Gene,
    activity: Activity,
}

impl Exercise {
    /// Resolves `gene` against `catalog`.
    ///
    /// # Errors
    /// Returns an error if the gene's exercise index
    /// is not in the catalog.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::{Activity, ExerciseTable};
    /// use fitmap_schedules::genomics::Gene;
    /// use fitmap_schedules::phenotypes::Exercise;
    ///
    /// let table = ExerciseTable::new(vec![
    ///     Activity { name: "swimming".into(), category: "water".into(), met: 6.0 },
    /// ]).unwrap();
    ///
    /// let exercise = Exercise::new(Gene::new(0, 45, 0b0101010), &table).unwrap();
    /// assert_eq!(exercise.name(), "swimming");
    /// assert_eq!(exercise.intensity(), 6.0);
    /// assert_eq!(exercise.duration(), 45);
    /// assert_eq!(exercise.frequency(), 3);
    ///
    /// assert!(Exercise::new(Gene::new(1, 45, 1), &table).is_err());
    /// ```
    pub fn new<C: Catalog + ?Sized>(gene: Gene, catalog: &C) -> Result<Exercise, CatalogError> {
        let activity = catalog.item_at(gene.exercise_index())?.clone();
        Ok(Exercise { gene, activity })
    }

    /// Alters the underlying gene as [`Gene::alter`] does,
    /// then re-resolves the activity.
    ///
    /// # Errors
    /// Returns an error if the altered index is not in
    /// the catalog, in which case the exercise is unchanged.
    pub fn alter<C, R>(
        &mut self,
        config: &GeneticConfig,
        catalog: &C,
        rng: &mut R,
    ) -> Result<GeneField, CatalogError>
    where
        C: Catalog + ?Sized,
        R: Rng,
    {
        let mut gene = self.gene;
        let field = gene.alter(config, rng);
        let activity = catalog.item_at(gene.exercise_index())?.clone();
        self.gene = gene;
        self.activity = activity;
        Ok(field)
    }

    pub fn gene(&self) -> &Gene {
        &self.gene
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn name(&self) -> &str {
        &self.activity.name
    }

    pub fn category(&self) -> &str {
        &self.activity.category
    }

    /// Returns the activity's MET value.
    pub fn intensity(&self) -> f64 {
        self.activity.met
    }

    pub fn exercise_index(&self) -> usize {
        self.gene.exercise_index()
    }

    /// Returns the duration in minutes.
    pub fn duration(&self) -> usize {
        self.gene.duration()
    }

    pub fn weekly_mask(&self) -> u8 {
        self.gene.weekly_mask()
    }

    /// Returns the number of days per week the exercise takes place.
    pub fn frequency(&self) -> u32 {
        self.gene.frequency()
    }

    pub fn is_scheduled_on(&self, day: usize) -> bool {
        self.gene.is_scheduled_on(day)
    }

    pub fn exercise_days(&self) -> Vec<&'static str> {
        self.gene.exercise_days()
    }

    pub fn schedule_to_base2(&self) -> String {
        self.gene.schedule_to_base2()
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<&str> = self.exercise_days().into_iter().map(|d| &d[..3]).collect();
        write!(
            f,
            "Exercise {{\n\
            \tname: {}\n\
            \tcategory: {}\n\
            \tMET: {}\n\
            \tduration: {} minutes\n\
            \trepeat: {}\n\
            \tgenotype: {}\n\
            \tschedule: {}\n\
            \tfrequency: {}\n\
            }}",
            self.name(),
            self.category(),
            self.intensity(),
            self.duration(),
            days.join(", "),
            self.gene,
            self.schedule_to_base2(),
            self.frequency(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ExerciseTable;

    use std::num::NonZeroUsize;

    fn table() -> ExerciseTable {
        ExerciseTable::new(
            (0..6)
                .map(|i| Activity {
                    name: format!("activity {}", i),
                    category: "test".into(),
                    met: 1.0 + i as f64,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn alter_keeps_activity_in_sync() {
        let table = table();
        let config = GeneticConfig::for_catalog(&table).unwrap();
        let mut rng = fitmap::rng::seeded(Some(31));
        let mut exercise = Exercise::new(Gene::new(0, 15, 1), &table).unwrap();
        for _ in 0..200 {
            exercise.alter(&config, &table, &mut rng).unwrap();
            assert_eq!(
                exercise.activity(),
                table.item_at(exercise.exercise_index()).unwrap()
            );
        }
    }

    #[test]
    fn failed_alter_leaves_exercise_unchanged() {
        let table = table();
        // Indices up to 99 against a catalog of 6.
        let mut config = GeneticConfig::new(NonZeroUsize::new(100).unwrap());
        config.set_weekly_mask_range(1, 1).unwrap();
        config.set_exercise_duration_range(15, 15).unwrap();
        let mut rng = fitmap::rng::seeded(Some(32));
        let mut exercise = Exercise::new(Gene::new(2, 15, 1), &table).unwrap();
        let mut failures = 0;
        for _ in 0..100 {
            let before = exercise.clone();
            if exercise.alter(&config, &table, &mut rng).is_err() {
                assert_eq!(exercise, before);
                failures += 1;
            }
        }
        assert!(failures > 0);
    }

    #[test]
    fn display_lists_repeat_days() {
        let table = table();
        let exercise = Exercise::new(Gene::new(3, 30, 0b1000001), &table).unwrap();
        let text = exercise.to_string();
        assert!(text.contains("name: activity 3"));
        assert!(text.contains("repeat: Mon, Sun"));
        assert!(text.contains("schedule: 1000001"));
        assert!(text.contains("frequency: 2"));
    }
}
