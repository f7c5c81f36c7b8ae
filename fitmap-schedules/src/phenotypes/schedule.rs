use super::{Exercise, WeightGoal};
use crate::catalog::{Catalog, CatalogError};
use crate::context::PlanningContext;
use crate::genomics::{Chromosome, GeneticConfig, WEEK};

use fitmap::{FeatureRange, Features, Phenotype};

use std::fmt;

/// The phenotype of a [`Chromosome`]: a weekly plan
/// of exercises, and its distance to a weight goal.
///
/// Schedules are fully computed on construction and
/// immutable afterwards.
#[derive(Clone, PartialEq, Debug)]
pub struct Schedule {
    chromosome: Chromosome,
    exercises: Vec<Exercise>,
    /// Indices into `exercises` of each day's exercises,
    /// in gene order.
    days: [Vec<usize>; 7],
    merged_mask: u8,
    fitness: f64,
}

impl Schedule {
    /// Decodes `chromosome` using the context's catalog
    /// and weight goal.
    ///
    /// # Panics
    /// Panics if any gene refers to an activity the
    /// catalog does not hold.
    pub fn new(chromosome: Chromosome, context: &PlanningContext) -> Schedule {
        match Schedule::try_new(chromosome, context.catalog(), context.goal()) {
            Ok(schedule) => schedule,
            Err(e) => panic!("chromosome does not match the catalog: {}", e),
        }
    }

    /// Decodes `chromosome` against `catalog`, and evaluates
    /// the resulting plan against `goal`.
    ///
    /// # Errors
    /// Returns an error if any gene refers to an activity
    /// the catalog does not hold.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::{Activity, ExerciseTable};
    /// use fitmap_schedules::genomics::{Chromosome, Gene, GeneticConfig};
    /// use fitmap_schedules::phenotypes::{Schedule, WeightGoal};
    ///
    /// let table = ExerciseTable::new(vec![
    ///     Activity { name: "running".into(), category: "running".into(), met: 8.0 },
    /// ]).unwrap();
    /// let config = GeneticConfig::for_catalog(&table).unwrap();
    /// let goal = WeightGoal::new(80.0, 75.0, 1).unwrap();
    ///
    /// let chromosome = Chromosome::from_genes(vec![Gene::new(0, 30, 0b1000000)], &config).unwrap();
    /// let schedule = Schedule::try_new(chromosome, &table, &goal).unwrap();
    ///
    /// assert_eq!(schedule.exercise_counts(), [1, 0, 0, 0, 0, 0, 0]);
    /// assert_eq!(schedule.fitness(), 4.96);
    /// ```
    pub fn try_new<C: Catalog + ?Sized>(
        chromosome: Chromosome,
        catalog: &C,
        goal: &WeightGoal,
    ) -> Result<Schedule, CatalogError> {
        let exercises = chromosome
            .genes()
            .iter()
            .map(|&gene| Exercise::new(gene, catalog))
            .collect::<Result<Vec<_>, _>>()?;

        let mut days: [Vec<usize>; 7] = Default::default();
        for (i, exercise) in exercises.iter().enumerate() {
            for (day, occurrences) in days.iter_mut().enumerate() {
                if exercise.is_scheduled_on(day) {
                    occurrences.push(i);
                }
            }
        }
        let merged_mask = exercises.iter().fold(0, |mask, e| mask | e.weekly_mask());

        let mut schedule = Schedule {
            chromosome,
            exercises,
            days,
            merged_mask,
            fitness: f64::INFINITY,
        };
        schedule.fitness = goal.fitness(schedule.days());
        Ok(schedule)
    }

    /// Returns the decoded exercises, in gene order.
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Returns the exercises taking place on `day`,
    /// where 0 is Monday, in gene order.
    ///
    /// # Panics
    /// Panics if `day` is not in `0..7`.
    pub fn day(&self, day: usize) -> impl Iterator<Item = &Exercise> + Clone {
        let exercises = &self.exercises;
        self.days[day].iter().map(move |&i| &exercises[i])
    }

    /// Iterate over every day's exercises, Monday first.
    pub fn days(
        &self,
    ) -> impl Iterator<Item = impl Iterator<Item = &Exercise> + Clone> + Clone {
        (0..7).map(move |day| self.day(day))
    }

    /// Iterate over every scheduled occurrence of an
    /// exercise, in week order.
    pub fn occurrences(&self) -> impl Iterator<Item = &Exercise> + Clone {
        self.days().flatten()
    }

    /// Returns the union of all exercises' weekly masks.
    pub fn merged_mask(&self) -> u8 {
        self.merged_mask
    }

    /// Returns the merged weekly mask as a 7 character
    /// binary string, Monday first.
    pub fn schedule_to_base2(&self) -> String {
        format!("{:07b}", self.merged_mask)
    }

    /// Returns the MET value of every occurrence, in week order.
    pub fn intensities(&self) -> Vec<f64> {
        self.occurrences().map(Exercise::intensity).collect()
    }

    /// Returns the duration of every occurrence, in week order.
    pub fn durations(&self) -> Vec<usize> {
        self.occurrences().map(Exercise::duration).collect()
    }

    /// Returns the weekly frequency of every exercise, in gene order.
    pub fn frequencies(&self) -> Vec<u32> {
        self.exercises.iter().map(Exercise::frequency).collect()
    }

    /// Returns the number of exercises on each day, Monday first.
    pub fn exercise_counts(&self) -> [usize; 7] {
        let mut counts = [0; 7];
        for (count, day) in counts.iter_mut().zip(&self.days) {
            *count = day.len();
        }
        counts
    }

    /// Returns each day's exercises as
    /// `(exercise_index, duration, intensity)` triples.
    pub fn phenotype_to_vec(&self) -> Vec<Vec<(usize, usize, f64)>> {
        self.days()
            .map(|day| {
                day.map(|e| (e.exercise_index(), e.duration(), e.intensity()))
                    .collect()
            })
            .collect()
    }

    /// Returns the schedule's behavioural descriptors: mean
    /// occurrence intensity, mean occurrence duration, and
    /// mean exercise frequency.
    pub fn features(&self) -> Features {
        let occurrences = self.occurrences().count() as f64;
        let intensity = self.occurrences().map(Exercise::intensity).sum::<f64>() / occurrences;
        let duration = self
            .occurrences()
            .map(|e| e.duration() as f64)
            .sum::<f64>()
            / occurrences;
        let frequency = self.exercises.iter().map(|e| e.frequency() as f64).sum::<f64>()
            / self.exercises.len() as f64;
        [intensity, duration, frequency]
    }

    /// Returns the distance to the weight goal. Lower is better.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }
}

impl Phenotype for Schedule {
    type Genome = Chromosome;
    type Context = PlanningContext;

    fn genetic_config(context: &PlanningContext) -> &GeneticConfig {
        context.genetic_config()
    }

    fn decode(chromosome: Chromosome, context: &PlanningContext) -> Schedule {
        Schedule::new(chromosome, context)
    }

    fn feature_ranges(context: &PlanningContext) -> [FeatureRange; 3] {
        context.feature_ranges()
    }

    fn genome(&self) -> &Chromosome {
        &self.chromosome
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn features(&self) -> Features {
        Schedule::features(self)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, day) in WEEK.iter().zip(self.days()) {
            let exercises: Vec<&Exercise> = day.collect();
            if exercises.is_empty() {
                writeln!(f, "{} (REST)", name)?;
            } else {
                writeln!(f, "{} ({} exercises):", name, exercises.len())?;
                for exercise in exercises {
                    writeln!(
                        f,
                        "    {} for {} minutes",
                        exercise.name(),
                        exercise.duration()
                    )?;
                }
            }
        }
        write!(f, "fitness: {}", self.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Activity, ExerciseTable};
    use crate::genomics::Gene;

    fn table() -> ExerciseTable {
        ExerciseTable::new(vec![
            Activity {
                name: "walking".into(),
                category: "walking".into(),
                met: 3.5,
            },
            Activity {
                name: "running".into(),
                category: "running".into(),
                met: 8.0,
            },
            Activity {
                name: "swimming".into(),
                category: "water".into(),
                met: 6.0,
            },
        ])
        .unwrap()
    }

    fn context() -> PlanningContext {
        PlanningContext::new(table(), WeightGoal::new(90.0, 85.0, 4).unwrap()).unwrap()
    }

    fn schedule(genes: Vec<Gene>) -> Schedule {
        let context = context();
        let chromosome = Chromosome::from_genes(genes, context.genetic_config()).unwrap();
        Schedule::new(chromosome, &context)
    }

    #[test]
    fn days_follow_gene_order() {
        let schedule = schedule(vec![
            Gene::new(1, 30, 0b1100000),
            Gene::new(0, 60, 0b1000001),
            Gene::new(2, 45, 0b0100000),
        ]);
        let monday: Vec<_> = schedule.day(0).map(Exercise::name).collect();
        let tuesday: Vec<_> = schedule.day(1).map(Exercise::name).collect();
        let sunday: Vec<_> = schedule.day(6).map(Exercise::name).collect();
        assert_eq!(monday, vec!["running", "walking"]);
        assert_eq!(tuesday, vec!["running", "swimming"]);
        assert_eq!(sunday, vec!["walking"]);
        assert_eq!(schedule.day(3).count(), 0);
        assert_eq!(schedule.exercise_counts(), [2, 2, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn merged_mask_matches_days() {
        let context = context();
        let mut rng = fitmap::rng::seeded(Some(41));
        for _ in 0..200 {
            let chromosome = Chromosome::new(context.genetic_config(), &mut rng);
            let schedule = Schedule::new(chromosome, &context);
            for day in 0..7 {
                let bit = schedule.merged_mask() & (1 << (6 - day)) != 0;
                assert_eq!(bit, schedule.day(day).count() > 0);
            }
        }
    }

    #[test]
    fn decoding_is_repeatable() {
        let context = context();
        let mut rng = fitmap::rng::seeded(Some(42));
        let chromosome = Chromosome::new(context.genetic_config(), &mut rng);
        let a = Schedule::new(chromosome.clone(), &context);
        let b = Schedule::new(chromosome, &context);
        assert_eq!(a, b);
        assert_eq!(a.fitness(), b.fitness());
        assert_eq!(a.features(), b.features());
    }

    #[test]
    fn features_are_occurrence_means() {
        let schedule = schedule(vec![
            // Three occurrences of 8.0 for 30 minutes.
            Gene::new(1, 30, 0b1010100),
            // One occurrence of 3.5 for 90 minutes.
            Gene::new(0, 90, 0b0000001),
        ]);
        let [intensity, duration, frequency] = schedule.features();
        assert!((intensity - (3.0 * 8.0 + 3.5) / 4.0).abs() < 1e-12);
        assert!((duration - (3.0 * 30.0 + 90.0) / 4.0).abs() < 1e-12);
        assert!((frequency - 2.0).abs() < 1e-12);
        assert_eq!(schedule.intensities(), vec![8.0, 8.0, 8.0, 3.5]);
        assert_eq!(schedule.durations(), vec![30, 30, 30, 90]);
        assert_eq!(schedule.frequencies(), vec![3, 1]);
    }

    #[test]
    fn phenotype_vec() {
        let schedule = schedule(vec![Gene::new(2, 45, 0b0000011)]);
        let days = schedule.phenotype_to_vec();
        assert_eq!(days.len(), 7);
        assert!(days[..5].iter().all(Vec::is_empty));
        assert_eq!(days[5], vec![(2, 45, 6.0)]);
        assert_eq!(days[6], vec![(2, 45, 6.0)]);
        assert_eq!(schedule.schedule_to_base2(), "0000011");
    }

    #[test]
    fn unresolvable_index_is_an_error() {
        let mut config = GeneticConfig::for_catalog(&table()).unwrap();
        config.set_exercise_index_range(0, 5).unwrap();
        let chromosome = Chromosome::from_genes(vec![Gene::new(5, 15, 1)], &config).unwrap();
        let goal = WeightGoal::new(80.0, 75.0, 1).unwrap();
        assert!(matches!(
            Schedule::try_new(chromosome, &table(), &goal),
            Err(CatalogError::IndexOutOfBounds { index: 5, size: 3 })
        ));
    }

    #[test]
    fn display_marks_rest_days() {
        let schedule = schedule(vec![Gene::new(1, 30, 0b1000000)]);
        let text = schedule.to_string();
        assert!(text.starts_with("Monday (1 exercises):\n    running for 30 minutes\n"));
        assert!(text.contains("Tuesday (REST)"));
        assert!(text.contains("Sunday (REST)"));
    }
}
