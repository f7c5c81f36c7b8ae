//! Statistics over the schedules found by a search.

use crate::phenotypes::Schedule;

use fitmap::logging::Stats;
use serde::{Deserialize, Serialize};

/// Per-schedule statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub mean_intensity: f64,
    pub std_intensity: f64,
    pub mean_duration: f64,
    pub std_duration: f64,
    /// The merged weekly mask, Monday first.
    pub week_schedule: String,
    pub total_exercises: usize,
    pub mean_frequency: f64,
    pub fitness: f64,
}

impl From<&Schedule> for ScheduleSummary {
    fn from(schedule: &Schedule) -> ScheduleSummary {
        let intensity = Stats::from(schedule.intensities().into_iter());
        let duration = Stats::from(schedule.durations().into_iter().map(|d| d as f64));
        let frequency = Stats::from(schedule.frequencies().into_iter().map(f64::from));
        ScheduleSummary {
            mean_intensity: intensity.mean,
            std_intensity: intensity.std_dev,
            mean_duration: duration.mean,
            std_duration: duration.std_dev,
            week_schedule: schedule.schedule_to_base2(),
            total_exercises: schedule.exercise_counts().iter().sum(),
            mean_frequency: frequency.mean,
            fitness: schedule.fitness(),
        }
    }
}

/// Returns named statistics over a collection of
/// schedules: their fitness, the durations and intensities
/// of every occurrence of an exercise, and the number of
/// exercises on each day.
///
/// # Examples
/// ```
/// use fitmap_schedules::{Activity, ExerciseTable};
/// use fitmap_schedules::genomics::{Chromosome, Gene, GeneticConfig};
/// use fitmap_schedules::phenotypes::{Schedule, WeightGoal};
/// use fitmap_schedules::results::summarize;
///
/// let table = ExerciseTable::new(vec![
///     Activity { name: "running".into(), category: "running".into(), met: 8.0 },
/// ]).unwrap();
/// let config = GeneticConfig::for_catalog(&table).unwrap();
/// let goal = WeightGoal::new(80.0, 75.0, 1).unwrap();
/// let chromosome = Chromosome::from_genes(vec![Gene::new(0, 30, 0b1111111)], &config).unwrap();
/// let schedule = Schedule::try_new(chromosome, &table, &goal).unwrap();
///
/// let stats = summarize(&[schedule]);
/// assert_eq!(stats[0].0, "performance");
/// assert_eq!(stats[1].1.mean, 30.0);
/// assert_eq!(stats[3].1.maximum, 1.0);
/// ```
pub fn summarize<'a, I>(schedules: I) -> Vec<(String, Stats)>
where
    I: IntoIterator<Item = &'a Schedule> + Clone,
{
    vec![
        (
            "performance".to_owned(),
            Stats::from(schedules.clone().into_iter().map(Schedule::fitness)),
        ),
        (
            "exercise duration".to_owned(),
            Stats::from(
                schedules
                    .clone()
                    .into_iter()
                    .flat_map(Schedule::durations)
                    .map(|d| d as f64),
            ),
        ),
        (
            "intensity".to_owned(),
            Stats::from(schedules.clone().into_iter().flat_map(Schedule::intensities)),
        ),
        (
            "exercises per day".to_owned(),
            Stats::from(
                schedules
                    .into_iter()
                    .flat_map(Schedule::exercise_counts)
                    .map(|c| c as f64),
            ),
        ),
    ]
}
