use clap::Parser;
use fitmap::logging::{ReportingLevel, SearchLogger};
use fitmap::{rng, Cell, Search, SearchConfig, SearchConfigError, SearchError, SearchReport};
use fitmap_schedules::genomics::ConfigError;
use fitmap_schedules::phenotypes::{Schedule, WeightGoal};
use fitmap_schedules::results::{summarize, ScheduleSummary};
use fitmap_schedules::{Catalog, CatalogError, ExerciseTable, PlanningContext};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

/// Evaluations spent on random schedules before mutating elites.
const INITIAL_EVALUATIONS: usize = 1000;
/// Number of search snapshots logged over a run.
const SNAPSHOTS: usize = 10;
const OUTPUT_PATH: &str = "results.ron";
const BUNDLED_CATALOG: &str = include_str!("../data/compendium.json");

#[derive(Debug, Error)]
enum PlannerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    SearchConfig(#[from] SearchConfigError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("unable to serialize results: {0}")]
    Ron(#[from] ron::Error),
    #[error("unable to write results: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "planner")]
#[command(about = "Search for weekly exercise schedules meeting a weight goal", long_about = None)]
struct Args {
    /// Starting body weight in kilograms
    #[arg(allow_negative_numbers = true)]
    initial_weight: f64,
    /// Target body weight in kilograms
    #[arg(allow_negative_numbers = true)]
    target_weight: f64,
    /// Length of the plan in weeks
    period: usize,
    /// Total number of schedule evaluations
    evaluations: usize,
    /// Bins per feature dimension
    bins: usize,
    /// Activity catalog in JSON; the bundled compendium when omitted
    catalog: Option<PathBuf>,
    /// Random seed
    seed: Option<u64>,
}

#[derive(Serialize)]
struct Solution {
    cell: Cell,
    genotype: Vec<[usize; 3]>,
    summary: ScheduleSummary,
}

#[derive(Serialize)]
struct Output {
    goal: WeightGoal,
    report: SearchReport,
    elapsed_seconds: f64,
    solutions: Vec<Solution>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), PlannerError> {
    let goal = WeightGoal::new(args.initial_weight, args.target_weight, args.period)?;

    let catalog = match &args.catalog {
        Some(path) => ExerciseTable::from_path(path)?,
        None => ExerciseTable::from_json(BUNDLED_CATALOG)?,
    };
    info!("loaded {} activities", catalog.size());

    let config = SearchConfig::new(
        args.bins,
        args.evaluations,
        args.evaluations.min(INITIAL_EVALUATIONS),
    )?;
    let context = PlanningContext::new(catalog, goal.clone())?;
    debug!("genetic configuration:\n{}", context.genetic_config());

    let mut search = Search::<Schedule>::new(config, context);
    let mut logger = SearchLogger::new(ReportingLevel::Champion);
    let log_interval = (args.evaluations / SNAPSHOTS).max(1);
    let mut rng = rng::seeded(args.seed);

    let start = Instant::now();
    let report = search.run_with(&mut rng, |search| {
        if search.evaluations() % log_interval == 0 {
            logger.log(
                search,
                &|s: &Schedule| [s.fitness(), s.chromosome().size() as f64],
                ["fitness", "genes"],
            );
            if let Some(snapshot) = logger.last() {
                info!("{}", snapshot);
            }
        }
    })?;
    let elapsed = start.elapsed();

    let archive = search.archive();
    println!("Solutions found: {}", archive.len());
    println!("Coverage: {:.2}%", archive.coverage() * 100.0);
    println!("Evaluations skipped: {}", report.skipped);
    println!("Elapsed time: {:.2?}", elapsed);

    let solutions: Vec<&Schedule> = archive.solutions().collect();
    for (name, stats) in summarize(solutions.iter().copied()) {
        println!("{}: {}", name, stats);
    }
    if let Some((cell, champion, _)) = archive.best() {
        println!("\nBest schedule, at {}:\n{}", cell, champion);
    }

    if env::var_os("PLANNER_NO_OUTPUT").is_none() {
        let output = Output {
            goal,
            report,
            elapsed_seconds: elapsed.as_secs_f64(),
            solutions: archive
                .elites()
                .map(|(cell, schedule, _)| Solution {
                    cell,
                    genotype: schedule.chromosome().genotype_to_vec(),
                    summary: ScheduleSummary::from(schedule),
                })
                .collect(),
        };
        let text = ron::ser::to_string_pretty(&output, ron::ser::PrettyConfig::new())?;
        std::fs::write(OUTPUT_PATH, text)?;
        info!("wrote {} solutions to {}", output.solutions.len(), OUTPUT_PATH);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(values: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("planner").chain(values.iter().copied()))
    }

    #[test]
    fn parses_required_arguments() {
        let args = parse(&["80", "75.5", "4", "5000", "20"]).unwrap();
        assert_eq!(args.initial_weight, 80.0);
        assert_eq!(args.target_weight, 75.5);
        assert_eq!(args.period, 4);
        assert_eq!(args.evaluations, 5000);
        assert_eq!(args.bins, 20);
        assert_eq!(args.catalog, None);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn parses_optional_arguments() {
        let args = parse(&["80", "75", "4", "100", "5", "catalog.json", "42"]).unwrap();
        assert_eq!(args.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn rejects_wrong_argument_counts() {
        assert!(parse(&["80", "75", "4", "100"]).is_err());
        assert!(parse(&["80", "75", "4", "100", "5", "c.json", "1", "x"]).is_err());
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(parse(&["80", "75", "four", "100", "5"]).is_err());
        assert!(parse(&["80", "75", "4", "100", "5", "c.json", "seed"]).is_err());
    }

    #[test]
    fn invalid_goal_is_reported_before_searching() {
        let args = parse(&["80", "-75", "4", "100", "5"]).unwrap();
        assert_eq!(args.target_weight, -75.0);
        assert!(matches!(
            run(args),
            Err(PlannerError::Config(ConfigError::InvalidGoal(_)))
        ));
    }

    #[test]
    fn bundled_catalog_is_valid() {
        let catalog = ExerciseTable::from_json(BUNDLED_CATALOG).unwrap();
        assert!(catalog.size() > 10);
        assert_eq!(catalog.intensity_range(), (2, 12));
    }

    #[test]
    fn small_run() {
        std::env::set_var("PLANNER_NO_OUTPUT", "1");
        assert!(run(parse(&["85", "80", "2", "300", "5", "missing.json", "3"]).unwrap()).is_err());
        let result = run(parse(&["85", "80", "2", "300", "5"]).unwrap());
        assert!(result.is_ok());
    }
}
