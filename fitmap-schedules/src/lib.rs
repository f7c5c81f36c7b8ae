//! # fitmap-schedules
//! Weekly exercise schedules as genomes for the
//! [`fitmap`] quality-diversity search.
//!
//! A [`Chromosome`] is a list of genes, each naming an activity from
//! a [`Catalog`], a duration, and the days of the week it is performed
//! on. It decodes into a [`Schedule`], whose fitness is the distance
//! between a target weight and the weight reached after following the
//! plan for a number of weeks. Schedules are placed in the archive by
//! the mean intensity and duration of their sessions, and by how many
//! days per week their exercises are repeated.
//!
//! [`Chromosome`]: crate::genomics::Chromosome
//! [`Schedule`]: crate::phenotypes::Schedule
//!
//! # Example usage: finding schedules for a weight goal
//! ```
//! use fitmap::{rng, Search, SearchConfig};
//! use fitmap_schedules::{Activity, ExerciseTable, PlanningContext};
//! use fitmap_schedules::phenotypes::{Schedule, WeightGoal};
//!
//! let catalog = ExerciseTable::from_json(r#"[
//!     { "name": "walking", "category": "walking", "met": 3.5 },
//!     { "name": "cycling", "category": "bicycling", "met": 6.8 },
//!     { "name": "running", "category": "running", "met": 9.8 },
//!     { "name": "yoga", "category": "conditioning", "met": 2.5 }
//! ]"#).unwrap();
//!
//! let goal = WeightGoal::new(90.0, 85.0, 4).unwrap();
//! let context = PlanningContext::new(catalog, goal).unwrap();
//!
//! let mut search = Search::<Schedule>::new(SearchConfig::new(10, 2000, 400).unwrap(), context);
//! let report = search.run(&mut rng::seeded(Some(7))).unwrap();
//!
//! assert_eq!(report.evaluations, 2000);
//! let (cell, champion, fitness) = search.archive().best().unwrap();
//! println!("best schedule at {}:\n{}", cell, champion);
//! assert_eq!(champion.fitness(), fitness);
//! ```

pub mod catalog;
mod context;
pub mod genomics;
pub mod phenotypes;
pub mod results;

pub use catalog::{Activity, Catalog, CatalogError, ExerciseTable};
pub use context::PlanningContext;
