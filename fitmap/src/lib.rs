//! A MAP-Elites quality-diversity search engine.
//!
//! Rather than converging on a single best solution, a [`Search`]
//! maintains an [`Archive`]: a 3-dimensional grid over behavioural
//! features in which each cell keeps the best phenotype ever
//! observed there. The search first evaluates random genomes, then
//! repeatedly mutates copies of uniformly-chosen elites.
//!
//! Lower fitness is better.
//!
//! Arbitrary genomic structures are supported via the [`Genome`] and
//! [`Phenotype`] traits. A weekly exercise schedule representation is
//! supplied via the `fitmap-schedules` crate. Search progress can be
//! recorded with a [`SearchLogger`](logging::SearchLogger).
//!
//! # Example usage: points near the centre of a cube
//! ```
//! use fitmap::{rng, FeatureRange, Features, Genome, Phenotype, Search, SearchConfig};
//! use rand::Rng;
//!
//! #[derive(Clone)]
//! struct Point([f64; 3]);
//!
//! impl Genome for Point {
//!     type Config = ();
//!
//!     fn new<R: Rng>(_: &(), rng: &mut R) -> Point {
//!         Point([rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)])
//!     }
//!
//!     fn mutate<R: Rng>(&mut self, _: &(), rng: &mut R) {
//!         let i = rng.gen_range(0..3);
//!         self.0[i] = (self.0[i] + rng.gen_range(-1.0..1.0)).clamp(0.0, 9.99);
//!     }
//! }
//!
//! struct Scored(Point, f64);
//!
//! impl Phenotype for Scored {
//!     type Genome = Point;
//!     type Context = ();
//!
//!     fn genetic_config(context: &()) -> &() {
//!         context
//!     }
//!
//!     fn decode(point: Point, _: &()) -> Scored {
//!         let distance = point.0.iter().map(|c| (c - 5.0).powi(2)).sum::<f64>().sqrt();
//!         Scored(point, distance)
//!     }
//!
//!     fn feature_ranges(_: &()) -> [FeatureRange; 3] {
//!         [FeatureRange::new(0.0, 9.0); 3]
//!     }
//!
//!     fn genome(&self) -> &Point {
//!         &self.0
//!     }
//!
//!     fn fitness(&self) -> f64 {
//!         self.1
//!     }
//!
//!     fn features(&self) -> Features {
//!         (self.0).0
//!     }
//! }
//!
//! let config = SearchConfig::new(5, 2000, 200).unwrap();
//! let mut search = Search::<Scored>::new(config, ());
//! let report = search.run(&mut rng::seeded(Some(42))).unwrap();
//!
//! assert_eq!(report.evaluations, 2000);
//! assert!(search.archive().len() > 100);
//! assert!(report.best_fitness.unwrap() < 2.0);
//! ```

mod archive;
mod features;
mod genome;
pub mod logging;
pub mod rng;
mod search;

pub use archive::{Archive, Insertion};
pub use features::{scale_features, Cell, FeatureRange, Features};
pub use genome::{Genome, Phenotype};
pub use search::{Outcome, Phase, Search, SearchConfig, SearchConfigError, SearchError, SearchReport};
