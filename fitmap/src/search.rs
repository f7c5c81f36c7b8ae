//! A Search fills an [`Archive`] by first evaluating
//! random genomes, then repeatedly mutating copies of
//! randomly selected elites.
mod config;
mod errors;

pub use config::SearchConfig;
pub use errors::{SearchConfigError, SearchError};

use crate::archive::{Archive, Insertion};
use crate::features::{scale_features, Cell, FeatureRange};
use crate::genome::{Genome, Phenotype};

use log::{debug, info, trace, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The two stages of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Evaluating brand-new random genomes.
    Init,
    /// Mutating copies of archived elites.
    Explore,
}

/// Outcome of a single evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// The phenotype mapped to `cell`, and the insertion
    /// attempt had the given result.
    Evaluated { cell: Cell, insertion: Insertion },
    /// A behavioural descriptor fell outside its range;
    /// the phenotype was discarded.
    Skipped,
}

/// Summary of a completed search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub evaluations: usize,
    pub skipped: usize,
    pub insertions: usize,
    pub occupied: usize,
    pub best_fitness: Option<f64>,
}

/// A MAP-Elites search over phenotypes of type `P`.
pub struct Search<P: Phenotype> {
    archive: Archive<P>,
    context: P::Context,
    config: SearchConfig,
    ranges: [FeatureRange; 3],
    evaluation: usize,
    skipped: usize,
    insertions: usize,
}

impl<P: Phenotype> Search<P> {
    /// Creates a new search with an empty archive.
    ///
    /// The type of `context` depends on the implementation
    /// of [`Phenotype`], and is effectively opaque to the search.
    pub fn new(config: SearchConfig, context: P::Context) -> Search<P> {
        Search {
            archive: Archive::new(config.bins),
            ranges: P::feature_ranges(&context),
            context,
            config,
            evaluation: 0,
            skipped: 0,
            insertions: 0,
        }
    }

    /// Returns the phase the next evaluation will run in.
    pub fn phase(&self) -> Phase {
        if self.evaluation < self.config.initial_evaluations.get() {
            Phase::Init
        } else {
            Phase::Explore
        }
    }

    /// Returns whether the evaluation budget is spent.
    pub fn is_finished(&self) -> bool {
        self.evaluation >= self.config.evaluations
    }

    /// Runs a single evaluation: generates a phenotype
    /// according to the current [`Phase`], then attempts
    /// to archive it.
    ///
    /// Returns `Ok(None)` once the budget is spent.
    ///
    /// # Errors
    /// Returns an error if an [`Phase::Explore`] evaluation
    /// finds the archive empty, which can only happen if
    /// every initial evaluation was skipped.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Result<Option<Outcome>, SearchError> {
        if self.is_finished() {
            return Ok(None);
        }
        if self.evaluation == self.config.initial_evaluations.get() {
            info!(
                "switching to exploration after {} evaluations, {} cells occupied",
                self.evaluation,
                self.archive.len()
            );
            if self.archive.len() < 2 {
                warn!("exploring from {} elite(s)", self.archive.len());
            }
        }

        let phenotype = match self.phase() {
            Phase::Init => {
                let genome = <P::Genome as Genome>::new(P::genetic_config(&self.context), rng);
                P::decode(genome, &self.context)
            }
            Phase::Explore => {
                let mut genome = self.select_parent(rng)?;
                genome.mutate(P::genetic_config(&self.context), rng);
                P::decode(genome, &self.context)
            }
        };
        let outcome = self.archive_phenotype(phenotype);
        self.evaluation += 1;
        Ok(Some(outcome))
    }

    /// Returns a copy of the genome of a uniformly
    /// chosen elite.
    fn select_parent<R: Rng>(&self, rng: &mut R) -> Result<P::Genome, SearchError> {
        self.archive
            .select_random(rng)
            .map(|(_, parent)| parent.genome().clone())
            .ok_or(SearchError::EmptyArchive {
                evaluation: self.evaluation,
            })
    }

    fn archive_phenotype(&mut self, phenotype: P) -> Outcome {
        let features = phenotype.features();
        match scale_features(&features, &self.ranges, self.config.bins.get()) {
            Some(cell) => {
                let fitness = phenotype.fitness();
                let insertion = self.archive.try_insert(cell, phenotype, fitness);
                if insertion.accepted() {
                    self.insertions += 1;
                    debug!(
                        "evaluation {}: {:?} at {} with fitness {}",
                        self.evaluation, insertion, cell, fitness
                    );
                }
                Outcome::Evaluated { cell, insertion }
            }
            None => {
                self.skipped += 1;
                trace!(
                    "evaluation {}: features {:?} out of range",
                    self.evaluation,
                    features
                );
                Outcome::Skipped
            }
        }
    }

    /// Runs the search until the evaluation budget is spent.
    ///
    /// # Errors
    /// See [`Search::step`].
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Result<SearchReport, SearchError> {
        self.run_with(rng, |_| {})
    }

    /// Runs the search until the evaluation budget is spent,
    /// calling `observer` after each evaluation.
    ///
    /// # Errors
    /// See [`Search::step`].
    pub fn run_with<R, O>(&mut self, rng: &mut R, mut observer: O) -> Result<SearchReport, SearchError>
    where
        R: Rng,
        O: FnMut(&Search<P>),
    {
        while self.step(rng)?.is_some() {
            observer(self);
        }
        let report = self.report();
        info!(
            "search finished: {} evaluations, {} skipped, {} cells occupied",
            report.evaluations, report.skipped, report.occupied
        );
        Ok(report)
    }

    /// Returns a summary of the search so far.
    pub fn report(&self) -> SearchReport {
        SearchReport {
            evaluations: self.evaluation,
            skipped: self.skipped,
            insertions: self.insertions,
            occupied: self.archive.len(),
            best_fitness: self.archive.best().map(|(_, _, f)| f),
        }
    }

    /// Returns the number of evaluations run so far.
    pub fn evaluations(&self) -> usize {
        self.evaluation
    }

    /// Returns the number of evaluations discarded for
    /// falling outside the feature ranges.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the archive of elites.
    pub fn archive(&self) -> &Archive<P> {
        &self.archive
    }

    /// Consumes the search, returning its archive.
    pub fn into_archive(self) -> Archive<P> {
        self.archive
    }

    /// Returns the search's context.
    pub fn context(&self) -> &P::Context {
        &self.context
    }

    /// Returns the search's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Features;
    use crate::rng;

    /// A point in the unit cube. Fitness is the distance
    /// to `TARGET`, the features are the coordinates.
    #[derive(Clone, Debug, PartialEq)]
    struct Point([f64; 3]);

    const TARGET: [f64; 3] = [0.5, 0.5, 0.5];

    struct Bounds {
        /// Randomly generated coordinates lie in `offset..offset + spread`.
        offset: f64,
        spread: f64,
        mutation_power: f64,
    }

    impl Genome for Point {
        type Config = Bounds;

        fn new<R: Rng>(config: &Bounds, rng: &mut R) -> Point {
            let mut coordinate = || config.offset + rng.gen_range(0.0..config.spread);
            Point([coordinate(), coordinate(), coordinate()])
        }

        fn mutate<R: Rng>(&mut self, config: &Bounds, rng: &mut R) {
            let i = rng.gen_range(0..3);
            self.0[i] += rng.gen_range(-config.mutation_power..=config.mutation_power);
        }
    }

    #[derive(Clone, Debug)]
    struct Evaluated {
        point: Point,
        fitness: f64,
    }

    impl Phenotype for Evaluated {
        type Genome = Point;
        type Context = Bounds;

        fn genetic_config(context: &Bounds) -> &Bounds {
            context
        }

        fn decode(point: Point, _: &Bounds) -> Evaluated {
            let fitness = point
                .0
                .iter()
                .zip(TARGET)
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            Evaluated { point, fitness }
        }

        fn feature_ranges(_: &Bounds) -> [FeatureRange; 3] {
            // With 10 bins, each bin spans 0.1 of [0, 1).
            [FeatureRange::new(0.0, 0.0); 3]
        }

        fn genome(&self) -> &Point {
            &self.point
        }

        fn fitness(&self) -> f64 {
            self.fitness
        }

        fn features(&self) -> Features {
            self.point.0
        }
    }

    fn unit_cube() -> Bounds {
        Bounds {
            offset: 0.0,
            spread: 1.0,
            mutation_power: 0.1,
        }
    }

    #[test]
    fn phases() {
        let mut rng = rng::seeded(Some(1));
        let mut search = Search::<Evaluated>::new(SearchConfig::new(10, 20, 5).unwrap(), unit_cube());
        for i in 0..20 {
            let expected = if i < 5 { Phase::Init } else { Phase::Explore };
            assert_eq!(search.phase(), expected);
            assert!(search.step(&mut rng).unwrap().is_some());
        }
        assert!(search.is_finished());
        assert_eq!(search.step(&mut rng), Ok(None));
        assert_eq!(search.evaluations(), 20);
    }

    #[test]
    fn run_spends_whole_budget() {
        let mut rng = rng::seeded(Some(2));
        let mut search = Search::<Evaluated>::new(SearchConfig::new(10, 1000, 100).unwrap(), unit_cube());
        let mut observed = 0;
        let report = search.run_with(&mut rng, |_| observed += 1).unwrap();
        assert_eq!(observed, 1000);
        assert_eq!(report.evaluations, 1000);
        assert_eq!(report.occupied, search.archive().len());
        assert!(report.insertions >= report.occupied);
        assert!(report.occupied > 0);
    }

    #[test]
    fn archived_elites_sit_in_their_cells() {
        let mut rng = rng::seeded(Some(3));
        let mut search = Search::<Evaluated>::new(SearchConfig::new(10, 2000, 200).unwrap(), unit_cube());
        search.run(&mut rng).unwrap();

        let ranges = Evaluated::feature_ranges(search.context());
        for (cell, elite, fitness) in search.archive().elites() {
            assert_eq!(scale_features(&elite.features(), &ranges, 10), Some(cell));
            assert_eq!(elite.fitness(), fitness);
        }
    }

    #[test]
    fn out_of_range_evaluations_are_skipped() {
        let mut rng = rng::seeded(Some(4));
        // Half of the generated coordinates in each dimension
        // fall outside [0, 1).
        let bounds = Bounds {
            offset: 0.0,
            spread: 2.0,
            mutation_power: 0.1,
        };
        let mut search = Search::<Evaluated>::new(SearchConfig::new(10, 500, 500).unwrap(), bounds);
        let report = search.run(&mut rng).unwrap();
        assert!(report.skipped > 0);
        assert!(report.skipped < 500);
        assert!(search
            .archive()
            .solutions()
            .all(|e| e.point.0.iter().all(|c| (0.0..1.0).contains(c))));
    }

    #[test]
    fn explore_on_empty_archive_fails() {
        let mut rng = rng::seeded(Some(5));
        // All generated points lie outside the feature ranges.
        let bounds = Bounds {
            offset: 5.0,
            spread: 1.0,
            mutation_power: 0.0,
        };
        let mut search = Search::<Evaluated>::new(SearchConfig::new(10, 3, 1).unwrap(), bounds);
        assert_eq!(search.step(&mut rng), Ok(Some(Outcome::Skipped)));
        assert_eq!(
            search.step(&mut rng),
            Err(SearchError::EmptyArchive { evaluation: 1 })
        );
    }

    #[test]
    fn exploration_improves_best_elite() {
        let mut rng = rng::seeded(Some(6));
        let mut search = Search::<Evaluated>::new(SearchConfig::new(10, 5000, 50).unwrap(), unit_cube());
        for _ in 0..50 {
            search.step(&mut rng).unwrap();
        }
        let initial_best = search.report().best_fitness.unwrap();
        let report = search.run(&mut rng).unwrap();
        assert!(report.best_fitness.unwrap() <= initial_best);
    }
}
