use crate::features::{FeatureRange, Features};

use rand::Rng;

/// An interface for genotypes that can be searched
/// by MAP-Elites.
pub trait Genome: Clone {
    type Config;

    /// Returns a randomized genome.
    fn new<R: Rng>(config: &Self::Config, rng: &mut R) -> Self;

    /// Mutates the genome in place.
    ///
    /// Archived genomes are never passed to this function;
    /// the search always mutates a clone.
    fn mutate<R: Rng>(&mut self, config: &Self::Config, rng: &mut R);
}

/// The decoded and evaluated form of a [`Genome`].
///
/// A phenotype is fully determined by its genome and the
/// search context, and is immutable once built.
pub trait Phenotype: Sized {
    type Genome: Genome;
    /// Everything needed to decode and evaluate a genome:
    /// the genetic configuration, lookup tables, objectives...
    type Context;

    /// Returns the genetic configuration held by the context.
    fn genetic_config(context: &Self::Context) -> &<Self::Genome as Genome>::Config;

    /// Decodes and evaluates a genome.
    fn decode(genome: Self::Genome, context: &Self::Context) -> Self;

    /// Returns the nominal ranges of the three behavioural
    /// descriptors, used to discretize them into archive cells.
    fn feature_ranges(context: &Self::Context) -> [FeatureRange; 3];

    /// Returns the genome this phenotype was decoded from.
    fn genome(&self) -> &Self::Genome;

    /// Returns the phenotype's fitness. Lower is better.
    fn fitness(&self) -> f64;

    /// Returns the phenotype's behavioural descriptors.
    fn features(&self) -> Features;
}
