//! Chromosomes are the genotype of weekly exercise
//! schedules. They are ordered collections of genes,
//! each describing one recurring activity, which can be
//! progressively mutated by altering, adding and
//! deleting genes.

mod config;
mod errors;
mod genes;

pub use config::{GeneticConfig, StepRange, DURATION_STEP, FULL_WEEK};
pub use errors::ConfigError;
pub use genes::{Gene, GeneField, WEEK};

use log::trace;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// An ordered, non-empty collection of genes.
///
/// Suports Serde for convenient saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "ChromosomeFields")]
pub struct Chromosome {
    genes: Vec<Gene>,
}

#[derive(Deserialize)]
struct ChromosomeFields {
    genes: Vec<Gene>,
}

impl TryFrom<ChromosomeFields> for Chromosome {
    type Error = ConfigError;

    fn try_from(fields: ChromosomeFields) -> Result<Chromosome, ConfigError> {
        if fields.genes.is_empty() {
            return Err(ConfigError::EmptyChromosome);
        }
        Ok(Chromosome {
            genes: fields.genes,
        })
    }
}

/// A mutation applied to a [`Chromosome`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mutation {
    /// The gene at index `gene` had `field` re-drawn.
    Alteration { gene: usize, field: GeneField },
    /// A random gene was appended.
    Addition,
    /// The gene at index `gene` was removed.
    Deletion { gene: usize },
    /// An addition on a full chromosome, or a deletion
    /// on a single-gene one. The chromosome is unchanged.
    Void,
}

impl Chromosome {
    /// Creates a new chromosome of
    /// [`initial_genes`](GeneticConfig::initial_genes) random genes.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::{Chromosome, GeneticConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(NonZeroUsize::new(10).unwrap());
    /// let chromosome = Chromosome::new(&config, &mut fitmap::rng::seeded(Some(1)));
    ///
    /// assert_eq!(chromosome.size(), config.initial_genes());
    /// ```
    pub fn new<R: Rng>(config: &GeneticConfig, rng: &mut R) -> Chromosome {
        Chromosome {
            genes: (0..config.initial_genes())
                .map(|_| Gene::random(config, rng))
                .collect(),
        }
    }

    /// Creates a chromosome holding the specified genes.
    ///
    /// # Errors
    /// Returns an error if `genes` is empty, holds more than
    /// [`max_genes`](GeneticConfig::max_genes) genes, or if
    /// any gene lies outside the ranges in `config`.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::{Chromosome, Gene, GeneticConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(NonZeroUsize::new(10).unwrap());
    ///
    /// let chromosome = Chromosome::from_genes(
    ///     vec![Gene::new(0, 30, 0b1000000), Gene::new(4, 60, 0b0010100)],
    ///     &config,
    /// ).unwrap();
    /// assert_eq!(chromosome.size(), 2);
    ///
    /// assert!(Chromosome::from_genes(vec![], &config).is_err());
    /// assert!(Chromosome::from_genes(vec![Gene::new(10, 30, 1)], &config).is_err());
    /// ```
    pub fn from_genes(genes: Vec<Gene>, config: &GeneticConfig) -> Result<Chromosome, ConfigError> {
        if genes.is_empty() || genes.len() > config.max_genes() {
            return Err(ConfigError::InvalidGeneCount {
                count: genes.len(),
                max: config.max_genes(),
            });
        }
        for gene in &genes {
            gene.check(config)?;
        }
        Ok(Chromosome { genes })
    }

    /// Mutates the chromosome with probability
    /// [`mutation_rate`](GeneticConfig::mutation_rate).
    /// If the mutation takes place, exactly one of
    /// alteration, addition or deletion is chosen, weighted
    /// by their respective rates in `config`:
    /// - alteration changes one field of a random gene.
    /// - addition appends a random gene, unless the chromosome
    ///   already holds [`max_genes`](GeneticConfig::max_genes).
    /// - deletion removes a random gene, unless it is the
    ///   only one.
    ///
    /// Returns the applied mutation, or `None` if
    /// no mutation took place.
    ///
    /// # Panics
    /// Panics if the alteration, addition and deletion
    /// rates are all zero.
    ///
    /// # Examples
    /// ```
    /// use fitmap_schedules::genomics::{Chromosome, GeneticConfig, Mutation};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut config = GeneticConfig::new(NonZeroUsize::new(10).unwrap());
    /// config.set_mutation_rates(1.0, 0.0, 0.5, 0.0).unwrap();
    ///
    /// let mut rng = fitmap::rng::seeded(Some(1));
    /// let mut chromosome = Chromosome::new(&config, &mut rng);
    /// let size = chromosome.size();
    ///
    /// assert_eq!(chromosome.mutate(&config, &mut rng), Some(Mutation::Addition));
    /// assert_eq!(chromosome.size(), size + 1);
    /// ```
    pub fn mutate<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) -> Option<Mutation> {
        if !fitmap::rng::chance(rng, config.mutation_rate()) {
            return None;
        }
        let weights = [
            config.alteration_rate(),
            config.addition_rate(),
            config.deletion_rate(),
        ];
        let choice = WeightedIndex::new(&weights)
            .unwrap_or_else(|e| panic!("invalid sub-mutation rates {:?}: {}", weights, e))
            .sample(rng);
        Some(match choice {
            0 => {
                let gene = rng.gen_range(0..self.genes.len());
                let field = self.genes[gene].alter(config, rng);
                Mutation::Alteration { gene, field }
            }
            1 => {
                if self.genes.len() < config.max_genes() {
                    self.genes.push(Gene::random(config, rng));
                    Mutation::Addition
                } else {
                    Mutation::Void
                }
            }
            _ => {
                if self.genes.len() > 1 {
                    let gene = rng.gen_range(0..self.genes.len());
                    self.genes.remove(gene);
                    Mutation::Deletion { gene }
                } else {
                    Mutation::Void
                }
            }
        })
    }

    /// Returns the number of genes in the chromosome.
    pub fn size(&self) -> usize {
        self.genes.len()
    }

    /// Returns the chromosome's genes in order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Returns the genes as `[exercise_index, duration, weekly_mask]` arrays.
    pub fn genotype_to_vec(&self) -> Vec<[usize; 3]> {
        self.genes.iter().map(Gene::to_array).collect()
    }
}

impl fitmap::Genome for Chromosome {
    type Config = GeneticConfig;

    fn new<R: Rng>(config: &GeneticConfig, rng: &mut R) -> Chromosome {
        Chromosome::new(config, rng)
    }

    fn mutate<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) {
        if let Some(mutation) = Chromosome::mutate(self, config, rng) {
            trace!("applied {:?}, {} genes", mutation, self.size());
        }
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.genotype_to_vec())
    }
}
