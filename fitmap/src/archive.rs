//! The archive, or _map of elites_: a fixed three-dimensional
//! grid holding the best phenotype found for each cell of the
//! discretized feature space.
use crate::features::Cell;

use ahash::RandomState;
use rand::Rng;

use std::collections::HashSet;
use std::num::NonZeroUsize;

/// Outcome of an insertion attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Insertion {
    /// The cell was empty.
    Filled,
    /// The incumbent was strictly worse and has been replaced.
    Replaced { previous: f64 },
    /// The incumbent was at least as good as the challenger.
    Rejected { incumbent: f64 },
}

impl Insertion {
    /// Returns whether the challenger was stored.
    pub fn accepted(&self) -> bool {
        !matches!(self, Insertion::Rejected { .. })
    }
}

#[derive(Clone, Debug)]
struct Elite<P> {
    phenotype: P,
    fitness: f64,
}

/// A `bins × bins × bins` grid of elites.
///
/// Alongside the grid, the archive tracks the list of
/// occupied cells. Each cell appears in that list exactly
/// once, so that [`select_random`] is uniform over
/// occupied cells regardless of how often a cell has
/// been improved.
///
/// [`select_random`]: Archive::select_random
#[derive(Clone, Debug)]
pub struct Archive<P> {
    bins: usize,
    cells: Vec<Option<Elite<P>>>,
    occupied: Vec<Cell>,
    occupied_set: HashSet<Cell, RandomState>,
}

impl<P> Archive<P> {
    /// Fitness reported for empty cells.
    pub const EMPTY: f64 = -1.0;

    /// Creates an empty archive with `bins` bins per dimension.
    ///
    /// # Examples
    /// ```
    /// use fitmap::Archive;
    /// use std::num::NonZeroUsize;
    ///
    /// let archive = Archive::<String>::new(NonZeroUsize::new(20).unwrap());
    /// assert!(archive.is_empty());
    /// assert_eq!(archive.capacity(), 20 * 20 * 20);
    /// ```
    pub fn new(bins: NonZeroUsize) -> Archive<P> {
        let bins = bins.get();
        Archive {
            bins,
            cells: (0..bins * bins * bins).map(|_| None).collect(),
            occupied: vec![],
            occupied_set: HashSet::default(),
        }
    }

    /// Returns the number of bins per dimension.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Returns the total number of cells.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of occupied cells.
    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    /// Returns whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    /// Fraction of cells that are occupied.
    pub fn coverage(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Returns whether `cell` lies within the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        let valid = |b: usize| (1..=self.bins).contains(&b);
        valid(cell.0) && valid(cell.1) && valid(cell.2)
    }

    fn index_of(&self, cell: Cell) -> usize {
        assert!(
            self.contains(cell),
            "cell {} outside archive with {} bins",
            cell,
            self.bins
        );
        ((cell.0 - 1) * self.bins + (cell.1 - 1)) * self.bins + (cell.2 - 1)
    }

    fn cell_at(&self, index: usize) -> Cell {
        let b = self.bins;
        Cell(index / (b * b) + 1, (index / b) % b + 1, index % b + 1)
    }

    /// Attempts to store `phenotype` with the given fitness in `cell`.
    ///
    /// The phenotype is stored iff the cell is empty, or the
    /// incumbent's fitness is strictly greater (worse) than
    /// `fitness`.
    ///
    /// # Panics
    /// Panics if `cell` is outside the grid, or if `fitness` is NaN.
    ///
    /// # Examples
    /// ```
    /// use fitmap::{Archive, Cell, Insertion};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut archive = Archive::new(NonZeroUsize::new(5).unwrap());
    ///
    /// assert_eq!(archive.try_insert(Cell(1, 2, 3), "first", 5.0), Insertion::Filled);
    /// assert_eq!(
    ///     archive.try_insert(Cell(1, 2, 3), "tied", 5.0),
    ///     Insertion::Rejected { incumbent: 5.0 }
    /// );
    /// assert_eq!(
    ///     archive.try_insert(Cell(1, 2, 3), "better", 4.5),
    ///     Insertion::Replaced { previous: 5.0 }
    /// );
    /// assert_eq!(archive.get(Cell(1, 2, 3)), Some(&"better"));
    /// ```
    pub fn try_insert(&mut self, cell: Cell, phenotype: P, fitness: f64) -> Insertion {
        assert!(!fitness.is_nan(), "NaN fitness inserted into archive");
        let index = self.index_of(cell);
        let insertion = match &self.cells[index] {
            None => Insertion::Filled,
            Some(e) if e.fitness > fitness => Insertion::Replaced {
                previous: e.fitness,
            },
            Some(e) => {
                return Insertion::Rejected {
                    incumbent: e.fitness,
                }
            }
        };

        self.cells[index] = Some(Elite { phenotype, fitness });
        if self.occupied_set.insert(cell) {
            self.occupied.push(cell);
        }
        insertion
    }

    /// Returns the fitness stored in `cell`, or
    /// [`Archive::EMPTY`] if the cell is empty.
    ///
    /// # Panics
    /// Panics if `cell` is outside the grid.
    pub fn fitness_at(&self, cell: Cell) -> f64 {
        self.cells[self.index_of(cell)]
            .as_ref()
            .map_or(Self::EMPTY, |e| e.fitness)
    }

    /// Returns the phenotype stored in `cell`, if any.
    ///
    /// # Panics
    /// Panics if `cell` is outside the grid.
    pub fn get(&self, cell: Cell) -> Option<&P> {
        self.cells[self.index_of(cell)]
            .as_ref()
            .map(|e| &e.phenotype)
    }

    /// Selects an occupied cell uniformly at random and
    /// returns it with its phenotype.
    ///
    /// Returns `None` if the archive is empty.
    ///
    /// # Examples
    /// ```
    /// use fitmap::{Archive, Cell};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut rng = fitmap::rng::seeded(Some(0));
    /// let mut archive = Archive::new(NonZeroUsize::new(3).unwrap());
    /// assert!(archive.select_random(&mut rng).is_none());
    ///
    /// archive.try_insert(Cell(3, 3, 3), 42, 1.0);
    /// assert_eq!(archive.select_random(&mut rng), Some((Cell(3, 3, 3), &42)));
    /// ```
    pub fn select_random<R: Rng>(&self, rng: &mut R) -> Option<(Cell, &P)> {
        if self.occupied.is_empty() {
            return None;
        }
        let cell = self.occupied[rng.gen_range(0..self.occupied.len())];
        self.get(cell).map(|p| (cell, p))
    }

    /// Returns an iterator over all archived phenotypes,
    /// in grid order.
    pub fn solutions(&self) -> impl Iterator<Item = &P> {
        self.cells.iter().flatten().map(|e| &e.phenotype)
    }

    /// Returns an iterator over all occupied cells, their
    /// phenotypes and fitnesses, in grid order.
    pub fn elites(&self) -> impl Iterator<Item = (Cell, &P, f64)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, e)| e.as_ref().map(|e| (self.cell_at(i), &e.phenotype, e.fitness)))
    }

    /// Returns the occupied cells, in order of first occupation.
    pub fn data_points(&self) -> &[Cell] {
        &self.occupied
    }

    /// Returns the best (lowest fitness) elite, if any.
    pub fn best(&self) -> Option<(Cell, &P, f64)> {
        self.elites().min_by(|(_, _, a), (_, _, b)| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("uncomparable fitness value detected"))
        })
    }

    /// Returns the grid of performances, flattened in grid
    /// order (the last coordinate varying fastest), with empty
    /// cells rendered as the worst possible value.
    ///
    /// Unscaled, empty cells take the value `floor(max + 1)`,
    /// `max` being the worst stored fitness. Scaled, stored
    /// fitnesses are divided by `max` and empty cells take the
    /// value `1.0`.
    ///
    /// # Examples
    /// ```
    /// use fitmap::{Archive, Cell};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut archive = Archive::new(NonZeroUsize::new(1).unwrap());
    /// assert_eq!(archive.performances(false), vec![0.0]);
    /// assert_eq!(archive.performances(true), vec![1.0]);
    ///
    /// archive.try_insert(Cell(1, 1, 1), (), 2.5);
    /// assert_eq!(archive.performances(false), vec![2.5]);
    /// assert_eq!(archive.performances(true), vec![1.0]);
    /// ```
    pub fn performances(&self, scale: bool) -> Vec<f64> {
        let max = self
            .cells
            .iter()
            .flatten()
            .map(|e| e.fitness)
            .fold(Self::EMPTY, f64::max);
        self.cells
            .iter()
            .map(|cell| match (cell, scale) {
                (Some(e), true) => {
                    if max > 0.0 {
                        e.fitness / max
                    } else {
                        0.0
                    }
                }
                (Some(e), false) => e.fitness,
                (None, true) => 1.0,
                (None, false) => (max + 1.0).floor(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    fn archive<P>(bins: usize) -> Archive<P> {
        Archive::new(NonZeroUsize::new(bins).unwrap())
    }

    #[test]
    fn empty_cell_always_accepts() {
        let mut archive = archive(4);
        assert_eq!(archive.fitness_at(Cell(2, 2, 2)), Archive::<()>::EMPTY);
        assert_eq!(
            archive.try_insert(Cell(2, 2, 2), "a", 1_000.0),
            Insertion::Filled
        );
        assert_eq!(archive.fitness_at(Cell(2, 2, 2)), 1_000.0);
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn equal_fitness_is_rejected() {
        let mut archive = archive(4);
        archive.try_insert(Cell(1, 1, 1), "incumbent", 5.0);
        let insertion = archive.try_insert(Cell(1, 1, 1), "challenger", 5.0);
        assert_eq!(insertion, Insertion::Rejected { incumbent: 5.0 });
        assert!(!insertion.accepted());
        assert_eq!(archive.get(Cell(1, 1, 1)), Some(&"incumbent"));
    }

    #[test]
    fn worse_fitness_is_rejected() {
        let mut archive = archive(4);
        archive.try_insert(Cell(1, 1, 1), "incumbent", 5.0);
        archive.try_insert(Cell(1, 1, 1), "challenger", 5.01);
        assert_eq!(archive.get(Cell(1, 1, 1)), Some(&"incumbent"));
        assert_eq!(archive.fitness_at(Cell(1, 1, 1)), 5.0);
    }

    #[test]
    fn zero_fitness_is_stored() {
        let mut archive = archive(2);
        archive.try_insert(Cell(1, 1, 1), "perfect", 0.0);
        assert_eq!(
            archive.try_insert(Cell(1, 1, 1), "other", 0.0),
            Insertion::Rejected { incumbent: 0.0 }
        );
    }

    #[test]
    fn negative_fitness_is_not_mistaken_for_empty() {
        let mut archive = archive(2);
        archive.try_insert(Cell(1, 1, 1), "incumbent", -3.0);
        assert_eq!(
            archive.try_insert(Cell(1, 1, 1), "challenger", -1.0),
            Insertion::Rejected { incumbent: -3.0 }
        );
    }

    #[test]
    fn stored_fitness_is_monotonic() {
        let mut rng = rng::seeded(Some(11));
        let mut archive = archive(3);
        let mut history = vec![];
        for _ in 0..500 {
            let fitness = rng.gen_range(0.0..100.0);
            if archive.try_insert(Cell(2, 1, 3), fitness, fitness).accepted() {
                history.push(archive.fitness_at(Cell(2, 1, 3)));
            }
        }
        assert!(history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(archive.data_points(), &[Cell(2, 1, 3)]);
    }

    #[test]
    fn occupied_cells_are_not_duplicated() {
        let mut archive = archive(3);
        for f in (0..10).rev() {
            archive.try_insert(Cell(1, 2, 3), f, f as f64);
        }
        archive.try_insert(Cell(3, 2, 1), 0, 0.0);
        assert_eq!(archive.data_points(), &[Cell(1, 2, 3), Cell(3, 2, 1)]);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn selection_is_uniform_over_cells() {
        let mut rng = rng::seeded(Some(3));
        let mut archive = archive(2);
        // Improve one cell many times; it must not become
        // more likely to be selected.
        for f in (0..100).rev() {
            archive.try_insert(Cell(1, 1, 1), 'a', f as f64);
        }
        archive.try_insert(Cell(2, 2, 2), 'b', 1.0);

        let draws = 10_000;
        let a = (0..draws)
            .filter(|_| archive.select_random(&mut rng).unwrap().1 == &'a')
            .count();
        let share = a as f64 / draws as f64;
        assert!((share - 0.5).abs() < 0.05, "share of 'a': {}", share);
    }

    #[test]
    fn selection_only_returns_occupied_cells() {
        let mut rng = rng::seeded(Some(5));
        let mut archive = archive(5);
        let cells = [Cell(1, 5, 2), Cell(4, 4, 4), Cell(5, 1, 1)];
        for (i, cell) in cells.iter().enumerate() {
            archive.try_insert(*cell, i, i as f64);
        }
        for _ in 0..200 {
            let (cell, p) = archive.select_random(&mut rng).unwrap();
            assert_eq!(cells[*p], cell);
            assert!(archive.get(cell).is_some());
        }
    }

    #[test]
    fn cell_index_round_trip() {
        let archive = archive::<()>(4);
        for x in 1..=4 {
            for y in 1..=4 {
                for z in 1..=4 {
                    let cell = Cell(x, y, z);
                    assert_eq!(archive.cell_at(archive.index_of(cell)), cell);
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn insert_outside_grid() {
        let mut archive = archive(2);
        archive.try_insert(Cell(3, 1, 1), (), 1.0);
    }

    #[test]
    #[should_panic]
    fn insert_zero_coordinate() {
        let mut archive = archive(2);
        archive.try_insert(Cell(0, 1, 1), (), 1.0);
    }

    #[test]
    fn solutions_and_elites() {
        let mut archive = archive(2);
        archive.try_insert(Cell(2, 2, 2), "last", 3.0);
        archive.try_insert(Cell(1, 1, 1), "first", 7.0);
        assert_eq!(archive.solutions().collect::<Vec<_>>(), vec![&"first", &"last"]);
        assert_eq!(
            archive.elites().collect::<Vec<_>>(),
            vec![(Cell(1, 1, 1), &"first", 7.0), (Cell(2, 2, 2), &"last", 3.0)]
        );
        assert_eq!(archive.best(), Some((Cell(2, 2, 2), &"last", 3.0)));
    }

    #[test]
    fn performances_fill_empty_cells_as_worst() {
        let mut archive = archive(2);
        archive.try_insert(Cell(1, 1, 1), (), 2.0);
        archive.try_insert(Cell(2, 2, 2), (), 4.5);

        let unscaled = archive.performances(false);
        assert_eq!(unscaled.len(), 8);
        assert_eq!(unscaled[0], 2.0);
        assert_eq!(unscaled[7], 4.5);
        assert!(unscaled[1..7].iter().all(|p| *p == 5.0));

        let scaled = archive.performances(true);
        assert_eq!(scaled[0], 2.0 / 4.5);
        assert_eq!(scaled[7], 1.0);
        assert!(scaled[1..7].iter().all(|p| *p == 1.0));
    }

    #[test]
    fn coverage() {
        let mut archive = archive(2);
        assert_eq!(archive.coverage(), 0.0);
        archive.try_insert(Cell(1, 2, 1), (), 1.0);
        archive.try_insert(Cell(2, 1, 2), (), 1.0);
        assert_eq!(archive.coverage(), 0.25);
    }
}
