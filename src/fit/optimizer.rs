//! Derivative-free global minimization.
//!
//! The fiducial search only needs `minimize(objective, bounds) -> point`, so
//! any strategy can be plugged in through [`GlobalMinimizer`]. The default is
//! differential evolution (best/1/bin with per-generation dithering):
//!
//! - members live in the unit cube and are scaled to the bounds on evaluation
//! - trial vectors are generated sequentially from a seeded RNG
//! - trials are evaluated in parallel; results do not depend on thread count
//! - ties are broken by population index

use log::debug;
use nalgebra::DVector;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RelBinError, Result};
use crate::fit::prior::Bounds;

/// Objective evaluated by a minimizer. Non-finite values count as `+∞`.
pub type Objective<'a> = dyn Fn(&[f64]) -> f64 + Sync + 'a;

pub trait GlobalMinimizer: Send + Sync {
    fn minimize(&self, objective: &Objective<'_>, bounds: &[Bounds]) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferentialEvolutionOptions {
    /// Population size per free dimension.
    pub population_size: usize,
    pub max_generations: usize,
    /// Mutation factor is drawn from `[mutation.0, mutation.1)` each generation.
    pub mutation: (f64, f64),
    pub recombination: f64,
    /// Relative convergence tolerance on the population energy spread.
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for DifferentialEvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: 15,
            max_generations: 100,
            mutation: (0.5, 1.0),
            recombination: 0.7,
            tolerance: 1e-6,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DifferentialEvolution {
    options: DifferentialEvolutionOptions,
}

impl DifferentialEvolution {
    pub fn new(options: DifferentialEvolutionOptions) -> Result<Self> {
        let (lo, hi) = options.mutation;
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && hi >= lo && hi <= 2.0) {
            return Err(RelBinError::config(format!(
                "Mutation range must satisfy 0 < lo <= hi <= 2 (got ({lo}, {hi}))."
            )));
        }
        if !(0.0..=1.0).contains(&options.recombination) {
            return Err(RelBinError::config("Recombination must lie in [0, 1]."));
        }
        if options.max_generations == 0 || options.population_size == 0 {
            return Err(RelBinError::config(
                "Population size and generation count must be >= 1.",
            ));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &DifferentialEvolutionOptions {
        &self.options
    }
}

struct Population {
    members: Vec<DVector<f64>>,
    energies: Vec<f64>,
    best: usize,
}

impl Population {
    fn refresh_best(&mut self) {
        let mut best = 0;
        for (i, &e) in self.energies.iter().enumerate().skip(1) {
            if e < self.energies[best] {
                best = i;
            }
        }
        self.best = best;
    }

    fn converged(&self, tolerance: f64) -> bool {
        if self.energies.iter().any(|e| !e.is_finite()) {
            return false;
        }
        let n = self.energies.len() as f64;
        let mean = self.energies.iter().sum::<f64>() / n;
        let var = self.energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
        var.sqrt() <= tolerance * mean.abs()
    }
}

fn scale(unit: &DVector<f64>, bounds: &[Bounds]) -> Vec<f64> {
    unit.iter()
        .zip(bounds.iter())
        .map(|(&u, b)| b.lower + u * b.width())
        .collect()
}

fn energies(objective: &Objective<'_>, members: &[DVector<f64>], bounds: &[Bounds]) -> Vec<f64> {
    members
        .par_iter()
        .map(|m| {
            let value = objective(&scale(m, bounds));
            if value.is_finite() { value } else { f64::INFINITY }
        })
        .collect()
}

impl GlobalMinimizer for DifferentialEvolution {
    fn minimize(&self, objective: &Objective<'_>, bounds: &[Bounds]) -> Result<Vec<f64>> {
        let dim = bounds.len();
        if dim == 0 {
            return Err(RelBinError::config("No free parameters to optimize."));
        }
        let opts = &self.options;
        let n_pop = (opts.population_size * dim).max(5);
        let mut rng = StdRng::seed_from_u64(opts.seed);

        let members: Vec<DVector<f64>> = (0..n_pop)
            .map(|_| DVector::from_fn(dim, |_, _| rng.r#gen::<f64>()))
            .collect();
        let energies_0 = energies(objective, &members, bounds);
        let mut pop = Population {
            members,
            energies: energies_0,
            best: 0,
        };
        pop.refresh_best();

        for generation in 0..opts.max_generations {
            let f = if opts.mutation.1 > opts.mutation.0 {
                rng.gen_range(opts.mutation.0..opts.mutation.1)
            } else {
                opts.mutation.0
            };

            let trials: Vec<DVector<f64>> = (0..n_pop)
                .map(|i| {
                    let (r1, r2) = pick_two(&mut rng, n_pop, i);
                    let mutant =
                        &pop.members[pop.best] + (&pop.members[r1] - &pop.members[r2]) * f;
                    let forced = rng.gen_range(0..dim);
                    DVector::from_fn(dim, |j, _| {
                        let take = j == forced || rng.r#gen::<f64>() < opts.recombination;
                        let v = if take { mutant[j] } else { pop.members[i][j] };
                        if (0.0..=1.0).contains(&v) { v } else { rng.r#gen::<f64>() }
                    })
                })
                .collect();

            let trial_energies = energies(objective, &trials, bounds);
            for (i, (trial, e)) in trials.into_iter().zip(trial_energies).enumerate() {
                if e <= pop.energies[i] {
                    pop.members[i] = trial;
                    pop.energies[i] = e;
                }
            }
            pop.refresh_best();

            if pop.converged(opts.tolerance) {
                debug!(
                    "Differential evolution converged after {} generations (f = {})",
                    generation + 1,
                    pop.energies[pop.best]
                );
                break;
            }
        }

        if !pop.energies[pop.best].is_finite() {
            return Err(RelBinError::Optimizer(
                "Objective was non-finite for the whole population.".to_string(),
            ));
        }
        Ok(scale(&pop.members[pop.best], bounds))
    }
}

/// Two distinct indices in `0..n`, both different from `exclude`.
fn pick_two(rng: &mut StdRng, n: usize, exclude: usize) -> (usize, usize) {
    let mut r1 = rng.gen_range(0..n);
    while r1 == exclude {
        r1 = rng.gen_range(0..n);
    }
    let mut r2 = rng.gen_range(0..n);
    while r2 == exclude || r2 == r1 {
        r2 = rng.gen_range(0..n);
    }
    (r1, r2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(ranges: &[(f64, f64)]) -> Vec<Bounds> {
        ranges
            .iter()
            .map(|&(lo, hi)| Bounds::new("x", lo, hi).unwrap())
            .collect()
    }

    #[test]
    fn finds_the_minimum_of_a_shifted_bowl() {
        let de = DifferentialEvolution::default();
        let objective = |x: &[f64]| (x[0] - 1.5).powi(2) + 3.0 * (x[1] + 0.25).powi(2);
        let best = de
            .minimize(&objective, &bounds(&[(-5.0, 5.0), (-2.0, 2.0)]))
            .unwrap();
        assert!((best[0] - 1.5).abs() < 1e-2, "{best:?}");
        assert!((best[1] + 0.25).abs() < 1e-2, "{best:?}");
    }

    #[test]
    fn same_seed_same_answer() {
        let de = DifferentialEvolution::default();
        let objective = |x: &[f64]| (x[0] * 3.0).sin() + 0.1 * x[0] * x[0];
        let b = bounds(&[(-4.0, 4.0)]);
        assert_eq!(de.minimize(&objective, &b).unwrap(), de.minimize(&objective, &b).unwrap());
    }

    #[test]
    fn non_finite_regions_are_avoided() {
        let de = DifferentialEvolution::default();
        let objective = |x: &[f64]| if x[0] < 0.0 { f64::NAN } else { (x[0] - 0.5).powi(2) };
        let best = de.minimize(&objective, &bounds(&[(-1.0, 1.0)])).unwrap();
        assert!((best[0] - 0.5).abs() < 1e-2);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let opts = DifferentialEvolutionOptions {
            recombination: 1.5,
            ..Default::default()
        };
        assert!(DifferentialEvolution::new(opts).is_err());
        let opts = DifferentialEvolutionOptions {
            mutation: (0.0, 1.0),
            ..Default::default()
        };
        assert!(DifferentialEvolution::new(opts).is_err());
    }

    #[test]
    fn everywhere_infinite_objective_is_an_error() {
        let de = DifferentialEvolution::default();
        let objective = |_: &[f64]| f64::INFINITY;
        assert!(de.minimize(&objective, &bounds(&[(0.0, 1.0)])).is_err());
    }
}
