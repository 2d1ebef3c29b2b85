use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Configuration for the [`Cem`] optimizer.
#[derive(Clone, Debug)]
pub struct CemConfig {
    /// Initial per-coordinate variance of the search distribution.
    pub sigma_init: f32,
    /// Initial variance damping, preventing early collapse.
    pub damping_init: f32,
    /// Floor the damping decays towards.
    pub damping_final: f32,
    /// Number of individuals sampled per generation.
    pub pop_size: usize,
    /// Number of top-ranked individuals used to refit the distribution.
    /// Defaults to `pop_size / 2` when `None`.
    pub parents: Option<usize>,
    /// Keep the best individual ever seen in every sampled population.
    pub elitism: bool,
    pub seed: u64,
}

impl Default for CemConfig {
    fn default() -> Self {
        Self {
            sigma_init: 1e-3,
            damping_init: 1e-3,
            damping_final: 1e-5,
            pop_size: 10,
            parents: None,
            elitism: false,
            seed: 0,
        }
    }
}

/// Cross-Entropy-Method optimizer over flat parameter vectors.
///
/// One generation is one `ask` followed by one `tell` with the population
/// that `ask` returned; interleaving calls from different generations leaves
/// the fitness-to-individual mapping undefined.
pub struct Cem {
    dim: usize,
    mu: Vec<f32>,
    sigma: Vec<f32>,
    damping: f32,
    damping_final: f32,
    pop_size: usize,
    parents: usize,
    weights: Vec<f32>,
    antithetic: bool,
    elitism: bool,
    elite: Option<(Vec<f32>, f32)>,
    rng: StdRng,
}

/// Exponential interpolation factor for the damping schedule.
const DAMPING_TAU: f32 = 0.95;

impl Cem {
    /// Creates an optimizer centred on `mu_init`.
    pub fn new(mu_init: Vec<f32>, config: &CemConfig) -> Self {
        let dim = mu_init.len();
        assert!(dim > 0, "cannot search over an empty parameter vector");
        assert!(config.pop_size > 0, "population size must be positive");
        let parents = config.parents.unwrap_or(config.pop_size / 2).max(1);
        assert!(parents <= config.pop_size);

        // Antithetic sampling needs mirrored pairs, so an odd population
        // silently turns it off.
        let antithetic = config.pop_size % 2 == 0;
        if !antithetic {
            tracing::debug!(pop_size = config.pop_size, "odd population, antithetic sampling disabled");
        }

        // Log-rank weights over the selected parents, normalized to sum 1.
        let raw: Vec<f32> = (0..parents)
            .map(|i| ((parents as f32) + 0.5).ln() - ((i + 1) as f32).ln())
            .collect();
        let total: f32 = raw.iter().sum();
        let weights = raw.iter().map(|w| w / total).collect();

        Self {
            dim,
            mu: mu_init,
            sigma: vec![config.sigma_init; dim],
            damping: config.damping_init,
            damping_final: config.damping_final,
            pop_size: config.pop_size,
            parents,
            weights,
            antithetic,
            elitism: config.elitism,
            elite: None,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Samples a population of `pop_size` parameter vectors.
    pub fn ask(&mut self, pop_size: usize) -> Vec<Vec<f32>> {
        assert_eq!(pop_size, self.pop_size, "population size is fixed at construction");
        let std: Vec<f32> = self.sigma.iter().map(|s| s.sqrt()).collect();
        let mut population = Vec::with_capacity(pop_size);

        if self.antithetic {
            for _ in 0..pop_size / 2 {
                let eps: Vec<f32> = (0..self.dim)
                    .map(|i| {
                        let z: f32 = StandardNormal.sample(&mut self.rng);
                        z * std[i]
                    })
                    .collect();
                population.push(self.mu.iter().zip(&eps).map(|(m, e)| m + e).collect());
                population.push(self.mu.iter().zip(&eps).map(|(m, e)| m - e).collect());
            }
        } else {
            for _ in 0..pop_size {
                let ind = (0..self.dim)
                    .map(|i| {
                        let z: f32 = StandardNormal.sample(&mut self.rng);
                        self.mu[i] + z * std[i]
                    })
                    .collect();
                population.push(ind);
            }
        }

        if self.elitism {
            if let Some((elite, _)) = &self.elite {
                population[pop_size - 1] = elite.clone();
            }
        }

        population
    }

    /// Updates the search distribution from a scored population.
    ///
    /// `population` and `fitnesses` must be the aligned pair produced by the
    /// immediately preceding [`Cem::ask`].
    pub fn tell(&mut self, population: &[Vec<f32>], fitnesses: &[f32]) {
        assert_eq!(population.len(), fitnesses.len(), "population/fitness length mismatch");
        assert_eq!(population.len(), self.pop_size);
        for ind in population {
            assert_eq!(ind.len(), self.dim);
        }

        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&a, &b| fitnesses[b].total_cmp(&fitnesses[a]));

        let old_mu = std::mem::take(&mut self.mu);
        let mut mu = vec![0.0; self.dim];
        let mut sigma = vec![0.0; self.dim];
        for (k, &idx) in order.iter().take(self.parents).enumerate() {
            let w = self.weights[k];
            for (i, &v) in population[idx].iter().enumerate() {
                mu[i] += w * v;
                let d = v - old_mu[i];
                sigma[i] += w * d * d;
            }
        }
        for s in sigma.iter_mut() {
            *s += self.damping;
        }
        self.mu = mu;
        self.sigma = sigma;
        self.damping =
            (DAMPING_TAU * self.damping + (1.0 - DAMPING_TAU) * self.damping_final).max(self.damping_final);

        let best = order[0];
        let replace = match &self.elite {
            Some((_, f)) => fitnesses[best] > *f,
            None => true,
        };
        if replace {
            self.elite = Some((population[best].clone(), fitnesses[best]));
        }
    }

    pub fn mean(&self) -> &[f32] {
        &self.mu
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Best individual observed so far, if any generation has completed.
    pub fn best(&self) -> Option<(&[f32], f32)> {
        self.elite.as_ref().map(|(p, f)| (p.as_slice(), *f))
    }
}
