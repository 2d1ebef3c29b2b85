use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Exploration noise added to deterministic policy actions during rollouts.
pub trait ActionNoise {
    fn sample(&mut self) -> Vec<f32>;

    /// Called at episode boundaries; stateful processes reset here.
    fn reset(&mut self) {}
}

/// Uncorrelated Gaussian noise.
pub struct GaussianActionNoise {
    mean: Vec<f32>,
    sigma: Vec<f32>,
    rng: StdRng,
}

impl GaussianActionNoise {
    pub fn new(mean: Vec<f32>, sigma: Vec<f32>, seed: u64) -> Self {
        assert_eq!(mean.len(), sigma.len());
        Self { mean, sigma, rng: StdRng::seed_from_u64(seed) }
    }

    /// Zero-mean noise with uniform std across all action dimensions.
    pub fn scalar(action_dim: usize, sigma: f32, seed: u64) -> Self {
        Self::new(vec![0.0; action_dim], vec![sigma; action_dim], seed)
    }
}

impl ActionNoise for GaussianActionNoise {
    fn sample(&mut self) -> Vec<f32> {
        self.mean
            .iter()
            .zip(&self.sigma)
            .map(|(&m, &s)| {
                let z: f32 = StandardNormal.sample(&mut self.rng);
                m + z * s
            })
            .collect()
    }
}

/// Temporally correlated Ornstein-Uhlenbeck noise, useful for environments
/// with momentum.
pub struct OrnsteinUhlenbeckNoise {
    mu: Vec<f32>,
    theta: f32,
    sigma: f32,
    dt: f32,
    prev: Vec<f32>,
    rng: StdRng,
}

impl OrnsteinUhlenbeckNoise {
    pub fn new(action_dim: usize, theta: f32, sigma: f32, dt: f32, seed: u64) -> Self {
        Self {
            mu: vec![0.0; action_dim],
            theta,
            sigma,
            dt,
            prev: vec![0.0; action_dim],
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ActionNoise for OrnsteinUhlenbeckNoise {
    fn sample(&mut self) -> Vec<f32> {
        let next: Vec<f32> = self
            .prev
            .iter()
            .zip(&self.mu)
            .map(|(&p, &m)| {
                let z: f32 = StandardNormal.sample(&mut self.rng);
                p + self.theta * (m - p) * self.dt + self.sigma * self.dt.sqrt() * z
            })
            .collect();
        self.prev = next.clone();
        next
    }

    fn reset(&mut self) {
        self.prev = vec![0.0; self.mu.len()];
    }
}
