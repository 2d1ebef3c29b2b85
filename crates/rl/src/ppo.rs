use nets::{Activation, Adam, Grads, Mlp};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::env::Env;

/// Proximal Policy Optimization over a small set of parallel environments.
///
/// Gaussian policy with a fixed standard deviation around the network's mean
/// action; separate policy and value networks with hand-computed gradients
/// for the clipped surrogate and the value regression.
pub struct Ppo<E: Env> {
    envs: Vec<E>,
    policy: Mlp,
    value: Mlp,
    policy_opt: Adam,
    value_opt: Adam,
    gamma: f32,
    lambda: f32,
    clip: f32,
    action_std: f32,
    t_max: usize,
    n_epochs: usize,
    obs: Vec<Vec<f32>>,
    obs_dim: usize,
    act_dim: usize,
    rng: StdRng,
}

/// Log-probability of `action` under a Gaussian centred on `mean`, dropping
/// terms constant in the mean (they cancel in the importance ratio).
fn gaussian_log_prob(mean: &[f32], action: &[f32], std: f32) -> f32 {
    mean.iter()
        .zip(action)
        .map(|(&m, &a)| {
            let z = (a - m) / std;
            -0.5 * z * z
        })
        .sum()
}

impl<E: Env> Ppo<E> {
    /// Creates a trainer with the provided environment constructor.
    pub fn new_with(mut make_env: impl FnMut() -> E, seed: u64) -> Self {
        fastrand::seed(seed);
        let envs: Vec<_> = (0..8).map(|_| make_env()).collect();
        let obs_dim = envs[0].obs_size();
        let act_dim = envs[0].action_size();

        let policy = Mlp::new(&[obs_dim, 32, act_dim], Activation::Tanh, Activation::Tanh);
        let value = Mlp::new(&[obs_dim, 32, 1], Activation::Tanh, Activation::Linear);
        let policy_opt = Adam::new(3e-4, &policy.param_sizes());
        let value_opt = Adam::new(1e-3, &value.param_sizes());
        let obs = vec![vec![0.0; obs_dim]; envs.len()];

        Self {
            envs,
            policy,
            value,
            policy_opt,
            value_opt,
            gamma: 0.99,
            lambda: 0.95,
            clip: 0.2,
            action_std: 0.2,
            t_max: 64,
            n_epochs: 4,
            obs,
            obs_dim,
            act_dim,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Collects `t_max` steps from every environment, then runs `n_epochs`
    /// of clipped-surrogate updates. Returns the mean total reward per
    /// environment over the collected window.
    pub fn step(&mut self) -> f32 {
        let n_envs = self.envs.len();
        let mut all_obs = Vec::new();
        let mut all_actions = Vec::new();
        let mut all_log_probs = Vec::new();
        let mut all_rewards = Vec::new();
        let mut all_dones = Vec::new();
        let mut all_values = Vec::new();
        let mut total_rewards = vec![0.0; n_envs];

        let action_std = self.action_std;
        for _ in 0..self.t_max {
            let mut step_obs = Vec::with_capacity(n_envs);
            let mut step_actions = Vec::with_capacity(n_envs);
            let mut step_log_probs = Vec::with_capacity(n_envs);
            let mut step_values = Vec::with_capacity(n_envs);
            let mut step_rewards = Vec::with_capacity(n_envs);
            let mut step_dones = Vec::with_capacity(n_envs);

            for (i, env) in self.envs.iter_mut().enumerate() {
                let obs = self.obs[i].clone();
                let mean = self.policy.forward(&obs);
                let action: Vec<f32> = mean
                    .iter()
                    .map(|&m| {
                        let z: f32 = StandardNormal.sample(&mut self.rng);
                        (m + z * action_std).clamp(-1.0, 1.0)
                    })
                    .collect();
                let log_prob = gaussian_log_prob(&mean, &action, action_std);
                let value = self.value.forward(&obs)[0];

                let (next_obs, reward, done) = env.step(&action);
                total_rewards[i] += reward;
                self.obs[i] = if done { env.reset() } else { next_obs };

                step_obs.push(obs);
                step_actions.push(action);
                step_log_probs.push(log_prob);
                step_values.push(value);
                step_rewards.push(reward);
                step_dones.push(done);
            }

            all_obs.push(step_obs);
            all_actions.push(step_actions);
            all_log_probs.push(step_log_probs);
            all_values.push(step_values);
            all_rewards.push(step_rewards);
            all_dones.push(step_dones);
        }

        // GAE(lambda) advantages, bootstrapping from the value of the final
        // observation.
        let last_values: Vec<f32> =
            self.obs.iter().map(|o| self.value.forward(o)[0]).collect();
        let mut advantages = vec![vec![0.0; n_envs]; self.t_max];
        let mut returns = vec![vec![0.0; n_envs]; self.t_max];
        let mut last_advantage = vec![0.0; n_envs];
        for t in (0..self.t_max).rev() {
            for i in 0..n_envs {
                let (next_value, next_done) = if t == self.t_max - 1 {
                    (last_values[i], false)
                } else {
                    (all_values[t + 1][i], all_dones[t + 1][i])
                };
                let not_done = 1.0 - next_done as i32 as f32;
                let delta =
                    all_rewards[t][i] + self.gamma * next_value * not_done - all_values[t][i];
                advantages[t][i] =
                    delta + self.gamma * self.lambda * last_advantage[i] * not_done;
                last_advantage[i] = advantages[t][i];
                returns[t][i] = advantages[t][i] + all_values[t][i];
            }
        }

        let advantages_flat: Vec<f32> = advantages.iter().flatten().copied().collect();
        let mean_adv = advantages_flat.iter().sum::<f32>() / advantages_flat.len() as f32;
        let std_adv = (advantages_flat.iter().map(|a| (a - mean_adv).powi(2)).sum::<f32>()
            / advantages_flat.len() as f32)
            .sqrt();

        let n_samples = (self.t_max * n_envs) as f32;
        let inv_std2 = 1.0 / (self.action_std * self.action_std);

        for _ in 0..self.n_epochs {
            let mut policy_grads = Grads::zeros_like(&self.policy);
            let mut value_grads = Grads::zeros_like(&self.value);

            for t in 0..self.t_max {
                for i in 0..n_envs {
                    let obs = &all_obs[t][i];
                    let action = &all_actions[t][i];
                    let adv = (advantages[t][i] - mean_adv) / (std_adv + 1e-8);

                    let (mean, cache) = self.policy.forward_cached(obs);
                    let log_prob = gaussian_log_prob(&mean, action, self.action_std);
                    let ratio = (log_prob - all_log_probs[t][i]).exp();

                    let unclipped = ratio * adv;
                    let clipped = ratio.clamp(1.0 - self.clip, 1.0 + self.clip) * adv;
                    // Gradient of -min(unclipped, clipped): zero once the
                    // clipped branch is active, since the clamp is then
                    // binding.
                    if unclipped <= clipped {
                        let out_grad: Vec<f32> = mean
                            .iter()
                            .zip(action)
                            .map(|(&m, &a)| {
                                -adv * ratio * (a - m) * inv_std2 / n_samples
                            })
                            .collect();
                        let (_, g) = self.policy.backward(&cache, &out_grad);
                        policy_grads.add(&g);
                    }

                    let (v, vcache) = self.value.forward_cached(obs);
                    let gv = 2.0 * (v[0] - returns[t][i]) / n_samples;
                    let (_, g) = self.value.backward(&vcache, &[gv]);
                    value_grads.add(&g);
                }
            }

            self.policy_opt.step_mlp(&mut self.policy, &policy_grads);
            self.value_opt.step_mlp(&mut self.value, &value_grads);
        }

        total_rewards.iter().sum::<f32>() / n_envs as f32
    }

    /// Mean action of the current policy for the given observation.
    pub fn act(&self, obs: &[f32]) -> Vec<f32> {
        assert_eq!(obs.len(), self.obs_dim);
        self.policy.forward(obs)
    }

    pub fn action_size(&self) -> usize {
        self.act_dim
    }
}
