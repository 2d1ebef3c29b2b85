use nets::Mlp;

use crate::buffer::ReplayBuffer;
use crate::callback::Callback;
use crate::env::Env;
use crate::noise::ActionNoise;

/// Aggregate statistics from one rollout-collection call.
pub struct Rollout {
    /// Total reward summed over all collected episodes.
    pub episode_reward: f32,
    /// Total environment steps collected.
    pub episode_timesteps: usize,
    /// Completed episodes.
    pub n_episodes: usize,
    /// `false` when the callback requested a stop mid-rollout; the caller
    /// must treat the surrounding generation as aborted.
    pub continue_training: bool,
}

/// Runs `actor` in `env` for `n_episodes` complete episodes, appending every
/// transition to the replay buffer.
///
/// Before `learning_starts` total steps have been taken, actions are drawn
/// uniformly at random to seed the buffer; afterwards the actor's output
/// plus exploration noise is used, clamped to `[-1, 1]`. Blocking and
/// synchronous: there are no partial results, the only cancellation point is
/// the per-step callback.
#[allow(clippy::too_many_arguments)]
pub fn collect_rollouts(
    actor: &Mlp,
    env: &mut dyn Env,
    n_episodes: usize,
    mut noise: Option<&mut (dyn ActionNoise + '_)>,
    buffer: &mut ReplayBuffer,
    learning_starts: usize,
    num_timesteps: &mut usize,
    callback: &mut dyn Callback,
) -> Rollout {
    let action_dim = env.action_size();
    let mut total_reward = 0.0;
    let mut total_steps = 0;
    let mut episodes_done = 0;

    for _ in 0..n_episodes {
        let mut obs = env.reset();
        if let Some(n) = noise.as_deref_mut() {
            n.reset();
        }
        loop {
            let mut action = if *num_timesteps < learning_starts {
                (0..action_dim).map(|_| fastrand::f32() * 2.0 - 1.0).collect()
            } else {
                actor.forward(&obs)
            };
            if let Some(n) = noise.as_deref_mut() {
                for (a, eps) in action.iter_mut().zip(n.sample()) {
                    *a = (*a + eps).clamp(-1.0, 1.0);
                }
            }

            let (next_obs, reward, done) = env.step(&action);
            buffer.add(obs, action, reward, next_obs.clone(), done);
            obs = next_obs;

            *num_timesteps += 1;
            total_steps += 1;
            total_reward += reward;

            if !callback.on_step(*num_timesteps) {
                return Rollout {
                    episode_reward: total_reward,
                    episode_timesteps: total_steps,
                    n_episodes: episodes_done,
                    continue_training: false,
                };
            }
            if done {
                episodes_done += 1;
                break;
            }
        }
    }

    Rollout {
        episode_reward: total_reward,
        episode_timesteps: total_steps,
        n_episodes: episodes_done,
        continue_training: true,
    }
}
