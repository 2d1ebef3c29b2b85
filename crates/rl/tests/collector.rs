use nets::{Activation, Mlp};
use rl::{
    collect_rollouts, ActionNoise, Env, GaussianActionNoise, NoopCallback, PointMassEnv,
    ReplayBuffer, StopTrainingCallback,
};

#[test]
fn collects_the_requested_number_of_episodes() {
    fastrand::seed(10);
    let mut env = PointMassEnv::with_horizon(10);
    let actor = Mlp::new(&[env.obs_size(), 8, env.action_size()], Activation::Relu, Activation::Tanh);
    let mut buffer = ReplayBuffer::new(1000);
    let mut num_timesteps = 0;

    let rollout = collect_rollouts(
        &actor,
        &mut env,
        3,
        None,
        &mut buffer,
        0,
        &mut num_timesteps,
        &mut NoopCallback,
    );

    assert!(rollout.continue_training);
    assert_eq!(rollout.n_episodes, 3);
    assert!(rollout.episode_timesteps <= 30);
    assert_eq!(rollout.episode_timesteps, num_timesteps);
    assert_eq!(buffer.len(), rollout.episode_timesteps);
}

#[test]
fn warm_up_phase_still_fills_the_buffer() {
    fastrand::seed(11);
    let mut env = PointMassEnv::with_horizon(5);
    let actor = Mlp::new(&[env.obs_size(), 8, env.action_size()], Activation::Relu, Activation::Tanh);
    let mut buffer = ReplayBuffer::new(100);
    let mut num_timesteps = 0;

    // learning_starts far beyond this call: every action is random warm-up.
    let rollout = collect_rollouts(
        &actor,
        &mut env,
        2,
        None,
        &mut buffer,
        10_000,
        &mut num_timesteps,
        &mut NoopCallback,
    );
    assert!(rollout.continue_training);
    assert_eq!(buffer.len(), rollout.episode_timesteps);
}

#[test]
fn boxed_noise_source_is_reborrowed_across_rollout_calls() {
    fastrand::seed(13);
    let mut env = PointMassEnv::with_horizon(5);
    let actor = Mlp::new(&[env.obs_size(), 8, env.action_size()], Activation::Relu, Activation::Tanh);
    let mut buffer = ReplayBuffer::new(1000);
    let mut num_timesteps = 0;

    // The training loops keep their noise in an owned option and hand out a
    // fresh short-lived borrow per collection call.
    let mut noise: Option<Box<dyn ActionNoise>> =
        Some(Box::new(GaussianActionNoise::scalar(env.action_size(), 0.1, 13)));
    for _ in 0..3 {
        let rollout = collect_rollouts(
            &actor,
            &mut env,
            1,
            noise.as_deref_mut(),
            &mut buffer,
            0,
            &mut num_timesteps,
            &mut NoopCallback,
        );
        assert!(rollout.continue_training);
        assert_eq!(rollout.n_episodes, 1);
    }
    assert_eq!(num_timesteps, 15);
    assert_eq!(buffer.len(), 15);
}

#[test]
fn callback_stop_surfaces_as_continue_training_false() {
    fastrand::seed(12);
    let mut env = PointMassEnv::with_horizon(50);
    let actor = Mlp::new(&[env.obs_size(), 8, env.action_size()], Activation::Relu, Activation::Tanh);
    let mut buffer = ReplayBuffer::new(1000);
    let mut num_timesteps = 0;
    let mut callback = StopTrainingCallback { max_steps: 4 };

    let rollout = collect_rollouts(
        &actor,
        &mut env,
        5,
        None,
        &mut buffer,
        0,
        &mut num_timesteps,
        &mut callback,
    );
    assert!(!rollout.continue_training);
    assert_eq!(rollout.episode_timesteps, 4);
}
