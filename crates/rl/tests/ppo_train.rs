use rl::{Env, PointMassEnv, Ppo};

#[test]
fn ppo_step_produces_finite_rewards_and_actions() {
    let mut trainer = Ppo::new_with(|| PointMassEnv::with_horizon(30), 0);
    for _ in 0..3 {
        let reward = trainer.step();
        assert!(reward.is_finite());
    }
    let mut env = PointMassEnv::with_horizon(30);
    let obs = env.reset();
    let action = trainer.act(&obs);
    assert_eq!(action.len(), env.action_size());
    assert!(action.iter().all(|a| a.is_finite() && a.abs() <= 1.0));
}

#[test]
#[ignore]
fn ppo_learns_to_reach_the_origin() {
    let mut trainer = Ppo::new_with(|| PointMassEnv::with_horizon(60), 0);
    let first = trainer.step();
    let mut best = first;
    for _ in 0..300 {
        let reward = trainer.step();
        if reward > best {
            best = reward;
        }
    }
    assert!(best > first, "no improvement over {first}");
}
