use rand::rngs::StdRng;
use rand::SeedableRng;
use rl::ReplayBuffer;

fn transition(tag: f32) -> (Vec<f32>, Vec<f32>, f32, Vec<f32>, bool) {
    (vec![tag, tag], vec![tag], tag, vec![tag + 1.0, tag + 1.0], false)
}

#[test]
fn buffer_fills_then_wraps_around() {
    let mut buffer = ReplayBuffer::new(4);
    assert!(buffer.is_empty());

    for i in 0..4 {
        let (o, a, r, no, d) = transition(i as f32);
        buffer.add(o, a, r, no, d);
    }
    assert_eq!(buffer.len(), 4);

    // Two more transitions overwrite the two oldest slots.
    for i in 4..6 {
        let (o, a, r, no, d) = transition(i as f32);
        buffer.add(o, a, r, no, d);
    }
    assert_eq!(buffer.len(), 4);

    let mut rng = StdRng::seed_from_u64(0);
    let batch = buffer.sample(64, &mut rng);
    // Rewards 0.0 and 1.0 were overwritten by 4.0 and 5.0.
    assert!(batch.rewards.iter().all(|&r| r >= 2.0));
}

#[test]
fn sampled_batch_has_aligned_parallel_fields() {
    let mut buffer = ReplayBuffer::new(16);
    for i in 0..10 {
        let (o, a, r, no, d) = transition(i as f32);
        buffer.add(o, a, r, no, d);
    }
    let mut rng = StdRng::seed_from_u64(1);
    let batch = buffer.sample(8, &mut rng);
    assert_eq!(batch.len(), 8);
    assert_eq!(batch.obs.len(), 8);
    assert_eq!(batch.actions.len(), 8);
    assert_eq!(batch.next_obs.len(), 8);
    assert_eq!(batch.dones.len(), 8);
    for j in 0..8 {
        // The tag encodes alignment across fields.
        assert_eq!(batch.obs[j][0], batch.rewards[j]);
        assert_eq!(batch.next_obs[j][0], batch.rewards[j] + 1.0);
    }
}

#[test]
#[should_panic(expected = "empty replay buffer")]
fn sampling_an_empty_buffer_panics() {
    let buffer = ReplayBuffer::new(4);
    let mut rng = StdRng::seed_from_u64(0);
    buffer.sample(1, &mut rng);
}
