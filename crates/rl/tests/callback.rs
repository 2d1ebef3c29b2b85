use rl::{Callback, CheckpointCallback};

#[test]
fn checkpoint_callback_writes_the_best_vector_as_json() {
    let path = std::env::temp_dir().join("cerl_checkpoint_test.json");
    let _ = std::fs::remove_file(&path);

    let mut callback = CheckpointCallback::new(&path, 2);
    let params = vec![0.25f32, -1.5, 3.0];
    callback.on_generation_end(1, 10.0, &params);
    assert!(!path.exists(), "generation 1 is not a save point with save_freq = 2");

    callback.on_generation_end(2, 12.5, &params);
    let contents = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["generation"], 2);
    assert_eq!(value["params"].as_array().unwrap().len(), 3);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn checkpoint_is_skipped_when_fitness_regressed() {
    let path = std::env::temp_dir().join("cerl_checkpoint_regress_test.json");
    let _ = std::fs::remove_file(&path);

    let mut callback = CheckpointCallback::new(&path, 1);
    let params = vec![1.0f32];
    callback.on_generation_end(1, 10.0, &params);
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);

    // A save point that is worse than the best seen so far writes nothing.
    callback.on_generation_end(2, 4.0, &params);
    assert!(!path.exists(), "regressed generation must not be checkpointed");

    callback.on_generation_end(3, 11.0, &params);
    let contents = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["generation"], 3);

    let _ = std::fs::remove_file(&path);
}
