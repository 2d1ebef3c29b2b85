use nets::{Activation, Mlp};

#[test]
fn parameter_vector_round_trip_is_exact() {
    fastrand::seed(11);
    let src = Mlp::new(&[5, 12, 12, 3], Activation::Relu, Activation::Tanh);
    let mut dst = Mlp::new(&[5, 12, 12, 3], Activation::Relu, Activation::Tanh);

    let vector = src.to_vector();
    assert_eq!(vector.len(), src.param_count());
    dst.load_from_vector(&vector);

    for (a, b) in src.layers.iter().zip(&dst.layers) {
        assert_eq!(a.w.data, b.w.data);
        assert_eq!(a.b.data, b.b.data);
    }
    // The round-tripped network must also encode back to the same vector.
    assert_eq!(dst.to_vector(), vector);
}

#[test]
#[should_panic(expected = "parameter vector length")]
fn mismatched_vector_length_panics() {
    let mut net = Mlp::new(&[2, 4, 1], Activation::Tanh, Activation::Linear);
    let too_short = vec![0.0; net.param_count() - 1];
    net.load_from_vector(&too_short);
}
