use nets::Dense;

#[test]
fn dense_forward_known_values() {
    // y = W x + b with W = [[1, 2], [3, 4]], b = [0.5, -0.5]
    let layer = Dense::new(vec![1.0, 2.0, 3.0, 4.0], vec![0.5, -0.5], 2, 2);
    let y = layer.forward(&[1.0, 1.0]);
    assert_eq!(y, vec![3.5, 6.5]);
}

#[test]
fn dense_backward_matches_finite_difference() {
    let layer = Dense::new(vec![0.3, -0.2, 0.7, 0.1], vec![0.05, -0.1], 2, 2);
    let x = [0.4, -0.9];
    // loss = sum of outputs, so the output gradient is all ones
    let (gx, gw, gb) = layer.backward(&x, &[1.0, 1.0]);

    let eps = 1e-3;
    let loss = |l: &Dense, x: &[f32]| -> f32 { l.forward(x).iter().sum() };

    for i in 0..2 {
        let mut xp = x;
        xp[i] += eps;
        let mut xm = x;
        xm[i] -= eps;
        let num = (loss(&layer, &xp) - loss(&layer, &xm)) / (2.0 * eps);
        assert!((gx[i] - num).abs() < 1e-2, "input grad {i}: {} vs {num}", gx[i]);
    }
    for i in 0..4 {
        let mut lp = layer.clone();
        lp.w.data[i] += eps;
        let mut lm = layer.clone();
        lm.w.data[i] -= eps;
        let num = (loss(&lp, &x) - loss(&lm, &x)) / (2.0 * eps);
        assert!((gw[i] - num).abs() < 1e-2, "weight grad {i}: {} vs {num}", gw[i]);
    }
    for i in 0..2 {
        let mut lp = layer.clone();
        lp.b.data[i] += eps;
        let mut lm = layer.clone();
        lm.b.data[i] -= eps;
        let num = (loss(&lp, &x) - loss(&lm, &x)) / (2.0 * eps);
        assert!((gb[i] - num).abs() < 1e-2, "bias grad {i}: {} vs {num}", gb[i]);
    }
}
