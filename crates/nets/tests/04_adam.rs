use nets::Adam;

#[test]
fn adam_minimizes_a_quadratic() {
    let mut x = vec![3.0f32, -2.0, 5.0];
    let mut opt = Adam::new(0.05, &[x.len()]);
    for _ in 0..500 {
        let grad: Vec<f32> = x.iter().map(|v| 2.0 * v).collect();
        let mut params = vec![x.as_mut_slice()];
        opt.step(&mut params, &[grad.as_slice()]);
    }
    for v in &x {
        assert!(v.abs() < 1e-2, "did not converge: {v}");
    }
}
