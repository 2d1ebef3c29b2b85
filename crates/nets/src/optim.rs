use crate::nn::{Grads, Mlp};

/// Adam optimizer with bias correction.
///
/// Construction is cheap so callers can rebuild it whenever they want fresh
/// moment estimates.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    /// Creates an optimizer for parameter slices of the given sizes.
    pub fn new(lr: f32, sizes: &[usize]) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: sizes.iter().map(|&n| vec![0.0; n]).collect(),
            v: sizes.iter().map(|&n| vec![0.0; n]).collect(),
        }
    }

    /// Applies one update to `params` given matching `grads`.
    pub fn step(&mut self, params: &mut [&mut [f32]], grads: &[&[f32]]) {
        assert_eq!(params.len(), self.m.len());
        assert_eq!(grads.len(), self.m.len());
        self.t += 1;
        let b1 = 1.0 - self.beta1.powi(self.t as i32);
        let b2 = 1.0 - self.beta2.powi(self.t as i32);
        for (i, p) in params.iter_mut().enumerate() {
            let g = grads[i];
            for j in 0..p.len() {
                self.m[i][j] = self.beta1 * self.m[i][j] + (1.0 - self.beta1) * g[j];
                self.v[i][j] = self.beta2 * self.v[i][j] + (1.0 - self.beta2) * g[j] * g[j];
                let m_hat = self.m[i][j] / b1;
                let v_hat = self.v[i][j] / b2;
                p[j] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
    }

    /// Convenience step for an [`Mlp`] and its accumulated [`Grads`].
    pub fn step_mlp(&mut self, mlp: &mut Mlp, grads: &Grads) {
        let mut params = mlp.params_mut();
        let mut flat: Vec<&[f32]> = Vec::with_capacity(params.len());
        for (w, b) in grads.w.iter().zip(&grads.b) {
            flat.push(w.as_slice());
            flat.push(b.as_slice());
        }
        self.step(&mut params, &flat);
    }
}
