use crate::tensor::Tensor;

/// A fully connected layer.
#[derive(Clone)]
pub struct Dense {
    /// The weight matrix, stored row-major as `[out_dim, in_dim]`.
    pub w: Tensor,
    /// The bias vector.
    pub b: Tensor,
    pub in_dim: usize,
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_d: usize, out_d: usize) -> Self {
        assert_eq!(weights.len(), in_d * out_d);
        assert_eq!(bias.len(), out_d);
        Self {
            w: Tensor::from_vec(vec![out_d, in_d], weights),
            b: Tensor::from_vec(vec![out_d], bias),
            in_dim: in_d,
            out_dim: out_d,
        }
    }

    /// Glorot-initialized layer.
    pub fn glorot(in_d: usize, out_d: usize) -> Self {
        let limit = (6.0 / (in_d + out_d) as f32).sqrt();
        let weights = (0..in_d * out_d)
            .map(|_| fastrand::f32() * 2.0 * limit - limit)
            .collect();
        let bias = vec![0.0; out_d];
        Self::new(weights, bias, in_d, out_d)
    }

    /// Forward pass for a single sample.
    pub fn forward(&self, x: &[f32]) -> Vec<f32> {
        debug_assert_eq!(x.len(), self.in_dim);
        let mut y = vec![0.0; self.out_dim];
        for o in 0..self.out_dim {
            let mut sum = self.b.data[o];
            for i in 0..self.in_dim {
                sum += self.w.data[o * self.in_dim + i] * x[i];
            }
            y[o] = sum;
        }
        y
    }

    /// Backward pass for a single sample.
    ///
    /// Returns `(input_grad, weight_grad, bias_grad)` given the layer input
    /// and the gradient of the loss with respect to the pre-activation
    /// output.
    pub fn backward(&self, x: &[f32], grad: &[f32]) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        let mut grad_input = vec![0.0; self.in_dim];
        let mut grad_w = vec![0.0; self.in_dim * self.out_dim];
        let mut grad_b = vec![0.0; self.out_dim];
        for o in 0..self.out_dim {
            let go = grad[o];
            for i in 0..self.in_dim {
                grad_w[o * self.in_dim + i] += go * x[i];
                grad_input[i] += self.w.data[o * self.in_dim + i] * go;
            }
            grad_b[o] += go;
        }
        (grad_input, grad_w, grad_b)
    }
}

/// Elementwise activation applied after a [`Dense`] layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Tanh,
    Linear,
}

impl Activation {
    pub fn forward(&self, x: &mut [f32]) {
        match self {
            Activation::Relu => {
                for v in x.iter_mut() {
                    *v = v.max(0.0);
                }
            }
            Activation::Tanh => {
                for v in x.iter_mut() {
                    *v = v.tanh();
                }
            }
            Activation::Linear => {}
        }
    }

    /// Derivative expressed in terms of the post-activation value.
    fn grad(&self, post: f32) -> f32 {
        match self {
            Activation::Relu => {
                if post > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Tanh => 1.0 - post * post,
            Activation::Linear => 1.0,
        }
    }
}

/// Per-layer gradients for an [`Mlp`], aligned with its layer order.
#[derive(Clone)]
pub struct Grads {
    pub w: Vec<Vec<f32>>,
    pub b: Vec<Vec<f32>>,
}

impl Grads {
    pub fn zeros_like(mlp: &Mlp) -> Self {
        Self {
            w: mlp.layers.iter().map(|l| vec![0.0; l.w.len()]).collect(),
            b: mlp.layers.iter().map(|l| vec![0.0; l.b.len()]).collect(),
        }
    }

    /// Elementwise accumulation of another gradient set.
    pub fn add(&mut self, other: &Grads) {
        for (a, b) in self.w.iter_mut().zip(&other.w) {
            for (av, bv) in a.iter_mut().zip(b) {
                *av += bv;
            }
        }
        for (a, b) in self.b.iter_mut().zip(&other.b) {
            for (av, bv) in a.iter_mut().zip(b) {
                *av += bv;
            }
        }
    }
}

/// Intermediate activations recorded during [`Mlp::forward_cached`].
pub struct MlpCache {
    /// Input to each layer (post-activation of the previous one).
    pub inputs: Vec<Vec<f32>>,
    /// Post-activation output of each layer.
    pub outputs: Vec<Vec<f32>>,
}

/// A multilayer perceptron with a shared hidden activation and a separate
/// output activation (tanh for squashed actors, linear for critics).
#[derive(Clone)]
pub struct Mlp {
    pub layers: Vec<Dense>,
    pub hidden: Activation,
    pub output: Activation,
}

impl Mlp {
    /// Builds an MLP from a list of layer sizes, e.g. `[4, 32, 32, 2]`.
    pub fn new(sizes: &[usize], hidden: Activation, output: Activation) -> Self {
        assert!(sizes.len() >= 2, "an MLP needs at least one layer");
        let layers = sizes
            .windows(2)
            .map(|w| Dense::glorot(w[0], w[1]))
            .collect();
        Self { layers, hidden, output }
    }

    fn activation_for(&self, layer: usize) -> Activation {
        if layer == self.layers.len() - 1 {
            self.output
        } else {
            self.hidden
        }
    }

    pub fn forward(&self, x: &[f32]) -> Vec<f32> {
        let mut out = x.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            out = layer.forward(&out);
            self.activation_for(i).forward(&mut out);
        }
        out
    }

    /// Forward pass recording the activations needed by [`Mlp::backward`].
    pub fn forward_cached(&self, x: &[f32]) -> (Vec<f32>, MlpCache) {
        let mut inputs = Vec::with_capacity(self.layers.len());
        let mut outputs = Vec::with_capacity(self.layers.len());
        let mut out = x.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            inputs.push(out.clone());
            out = layer.forward(&out);
            self.activation_for(i).forward(&mut out);
            outputs.push(out.clone());
        }
        (out, MlpCache { inputs, outputs })
    }

    /// Backward pass for a single sample.
    ///
    /// `out_grad` is the gradient of the loss with respect to the network
    /// output. Returns the gradient with respect to the network input along
    /// with the parameter gradients.
    pub fn backward(&self, cache: &MlpCache, out_grad: &[f32]) -> (Vec<f32>, Grads) {
        let mut grads = Grads::zeros_like(self);
        let mut g = out_grad.to_vec();
        for i in (0..self.layers.len()).rev() {
            let act = self.activation_for(i);
            for (gv, &post) in g.iter_mut().zip(&cache.outputs[i]) {
                *gv *= act.grad(post);
            }
            let (gi, gw, gb) = self.layers[i].backward(&cache.inputs[i], &g);
            grads.w[i] = gw;
            grads.b[i] = gb;
            g = gi;
        }
        (g, grads)
    }

    pub fn param_count(&self) -> usize {
        self.layers.iter().map(|l| l.w.len() + l.b.len()).sum()
    }

    /// Sizes of the parameter slices in the order used by the optimizer.
    pub fn param_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers.len() * 2);
        for l in &self.layers {
            sizes.push(l.w.len());
            sizes.push(l.b.len());
        }
        sizes
    }

    /// Mutable views of all parameter slices, aligned with [`Grads`].
    pub fn params_mut(&mut self) -> Vec<&mut [f32]> {
        let mut out = Vec::with_capacity(self.layers.len() * 2);
        for Dense { w, b, .. } in &mut self.layers {
            out.push(w.data.as_mut_slice());
            out.push(b.data.as_mut_slice());
        }
        out
    }
}
