//! Flat parameter-vector codec.
//!
//! Flattens an [`Mlp`]'s learnable tensors into a single ordered `Vec<f32>`
//! and writes such a vector back into a network of identical architecture.
//! Traversal order is fixed: for each layer in declaration order, the weight
//! matrix row-major, then the bias vector. A length mismatch is a
//! programming error (mismatched architectures) and panics.

use crate::nn::Mlp;

impl Mlp {
    /// Flattens all learnable parameters into one vector.
    pub fn to_vector(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.param_count());
        for l in &self.layers {
            out.extend_from_slice(&l.w.data);
            out.extend_from_slice(&l.b.data);
        }
        out
    }

    /// Writes `vector` back into the network's parameters.
    ///
    /// Panics if the vector length does not match [`Mlp::param_count`].
    pub fn load_from_vector(&mut self, vector: &[f32]) {
        assert_eq!(
            vector.len(),
            self.param_count(),
            "parameter vector length does not match network architecture"
        );
        let mut offset = 0;
        for l in &mut self.layers {
            let w_len = l.w.len();
            l.w.data.copy_from_slice(&vector[offset..offset + w_len]);
            offset += w_len;
            let b_len = l.b.len();
            l.b.data.copy_from_slice(&vector[offset..offset + b_len]);
            offset += b_len;
        }
    }
}
