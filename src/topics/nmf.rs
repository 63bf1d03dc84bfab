// Non-negative matrix factorization via multiplicative updates.
//
// Decomposes the TF-IDF matrix V (docs x terms) into W (docs x k) and
// H (k x terms); each row of H is one topic's weight over the vocabulary.
// Update rules follow Lee & Seung, with an L1/L2 regularization blend folded
// into the denominators. Initialization is seeded, so a given corpus always
// decomposes the same way.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct NmfParams {
    /// Number of topics (k)
    pub n_components: usize,
    pub max_iter: usize,
    /// Stop when the relative drop in reconstruction error falls below this
    pub tolerance: f64,
    /// Overall regularization strength
    pub alpha: f64,
    /// Blend between L1 (sparsity) and L2 (smoothness) penalties, in [0, 1]
    pub l1_ratio: f64,
    pub seed: u64,
}

impl Default for NmfParams {
    fn default() -> Self {
        Self {
            n_components: 5,
            max_iter: 500,
            tolerance: 1e-4,
            alpha: 0.1,
            l1_ratio: 0.5,
            seed: 42,
        }
    }
}

/// Factorize `v` into non-negative factors (W, H).
///
/// Deterministic for a fixed seed. Degenerate shapes (zero docs, terms, or
/// components) come back as zero matrices rather than panicking.
pub fn factorize(v: &Array2<f64>, params: &NmfParams) -> (Array2<f64>, Array2<f64>) {
    let (n_docs, n_terms) = v.dim();
    let k = params.n_components;

    if n_docs == 0 || n_terms == 0 || k == 0 {
        return (Array2::zeros((n_docs, k)), Array2::zeros((k, n_terms)));
    }

    let eps = 1e-10;
    let l1 = params.alpha * params.l1_ratio;
    let l2 = params.alpha * (1.0 - params.l1_ratio);

    // Positive uniform init keeps the multiplicative updates away from the
    // absorbing zero state
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut w = Array2::from_shape_fn((n_docs, k), |_| rng.random_range(0.1..1.0));
    let mut h = Array2::from_shape_fn((k, n_terms), |_| rng.random_range(0.1..1.0));

    let mut initial_error = 0.0;
    let mut prev_error = 0.0;

    for iter in 0..params.max_iter {
        // H <- H * (W^T V) / (W^T W H + l1 + l2 H)
        let wt = w.t();
        let numer_h = wt.dot(v);
        let denom_h = wt.dot(&w).dot(&h) + l1 + &(l2 * &h) + eps;
        h = h * &(numer_h / denom_h);

        // W <- W * (V H^T) / (W H H^T + l1 + l2 W)
        let ht = h.t();
        let numer_w = v.dot(&ht);
        let denom_w = w.dot(&h).dot(&ht) + l1 + &(l2 * &w) + eps;
        w = w * &(numer_w / denom_w);

        // Frobenius reconstruction error, relative-drop convergence test
        let residual = v - &w.dot(&h);
        let error = residual.mapv(|x| x * x).sum();

        if iter == 0 {
            initial_error = error.max(eps);
            prev_error = error;
            continue;
        }

        let relative_drop = (prev_error - error) / initial_error;
        prev_error = error;

        if relative_drop < params.tolerance {
            break;
        }
    }

    (w, h)
}
