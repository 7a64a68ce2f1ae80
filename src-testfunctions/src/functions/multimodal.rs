use ndarray::Array1;
use std::f64::consts::{E, PI};

/// Rastrigin function - highly multimodal, regular grid of local minima
/// Global minimum: f(x) = 0 at x = (0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    10.0 * n
        + x.iter()
            .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Ackley function - nearly flat outer region with a deep central hole
/// Global minimum: f(x) = 0 at x = (0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let mean_sq = x.dot(x) / n;
    let mean_cos = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum::<f64>() / n;
    -20.0 * (-0.2 * mean_sq.sqrt()).exp() - mean_cos.exp() + 20.0 + E
}

/// Himmelblau function - 2D, four global minima
/// Global minimum: f(x) = 0 at (3, 2), (-2.805118, 3.131312), (-3.779310, -3.283186), (3.584428, -1.848126)
/// Bounds: x_i in [-5, 5]
pub fn himmelblau(x: &Array1<f64>) -> f64 {
    let (x1, x2) = (x[0], x[1]);
    (x1 * x1 + x2 - 11.0).powi(2) + (x1 + x2 * x2 - 7.0).powi(2)
}
