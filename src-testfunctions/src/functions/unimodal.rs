use ndarray::Array1;

/// Sphere function - N-dimensional bowl
/// Global minimum: f(x) = 0 at x = (0, ..., 0)
/// Bounds: x_i in [-5, 5]
pub fn sphere(x: &Array1<f64>) -> f64 {
    x.dot(x)
}

/// Rosenbrock function - N-dimensional banana valley
/// Global minimum: f(x) = 0 at x = (1, ..., 1)
/// Bounds: x_i in [-2.048, 2.048]
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    x.windows(2)
        .into_iter()
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Booth function - 2D plate
/// Global minimum: f(x) = 0 at x = (1, 3)
/// Bounds: x_i in [-10, 10]
pub fn booth(x: &Array1<f64>) -> f64 {
    (x[0] + 2.0 * x[1] - 7.0).powi(2) + (2.0 * x[0] + x[1] - 5.0).powi(2)
}
