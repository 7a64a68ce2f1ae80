//! Optimization test functions library
//!
//! Benchmark objectives used to exercise the swarm optimizer. Functions are
//! organized by category:
//!
//! - **Unimodal**: single optimum (sphere, rosenbrock, booth)
//! - **Multimodal**: several or many local minima (rastrigin, ackley, himmelblau)
//!
//! Every function is given in minimization form; an optimizer that maximizes
//! fitness should evaluate `-f(x)`.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use pswarm_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds("himmelblau").unwrap();
//! assert_eq!(bounds, vec![(-5.0, 5.0); 2]);
//! let f = get_function("himmelblau").unwrap();
//! assert_eq!(f(&Array1::from_vec(vec![3.0, 2.0])), 0.0);
//! ```

use ndarray::Array1;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Signature shared by every test function
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Metadata for a test function: bounds, known minima and shape
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    pub name: String,
    pub function: TestFunction,
    /// Bounds for each dimension (min, max) at the default dimension
    pub bounds: Vec<(f64, f64)>,
    /// Global minima locations and values at the default dimension
    pub global_minima: Vec<(Vec<f64>, f64)>,
    /// Whether the same bounds hold for any dimension
    pub scalable: bool,
    pub multimodal: bool,
    pub description: String,
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    let entries = [
        FunctionMetadata {
            name: "sphere".to_string(),
            function: sphere,
            bounds: vec![(-5.0, 5.0); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
            scalable: true,
            multimodal: false,
            description: "N-dimensional quadratic bowl".to_string(),
        },
        FunctionMetadata {
            name: "rosenbrock".to_string(),
            function: rosenbrock,
            bounds: vec![(-2.048, 2.048); 2],
            global_minima: vec![(vec![1.0, 1.0], 0.0)],
            scalable: true,
            multimodal: false,
            description: "N-dimensional banana valley".to_string(),
        },
        FunctionMetadata {
            name: "booth".to_string(),
            function: booth,
            bounds: vec![(-10.0, 10.0); 2],
            global_minima: vec![(vec![1.0, 3.0], 0.0)],
            scalable: false,
            multimodal: false,
            description: "2D plate-shaped function".to_string(),
        },
        FunctionMetadata {
            name: "rastrigin".to_string(),
            function: rastrigin,
            bounds: vec![(-5.12, 5.12); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
            scalable: true,
            multimodal: true,
            description: "N-dimensional highly multimodal function".to_string(),
        },
        FunctionMetadata {
            name: "ackley".to_string(),
            function: ackley,
            bounds: vec![(-32.768, 32.768); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
            scalable: true,
            multimodal: true,
            description: "N-dimensional multimodal function with a deep central hole".to_string(),
        },
        FunctionMetadata {
            name: "himmelblau".to_string(),
            function: himmelblau,
            bounds: vec![(-5.0, 5.0); 2],
            global_minima: vec![
                (vec![3.0, 2.0], 0.0),
                (vec![-2.805118, 3.131312], 0.0),
                (vec![-3.779310, -3.283186], 0.0),
                (vec![3.584428, -1.848126], 0.0),
            ],
            scalable: false,
            multimodal: true,
            description: "2D multimodal function with 4 global minima".to_string(),
        },
    ];
    entries.into_iter().map(|meta| (meta.name.clone(), meta)).collect()
}

/// Look up a test function by name
pub fn get_function(function_name: &str) -> Option<TestFunction> {
    get_function_metadata().get(function_name).map(|meta| meta.function)
}

/// Get bounds for a specific function at its default dimension
pub fn get_function_bounds(function_name: &str) -> Option<Vec<(f64, f64)>> {
    let metadata = get_function_metadata();
    metadata.get(function_name).map(|meta| meta.bounds.clone())
}

/// Bounds for `function_name` in `dim` dimensions.
///
/// Scalable functions repeat their per-axis bound `dim` times. Fixed-dimension
/// functions ignore `dim` and return their own bounds. Unknown names fall back to
/// `default_bounds` on every axis.
pub fn get_function_bounds_vec(
    function_name: &str,
    dim: usize,
    default_bounds: (f64, f64),
) -> Vec<(f64, f64)> {
    match get_function_metadata().get(function_name) {
        Some(meta) if meta.scalable => vec![meta.bounds[0]; dim],
        Some(meta) => meta.bounds.clone(),
        None => vec![default_bounds; dim],
    }
}
