use ndarray::{Array1, Zip};

/// Clamp `x` into the box componentwise; zero-width dimensions collapse onto their bound.
///
/// Bounds must be finite with lower <= upper.
pub(crate) fn clip_inplace(x: &mut Array1<f64>, lower: &Array1<f64>, upper: &Array1<f64>) {
	Zip::from(x).and(lower).and(upper).for_each(|xi, &lo, &hi| {
		*xi = (*xi).clamp(lo, hi);
	});
}
