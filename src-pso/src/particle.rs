use ndarray::Array1;
use rand::Rng;

/// One search agent: where it is, where it is heading, and the best place it has been
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
	pub(crate) position: Array1<f64>,
	pub(crate) velocity: Array1<f64>,
	pub(crate) current_value: Option<f64>,
	pub(crate) best_position: Array1<f64>,
	pub(crate) best_value: f64,
}

impl Particle {
	/// Random particle inside [lower, upper], velocity within +/- the bound width.
	///
	/// Bounds are assumed validated by the caller (same length, lower <= upper).
	pub fn new<R: Rng + ?Sized>(lower: &Array1<f64>, upper: &Array1<f64>, rng: &mut R) -> Self {
		let span = upper - lower;
		let position = Array1::from_shape_fn(lower.len(), |i| {
			lower[i] + rng.random::<f64>() * span[i]
		});
		let velocity = Array1::from_shape_fn(lower.len(), |i| {
			-span[i] + 2.0 * span[i] * rng.random::<f64>()
		});
		Self {
			best_position: position.clone(),
			position,
			velocity,
			current_value: None,
			best_value: f64::NEG_INFINITY,
		}
	}

	pub fn position(&self) -> &Array1<f64> {
		&self.position
	}

	pub fn velocity(&self) -> &Array1<f64> {
		&self.velocity
	}

	/// Fitness of `position` at its last evaluation, `None` before the first one
	pub fn current_value(&self) -> Option<f64> {
		self.current_value
	}

	/// Best position seen; only meaningful once `best_value` is no longer -inf
	pub fn best_position(&self) -> &Array1<f64> {
		&self.best_position
	}

	pub fn best_value(&self) -> f64 {
		self.best_value
	}

	/// Store the fitness of the current position, promoting it to personal best on strict improvement
	pub(crate) fn record(&mut self, value: f64) -> bool {
		self.current_value = Some(value);
		if value > self.best_value {
			self.best_value = value;
			self.best_position.assign(&self.position);
			true
		} else {
			false
		}
	}
}
