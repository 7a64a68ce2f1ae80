//! Swarm hyperparameters and their JSON configuration form

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::PsoError;

/// What happens to a particle whose update leaves the `[lower, upper]` box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundPolicy {
	/// Positions and velocities may leave the box; the caller evaluates whatever it gets
	#[default]
	Unbounded,
	/// Positions are clamped back to the box after every update (velocities untouched)
	Clamp,
}

/// Hyperparameters of the swarm
///
/// ```
/// use pswarm_pso::{BoundPolicy, PsoParams};
///
/// let params = PsoParams::from_json_str(
///     r#"{"population_count": 12, "inertia_weight": 0.5,
///         "cognitive_parameter": 1.0, "social_parameter": 2.0}"#,
/// )?;
/// assert_eq!(params.population_count, 12);
/// assert_eq!(params.bound_policy, BoundPolicy::Unbounded);
/// # Ok::<(), pswarm_pso::PsoError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsoParams {
	/// Number of particles, fixed for the lifetime of the swarm
	pub population_count: usize,
	/// Weight of the previous velocity in the next one
	pub inertia_weight: f64,
	/// Attraction toward the particle's own best position
	pub cognitive_parameter: f64,
	/// Attraction toward the swarm's best position
	pub social_parameter: f64,
	#[serde(default)]
	pub bound_policy: BoundPolicy,
}

impl Default for PsoParams {
	fn default() -> Self {
		// Clerc-Kennedy constriction coefficients
		Self {
			population_count: 30,
			inertia_weight: 0.7298,
			cognitive_parameter: 1.49618,
			social_parameter: 1.49618,
			bound_policy: BoundPolicy::Unbounded,
		}
	}
}

impl PsoParams {
	/// Parse hyperparameters from a JSON document
	pub fn from_json_str(s: &str) -> Result<Self, PsoError> {
		let params: PsoParams = serde_json::from_str(s)?;
		params.validate()?;
		Ok(params)
	}

	/// Load hyperparameters from a JSON file
	pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PsoError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)
			.map_err(|source| PsoError::ConfigRead { path: path.to_path_buf(), source })?;
		Self::from_json_str(&content)
	}

	/// Reject a zero population and non-finite coefficients
	pub fn validate(&self) -> Result<(), PsoError> {
		if self.population_count == 0 {
			return Err(PsoError::EmptyPopulation);
		}
		for (name, value) in [
			("inertia_weight", self.inertia_weight),
			("cognitive_parameter", self.cognitive_parameter),
			("social_parameter", self.social_parameter),
		] {
			if !value.is_finite() {
				return Err(PsoError::NonFiniteParameter { name, value });
			}
		}
		Ok(())
	}
}

/// Fluent builder for `PsoParams`
#[derive(Debug, Clone, Default)]
pub struct PsoParamsBuilder {
	params: PsoParams,
}

impl PsoParamsBuilder {
	pub fn new() -> Self {
		Self { params: PsoParams::default() }
	}
	pub fn population_count(mut self, v: usize) -> Self {
		self.params.population_count = v;
		self
	}
	pub fn inertia_weight(mut self, v: f64) -> Self {
		self.params.inertia_weight = v;
		self
	}
	pub fn cognitive_parameter(mut self, v: f64) -> Self {
		self.params.cognitive_parameter = v;
		self
	}
	pub fn social_parameter(mut self, v: f64) -> Self {
		self.params.social_parameter = v;
		self
	}
	pub fn bound_policy(mut self, v: BoundPolicy) -> Self {
		self.params.bound_policy = v;
		self
	}
	pub fn build(self) -> PsoParams {
		self.params
	}
}
