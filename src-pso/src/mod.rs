//! Particle Swarm Optimization (PSO) in pure Rust using ndarray
//!
//! The optimizer is a passive state machine: it hands out one position at a
//! time and waits for the caller to report its fitness. How, when and where the
//! objective is evaluated stays with the caller.
//!
//! Supported features:
//! - Box bounds, uniform random initialization of positions and velocities
//! - Classic global-best update rule with inertia, cognitive and social weights
//! - Optional clamping of positions to the bounds
//! - Injectable random generator for deterministic replay
//! - Hyperparameters from a builder or a JSON file
//! - A SciPy-like convenience driver with per-generation callback and CSV recording
//!
//! Fitness is *maximized*; negate a cost before reporting it.

use std::fmt;

use ndarray::{Array1, Array2};

pub mod clip_inplace;
pub mod error;
pub mod optimization_recorder;
pub mod params;
pub mod particle;
pub mod particle_swarm;
pub mod run_recorded;
pub mod swarm;

pub use error::PsoError;
pub use optimization_recorder::{OptimizationRecord, OptimizationRecorder};
pub use params::{BoundPolicy, PsoParams, PsoParamsBuilder};
pub use particle::Particle;
pub use particle_swarm::particle_swarm;
pub use run_recorded::run_recorded_particle_swarm;
pub use swarm::{ParticleSwarm, validate_bounds};


/// Configuration of the convenience driver [`particle_swarm`]
pub struct PsoConfig {
	/// Swarm hyperparameters
	pub params: PsoParams,
	/// Number of generations to run
	pub maxiter: usize,
	pub seed: Option<u64>,
	/// Log the best value after each generation at info level
	pub disp: bool,
	/// Optional per-generation callback (may stop early)
	pub callback: Option<Box<dyn FnMut(&PsoIntermediate) -> CallbackAction>>,
}

impl Default for PsoConfig {
	fn default() -> Self {
		Self { params: PsoParams::default(), maxiter: 1000, seed: None, disp: false, callback: None }
	}
}

/// Fluent builder for `PsoConfig`
pub struct PsoConfigBuilder {
	cfg: PsoConfig,
}

impl Default for PsoConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl PsoConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: PsoConfig::default() }
	}
	pub fn params(mut self, v: PsoParams) -> Self {
		self.cfg.params = v;
		self
	}
	pub fn popsize(mut self, v: usize) -> Self {
		self.cfg.params.population_count = v;
		self
	}
	pub fn inertia_weight(mut self, v: f64) -> Self {
		self.cfg.params.inertia_weight = v;
		self
	}
	pub fn cognitive_parameter(mut self, v: f64) -> Self {
		self.cfg.params.cognitive_parameter = v;
		self
	}
	pub fn social_parameter(mut self, v: f64) -> Self {
		self.cfg.params.social_parameter = v;
		self
	}
	pub fn bound_policy(mut self, v: BoundPolicy) -> Self {
		self.cfg.params.bound_policy = v;
		self
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn disp(mut self, v: bool) -> Self {
		self.cfg.disp = v;
		self
	}
	pub fn callback(mut self, cb: Box<dyn FnMut(&PsoIntermediate) -> CallbackAction>) -> Self {
		self.cfg.callback = Some(cb);
		self
	}
	pub fn build(self) -> PsoConfig {
		self.cfg
	}
}

/// Result/Report of a PSO run
#[derive(Clone)]
pub struct PsoReport {
	/// Best position found
	pub x: Array1<f64>,
	/// Fitness at `x` (maximized)
	pub fun: f64,
	pub success: bool,
	pub message: String,
	/// Completed generations
	pub nit: usize,
	/// Objective evaluations
	pub nfev: usize,
	/// Final particle positions, one row per particle
	pub population: Array2<f64>,
	/// Last evaluated fitness of each particle
	pub population_values: Array1<f64>,
}

impl fmt::Debug for PsoReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PsoReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("success", &self.success)
			.field("message", &self.message)
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.field(
				"population",
				&format!("{}x{}", self.population.nrows(), self.population.ncols()),
			)
			.field("population_values", &format!("len={}", self.population_values.len()))
			.finish()
	}
}

/// Information passed to the callback after each generation
pub struct PsoIntermediate {
	pub x: Array1<f64>,
	pub fun: f64,
	pub iter: usize,
	pub nfev: usize,
}

/// Action returned by callback
pub enum CallbackAction {
	Continue,
	Stop,
}
