//! The swarm state machine and its pull-based evaluation protocol
//!
//! ```
//! use ndarray::Array1;
//! use pswarm_pso::{ParticleSwarm, PsoParamsBuilder};
//!
//! let params = PsoParamsBuilder::new().population_count(10).build();
//! let lower = Array1::from(vec![-5.0, -5.0]);
//! let upper = Array1::from(vec![5.0, 5.0]);
//! let mut swarm = ParticleSwarm::with_seed(params, lower, upper, 42)?;
//!
//! for _ in 0..10 * 100 {
//!     let x = swarm.get_position_to_evaluate();
//!     // maximize -|x|^2
//!     let fitness = -x.dot(&x);
//!     swarm.notify_evaluation(fitness)?;
//! }
//! assert!(swarm.get_best_value() > -1e-2);
//! # Ok::<(), pswarm_pso::PsoError>(())
//! ```

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clip_inplace::clip_inplace;
use crate::{BoundPolicy, Particle, PsoError, PsoParams};

/// Where the swarm stands in the get/notify alternation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	/// No position handed out since the last report
	Ready,
	/// `particles[cursor]` was handed out and its fitness is expected next
	AwaitingEvaluation,
}

/// Check that `lower`/`upper` describe a non-empty, finite box
pub fn validate_bounds(lower: &Array1<f64>, upper: &Array1<f64>) -> Result<(), PsoError> {
	if lower.len() != upper.len() {
		return Err(PsoError::BoundsLengthMismatch { lower: lower.len(), upper: upper.len() });
	}
	if lower.is_empty() {
		return Err(PsoError::EmptyBounds);
	}
	for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
		if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
			return Err(PsoError::InvalidBounds { index, lower: lo, upper: hi });
		}
	}
	Ok(())
}

/// Particle swarm optimizer driven by the caller.
///
/// The caller asks for a position with [`get_position_to_evaluate`](Self::get_position_to_evaluate),
/// evaluates it however it likes, and reports the fitness (to be maximized) with
/// [`notify_evaluation`](Self::notify_evaluation). Particles are served round-robin; once every
/// particle of a generation has been reported the whole swarm is moved in one synchronous step.
#[derive(Debug, Clone)]
pub struct ParticleSwarm<R: Rng = StdRng> {
	params: PsoParams,
	lower: Array1<f64>,
	upper: Array1<f64>,
	particles: Vec<Particle>,
	global_best: Particle,
	cursor: usize,
	phase: Phase,
	generation: usize,
	nfev: usize,
	rng: R,
}

impl ParticleSwarm<StdRng> {
	/// Swarm with its own `StdRng` seeded from `seed`
	pub fn with_seed(
		params: PsoParams,
		lower: Array1<f64>,
		upper: Array1<f64>,
		seed: u64,
	) -> Result<Self, PsoError> {
		Self::new(params, lower, upper, StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> ParticleSwarm<R> {
	/// Create the swarm: `population_count` random particles plus a random global-best seed.
	pub fn new(
		params: PsoParams,
		lower: Array1<f64>,
		upper: Array1<f64>,
		mut rng: R,
	) -> Result<Self, PsoError> {
		params.validate()?;
		validate_bounds(&lower, &upper)?;

		let particles: Vec<Particle> = (0..params.population_count)
			.map(|_| Particle::new(&lower, &upper, &mut rng))
			.collect();
		let global_best = Particle::new(&lower, &upper, &mut rng);

		log::debug!(
			"PSO init: {} dimensions, population={}, w={:.4}, c_p={:.4}, c_g={:.4}, bound_policy={:?}",
			lower.len(),
			params.population_count,
			params.inertia_weight,
			params.cognitive_parameter,
			params.social_parameter,
			params.bound_policy
		);

		Ok(Self {
			params,
			lower,
			upper,
			particles,
			global_best,
			cursor: 0,
			phase: Phase::Ready,
			generation: 0,
			nfev: 0,
			rng,
		})
	}

	/// Same as [`new`](Self::new) with SciPy-style `(lower, upper)` pairs
	pub fn from_bounds(params: PsoParams, bounds: &[(f64, f64)], rng: R) -> Result<Self, PsoError> {
		let lower = bounds.iter().map(|&(lo, _)| lo).collect::<Array1<f64>>();
		let upper = bounds.iter().map(|&(_, hi)| hi).collect::<Array1<f64>>();
		Self::new(params, lower, upper, rng)
	}

	/// Best position found so far. Before the first completed generation this is a random
	/// point carrying no information.
	pub fn get_best_position(&self) -> &Array1<f64> {
		&self.global_best.position
	}

	/// Best fitness found so far, `-inf` until a generation has improved on it
	pub fn get_best_value(&self) -> f64 {
		self.global_best.best_value
	}

	/// Position the caller should evaluate next.
	///
	/// Repeated calls without a report return the same position.
	pub fn get_position_to_evaluate(&mut self) -> Array1<f64> {
		self.phase = Phase::AwaitingEvaluation;
		self.particles[self.cursor].position.clone()
	}

	/// Report the fitness of the position last returned by
	/// [`get_position_to_evaluate`](Self::get_position_to_evaluate).
	///
	/// Completing a generation moves the whole swarm before returning.
	pub fn notify_evaluation(&mut self, value: f64) -> Result<(), PsoError> {
		if self.phase != Phase::AwaitingEvaluation {
			return Err(PsoError::NoPendingEvaluation);
		}
		if !value.is_finite() {
			log::warn!(
				"particle {} of generation {} reported a non-finite fitness: {}",
				self.cursor,
				self.generation,
				value
			);
		}

		let improved = self.particles[self.cursor].record(value);
		log::trace!(
			"gen {} particle {} value={:.6e} personal_best={}",
			self.generation,
			self.cursor,
			value,
			improved
		);

		self.phase = Phase::Ready;
		self.nfev += 1;
		self.cursor += 1;
		if self.cursor == self.particles.len() {
			self.advance_generation();
			self.cursor = 0;
		}
		Ok(())
	}

	fn advance_generation(&mut self) {
		// Strict comparison keeps the lowest index on ties
		for particle in &self.particles {
			if particle.best_value > self.global_best.best_value {
				self.global_best = particle.clone();
			}
		}

		let w = self.params.inertia_weight;
		let c_p = self.params.cognitive_parameter;
		let c_g = self.params.social_parameter;
		for particle in self.particles.iter_mut() {
			let rp: f64 = self.rng.random();
			let rg: f64 = self.rng.random();
			let to_personal = &particle.best_position - &particle.position;
			let to_global = &self.global_best.position - &particle.position;
			particle.velocity =
				w * &particle.velocity + rp * c_p * &to_personal + rg * c_g * &to_global;
			particle.position += &particle.velocity;
			if self.params.bound_policy == BoundPolicy::Clamp {
				clip_inplace(&mut particle.position, &self.lower, &self.upper);
			}
		}

		self.generation += 1;
		log::debug!(
			"PSO generation {:4} best_value={:.6e} nfev={}",
			self.generation,
			self.global_best.best_value,
			self.nfev
		);
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Owned snapshot of the best particle; it does not follow later moves of its origin
	pub fn global_best(&self) -> &Particle {
		&self.global_best
	}

	/// Index of the particle whose evaluation is expected next
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Number of completed generations
	pub fn generation(&self) -> usize {
		self.generation
	}

	/// Number of accepted evaluations
	pub fn nfev(&self) -> usize {
		self.nfev
	}

	pub fn is_awaiting_evaluation(&self) -> bool {
		self.phase == Phase::AwaitingEvaluation
	}

	pub fn params(&self) -> &PsoParams {
		&self.params
	}

	pub fn lower(&self) -> &Array1<f64> {
		&self.lower
	}

	pub fn upper(&self) -> &Array1<f64> {
		&self.upper
	}

	pub fn dimension(&self) -> usize {
		self.lower.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::PsoParamsBuilder;

	fn params(n: usize) -> PsoParams {
		PsoParamsBuilder::new()
			.population_count(n)
			.inertia_weight(0.5)
			.cognitive_parameter(1.0)
			.social_parameter(1.5)
			.build()
	}

	fn unit_box(d: usize) -> (Array1<f64>, Array1<f64>) {
		(Array1::from_elem(d, -1.0), Array1::from_elem(d, 1.0))
	}

	fn one_generation<R: Rng>(swarm: &mut ParticleSwarm<R>, f: impl Fn(&Array1<f64>) -> f64) {
		for _ in 0..swarm.particles().len() {
			let x = swarm.get_position_to_evaluate();
			swarm.notify_evaluation(f(&x)).unwrap();
		}
	}

	#[test]
	fn test_construction_within_bounds() {
		let lower = Array1::from(vec![-3.0, 0.0, 50.0]);
		let upper = Array1::from(vec![3.0, 0.5, 60.0]);
		let swarm = ParticleSwarm::with_seed(params(64), lower.clone(), upper.clone(), 5).unwrap();
		assert_eq!(swarm.particles().len(), 64);
		assert_eq!(swarm.dimension(), 3);
		for p in swarm.particles() {
			for i in 0..3 {
				let span = upper[i] - lower[i];
				assert!(p.position()[i] >= lower[i] && p.position()[i] <= upper[i]);
				assert!(p.velocity()[i] >= -span && p.velocity()[i] <= span);
			}
		}
		assert_eq!(swarm.get_best_value(), f64::NEG_INFINITY);
		assert_eq!(swarm.cursor(), 0);
		assert!(!swarm.is_awaiting_evaluation());
	}

	#[test]
	fn test_invalid_configurations() {
		let (lo, hi) = unit_box(2);
		assert!(matches!(
			ParticleSwarm::with_seed(params(0), lo.clone(), hi.clone(), 0),
			Err(PsoError::EmptyPopulation)
		));
		assert!(matches!(
			ParticleSwarm::with_seed(params(2), lo.clone(), Array1::from_elem(3, 1.0), 0),
			Err(PsoError::BoundsLengthMismatch { lower: 2, upper: 3 })
		));
		assert!(matches!(
			ParticleSwarm::with_seed(params(2), Array1::zeros(0), Array1::zeros(0), 0),
			Err(PsoError::EmptyBounds)
		));
		assert!(matches!(
			ParticleSwarm::with_seed(params(2), Array1::from(vec![0.0, 2.0]), hi.clone(), 0),
			Err(PsoError::InvalidBounds { index: 1, .. })
		));
		assert!(matches!(
			ParticleSwarm::with_seed(params(2), Array1::from(vec![f64::NAN, 0.0]), hi.clone(), 0),
			Err(PsoError::InvalidBounds { index: 0, .. })
		));
		assert!(matches!(
			ParticleSwarm::with_seed(params(2), lo, Array1::from(vec![1.0, f64::INFINITY]), 0),
			Err(PsoError::InvalidBounds { index: 1, .. })
		));
	}

	#[test]
	fn test_get_position_is_idempotent() {
		let (lo, hi) = unit_box(4);
		let mut swarm = ParticleSwarm::with_seed(params(3), lo, hi, 11).unwrap();
		let a = swarm.get_position_to_evaluate();
		let b = swarm.get_position_to_evaluate();
		assert_eq!(a, b);
		assert_eq!(swarm.cursor(), 0);
		assert_eq!(swarm.nfev(), 0);
	}

	#[test]
	fn test_notify_without_pending_is_rejected() {
		let (lo, hi) = unit_box(2);
		let mut swarm = ParticleSwarm::with_seed(params(3), lo, hi, 11).unwrap();
		assert!(matches!(swarm.notify_evaluation(1.0), Err(PsoError::NoPendingEvaluation)));

		swarm.get_position_to_evaluate();
		swarm.notify_evaluation(1.0).unwrap();
		// second report for the same position
		assert!(matches!(swarm.notify_evaluation(2.0), Err(PsoError::NoPendingEvaluation)));
		assert_eq!(swarm.cursor(), 1);
		assert_eq!(swarm.nfev(), 1);
		assert_eq!(swarm.particles()[0].current_value(), Some(1.0));
		assert!(swarm.particles()[1].current_value().is_none());
	}

	#[test]
	fn test_cursor_wraps_after_population_count() {
		let (lo, hi) = unit_box(2);
		let n = 5;
		let mut swarm = ParticleSwarm::with_seed(params(n), lo, hi, 2).unwrap();
		for k in 0..n {
			assert_eq!(swarm.cursor(), k);
			assert_eq!(swarm.generation(), 0);
			swarm.get_position_to_evaluate();
			swarm.notify_evaluation(k as f64).unwrap();
		}
		assert_eq!(swarm.cursor(), 0);
		assert_eq!(swarm.generation(), 1);
		assert_eq!(swarm.nfev(), n);
	}

	#[test]
	fn test_positions_only_move_on_generation_advance() {
		let (lo, hi) = unit_box(2);
		let mut swarm = ParticleSwarm::with_seed(params(3), lo, hi, 8).unwrap();
		let before: Vec<Array1<f64>> = swarm.particles().iter().map(|p| p.position().clone()).collect();
		swarm.get_position_to_evaluate();
		swarm.notify_evaluation(0.0).unwrap();
		swarm.get_position_to_evaluate();
		swarm.notify_evaluation(0.0).unwrap();
		let mid: Vec<Array1<f64>> = swarm.particles().iter().map(|p| p.position().clone()).collect();
		assert_eq!(before, mid);
	}

	#[test]
	fn test_single_particle_single_generation() {
		let (lo, hi) = unit_box(3);
		let mut swarm = ParticleSwarm::with_seed(params(1), lo, hi, 21).unwrap();
		let x0 = swarm.get_position_to_evaluate();
		swarm.notify_evaluation(5.0).unwrap();
		assert_eq!(swarm.generation(), 1);
		assert_eq!(swarm.get_best_value(), 5.0);
		assert_eq!(swarm.get_best_position(), &x0);
	}

	#[test]
	fn test_global_best_is_a_snapshot() {
		let (lo, hi) = unit_box(2);
		let mut swarm = ParticleSwarm::with_seed(params(2), lo, hi, 4).unwrap();
		let _x0 = swarm.get_position_to_evaluate();
		swarm.notify_evaluation(3.0).unwrap();
		let x1 = swarm.get_position_to_evaluate();
		swarm.notify_evaluation(7.0).unwrap();

		assert_eq!(swarm.get_best_value(), 7.0);
		assert_eq!(swarm.get_best_position(), &x1);
		// the second particle has moved on, the snapshot has not
		assert_ne!(swarm.particles()[1].position(), &x1);

		one_generation(&mut swarm, |_| 1.0);
		assert_eq!(swarm.get_best_value(), 7.0);
		assert_eq!(swarm.get_best_position(), &x1);
	}

	#[test]
	fn test_ties_keep_lowest_index() {
		let (lo, hi) = unit_box(2);
		let mut swarm = ParticleSwarm::with_seed(params(3), lo, hi, 9).unwrap();
		let _ = swarm.get_position_to_evaluate();
		swarm.notify_evaluation(1.0).unwrap();
		let x1 = swarm.get_position_to_evaluate();
		swarm.notify_evaluation(4.0).unwrap();
		let _ = swarm.get_position_to_evaluate();
		swarm.notify_evaluation(4.0).unwrap();
		assert_eq!(swarm.get_best_position(), &x1);
	}

	#[test]
	fn test_degenerate_point_bounds() {
		let lower = Array1::from(vec![0.0]);
		let upper = Array1::from(vec![0.0]);
		let mut swarm = ParticleSwarm::with_seed(params(1), lower, upper, 99).unwrap();
		for k in 0..25 {
			let x = swarm.get_position_to_evaluate();
			assert_eq!(x.to_vec(), vec![0.0]);
			swarm.notify_evaluation(-(k as f64)).unwrap();
		}
		assert_eq!(swarm.particles()[0].velocity().to_vec(), vec![0.0]);
		assert_eq!(swarm.get_best_value(), 0.0);
	}

	#[test]
	fn test_best_values_monotone() {
		let (lo, hi) = unit_box(3);
		let mut swarm = ParticleSwarm::with_seed(params(6), lo, hi, 17).unwrap();
		let mut last_global = swarm.get_best_value();
		let mut last_personal: Vec<f64> = swarm.particles().iter().map(|p| p.best_value()).collect();
		for step in 0..6 * 40 {
			let x = swarm.get_position_to_evaluate();
			// noisy objective so that personal bests are challenged
			let f = -x.dot(&x) + if step % 3 == 0 { -10.0 } else { 0.0 };
			swarm.notify_evaluation(f).unwrap();
			assert!(swarm.get_best_value() >= last_global);
			last_global = swarm.get_best_value();
			for (p, last) in swarm.particles().iter().zip(last_personal.iter_mut()) {
				assert!(p.best_value() >= *last);
				*last = p.best_value();
			}
		}
	}

	#[test]
	fn test_same_seed_same_trajectory() {
		let run = |seed: u64| {
			let (lo, hi) = unit_box(3);
			let mut swarm = ParticleSwarm::with_seed(params(4), lo, hi, seed).unwrap();
			let mut seen = Vec::new();
			for _ in 0..4 * 15 {
				let x = swarm.get_position_to_evaluate();
				let f = -(x[0] - 0.3).powi(2) - x[1].abs() - x[2] * x[2];
				seen.push(x);
				swarm.notify_evaluation(f).unwrap();
			}
			(seen, swarm.get_best_position().clone(), swarm.get_best_value())
		};
		let a = run(1234);
		let b = run(1234);
		assert_eq!(a, b);
		let c = run(4321);
		assert_ne!(a.0, c.0);
	}

	#[test]
	fn test_injected_rng() {
		let (lo, hi) = unit_box(2);
		let a = ParticleSwarm::new(params(3), lo.clone(), hi.clone(), StdRng::seed_from_u64(77)).unwrap();
		let b = ParticleSwarm::with_seed(params(3), lo, hi, 77).unwrap();
		assert_eq!(a.particles(), b.particles());
	}

	#[test]
	fn test_from_bounds_pairs() {
		let swarm = ParticleSwarm::from_bounds(
			params(2),
			&[(-1.0, 1.0), (10.0, 20.0)],
			StdRng::seed_from_u64(0),
		)
		.unwrap();
		assert_eq!(swarm.lower().to_vec(), vec![-1.0, 10.0]);
		assert_eq!(swarm.upper().to_vec(), vec![1.0, 20.0]);
	}

	#[test]
	fn test_unbounded_policy_can_leave_box() {
		// a strong pull toward a far corner with no clamping takes particles out of the box
		let p = PsoParamsBuilder::new()
			.population_count(8)
			.inertia_weight(1.0)
			.cognitive_parameter(0.0)
			.social_parameter(4.0)
			.build();
		let (lo, hi) = unit_box(2);
		let mut swarm = ParticleSwarm::with_seed(p, lo, hi, 3).unwrap();
		let mut left_box = false;
		for _ in 0..20 {
			one_generation(&mut swarm, |x| x[0] + x[1]);
			left_box |= swarm
				.particles()
				.iter()
				.any(|p| p.position().iter().any(|v| v.abs() > 1.0));
		}
		assert!(left_box);
	}

	#[test]
	fn test_clamp_policy_stays_in_box() {
		let p = PsoParamsBuilder::new()
			.population_count(8)
			.inertia_weight(1.0)
			.cognitive_parameter(0.0)
			.social_parameter(4.0)
			.bound_policy(BoundPolicy::Clamp)
			.build();
		let lower = Array1::from(vec![-1.0, 2.0]);
		let upper = Array1::from(vec![1.0, 2.0]);
		let mut swarm = ParticleSwarm::with_seed(p, lower, upper, 3).unwrap();
		for _ in 0..20 {
			one_generation(&mut swarm, |x| x[0] + x[1]);
			for particle in swarm.particles() {
				let x = particle.position();
				assert!(x[0] >= -1.0 && x[0] <= 1.0);
				assert_eq!(x[1], 2.0);
			}
		}
	}
}
