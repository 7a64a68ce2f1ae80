use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{CallbackAction, ParticleSwarm, PsoConfig, PsoError, PsoIntermediate, PsoReport};

/// Convenience driver mirroring SciPy's optimizer API shape, for maximization:
/// - `func`: objective function mapping x -> fitness (higher is better)
/// - `bounds`: vector of (lower, upper) pairs
/// - `config`: swarm hyperparameters, number of generations, seed, callback
///
/// Runs the ask/tell protocol of [`ParticleSwarm`] for `config.maxiter` generations,
/// evaluating one position at a time.
pub fn particle_swarm<F>(
	func: &F,
	bounds: &[(f64, f64)],
	mut config: PsoConfig,
) -> Result<PsoReport, PsoError>
where
	F: Fn(&Array1<f64>) -> f64,
{
	let rng: StdRng = match config.seed {
		Some(s) => StdRng::seed_from_u64(s),
		None => {
			let mut thread_rng = rand::rng();
			StdRng::from_rng(&mut thread_rng)
		}
	};
	let mut swarm = ParticleSwarm::from_bounds(config.params.clone(), bounds, rng)?;
	let npop = swarm.particles().len();

	if config.disp {
		log::info!(
			"PSO Init: {} dimensions, population={}, maxiter={}",
			swarm.dimension(),
			npop,
			config.maxiter
		);
		log::info!(
			"  w={:.4}, c_p={:.4}, c_g={:.4}, bound_policy: {:?}",
			config.params.inertia_weight,
			config.params.cognitive_parameter,
			config.params.social_parameter,
			config.params.bound_policy
		);
	}

	let mut stopped = false;
	let mut nit = 0;
	for iter in 1..=config.maxiter {
		for _ in 0..npop {
			let x = swarm.get_position_to_evaluate();
			let fitness = func(&x);
			swarm.notify_evaluation(fitness)?;
		}
		nit = iter;

		if config.disp {
			log::info!(
				"PSO iter {:4}  best_f={:.6e}  nfev={}",
				iter,
				swarm.get_best_value(),
				swarm.nfev()
			);
		}

		if let Some(ref mut cb) = config.callback {
			let intermediate = PsoIntermediate {
				x: swarm.get_best_position().clone(),
				fun: swarm.get_best_value(),
				iter,
				nfev: swarm.nfev(),
			};
			if let CallbackAction::Stop = cb(&intermediate) {
				stopped = true;
				break;
			}
		}
	}

	let message = if stopped {
		"Optimization stopped by callback".to_string()
	} else if nit == 0 {
		"No generation was run (maxiter = 0)".to_string()
	} else {
		format!("Maximum iterations reached: {}", config.maxiter)
	};
	let success = swarm.get_best_value().is_finite();
	if config.disp {
		log::info!("PSO finished: {}", message);
	}

	let particles = swarm.particles();
	let population = Array2::from_shape_fn((npop, swarm.dimension()), |(i, j)| {
		particles[i].position()[j]
	});
	let population_values = particles
		.iter()
		.map(|p| p.current_value().unwrap_or(f64::NEG_INFINITY))
		.collect::<Array1<f64>>();

	Ok(PsoReport {
		x: swarm.get_best_position().clone(),
		fun: swarm.get_best_value(),
		success,
		message,
		nit,
		nfev: swarm.nfev(),
		population,
		population_values,
	})
}
