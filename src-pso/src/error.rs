use std::path::PathBuf;

/// Error type for swarm construction, protocol misuse and collaborator I/O
#[derive(Debug, thiserror::Error)]
pub enum PsoError {
	#[error("population_count must be at least 1")]
	EmptyPopulation,

	#[error("search space has no dimension: lower and upper bounds are empty")]
	EmptyBounds,

	#[error("lower/upper size mismatch: lower has {lower} entries, upper has {upper}")]
	BoundsLengthMismatch { lower: usize, upper: usize },

	#[error("bound[{index}] is not a finite interval with lower <= upper (lower={lower}, upper={upper})")]
	InvalidBounds { index: usize, lower: f64, upper: f64 },

	#[error("{name} must be finite, got {value}")]
	NonFiniteParameter { name: &'static str, value: f64 },

	#[error(
		"notify_evaluation called without a pending position; call get_position_to_evaluate first"
	)]
	NoPendingEvaluation,

	#[error("cannot read configuration {path}: {source}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Csv(#[from] csv::Error),
}
