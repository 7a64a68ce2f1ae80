//! Minimize a named benchmark function with the particle swarm
//!
//! The swarm maximizes fitness, so the objective handed to it is `-f(x)`.
//!
//! ```text
//! run_pswarm --function rosenbrock --dim 4 --maxiter 500 --seed 7
//! run_pswarm --function ackley --config pso.json --record --output-dir data_generated/records
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use ndarray::Array1;
use pswarm_pso::{
    BoundPolicy, PsoConfigBuilder, PsoParams, particle_swarm, run_recorded_particle_swarm,
};
use pswarm_testfunctions::{get_function, get_function_bounds_vec, get_function_metadata};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Particle swarm optimization on benchmark functions")]
struct Args {
    /// Benchmark function to minimize
    #[arg(long, default_value = "sphere")]
    function: String,

    /// Number of dimensions (ignored by fixed-dimension functions)
    #[arg(long, default_value_t = 2)]
    dim: usize,

    /// Number of generations
    #[arg(long, default_value_t = 200)]
    maxiter: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with swarm hyperparameters; command line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    popsize: Option<usize>,

    #[arg(long)]
    inertia_weight: Option<f64>,

    #[arg(long)]
    cognitive_parameter: Option<f64>,

    #[arg(long)]
    social_parameter: Option<f64>,

    /// Clamp particles to the bounds after each move
    #[arg(long, default_value_t = false)]
    clamp: bool,

    /// Write one CSV row per generation
    #[arg(long, default_value_t = false)]
    record: bool,

    #[arg(long, env = "PSWARM_RECORDS_DIR", default_value = "data_generated/records")]
    output_dir: PathBuf,

    /// List the available functions and exit
    #[arg(long, default_value_t = false)]
    list: bool,
}

fn load_params(args: &Args) -> Result<PsoParams, Box<dyn Error>> {
    let mut params = match &args.config {
        Some(path) => PsoParams::from_json_file(path)?,
        None => PsoParams::default(),
    };
    if let Some(v) = args.popsize {
        params.population_count = v;
    }
    if let Some(v) = args.inertia_weight {
        params.inertia_weight = v;
    }
    if let Some(v) = args.cognitive_parameter {
        params.cognitive_parameter = v;
    }
    if let Some(v) = args.social_parameter {
        params.social_parameter = v;
    }
    if args.clamp {
        params.bound_policy = BoundPolicy::Clamp;
    }
    params.validate()?;
    Ok(params)
}

/// Search box for `function`; fixed-dimension functions keep their own size whatever `dim` says
fn search_bounds(function: &str, dim: usize) -> Vec<(f64, f64)> {
    let bounds = get_function_bounds_vec(function, dim, (-5.0, 5.0));
    if bounds.len() != dim {
        log::warn!(
            "{} is defined in {} dimensions only, ignoring --dim {}",
            function,
            bounds.len(),
            dim
        );
    }
    bounds
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list {
        let metadata = get_function_metadata();
        let mut names: Vec<&String> = metadata.keys().collect();
        names.sort();
        for name in names {
            println!("{:<12} {}", name, metadata[name].description);
        }
        return Ok(());
    }

    let Some(func) = get_function(&args.function) else {
        return Err(format!("unknown function: {} (see --list)", args.function).into());
    };
    let bounds = search_bounds(&args.function, args.dim);
    let params = load_params(&args)?;
    log::info!(
        "minimizing {} in {} dimensions with {} particles",
        args.function,
        bounds.len(),
        params.population_count
    );

    let mut builder = PsoConfigBuilder::new().params(params).maxiter(args.maxiter).disp(true);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let config = builder.build();

    let fitness = move |x: &Array1<f64>| -func(x);
    let report = if args.record {
        let (report, csv_path) =
            run_recorded_particle_swarm(&args.function, fitness, &bounds, config, &args.output_dir)?;
        log::info!("records saved to {}", csv_path.display());
        report
    } else {
        particle_swarm(&fitness, &bounds, config)?
    };

    println!("{}: {}", args.function, report.message);
    println!("  f(x) = {:.6e} after {} evaluations", -report.fun, report.nfev);
    println!("  x    = {:?}", report.x.to_vec());
    Ok(())
}
