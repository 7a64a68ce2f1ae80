//! Recording wrapper around the driver, used by tests and the CLI

use std::path::{Path, PathBuf};

use ndarray::Array1;

use crate::{
    particle_swarm, CallbackAction, OptimizationRecorder, PsoConfig, PsoError, PsoIntermediate,
    PsoReport,
};

/// Run the swarm driver and save one CSV row per generation to `<output_dir>/<function_name>.csv`.
///
/// A callback already present in `config` still runs after the recorder and keeps its
/// ability to stop the run.
pub fn run_recorded_particle_swarm<F, P>(
    function_name: &str,
    func: F,
    bounds: &[(f64, f64)],
    mut config: PsoConfig,
    output_dir: P,
) -> Result<(PsoReport, PathBuf), PsoError>
where
    F: Fn(&Array1<f64>) -> f64,
    P: AsRef<Path>,
{
    let recorder = OptimizationRecorder::new(function_name);
    let mut record = recorder.create_callback();
    let mut user_callback = config.callback.take();
    config.callback = Some(Box::new(move |intermediate: &PsoIntermediate| {
        record(intermediate);
        match user_callback.as_mut() {
            Some(cb) => cb(intermediate),
            None => CallbackAction::Continue,
        }
    }));

    let report = particle_swarm(&func, bounds, config)?;
    let csv_path = recorder.save_to_csv(output_dir)?;
    log::debug!(
        "recorded {} generations of {} to {}",
        recorder.num_iterations(),
        recorder.function_name(),
        csv_path.display()
    );

    Ok((report, csv_path))
}
