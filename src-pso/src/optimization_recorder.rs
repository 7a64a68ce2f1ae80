use std::cell::RefCell;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::{CallbackAction, PsoError, PsoIntermediate};

/// Records optimization progress via driver callbacks
#[derive(Debug, Clone)]
pub struct OptimizationRecorder {
    /// Function name (used for CSV filename)
    function_name: String,
    /// Shared with the callbacks handed to the driver
    records: Rc<RefCell<Vec<OptimizationRecord>>>,
}

/// One completed generation
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRecord {
    /// Generation number, starting at 1
    pub iteration: usize,
    /// Best x found so far
    pub x: Vec<f64>,
    /// Best fitness found so far
    pub best_value: f64,
    /// Evaluations consumed so far
    pub nfev: usize,
    /// Whether this generation raised the best known fitness
    pub is_improvement: bool,
}

impl OptimizationRecorder {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Create a callback function that records optimization progress
    pub fn create_callback(&self) -> Box<dyn FnMut(&PsoIntermediate) -> CallbackAction> {
        let records = self.records.clone();

        Box::new(move |intermediate: &PsoIntermediate| -> CallbackAction {
            let mut records = records.borrow_mut();
            let is_improvement = match records.last() {
                Some(last) => intermediate.fun > last.best_value,
                None => intermediate.fun.is_finite(),
            };
            records.push(OptimizationRecord {
                iteration: intermediate.iter,
                x: intermediate.x.to_vec(),
                best_value: intermediate.fun,
                nfev: intermediate.nfev,
                is_improvement,
            });
            CallbackAction::Continue
        })
    }

    /// Save all recorded generations to `<output_dir>/<function_name>.csv`
    pub fn save_to_csv<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf, PsoError> {
        let output_dir = output_dir.as_ref();
        create_dir_all(output_dir)?;

        let filename = output_dir.join(format!("{}.csv", self.function_name));
        let mut wtr = csv::Writer::from_path(&filename)?;

        let records = self.records.borrow();
        let Some(first) = records.first() else {
            wtr.flush()?;
            return Ok(filename);
        };

        let mut header = vec!["iteration".to_string()];
        header.extend((0..first.x.len()).map(|i| format!("x{}", i)));
        header.extend(["best_value", "nfev", "is_improvement"].map(String::from));
        wtr.write_record(&header)?;

        for record in records.iter() {
            let mut row = vec![record.iteration.to_string()];
            row.extend(record.x.iter().map(|xi| format!("{:.16}", xi)));
            row.push(format!("{:.16}", record.best_value));
            row.push(record.nfev.to_string());
            row.push(record.is_improvement.to_string());
            wtr.write_record(&row)?;
        }
        wtr.flush()?;

        Ok(filename)
    }

    /// Get a copy of all recorded generations
    pub fn records(&self) -> Vec<OptimizationRecord> {
        self.records.borrow().clone()
    }

    pub fn num_iterations(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    /// Best position and fitness of the last recorded generation
    pub fn best_solution(&self) -> Option<(Vec<f64>, f64)> {
        self.records
            .borrow()
            .last()
            .map(|last| (last.x.clone(), last.best_value))
    }
}
