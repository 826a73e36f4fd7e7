//! Per-iteration progress reporting shared by every kernel.
//!
//! A kernel calls [`IterMonitor::report`] once per iteration with the
//! current iterate and its residual measure. The monitor evaluates the
//! optional objective callback and the relative error against the optional
//! ground truth, and logs everything at `debug!`. Nothing computed here
//! feeds back into a stopping decision.
use log::debug;

use crate::iter::{guard::norm, types::ObjectiveFn};

/// Progress sink for one kernel run.
#[derive(Clone, Copy)]
pub struct IterMonitor<'a> {
    name: &'static str,
    truth: Option<&'a [f64]>,
    obj_eval: Option<ObjectiveFn<'a>>,
}

impl<'a> IterMonitor<'a> {
    pub fn new(
        name: &'static str, truth: Option<&'a [f64]>, obj_eval: Option<ObjectiveFn<'a>>,
    ) -> Self {
        Self { name, truth, obj_eval }
    }

    /// A monitor that only logs residuals.
    pub fn silent(name: &'static str) -> Self {
        Self::new(name, None, None)
    }

    /// Objective value at `x`, if a callback was supplied.
    pub fn objective(&self, x: &[f64]) -> Option<f64> {
        self.obj_eval.map(|f| f(x))
    }

    /// Relative error `‖x − truth‖ / ‖truth‖`, if a truth was supplied.
    ///
    /// A zero truth gives the absolute error instead.
    pub fn truth_error(&self, x: &[f64]) -> Option<f64> {
        let truth = self.truth?;
        assert_eq!(truth.len(), x.len(), "truth length does not match image length");
        let diff: Vec<f64> = x.iter().zip(truth).map(|(a, b)| a - b).collect();
        let scale = norm(truth);
        let err = norm(&diff);
        Some(if scale > 0.0 { err / scale } else { err })
    }

    /// Log progress of iteration `iter`.
    pub fn report(&self, iter: usize, x: &[f64], residual: f64) {
        let obj = self.objective(x);
        let err = self.truth_error(x);
        match (obj, err) {
            (Some(obj), Some(err)) => debug!(
                "{} #It {iter:03}: residual {residual:e}, objective {obj:e}, error {err:e}",
                self.name
            ),
            (Some(obj), None) => {
                debug!("{} #It {iter:03}: residual {residual:e}, objective {obj:e}", self.name)
            }
            (None, Some(err)) => {
                debug!("{} #It {iter:03}: residual {residual:e}, error {err:e}", self.name)
            }
            (None, None) => debug!("{} #It {iter:03}: residual {residual:e}", self.name),
        }
    }
}

impl std::fmt::Debug for IterMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterMonitor")
            .field("name", &self.name)
            .field("has_truth", &self.truth.is_some())
            .field("has_objective", &self.obj_eval.is_some())
            .finish()
    }
}
