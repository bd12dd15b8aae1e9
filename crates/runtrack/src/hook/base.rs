use crate::TrackerError;
use crate::metric::{Snapshot, Split};
use crate::visual::TrackedModel;

/// The base trait for training-loop logger hooks.
///
/// The runner invokes hooks synchronously at its logging points and once when
/// the run completes, never concurrently. Errors are not handled here: they
/// propagate to the runner's own failure handling, so a training step whose
/// reporting failed is a failed step.
pub trait LoggerHook<M: TrackedModel>: Send {
    /// Called at each logging point.
    fn on_log(&mut self, ctx: &RunContext<'_, M>) -> Result<(), TrackerError>;

    /// Called once when the run completes.
    fn on_run_end(&mut self, ctx: &RunContext<'_, M>) -> Result<(), TrackerError>;
}

/// The runner-side view handed to a [logger hook](LoggerHook).
#[derive(new)]
pub struct RunContext<'a, M> {
    /// The current metrics snapshot.
    pub snapshot: &'a Snapshot,

    /// The split the logging point belongs to.
    pub split: Split,

    /// The current iteration.
    pub iteration: usize,

    learning_rates: &'a [f64],
    momentums: &'a [f64],

    /// The model driven by the runner.
    pub model: &'a M,
}

impl<'a, M> RunContext<'a, M> {
    /// The current learning rates, one per parameter group, in optimizer
    /// order.
    pub fn current_lr(&self) -> &[f64] {
        self.learning_rates
    }

    /// The current momentums, one per parameter group, in optimizer order.
    pub fn current_momentum(&self) -> &[f64] {
        self.momentums
    }
}
