use crate::TrackerError;
use crate::metric::ScalarReport;
use crate::visual::Visual;

/// Handle to an experiment tracking backend.
///
/// One client owns one tracking session: scalars and visuals are reported
/// step by step, then [finish](TrackerClient::finish) releases the session.
/// Calls block until the backend accepted the data or failed.
pub trait TrackerClient: Send {
    /// Report scalar metrics for one step.
    fn log_scalars(&mut self, scalars: &ScalarReport, step: usize) -> Result<(), TrackerError>;

    /// Report a visualization for one step.
    fn log_visual(&mut self, visual: &Visual, step: usize) -> Result<(), TrackerError>;

    /// Release the tracking session.
    fn finish(&mut self) -> Result<(), TrackerError>;
}
