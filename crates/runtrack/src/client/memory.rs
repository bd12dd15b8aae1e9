use super::TrackerClient;
use crate::TrackerError;
use crate::metric::ScalarReport;
use crate::visual::Visual;

/// In memory client, useful when testing and debugging.
#[derive(Default)]
pub struct InMemoryTrackerClient {
    scalars: Vec<(ScalarReport, usize)>,
    visuals: Vec<(Visual, usize)>,
    finished: usize,
}

impl InMemoryTrackerClient {
    /// Create a new in-memory client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar reports received so far, with their steps.
    pub fn scalars(&self) -> &[(ScalarReport, usize)] {
        &self.scalars
    }

    /// Visuals received so far, with their steps.
    pub fn visuals(&self) -> &[(Visual, usize)] {
        &self.visuals
    }

    /// Number of times the session was finished.
    pub fn finished(&self) -> usize {
        self.finished
    }
}

impl TrackerClient for InMemoryTrackerClient {
    fn log_scalars(&mut self, scalars: &ScalarReport, step: usize) -> Result<(), TrackerError> {
        self.scalars.push((scalars.clone(), step));
        Ok(())
    }

    fn log_visual(&mut self, visual: &Visual, step: usize) -> Result<(), TrackerError> {
        self.visuals.push((visual.clone(), step));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TrackerError> {
        self.finished += 1;
        Ok(())
    }
}
