use super::Visual;
use crate::TrackerError;

/// Test-time settings a model consumes when rendering visualizations.
#[derive(Debug, Clone, PartialEq)]
pub struct TestConfig {
    /// Minimum score for a prediction to be drawn.
    pub score_threshold: f64,

    /// Maximum number of predictions drawn per image.
    pub max_detections: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.3,
            max_detections: 100,
        }
    }
}

/// Optional model capability rendering diagnostic images for a batch.
pub trait VisualizationProvider: Send {
    /// The input batch type rendered by this provider.
    type Batch;

    /// Render diagnostic images for the given batch.
    fn visualize(
        &self,
        batch: &Self::Batch,
        classes: &[String],
        config: &TestConfig,
    ) -> Result<Vec<Visual>, TrackerError>;
}

/// Runner-visible model abstraction.
///
/// The visualization capability is optional; models without one are never
/// asked for images.
pub trait TrackedModel: Send {
    /// Input batch type the model is fed.
    type Batch;

    /// The model's visualization capability, when it has one.
    fn visualization(&self) -> Option<&dyn VisualizationProvider<Batch = Self::Batch>>;

    /// The last input batch seen by the model, when any.
    fn last_batch(&self) -> Option<&Self::Batch>;

    /// Class labels the model predicts.
    fn class_names(&self) -> &[String];

    /// Test-time settings consumed when rendering visualizations.
    fn test_config(&self) -> &TestConfig;
}
