use super::{LoggerHook, RunContext};
use crate::TrackerError;
use crate::client::TrackerClient;
use crate::logger::ApplicationLoggerInstaller;
use crate::metric::{LEARNING_RATE_KEY, MOMENTUM_KEY, RUNTIME_KEYS, ScalarReport, report_tag};
use crate::visual::TrackedModel;

/// The rank performing external I/O in a distributed run.
pub const MASTER_RANK: usize = 0;

/// Configuration to create a [metrics reporter](MetricsReporter).
pub struct MetricsReporterConfig {
    interval: usize,
    ignore_last: bool,
    reset_buffer: bool,
    image_interval: usize,
    rank: usize,
    application_logger: Option<Box<dyn ApplicationLoggerInstaller>>,
}

impl Default for MetricsReporterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporterConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            interval: 10,
            ignore_last: true,
            reset_buffer: true,
            image_interval: 1,
            rank: MASTER_RANK,
            application_logger: None,
        }
    }

    /// Base logging interval, in runner iterations.
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval;
        self
    }

    /// Whether the runner should skip the final incomplete interval.
    pub fn with_ignore_last(mut self, ignore_last: bool) -> Self {
        self.ignore_last = ignore_last;
        self
    }

    /// Whether the runner should reset its buffer after each report.
    pub fn with_reset_buffer(mut self, reset_buffer: bool) -> Self {
        self.reset_buffer = reset_buffer;
        self
    }

    /// Image-reporting interval, as a multiple of base-interval invocations.
    ///
    /// With a base interval of 10, an image interval of 1 sends images every
    /// 10 runner iterations, while an image interval of 10 sends them every
    /// 100 runner iterations.
    pub fn with_image_interval(mut self, image_interval: usize) -> Self {
        self.image_interval = image_interval;
        self
    }

    /// Rank of the calling process; only [MASTER_RANK] performs I/O.
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    /// Install an application logger when the reporter is created.
    pub fn with_application_logger(
        mut self,
        logger: Option<Box<dyn ApplicationLoggerInstaller>>,
    ) -> Self {
        self.application_logger = logger;
        self
    }

    /// Create the reporter owning the given client.
    pub fn init<C: TrackerClient>(self, client: C) -> MetricsReporter<C> {
        if let Some(logger) = &self.application_logger {
            if let Err(err) = logger.install() {
                log::warn!("Failed to install the experiment logger: {err}");
            }
        }

        MetricsReporter {
            client,
            interval: self.interval,
            ignore_last: self.ignore_last,
            reset_buffer: self.reset_buffer,
            image_interval: self.image_interval,
            rank: self.rank,
            calls: 0,
        }
    }
}

/// Hook reporting scalar metrics and visualization images to a tracking
/// backend.
///
/// Scalars are forwarded at every logging point. Visualizations follow the
/// coarser image cadence, and only when the model exposes a
/// [visualization provider](crate::visual::VisualizationProvider).
pub struct MetricsReporter<C: TrackerClient> {
    client: C,
    interval: usize,
    ignore_last: bool,
    reset_buffer: bool,
    image_interval: usize,
    rank: usize,
    calls: usize,
}

impl<C: TrackerClient> MetricsReporter<C> {
    /// Base logging interval the runner should flush its buffer at.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Whether the runner should skip the final incomplete interval.
    pub fn ignore_last(&self) -> bool {
        self.ignore_last
    }

    /// Whether the runner should reset its buffer after each report.
    pub fn reset_buffer(&self) -> bool {
        self.reset_buffer
    }

    /// Number of completed logging calls on this process.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// The underlying tracker client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn is_master(&self) -> bool {
        self.rank == MASTER_RANK
    }
}

impl<C, M> LoggerHook<M> for MetricsReporter<C>
where
    C: TrackerClient,
    M: TrackedModel,
{
    fn on_log(&mut self, ctx: &RunContext<'_, M>) -> Result<(), TrackerError> {
        if !self.is_master() {
            return Ok(());
        }

        let mut scalars = ScalarReport::new();

        for (name, value) in ctx.snapshot.iter() {
            if RUNTIME_KEYS.contains(&name) {
                continue;
            }
            if let Some(value) = value.as_numeric() {
                scalars.insert(report_tag(name, ctx.split), value);
            }
        }

        let lr = ctx
            .current_lr()
            .first()
            .copied()
            .ok_or(TrackerError::EmptyLearningRate)?;
        let momentum = ctx
            .current_momentum()
            .first()
            .copied()
            .ok_or(TrackerError::EmptyMomentum)?;
        scalars.insert(LEARNING_RATE_KEY.to_string(), lr);
        scalars.insert(MOMENTUM_KEY.to_string(), momentum);

        if !scalars.is_empty() {
            self.client.log_scalars(&scalars, ctx.iteration)?;
        }

        if let Some(provider) = ctx.model.visualization() {
            if self.calls % self.image_interval == 0 {
                let batch = ctx.model.last_batch().ok_or(TrackerError::MissingBatch)?;
                let visuals =
                    provider.visualize(batch, ctx.model.class_names(), ctx.model.test_config())?;

                for visual in visuals {
                    self.client.log_visual(&visual, ctx.iteration)?;
                }
            }
        }

        // Counts every completed call, logged or not; the image cadence is
        // tied to logging calls, not to runner iterations.
        self.calls += 1;

        Ok(())
    }

    fn on_run_end(&mut self, _ctx: &RunContext<'_, M>) -> Result<(), TrackerError> {
        if !self.is_master() {
            return Ok(());
        }

        self.client.finish()
    }
}
