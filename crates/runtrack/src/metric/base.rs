use std::collections::HashMap;

/// Snapshot keys recorded by the runner for its own timing bookkeeping.
///
/// These never reach the tracking backend.
pub const RUNTIME_KEYS: [&str; 2] = ["time", "data_time"];

/// Key under which the current learning rate is always reported.
pub const LEARNING_RATE_KEY: &str = "learning_rate";

/// Key under which the current momentum is always reported.
pub const MOMENTUM_KEY: &str = "momentum";

/// A rolling-window aggregate from the runner's log buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Numeric aggregate.
    Numeric(f64),
    /// Non-numeric aggregate, e.g. a formatted status string.
    Text(String),
}

impl MetricValue {
    /// Returns the value when the aggregate is numeric.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Read-only view of the runner's metrics buffer at one logging point.
///
/// The buffer itself is owned by the runner; hooks only iterate over the
/// aggregates it recorded.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: HashMap<String, MetricValue>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an aggregate under the given name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MetricValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Iterate over all recorded aggregates.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// The split a logging point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// Training split.
    Train,
    /// Validation split.
    Valid,
}

impl Split {
    /// Label used when composing report tags.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Valid => "val",
        }
    }
}

/// Scalar metrics forwarded for one step, keyed by `"<name>/<split>"`.
pub type ScalarReport = HashMap<String, f64>;

/// Compose the report tag for a metric name and split.
pub fn report_tag(name: &str, split: Split) -> String {
    format!("{}/{}", name, split.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_composition_uses_split_label() {
        assert_eq!("loss/train", report_tag("loss", Split::Train));
        assert_eq!("mAP/val", report_tag("mAP", Split::Valid));
    }

    #[test]
    fn text_aggregates_are_not_numeric() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("loss", 0.5);
        snapshot.insert("status", "converging");

        let numeric: Vec<_> = snapshot
            .iter()
            .filter_map(|(name, value)| value.as_numeric().map(|v| (name.to_string(), v)))
            .collect();

        assert_eq!(vec![("loss".to_string(), 0.5)], numeric);
    }
}
