use serde::{Deserialize, Serialize};

/// Index-aligned chart data: `values[i]` is plotted under `labels[i]`.
///
/// Fields are private so the two vectors can only grow together. Each
/// pipeline run builds a fresh series; nothing mutates one after it has
/// been handed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    values: Vec<f64>,
    labels: Vec<String>,
}

impl ChartSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
        }
    }

    /// Build from two vectors. Returns `None` if their lengths differ.
    pub fn from_parts(values: Vec<f64>, labels: Vec<String>) -> Option<Self> {
        (values.len() == labels.len()).then_some(Self { values, labels })
    }

    pub fn push(&mut self, value: f64, label: impl Into<String>) {
        self.values.push(value);
        self.labels.push(label.into());
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(label, value)` pairs in plot order.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
