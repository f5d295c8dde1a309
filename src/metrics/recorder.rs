//! Metrics Recorder
//!
//! Bounded FIFO of duration samples plus named start/stop timers.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::metrics::{Metric, MetricsSummary, DEFAULT_MAX_METRICS, DEFAULT_SLOW_THRESHOLD_MS};

/// Recorder shared across every caller in the process.
pub type SharedMetrics = Arc<RwLock<MetricsRecorder>>;

#[derive(Debug)]
pub struct MetricsRecorder {
    /// Samples in insertion order, oldest at the front
    metrics: VecDeque<Metric>,
    /// Running timers by label
    timers: HashMap<String, Instant>,
    max_metrics: usize,
    slow_threshold_ms: f64,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_METRICS, DEFAULT_SLOW_THRESHOLD_MS)
    }
}

impl MetricsRecorder {
    pub fn new(max_metrics: usize, slow_threshold_ms: f64) -> Self {
        Self {
            metrics: VecDeque::with_capacity(max_metrics.min(DEFAULT_MAX_METRICS)),
            timers: HashMap::new(),
            max_metrics,
            slow_threshold_ms,
        }
    }

    pub fn shared(self) -> SharedMetrics {
        Arc::new(RwLock::new(self))
    }

    // == Timers ==
    /// Starts (or restarts) the timer for `label`.
    pub fn start_timer(&mut self, label: impl Into<String>) {
        self.timers.insert(label.into(), Instant::now());
    }

    /// Stops the timer for `label` and records the elapsed time.
    ///
    /// Without a matching `start_timer` this logs a warning and returns None.
    pub fn end_timer(
        &mut self,
        label: &str,
        category: impl Into<String>,
        metadata: Option<Value>,
    ) -> Option<Metric> {
        let Some(started) = self.timers.remove(label) else {
            warn!("end_timer called for '{}' without a matching start_timer", label);
            return None;
        };

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        let metric = Metric::new(label, duration_ms, category, metadata);
        self.push(metric.clone());
        Some(metric)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // == Record ==
    /// Records a duration measured elsewhere.
    pub fn record_metric(
        &mut self,
        name: impl Into<String>,
        duration_ms: f64,
        category: impl Into<String>,
        metadata: Option<Value>,
    ) {
        self.push(Metric::new(name, duration_ms, category, metadata));
    }

    fn push(&mut self, metric: Metric) {
        if self.max_metrics == 0 {
            return;
        }
        while self.metrics.len() >= self.max_metrics {
            self.metrics.pop_front();
        }
        debug!("Recorded metric {} ({:.2}ms)", metric.name, metric.duration_ms);
        self.metrics.push_back(metric);
    }

    // == Queries ==
    /// All samples, optionally restricted to one category, oldest first.
    pub fn metrics(&self, category: Option<&str>) -> Vec<Metric> {
        self.metrics
            .iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .cloned()
            .collect()
    }

    /// Mean duration of samples named `name`, or 0 when there are none.
    pub fn average_time(&self, name: &str) -> f64 {
        let (count, total) = self
            .metrics
            .iter()
            .filter(|m| m.name == name)
            .fold((0usize, 0.0), |(count, total), m| (count + 1, total + m.duration_ms));

        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// Samples strictly slower than `threshold_ms`.
    pub fn slow_operations(&self, threshold_ms: f64) -> Vec<Metric> {
        self.metrics
            .iter()
            .filter(|m| m.is_slower_than(threshold_ms))
            .cloned()
            .collect()
    }

    pub fn slow_threshold_ms(&self) -> f64 {
        self.slow_threshold_ms
    }

    pub fn summary(&self) -> MetricsSummary {
        let total_metrics = self.metrics.len();
        let avg_duration = if total_metrics == 0 {
            0.0
        } else {
            self.metrics.iter().map(|m| m.duration_ms).sum::<f64>() / total_metrics as f64
        };

        let mut categories = BTreeMap::new();
        for metric in &self.metrics {
            *categories.entry(metric.category.clone()).or_insert(0) += 1;
        }

        MetricsSummary {
            total_metrics,
            avg_duration,
            slow_operations: self
                .metrics
                .iter()
                .filter(|m| m.is_slower_than(self.slow_threshold_ms))
                .count(),
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Drops every sample and every running timer.
    pub fn clear(&mut self) {
        self.metrics.clear();
        self.timers.clear();
        info!("Metrics cleared");
    }
}

/// Times `future` and records the sample once it completes.
///
/// The recorder lock is only taken after the future resolves.
pub async fn measure_async<F>(
    metrics: &SharedMetrics,
    name: &str,
    category: &str,
    future: F,
) -> F::Output
where
    F: Future,
{
    let started = Instant::now();
    let output = future.await;
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

    metrics
        .write()
        .await
        .record_metric(name, duration_ms, category, None);
    output
}
