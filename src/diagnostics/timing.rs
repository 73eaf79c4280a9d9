use serde::Serialize;
use std::time::Instant;

/// Wall-clock time spent in one preparation stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Per-stage timings of a preparation run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Run `stage`, record its duration under `label`, and return its output.
    pub fn measure<T>(&mut self, label: impl Into<String>, stage: impl FnOnce() -> T) -> T {
        let t0 = Instant::now();
        let out = stage();
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
        self.total_ms += elapsed_ms;
        self.stages.push(StageTiming {
            label: label.into(),
            elapsed_ms,
        });
        out
    }
}
