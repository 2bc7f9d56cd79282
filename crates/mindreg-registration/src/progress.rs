//! Progress reporting for optimizer runs.

/// Snapshot passed to iteration observers.
#[derive(Debug, Clone, Copy)]
pub struct IterationReport {
    /// Iteration number (0-based; the final call reports the exit iteration).
    pub iteration: usize,
    /// Cost at this iteration.
    pub cost: f64,
    /// Current step factor.
    pub step_factor: f64,
}

/// Observer invoked at iteration 0, every `observer_interval` iterations,
/// and once at exit.
pub type IterationObserver = Box<dyn FnMut(&IterationReport) + Send>;

/// Observer that logs through `tracing` at `info` level.
pub fn console_observer() -> IterationObserver {
    Box::new(|report: &IterationReport| {
        tracing::info!(
            iteration = report.iteration,
            cost = report.cost,
            step_factor = report.step_factor,
            "optimizer progress"
        );
    })
}

/// Observer that records every report it receives; useful for tests and for
/// collecting a history across a run.
pub fn history_observer() -> (IterationObserver, std::sync::Arc<std::sync::Mutex<Vec<IterationReport>>>) {
    let history = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = history.clone();
    let observer: IterationObserver = Box::new(move |report: &IterationReport| {
        sink.lock().expect("history observer lock").push(*report);
    });
    (observer, history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_observer_records_reports() {
        let (mut observer, history) = history_observer();
        observer(&IterationReport {
            iteration: 3,
            cost: 1.0,
            step_factor: 0.5,
        });
        let recorded = history.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].iteration, 3);
    }
}
