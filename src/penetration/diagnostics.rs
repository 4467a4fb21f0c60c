//! Where per-candidate skips and failures are reported.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::PenetrationError;

/// Best-effort receiver of pipeline diagnostics.
///
/// `record` must not panic or block for long; the pipeline calls it inline,
/// possibly from several worker threads at once.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, error: &PenetrationError);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, error: &PenetrationError) {
        match error {
            PenetrationError::MissingGeometry { element } => {
                debug!(%element, "no usable solid, candidate skipped");
            }
            PenetrationError::GeometryQueryFailure { element, reason } => {
                warn!(%element, %reason, "geometry query failed, candidate skipped");
            }
            PenetrationError::DegenerateInput(what) => {
                debug!(input = what, "degenerate input, nothing to do");
            }
        }
    }
}

/// Keeps every diagnostic in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<PenetrationError>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<PenetrationError> {
        self.lock().clone()
    }

    /// Drains the recorded diagnostics.
    pub fn take(&self) -> Vec<PenetrationError> {
        std::mem::take(&mut *self.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking recorder elsewhere must not take the sink down with it.
    fn lock(&self) -> MutexGuard<'_, Vec<PenetrationError>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, error: &PenetrationError) {
        self.lock().push(error.clone());
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _error: &PenetrationError) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use super::*;
    use crate::penetration::model::{ElementId, ElementRef};

    fn missing(id: u64) -> PenetrationError {
        PenetrationError::MissingGeometry {
            element: ElementRef::host(ElementId(id)),
        }
    }

    #[test]
    fn collecting_sink_keeps_arrival_order() {
        let sink = CollectingSink::new();
        sink.record(&missing(1));
        sink.record(&PenetrationError::DegenerateInput("no centerline"));
        sink.record(&missing(2));

        assert_eq!(sink.len(), 3);
        let entries = sink.entries();
        assert!(matches!(
            entries[0],
            PenetrationError::MissingGeometry { element } if element.element == ElementId(1)
        ));
        assert!(matches!(entries[1], PenetrationError::DegenerateInput(_)));
    }

    #[test]
    fn take_drains() {
        let sink = CollectingSink::new();
        sink.record(&missing(1));
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn collecting_sink_is_shared_across_threads() {
        let sink = CollectingSink::new();
        std::thread::scope(|scope| {
            for id in 0..4 {
                let sink = &sink;
                scope.spawn(move || sink.record(&missing(id)));
            }
        });
        assert_eq!(sink.len(), 4);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn tracing_sink_logs_each_kind_at_its_level() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.record(&missing(3));
            TracingSink.record(&PenetrationError::GeometryQueryFailure {
                element: ElementRef::linked(0, ElementId(4)),
                reason: "face evaluation failed".into(),
            });
            TracingSink.record(&PenetrationError::DegenerateInput("empty candidate set"));
            NullSink.record(&missing(5));
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3, "{output}");

        assert!(lines[0].contains("DEBUG"));
        assert!(lines[0].contains("no usable solid"));
        assert!(lines[0].contains("host:#3"));

        assert!(lines[1].contains("WARN"));
        assert!(lines[1].contains("geometry query failed"));
        assert!(lines[1].contains("link[0]:#4"));
        assert!(lines[1].contains("face evaluation failed"));

        assert!(lines[2].contains("DEBUG"));
        assert!(lines[2].contains("empty candidate set"));

        assert!(!output.contains("#5"));
    }
}
