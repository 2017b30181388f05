//! Log capture for unit tests.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::{LogLevel, PlanConfig};
use crate::logging::subscriber;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a subscriber at `level`; return its result and the
/// formatted log lines.
pub(crate) fn capture_logs<R>(level: LogLevel, f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let config = PlanConfig::default().with_log_level(level);
    let result =
        tracing::subscriber::with_default(subscriber(&config, move || writer.clone()), f);
    (result, buffer.contents())
}
