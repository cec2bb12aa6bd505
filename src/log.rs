//! Provides logging utilities, used by the room session.
//!
//! The session itself only emits records via [`slog_scope`] macros. Installing
//! a global [`Logger`] is up to the embedding application, which may use
//! [`init()`] for that.

use std::io;

use chrono::Local;
use slog::{
    o, Discard, Drain, Duplicate, FnValue, Fuse, Level, Logger, PushFnValue,
    Record,
};
use slog_async::Async;
use slog_json::Json;
use slog_scope::GlobalLoggerGuard;

use crate::conf;

/// Re-exports common definitions for logging.
///
/// Use this module as following:
/// ```rust
/// use medea_room_session::log::prelude::*;
/// ```
pub mod prelude {
    pub use slog::{slog_debug, slog_error, slog_info, slog_trace, slog_warn};
    pub use slog_scope::{debug, error, info, trace, warn};
}

/// Builds JSON [`Logger`] which prints all its log records to `w_out` writer,
/// but WARN level (and higher) to `w_err` writer. Records less severe than
/// the provided `level` are dropped, and `None` level disables logging
/// completely.
///
/// Logger will use [`Async`] drain with channel size of 2048 entries.
///
/// Created [`Logger`] produces log records with `fqn`, `lvl`, `time` and `msg`
/// fields by default.
pub fn new_dual_logger<W1, W2>(
    w_out: W1,
    w_err: W2,
    level: Option<Level>,
) -> Logger
where
    W1: io::Write + Send + 'static,
    W2: io::Write + Send + 'static,
{
    let level = if let Some(level) = level {
        level
    } else {
        return Logger::root(Discard, o!());
    };

    let drain_out = Json::new(w_out).build();
    let drain_err = Json::new(w_err).build();
    let drain = Duplicate(
        drain_out.filter(|r| !r.level().is_at_least(Level::Warning)),
        drain_err.filter_level(Level::Warning),
    )
    .map(Fuse);
    let drain = drain.filter_level(level).fuse();
    let drain = Async::new(drain).chan_size(2048).build().fuse();
    add_default_keys(&Logger::root(drain, o!()))
}

/// Installs a [`new_dual_logger()`] writing to STDOUT/STDERR as the global
/// [`slog_scope`] logger, and bridges records of the [`log`] crate into it.
///
/// Returned [`GlobalLoggerGuard`] must be held for as long as logging is
/// needed.
///
/// [`log`]: https://docs.rs/log
#[must_use]
pub fn init(conf: &conf::Log) -> GlobalLoggerGuard {
    let guard = slog_scope::set_global_logger(new_dual_logger(
        io::stdout(),
        io::stderr(),
        conf.level(),
    ));
    // Embedder may have installed its own `log` backend already.
    slog_stdlog::init().ok();
    guard
}

/// Adds default log record data (key-value pairs) to specified [`Logger`]:
/// - `msg`: log record message.
/// - `fqn`: path to code line that called log function.
/// - `time`: creation date and time of log record in [RFC 3339] format.
/// - `lvl`: logging level of log record.
///
/// [RFC 3339]: https://www.ietf.org/rfc/rfc3339.txt
fn add_default_keys(logger: &Logger) -> Logger {
    logger.new(o!(
        "msg" => PushFnValue(move |record : &Record, ser| {
            ser.emit(record.msg())
        }),
        "fqn" => PushFnValue(move |record : &Record, ser| {
             ser.emit(format_args!("{}:{}", record.module(), record.line()))
        }),
        "time" => PushFnValue(move |_ : &Record, ser| {
            ser.emit(Local::now().to_rfc3339())
        }),
        "lvl" => FnValue(move |rinfo : &Record| {
            rinfo.level().as_str()
        }),
    ))
}

#[cfg(test)]
mod spec {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use slog::{info, warn, Level};

    use super::new_dual_logger;

    /// [`io::Write`] collecting everything into a shared buffer.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn splits_warnings_into_err_writer() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let logger =
            new_dual_logger(out.clone(), err.clone(), Some(Level::Info));

        info!(logger, "joined room");
        warn!(logger, "recording failed");
        // Dropping the logger flushes its async drain.
        drop(logger);

        assert!(out.contents().contains("joined room"));
        assert!(!out.contents().contains("recording failed"));
        assert!(err.contents().contains("recording failed"));
        assert!(err.contents().contains("\"lvl\":\"WARNING\""));
    }

    #[test]
    fn disabled_level_discards_everything() {
        let (out, err) = (SharedBuf::default(), SharedBuf::default());
        let logger = new_dual_logger(out.clone(), err.clone(), None);

        warn!(logger, "recording failed");
        drop(logger);

        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }
}
