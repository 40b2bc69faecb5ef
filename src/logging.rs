/// Logging setup: `log` records go through `env_logger` into a file.
///
/// The terminal is in raw alternate-screen mode while the game runs, so
/// nothing may be written to stderr. Records emitted before the log file
/// is known (config loading) are held in memory and written out once the
/// file is attached.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use env_logger::{Env, Target, WriteStyle};

enum Sink {
    Pending(Vec<u8>),
    File(File),
    Discard,
}

#[derive(Clone)]
pub struct LogSink(Arc<Mutex<Sink>>);

impl LogSink {
    fn new() -> Self {
        LogSink(Arc::new(Mutex::new(Sink::Pending(Vec::new()))))
    }

    /// Open `path` for appending and move any held records into it.
    pub fn attach(&self, path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut sink = self.0.lock().map_err(|_| io::Error::other("log sink poisoned"))?;
        if let Sink::Pending(held) = &*sink {
            file.write_all(held)?;
        }
        *sink = Sink::File(file);
        Ok(())
    }

    /// Drop held records and ignore everything from now on.
    pub fn discard(&self) {
        if let Ok(mut sink) = self.0.lock() {
            *sink = Sink::Discard;
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut sink = self.0.lock().map_err(|_| io::Error::other("log sink poisoned"))?;
        match &mut *sink {
            Sink::Pending(held) => {
                held.extend_from_slice(buf);
                Ok(buf.len())
            }
            Sink::File(f) => f.write(buf),
            Sink::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut sink = self.0.lock().map_err(|_| io::Error::other("log sink poisoned"))?;
        match &mut *sink {
            Sink::File(f) => f.flush(),
            _ => Ok(()),
        }
    }
}

/// Install the global logger. Filter comes from `RUST_LOG`, default `info`.
pub fn init() -> LogSink {
    let sink = LogSink::new();
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(sink.clone())))
        .write_style(WriteStyle::Never)
        .format_timestamp_millis()
        .init();
    sink
}
