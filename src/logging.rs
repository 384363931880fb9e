//! Logging Sink: a minimal [`log::Log`] implementation with three
//! destinations, wired up once at startup by the CLI.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogMode {
    #[value(name = "file")]
    File,
    #[value(name = "stdio")]
    Stdout,
    #[value(name = "no")]
    None,
}

enum Destination {
    File(Mutex<std::fs::File>),
    Stdout,
    None,
}

struct Sink {
    destination: Destination,
}

impl Log for Sink {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        !matches!(self.destination, Destination::None)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // FATAL is modeled as an Error-level record with the tag swapped in.
        let tag = if record.level() == Level::Error && record.target() == "fatal" {
            "FATAL"
        } else {
            record.level().as_str()
        };
        let line = format!("[{tag}] {}\n", record.args());
        match &self.destination {
            Destination::File(file) => {
                let _ = file.lock().unwrap().write_all(line.as_bytes());
            }
            Destination::Stdout => {
                print!("{line}");
            }
            Destination::None => {}
        }
    }

    fn flush(&self) {
        if let Destination::File(file) = &self.destination {
            let _ = file.lock().unwrap().flush();
        }
    }
}

/// Installs the process-wide logger for `mode`. `path` names the log file
/// when `mode` is [`LogMode::File`]; if the file can't be opened, falls back
/// to stdout and emits a WARN record saying so.
pub fn install(mode: LogMode, path: &std::path::Path) {
    let mut fallback_warning = None;
    let destination = match mode {
        LogMode::File => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Destination::File(Mutex::new(file)),
            Err(err) => {
                fallback_warning = Some(format!(
                    "could not open log file {path:?} ({err}), falling back to stdout"
                ));
                Destination::Stdout
            }
        },
        LogMode::Stdout => Destination::Stdout,
        LogMode::None => Destination::None,
    };

    let max_level = match destination {
        Destination::None => LevelFilter::Off,
        _ => LevelFilter::Trace,
    };

    let sink = Box::new(Sink { destination });
    if log::set_boxed_logger(sink).is_ok() {
        log::set_max_level(max_level);
    }

    if let Some(message) = fallback_warning {
        log::warn!("{message}");
    }
}

/// Logs `message` as a FATAL record (an Error-level record tagged `FATAL`
/// rather than `ERROR`).
pub fn fatal(message: impl std::fmt::Display) {
    log::error!(target: "fatal", "{message}");
}
