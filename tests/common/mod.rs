// Each test binary links only a subset of these helpers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ctxlog::{ContextLogger, Logger};
use log::{
    LevelFilter, Record,
    kv::{self, Key},
};

#[allow(dead_code)]
pub trait RecordExt {
    fn get_record(&self, key: &str) -> Option<serde_json::Value>;
}

impl RecordExt for Record<'_> {
    fn get_record(&self, key: &str) -> Option<serde_json::Value> {
        let key = Key::from_str(key);
        let val = self.key_values().get(key)?;
        serde_json::to_value(val).ok()
    }
}

/// Renders a record as `LEVEL message key=value ...`.
#[allow(dead_code)]
pub fn render(record: &Record) -> String {
    struct Render(String);

    impl<'kvs> kv::VisitSource<'kvs> for Render {
        fn visit_pair(&mut self, key: Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
            self.0.push_str(&format!(" {key}={value}"));
            Ok(())
        }
    }

    let mut line = Render(format!("{} {}", record.level(), record.args()));
    record
        .key_values()
        .visit(&mut line)
        .expect("key/values should be readable");
    line.0
}

/// An in-memory sink that records every formatted line.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct Sink {
    lines: Arc<Mutex<Vec<String>>>,
    files: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logger writing into this sink through `env_logger`.
    pub fn logger(&self, level: LevelFilter) -> Logger {
        let lines = self.lines.clone();
        let files = self.files.clone();
        Logger::new(
            env_logger::Builder::new()
                .filter_level(level)
                .format(move |_fmt, record| {
                    lines.lock().unwrap().push(render(record));
                    files
                        .lock()
                        .unwrap()
                        .push(record.file().unwrap_or_default().to_owned());
                    Ok(())
                })
                .build(),
        )
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn files(&self) -> Vec<String> {
        self.files.lock().unwrap().clone()
    }

    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }
}

/// Serializes tests that replace the process-wide default logger.
#[allow(dead_code)]
pub fn serial() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[allow(dead_code)]
pub fn check_logger_once<F>(check: F)
where
    F: Fn(&Record) -> std::io::Result<()> + Send + Sync + 'static,
{
    let level_filter = LevelFilter::Trace;
    ctxlog::set_default(Logger::new(
        env_logger::Builder::new()
            .filter_level(level_filter)
            .format(move |_fmt, record| check(record))
            .build(),
    ));
    ContextLogger::new().init(level_filter);
}
