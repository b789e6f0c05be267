//! A logger handle that decorates records before passing them to a `log` sink.

use std::{borrow::Cow, fmt, panic::Location, sync::Arc};

use log::{Level, kv};

use crate::{
    Attr, KeyValues, StaticCowStr,
    attr::{flatten_into, qualify},
};

const DEFAULT_TARGET: &str = "ctxlog";

/// An immutable logger handle.
///
/// A logger wraps any [`log::Log`] implementation (the sink) and carries a set of
/// pre-bound attributes and an optional group prefix. Deriving a logger with
/// [`Logger::with`], [`Logger::with_attrs`] or [`Logger::with_group`] returns a
/// new handle and leaves the original unchanged, so loggers can be shared
/// across threads without locking.
///
/// # Example
///
/// ```
/// use ctxlog::{Level, Logger};
///
/// let logger = Logger::new(env_logger::builder().build())
///     .with([("service", "api")])
///     .with_group("request");
///
/// // Emits `request.id=42` along with `service=api`.
/// logger.log(Level::Info, "accepted", [("id", 42)]);
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

#[derive(Clone)]
struct LoggerInner {
    sink: Arc<dyn log::Log>,
    target: StaticCowStr,
    // Flattened, with keys already qualified by the group they were bound under.
    attrs: Vec<Attr>,
    group: Option<StaticCowStr>,
}

impl Logger {
    /// Creates a logger that forwards records to the given sink.
    pub fn new<L>(sink: L) -> Self
    where
        L: log::Log + 'static,
    {
        Self::from_arc(Arc::new(sink))
    }

    /// Creates a logger from a shared sink.
    #[must_use]
    pub fn from_arc(sink: Arc<dyn log::Log>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                sink,
                target: Cow::Borrowed(DEFAULT_TARGET),
                attrs: Vec::new(),
                group: None,
            }),
        }
    }

    /// Creates a logger that writes human readable text to the standard error.
    ///
    /// The level is `info` unless overridden by the `RUST_LOG` environment variable,
    /// see [`env_logger`] for the filter syntax.
    #[must_use]
    pub fn stderr() -> Self {
        let env = env_logger::Env::default().default_filter_or("info");
        Self::new(env_logger::Builder::from_env(env).build())
    }

    /// Returns a logger that emits records with the given target.
    ///
    /// The default target is `ctxlog`.
    #[must_use]
    pub fn with_target(&self, target: impl Into<StaticCowStr>) -> Self {
        self.derive(|inner| inner.target = target.into())
    }

    /// Returns a logger that includes the given key/value pairs in every record.
    ///
    /// Pairs are added to the attributes already bound to this logger, and are
    /// qualified by the current group.
    #[must_use]
    pub fn with(&self, kvs: impl KeyValues) -> Self {
        self.with_attrs(kvs.into_attrs())
    }

    /// Returns a logger that includes the given attributes in every record.
    #[must_use]
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let attrs = attrs.into_iter().collect::<Vec<_>>();
        if attrs.is_empty() {
            return self.clone();
        }

        self.derive(|inner| flatten_into(inner.group.as_deref(), &attrs, &mut inner.attrs))
    }

    /// Returns a logger that qualifies the keys of all attributes added later
    /// with the given group name.
    ///
    /// Nested groups compose: `with_group("a").with_group("b")` emits `a.b.key`.
    #[must_use]
    pub fn with_group(&self, name: impl Into<StaticCowStr>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }

        self.derive(|inner| inner.group = Some(qualify(inner.group.as_deref(), &name)))
    }

    /// Returns the attributes bound to this logger, with qualified keys.
    #[must_use]
    pub fn attrs(&self) -> &[Attr] {
        &self.inner.attrs
    }

    /// Returns the current group prefix.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.inner.group.as_deref()
    }

    /// Returns the target of the emitted records.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.inner.target
    }

    /// Reports whether the sink emits records at the given level.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        let metadata = log::Metadata::builder()
            .level(level)
            .target(&self.inner.target)
            .build();
        self.inner.sink.enabled(&metadata)
    }

    /// Reports whether the sink emits records with the given metadata.
    #[must_use]
    pub fn enabled_for(&self, metadata: &log::Metadata<'_>) -> bool {
        self.inner.sink.enabled(metadata)
    }

    /// Emits a record with the given level, message and key/value pairs.
    #[track_caller]
    pub fn log(&self, level: Level, msg: impl fmt::Display, kvs: impl KeyValues) {
        if !self.enabled(level) {
            return;
        }

        let attrs = kvs.into_attrs();
        self.emit(level, format_args!("{msg}"), &attrs, Location::caller());
    }

    /// Emits a record with the given level, message and attributes.
    ///
    /// Unlike [`Logger::log`] the attributes are only borrowed.
    #[track_caller]
    pub fn log_attrs(&self, level: Level, msg: impl fmt::Display, attrs: &[Attr]) {
        if !self.enabled(level) {
            return;
        }

        self.emit(level, format_args!("{msg}"), attrs, Location::caller());
    }

    /// Forwards a record produced elsewhere, such as by the [`log`] macros.
    ///
    /// The bound attributes are placed before the record's own key/values, which
    /// are qualified by the current group.
    pub fn log_record(&self, record: &log::Record<'_>) {
        if !self.enabled_for(record.metadata()) {
            return;
        }

        let source = record.key_values();
        match self.group() {
            None => {
                let fields = Fields {
                    bound: &self.inner.attrs,
                    attrs: &[],
                    pairs: &[],
                    source: Some(source),
                };
                self.inner
                    .sink
                    .log(&record.to_builder().key_values(&fields).build());
            }
            Some(prefix) => {
                let mut collect = QualifiedPairs {
                    prefix,
                    pairs: Vec::new(),
                };
                if let Err(err) = source.visit(&mut collect) {
                    // We can't log this error through the sink, it is the one being fed.
                    eprintln!("Error reading record key/values: {err}");
                }
                let fields = Fields {
                    bound: &self.inner.attrs,
                    attrs: &[],
                    pairs: &collect.pairs,
                    source: None,
                };
                self.inner
                    .sink
                    .log(&record.to_builder().key_values(&fields).build());
            }
        }
    }

    /// Flushes the sink.
    pub fn flush(&self) {
        self.inner.sink.flush();
    }

    fn emit(
        &self,
        level: Level,
        args: fmt::Arguments<'_>,
        attrs: &[Attr],
        location: &'static Location<'static>,
    ) {
        let needs_flatten =
            self.group().is_some() || attrs.iter().any(|attr| attr.value.is_group());
        let attrs: Cow<'_, [Attr]> = if needs_flatten {
            let mut flat = Vec::with_capacity(attrs.len());
            flatten_into(self.group(), attrs, &mut flat);
            Cow::Owned(flat)
        } else {
            Cow::Borrowed(attrs)
        };

        let fields = Fields {
            bound: &self.inner.attrs,
            attrs: &attrs,
            pairs: &[],
            source: None,
        };
        self.inner.sink.log(
            &log::Record::builder()
                .level(level)
                .target(&self.inner.target)
                .args(args)
                .file_static(Some(location.file()))
                .line(Some(location.line()))
                .key_values(&fields)
                .build(),
        );
    }

    fn derive(&self, update: impl FnOnce(&mut LoggerInner)) -> Self {
        let mut inner = LoggerInner::clone(&self.inner);
        update(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("target", &self.inner.target)
            .field("group", &self.inner.group)
            .field("attrs", &self.inner.attrs)
            .finish_non_exhaustive()
    }
}

/// Key/values of an outgoing record.
struct Fields<'a, 'v> {
    bound: &'a [Attr],
    attrs: &'a [Attr],
    pairs: &'a [(String, kv::Value<'v>)],
    source: Option<&'a dyn kv::Source>,
}

impl kv::Source for Fields<'_, '_> {
    fn visit<'kvs>(&'kvs self, visitor: &mut dyn kv::VisitSource<'kvs>) -> Result<(), kv::Error> {
        for attr in self.bound.iter().chain(self.attrs) {
            visitor.visit_pair(kv::Key::from_str(&attr.key), attr.value.as_log_value())?;
        }
        for (key, value) in self.pairs {
            visitor.visit_pair(kv::Key::from_str(key), kv::ToValue::to_value(value))?;
        }
        if let Some(source) = self.source {
            source.visit(visitor)?;
        }
        Ok(())
    }
}

/// Collects foreign key/values with keys qualified by a group prefix.
struct QualifiedPairs<'a, 'kvs> {
    prefix: &'a str,
    pairs: Vec<(String, kv::Value<'kvs>)>,
}

impl<'kvs> kv::VisitSource<'kvs> for QualifiedPairs<'_, 'kvs> {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.pairs.push((format!("{}.{key}", self.prefix), value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;

    /// Renders records as `LEVEL message key=value ...`.
    #[derive(Default)]
    struct Lines {
        level: Option<log::LevelFilter>,
        lines: Mutex<Vec<String>>,
    }

    impl log::Log for Lines {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= self.level.unwrap_or(log::LevelFilter::Trace)
        }

        fn log(&self, record: &log::Record<'_>) {
            struct Render(String);

            impl<'kvs> kv::VisitSource<'kvs> for Render {
                fn visit_pair(
                    &mut self,
                    key: kv::Key<'kvs>,
                    value: kv::Value<'kvs>,
                ) -> Result<(), kv::Error> {
                    self.0.push_str(&format!(" {key}={value}"));
                    Ok(())
                }
            }

            let mut line = Render(format!("{} {}", record.level(), record.args()));
            record.key_values().visit(&mut line).unwrap();
            self.lines.lock().unwrap().push(line.0);
        }

        fn flush(&self) {}
    }

    fn capture(level: log::LevelFilter) -> (Logger, Arc<Lines>) {
        let lines = Arc::new(Lines {
            level: Some(level),
            ..Lines::default()
        });
        (Logger::from_arc(lines.clone()), lines)
    }

    fn taken(lines: &Lines) -> Vec<String> {
        std::mem::take(&mut *lines.lines.lock().unwrap())
    }

    #[test]
    fn test_logger_levels() {
        let (logger, lines) = capture(log::LevelFilter::Warn);

        assert_eq!(logger.enabled(Level::Debug), false);
        assert_eq!(logger.enabled(Level::Info), false);
        assert_eq!(logger.enabled(Level::Warn), true);
        assert_eq!(logger.enabled(Level::Error), true);

        logger.log(Level::Info, "hidden", ());
        logger.log(Level::Error, "shown", [("code", 7)]);
        assert_eq!(taken(&lines), ["ERROR shown code=7"]);
    }

    #[test]
    fn test_logger_with_accumulates() {
        let (logger, lines) = capture(log::LevelFilter::Trace);

        let first = logger.with([("k1", "v1")]);
        let second = first.with((("k2", "v2"), ("n", 3)));
        second.log(Level::Info, "msg", [("call", true)]);
        first.log(Level::Info, "msg", ());
        logger.log(Level::Info, "msg", ());

        assert_eq!(
            taken(&lines),
            [
                "INFO msg k1=v1 k2=v2 n=3 call=true",
                "INFO msg k1=v1",
                "INFO msg",
            ]
        );
    }

    #[test]
    fn test_logger_groups() {
        let (logger, lines) = capture(log::LevelFilter::Trace);

        let logger = logger
            .with([("before", 1)])
            .with_group("a")
            .with([("bound", 2)])
            .with_group("b");
        assert_eq!(logger.group(), Some("a.b"));

        logger.log_attrs(
            Level::Info,
            "grouped",
            &[Attr::new("k", "v"), Attr::group("g", [Attr::new("x", 1)])],
        );
        assert_eq!(
            taken(&lines),
            ["INFO grouped before=1 a.bound=2 a.b.k=v a.b.g.x=1"]
        );
    }

    #[test]
    fn test_logger_empty_derivations_reuse_logger() {
        let (logger, _lines) = capture(log::LevelFilter::Trace);

        assert!(Arc::ptr_eq(&logger.inner, &logger.with(()).inner));
        assert!(Arc::ptr_eq(&logger.inner, &logger.with_group("").inner));
        assert!(Arc::ptr_eq(&logger.inner, &logger.with_attrs(Vec::<Attr>::new()).inner));
    }

    #[test]
    fn test_logger_log_record() {
        let (logger, lines) = capture(log::LevelFilter::Trace);

        let kvs = ("user", "bob");
        let record = |logger: &Logger| {
            logger.log_record(
                &log::Record::builder()
                    .level(Level::Info)
                    .args(format_args!("from macro"))
                    .key_values(&kvs)
                    .build(),
            );
        };

        record(&logger.with([("req", 42)]));
        record(&logger.with([("req", 42)]).with_group("http"));

        assert_eq!(
            taken(&lines),
            [
                "INFO from macro req=42 user=bob",
                "INFO from macro req=42 http.user=bob",
            ]
        );
    }

    #[test]
    fn test_logger_target() {
        let (logger, _lines) = capture(log::LevelFilter::Trace);
        assert_eq!(logger.target(), "ctxlog");
        assert_eq!(logger.with_target("app::db").target(), "app::db");
    }
}
