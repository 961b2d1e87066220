//! Captures the spans and events emitted while a closure runs, so suites can
//! assert on `builder.build`, `store.*` and `cli.*` instrumentation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

/// Field values keyed by field name, rendered without `Debug` quoting.
pub type Fields = BTreeMap<&'static str, String>;

/// A span that closed during the capture.
#[derive(Clone, Debug)]
pub struct ClosedSpan {
    /// Span name, e.g. `builder.build`.
    pub name: &'static str,
    /// Fields declared on the span plus any recorded later.
    pub fields: Fields,
}

impl ClosedSpan {
    /// Value of `field`, if it was declared and recorded.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// An event emitted during the capture.
#[derive(Clone, Debug)]
pub struct LoggedEvent {
    /// Event level.
    pub level: Level,
    /// Fields, with the event text under `message`.
    pub fields: Fields,
}

impl LoggedEvent {
    /// The event's `message` field.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

/// Everything recorded while a [`capture`] closure ran.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    spans: Vec<ClosedSpan>,
    events: Vec<LoggedEvent>,
}

impl Trace {
    /// First closed span called `name`.
    ///
    /// # Examples
    /// ```
    /// use adventure_test_support::trace::capture;
    ///
    /// let ((), trace) = capture(|| {
    ///     let _span = tracing::info_span!("store.write", dir = "rooms.1").entered();
    /// });
    /// let span = trace.span("store.write").expect("span closed");
    /// assert_eq!(span.field("dir"), Some("rooms.1"));
    /// ```
    #[must_use]
    pub fn span(&self, name: &str) -> Option<&ClosedSpan> {
        self.spans.iter().find(|span| span.name == name)
    }

    /// Events logged at `level` whose message is `message`.
    pub fn logged<'a>(
        &'a self,
        level: Level,
        message: &'a str,
    ) -> impl Iterator<Item = &'a LoggedEvent> + 'a {
        self.events
            .iter()
            .filter(move |event| event.level == level && event.message() == Some(message))
    }

    /// Whether any event was logged at `level`.
    #[must_use]
    pub fn logged_at(&self, level: Level) -> bool {
        self.events.iter().any(|event| event.level == level)
    }
}

/// Runs `run` with a subscriber that records into a [`Trace`] and returns
/// the closure's result alongside it.
pub fn capture<T>(run: impl FnOnce() -> T) -> (T, Trace) {
    let sink = Arc::new(Mutex::new(Trace::default()));
    let subscriber = Registry::default().with(Recorder {
        sink: Arc::clone(&sink),
    });
    let value = tracing::subscriber::with_default(subscriber, run);
    let trace = sink.lock().unwrap_or_else(PoisonError::into_inner).clone();
    (value, trace)
}

struct Recorder {
    sink: Arc<Mutex<Trace>>,
}

struct OpenSpan(Fields);

impl<S> Layer<S> for Recorder
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Fields::new();
        attrs.record(&mut FieldWriter(&mut fields));
        span.extensions_mut().insert(OpenSpan(fields));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(OpenSpan(fields)) = span.extensions_mut().get_mut::<OpenSpan>() {
            values.record(&mut FieldWriter(fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let Some(OpenSpan(fields)) = span.extensions_mut().remove::<OpenSpan>() else {
            return;
        };
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spans
            .push(ClosedSpan {
                name: span.name(),
                fields,
            });
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::new();
        event.record(&mut FieldWriter(&mut fields));
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .push(LoggedEvent {
                level: *event.metadata().level(),
                fields,
            });
    }
}

struct FieldWriter<'a>(&'a mut Fields);

impl Visit for FieldWriter<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name(), format!("{value:?}"));
    }
}
