//! # Pipeline Driver
//!
//! Drives configured streams one after another: build the stream through the
//! factory, drain it to exhaustion, format every value and push it through the
//! notifier. Streams are never interleaved.
//!
//! The core does not retry or swallow data-source errors. What happens to a
//! failing stream is decided here by the [`ErrorPolicy`].

use crate::configs::FisheryConfig;
use crate::errors::{FisheryError, FisheryResult};
use crate::factory::StreamFactory;
use crate::formatters::{Formatter, Transform};
use crate::notifiers::{Channel, Notifier};
use crate::routes::StreamKind;
use crate::sources::DataSource;
use crate::stream::Next;

/// What to do when one stream fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Log the error, record the stream as skipped and continue.
    Skip,
}

/// One stream to drive: its kind, an optional source and an optional transform.
pub struct StreamPlan {
    /// Which stream to build.
    pub kind: StreamKind,
    /// Source override; `None` means the factory's default remote source.
    pub source: Option<Box<dyn DataSource>>,
    /// Message builder; `None` means the formatter's template.
    pub transform: Option<Transform>,
}

impl StreamPlan {
    /// Plan for `kind` with the default source and template.
    pub fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            source: None,
            transform: None,
        }
    }

    /// Uses `source` instead of the default remote source.
    pub fn with_source(mut self, source: impl DataSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Formats values with `transform` instead of the template.
    pub fn with_transform(mut self, transform: impl Fn(&str) -> String + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }
}

/// Outcome of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Notifications delivered per completed stream, in run order.
    pub delivered: Vec<(StreamKind, usize)>,
    /// Streams abandoned under [`ErrorPolicy::Skip`], with the cause.
    pub skipped: Vec<(StreamKind, FisheryError)>,
}

impl RunSummary {
    /// Notifications delivered across all completed streams.
    pub fn total_delivered(&self) -> usize {
        self.delivered.iter().map(|(_, n)| n).sum()
    }
}

/// Factory, formatter and notifier wired together.
pub struct Pipeline<C: Channel> {
    factory: StreamFactory,
    formatter: Formatter,
    notifier: Notifier<C>,
    policy: ErrorPolicy,
}

impl<C: Channel> Pipeline<C> {
    /// Pipeline from explicit parts, aborting on the first failure.
    pub fn new(factory: StreamFactory, formatter: Formatter, notifier: Notifier<C>) -> Self {
        Self {
            factory,
            formatter,
            notifier,
            policy: ErrorPolicy::default(),
        }
    }

    /// Pipeline whose factory and formatter come from `config`.
    pub fn from_config(config: FisheryConfig, channel: C) -> Self {
        let formatter = Formatter::new(config.name_template.clone());
        Self::new(StreamFactory::new(config), formatter, Notifier::new(channel))
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The notifier in use.
    pub fn notifier(&self) -> &Notifier<C> {
        &self.notifier
    }

    /// Drives every plan in order.
    ///
    /// # Errors
    /// Under [`ErrorPolicy::Abort`], the first stream error.
    pub fn run(&self, plans: Vec<StreamPlan>) -> FisheryResult<RunSummary> {
        let mut summary = RunSummary::default();

        for plan in plans {
            let kind = plan.kind;
            match self.run_stream(plan) {
                Ok(count) => {
                    log::info!("{} stream done: {} notifications", kind, count);
                    summary.delivered.push((kind, count));
                }
                Err(e) => match self.policy {
                    ErrorPolicy::Abort => {
                        log::error!("{} stream failed, aborting run: {}", kind, e);
                        return Err(e);
                    }
                    ErrorPolicy::Skip => {
                        log::warn!("{} stream failed, skipping: {}", kind, e);
                        summary.skipped.push((kind, e));
                    }
                },
            }
        }

        Ok(summary)
    }

    /// Drains one stream to exhaustion, returning the notification count.
    pub fn run_stream(&self, plan: StreamPlan) -> FisheryResult<usize> {
        let StreamPlan {
            kind,
            source,
            transform,
        } = plan;

        let mut stream = self.factory.create_kind(kind, source)?;
        stream.begin()?;

        let mut count = 0;
        while let Next::Value(value) = stream.next_value()? {
            let message = self.formatter.format(&value, transform.as_deref());
            self.notifier.notify(&message);
            count += 1;
        }
        Ok(count)
    }
}
