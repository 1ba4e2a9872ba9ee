//! # lib_fishery
//!
//! Fetches taxonomic name records (genera, species) from a remote service or a
//! local cache and streams formatted notifications about each record to a UI
//! channel.
//!
//! Data flows `DataSource` → `RecordStream` → `Formatter` → `Notifier`,
//! assembled by `StreamFactory` and driven by `Pipeline`.

#![forbid(unsafe_code)]

pub mod configs;
pub mod errors;
pub mod factory;
pub mod formatters;
#[cfg(feature = "loggers")]
pub mod loggers;
pub mod notifiers;
pub mod pipeline;
pub mod retrieve;
pub mod routes;
pub mod sources;
pub mod stream;

pub use configs::{ConfigLayer, FisheryConfig};
pub use errors::{FisheryError, FisheryResult};
pub use factory::StreamFactory;
pub use formatters::{get_formatted_fish, Formatter, Transform};
pub use notifiers::{Channel, ConsoleChannel, LogChannel, Notifier};
pub use pipeline::{ErrorPolicy, Pipeline, RunSummary, StreamPlan};
pub use routes::{FieldSpec, RouteName, StreamKind};
pub use sources::{DataSource, LocalSource, RawCollection, Record, RemoteSource};
pub use stream::{Next, RecordStream};
