//! # Record Streams
//!
//! A lazy, single-pass sequence of field values projected out of one fetched
//! collection. Genera and species streams are the same engine configured with
//! a different [`FieldSpec`].
//!
//! ## Lifecycle:
//! `Unfetched` → (`begin`) → `Draining` → `Exhausted`.
//! The buffer is filled exactly once and only shrinks afterwards. Values are
//! popped from the end of the buffer, so emission order is the reverse of the
//! source order. An exhausted stream stays exhausted.

use serde_json::Value;

use crate::errors::{FisheryError, FisheryResult};
use crate::routes::{FieldSpec, StreamKind};
use crate::sources::{DataSource, RawCollection, Record};

/// Result of asking a stream for its next value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// One extracted field value.
    Value(String),
    /// The stream is exhausted; no value was produced.
    End,
}

enum StreamState {
    Unfetched,
    Draining(RawCollection),
    Exhausted,
}

/// Single-pass stream of extracted values over an exclusively owned source.
pub struct RecordStream {
    kind: StreamKind,
    spec: FieldSpec,
    source: Box<dyn DataSource>,
    state: StreamState,
}

impl RecordStream {
    /// Creates an unfetched stream of `kind` over `source`.
    pub fn new(kind: StreamKind, source: Box<dyn DataSource>) -> Self {
        Self {
            kind,
            spec: kind.field_spec(),
            source,
            state: StreamState::Unfetched,
        }
    }

    /// The stream kind.
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Route and field used by this stream.
    pub fn field_spec(&self) -> FieldSpec {
        self.spec
    }

    /// The data source this stream owns.
    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Records still buffered (zero before `begin` and after exhaustion).
    pub fn remaining(&self) -> usize {
        match &self.state {
            StreamState::Draining(buffer) => buffer.len(),
            _ => 0,
        }
    }

    /// True once the last value has been emitted or the fetch failed.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, StreamState::Exhausted)
    }

    /// Fetches the collection from the data source.
    ///
    /// Only the first call fetches; later calls are no-ops. A failed fetch
    /// leaves the stream exhausted and the source error is returned as-is.
    /// Every record must carry the stream's field; one record without it
    /// fails the whole collection before anything is emitted.
    pub fn begin(&mut self) -> FisheryResult<()> {
        if !matches!(self.state, StreamState::Unfetched) {
            log::debug!("{} stream already started; not fetching again", self.kind);
            return Ok(());
        }

        let spec = self.spec;
        let fetched = self.source.get_data(spec.route).and_then(|buffer| {
            buffer
                .iter()
                .try_for_each(|record| project(record, spec).map(|_| ()))?;
            Ok(buffer)
        });

        match fetched {
            Ok(buffer) => {
                log::debug!(
                    "{} stream draining {} records from {} source {}",
                    self.kind,
                    buffer.len(),
                    self.source.name(),
                    self.source.origin()
                );
                self.state = StreamState::Draining(buffer);
                Ok(())
            }
            Err(e) => {
                self.state = StreamState::Exhausted;
                Err(e)
            }
        }
    }

    /// Removes the last buffered record and returns its projected field.
    ///
    /// Starts the stream if it has not been started. Returns [`Next::End`]
    /// once the buffer is empty, and on every call after that.
    ///
    /// # Errors
    /// Data-source errors and field checks from the implicit `begin`.
    pub fn next_value(&mut self) -> FisheryResult<Next> {
        if matches!(self.state, StreamState::Unfetched) {
            self.begin()?;
        }

        let record = match &mut self.state {
            StreamState::Draining(buffer) => buffer.pop(),
            _ => None,
        };

        match record {
            Some(record) => {
                let value = match project(&record, self.spec) {
                    Ok(value) => value,
                    Err(e) => {
                        self.state = StreamState::Exhausted;
                        return Err(e);
                    }
                };
                log::trace!("{} stream emitted '{}'", self.kind, value);
                Ok(Next::Value(value))
            }
            None => {
                if !self.is_exhausted() {
                    log::debug!("{} stream exhausted", self.kind);
                    self.state = StreamState::Exhausted;
                }
                Ok(Next::End)
            }
        }
    }
}

impl Iterator for RecordStream {
    type Item = FisheryResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_value() {
            Ok(Next::Value(value)) => Some(Ok(value)),
            Ok(Next::End) => None,
            Err(e) => {
                self.state = StreamState::Exhausted;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for RecordStream {}

fn project(record: &Record, spec: FieldSpec) -> FisheryResult<String> {
    match record.get(spec.field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(FisheryError::Format(format!(
            "{} record has no \"{}\" field",
            spec.route, spec.field
        ))),
        Some(other) => Ok(other.to_string()),
    }
}
