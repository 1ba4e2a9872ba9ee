//! # Stream Factory
//!
//! Builds record streams. When the caller does not supply a data source the
//! factory constructs the default remote one from its configuration. The
//! factory keeps no state between calls: every stream gets a fresh source.

use crate::configs::FisheryConfig;
use crate::errors::FisheryResult;
use crate::routes::StreamKind;
use crate::sources::{DataSource, RemoteSource};
use crate::stream::RecordStream;

/// Pure constructor of [`RecordStream`]s.
#[derive(Debug, Clone)]
pub struct StreamFactory {
    config: FisheryConfig,
}

impl StreamFactory {
    /// Factory whose default source targets `config.base_url`.
    pub fn new(config: FisheryConfig) -> Self {
        Self { config }
    }

    /// The configuration used for default sources.
    pub fn config(&self) -> &FisheryConfig {
        &self.config
    }

    /// Creates a stream for a kind given by name.
    ///
    /// # Errors
    /// `FisheryError::Config` for an unknown kind or an unusable base URL.
    pub fn create(
        &self,
        kind: &str,
        data_source: Option<Box<dyn DataSource>>,
    ) -> FisheryResult<RecordStream> {
        let kind: StreamKind = kind.parse()?;
        self.create_kind(kind, data_source)
    }

    /// Creates a stream of `kind`, defaulting to a remote source.
    pub fn create_kind(
        &self,
        kind: StreamKind,
        data_source: Option<Box<dyn DataSource>>,
    ) -> FisheryResult<RecordStream> {
        let source = match data_source {
            Some(source) => source,
            None => Box::new(RemoteSource::from_config(&self.config)?),
        };
        log::debug!(
            "Created {} stream over {} source {}",
            kind,
            source.name(),
            source.origin()
        );
        Ok(RecordStream::new(kind, source))
    }
}

impl Default for StreamFactory {
    fn default() -> Self {
        Self::new(FisheryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FisheryError;
    use crate::sources::LocalSource;

    fn factory() -> StreamFactory {
        StreamFactory::new(FisheryConfig {
            base_url: "http://fish.example/api/".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn default_source_is_the_configured_remote() {
        let factory = factory();
        for kind in StreamKind::ALL {
            let stream = factory.create(kind.as_str(), None).unwrap();
            assert_eq!(stream.kind(), kind);
            assert_eq!(stream.source().name(), "remote");
            assert_eq!(stream.source().origin(), "http://fish.example/api/");
            assert!(!stream.is_exhausted());
        }
    }

    #[test]
    fn supplied_source_is_used() {
        let stream = factory()
            .create("species", Some(Box::new(LocalSource::new("/tmp/fish"))))
            .unwrap();
        assert_eq!(stream.source().name(), "local");
        assert_eq!(stream.field_spec().field, "Species");
    }

    #[test]
    fn unknown_kind_is_a_config_error() {
        let err = factory().create("orders", None).err().unwrap();
        assert!(matches!(err, FisheryError::Config(_)));
    }

    #[test]
    fn each_call_builds_an_independent_stream() {
        let factory = factory();
        let mut first = factory
            .create_kind(StreamKind::Genera, Some(Box::new(LocalSource::new("/does/not/exist"))))
            .unwrap();
        let second = factory.create_kind(StreamKind::Genera, None).unwrap();

        assert!(first.begin().is_err());
        assert!(first.is_exhausted());
        assert!(!second.is_exhausted());
        assert_eq!(second.source().name(), "remote");
    }
}
