use crate::configs::FisheryConfig;
use crate::errors::FisheryResult;
use crate::retrieve::ApiClient;
use crate::routes::RouteName;

use super::{extract_collection, DataSource, RawCollection};

/// # Remote Source
///
/// Calls the remote fish service for each route. Transport concerns
/// (timeouts, retries, status handling) are delegated to `ApiClient`.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: ApiClient,
}

impl RemoteSource {
    /// Remote source over an already configured client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Remote source for `config.base_url` with the configured retry policy.
    pub fn from_config(config: &FisheryConfig) -> FisheryResult<Self> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }
}

impl DataSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    fn origin(&self) -> String {
        self.client.base_url().to_string()
    }

    fn get_data(&self, route: RouteName) -> FisheryResult<RawCollection> {
        let body = self.client.get_json(route.as_str())?;
        let records = extract_collection(route, body)?;
        log::info!(
            "Fetched {} {} records from {}",
            records.len(),
            route,
            self.client.base_url()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FisheryError;
    use crate::retrieve::ky_http::tests::{http_response, serve};
    use std::path::PathBuf;
    use std::time::Duration;

    fn config_for(base: &str) -> FisheryConfig {
        FisheryConfig {
            base_url: base.to_string(),
            data_dir: PathBuf::from("."),
            max_attempts: 1,
            retry_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[test]
    fn fetches_the_route_collection() {
        let body = r#"{"data": [{"Species": "trutta"}, {"Species": "lucius"}]}"#;
        let (base, handle) = serve(vec![http_response("200 OK", body)]);

        let source = RemoteSource::from_config(&config_for(&base)).unwrap();
        let records = source.get_data(RouteName::Species).unwrap();
        let requests = handle.join().unwrap();

        assert_eq!(requests[0], "GET /species HTTP/1.1");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["Species"], "lucius");
        assert_eq!(source.name(), "remote");
        assert_eq!(source.origin(), base);
    }

    #[test]
    fn payload_without_data_is_a_format_error() {
        let (base, handle) = serve(vec![http_response("200 OK", r#"{"error": "gone"}"#)]);

        let source = RemoteSource::from_config(&config_for(&base)).unwrap();
        let err = source.get_data(RouteName::Genera).unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, FisheryError::Format(_)));
    }

    #[test]
    fn http_failure_is_a_transport_error() {
        let (base, handle) = serve(vec![http_response("500 Internal Server Error", "")]);

        let source = RemoteSource::from_config(&config_for(&base)).unwrap();
        let err = source.get_data(RouteName::Genera).unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, FisheryError::Transport(_)));
    }
}
