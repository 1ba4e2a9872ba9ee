//! # HTTP Retrieval Utilities
//!
//! A blocking API client wrapper around `reqwest`. It joins relative paths
//! onto a base URL, retries transient failures with a linear backoff and
//! returns the body as raw JSON.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::configs::FisheryConfig;
use crate::errors::{FisheryError, FisheryResult};

/// A blocking HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying connection-pooling client.
    inner: Client,
    /// The base URL to which all relative paths are joined. Always ends in `/`.
    base_url: Url,
    /// Total attempts per request, including the first one.
    max_attempts: u32,
    /// Backoff step; attempt `n` waits `n * retry_delay` before the next one.
    retry_delay: Duration,
}

impl ApiClient {
    /// Creates a client with the default retry and timeout settings.
    ///
    /// # Errors
    /// Returns `FisheryError::Config` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> FisheryResult<Self> {
        let defaults = FisheryConfig::default();
        Self::build(base_url, defaults.max_attempts, defaults.retry_delay, defaults.timeout)
    }

    /// Creates a client from the resolved configuration.
    pub fn from_config(config: &FisheryConfig) -> FisheryResult<Self> {
        Self::build(
            &config.base_url,
            config.max_attempts,
            config.retry_delay,
            config.timeout,
        )
    }

    fn build(
        base_url: &str,
        max_attempts: u32,
        retry_delay: Duration,
        timeout: Duration,
    ) -> FisheryResult<Self> {
        let mut url = Url::parse(base_url.trim())?;
        if url.cannot_be_a_base() {
            return Err(FisheryError::Config(format!(
                "base URL '{}' cannot be used as a base",
                base_url
            )));
        }
        // A path without a trailing slash would have its last segment replaced by `join`.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fishery/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner,
            base_url: url,
            max_attempts: max_attempts.max(1),
            retry_delay,
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins `path` onto the base URL.
    pub fn url_for(&self, path: &str) -> FisheryResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Performs `GET {base_url}/{path}` and parses the body as JSON.
    ///
    /// Network errors, `5xx` and `429` responses are retried up to
    /// `max_attempts` times; any other non-2xx status fails immediately.
    ///
    /// # Errors
    /// `FisheryError::Transport` when the request never succeeds or the
    /// successful body is not valid JSON.
    pub fn get_json(&self, path: &str) -> FisheryResult<Value> {
        let url = self.url_for(path)?;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            let failure = match self.inner.get(url.clone()).send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text()?;
                        return serde_json::from_str(&body).map_err(|e| {
                            FisheryError::Transport(format!(
                                "response from {} is not valid JSON: {}",
                                url, e
                            ))
                        });
                    }
                    let message = format!("HTTP request failed for {}: Status {}", url, status);
                    if !is_transient(status) {
                        log::error!("{}", message);
                        return Err(FisheryError::Transport(message));
                    }
                    message
                }
                Err(e) => format!("HTTP request failed for {}: {}", url, e),
            };

            if attempts >= self.max_attempts {
                log::error!("{} (giving up after {} attempts)", failure, attempts);
                return Err(FisheryError::Transport(format!(
                    "{} (after {} attempts)",
                    failure, attempts
                )));
            }

            log::warn!("{} (attempt {}/{})", failure, attempts, self.max_attempts);
            thread::sleep(self.retry_delay * attempts);
        }
    }
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Serves the given raw HTTP responses, one per accepted connection.
    pub(crate) fn serve(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
        let port = listener.local_addr().unwrap().port();
        let base = format!("http://127.0.0.1:{}/", port);

        let handle = thread::spawn(move || {
            let mut request_lines = Vec::new();
            for response in responses {
                if let Ok((mut stream, _)) = listener.accept() {
                    let mut buf = [0u8; 2048];
                    let n = stream.read(&mut buf).unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    request_lines.push(request.lines().next().unwrap_or_default().to_string());

                    stream.write_all(response.as_bytes()).unwrap();
                    stream.flush().unwrap();
                }
            }
            request_lines
        });

        (base, handle)
    }

    pub(crate) fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn client(base: &str, attempts: u32) -> ApiClient {
        ApiClient::build(base, attempts, Duration::from_millis(5), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = ApiClient::new("https://fishbase.ropensci.org").unwrap();
        assert_eq!(api.base_url().as_str(), "https://fishbase.ropensci.org/");
        assert_eq!(
            api.url_for("genera").unwrap().as_str(),
            "https://fishbase.ropensci.org/genera"
        );
        assert_eq!(
            api.url_for("/species").unwrap().as_str(),
            "https://fishbase.ropensci.org/species"
        );
    }

    #[test]
    fn trailing_slash_goes_on_the_path_not_the_query() {
        let api = ApiClient::new("http://fish.example/api?k=1").unwrap();
        assert_eq!(api.base_url().path(), "/api/");
        assert_eq!(api.base_url().query(), Some("k=1"));
        assert_eq!(api.url_for("genera").unwrap().as_str(), "http://fish.example/api/genera");
    }

    #[test]
    fn relative_base_url_is_a_config_error() {
        assert!(matches!(ApiClient::new("fishbase"), Err(FisheryError::Config(_))));
    }

    #[test]
    fn get_json_returns_parsed_body() {
        let (base, handle) = serve(vec![http_response("200 OK", r#"{"data": [{"GenName": "Salmo"}]}"#)]);

        let body = client(&base, 1).get_json("genera").unwrap();
        let requests = handle.join().unwrap();

        assert_eq!(body["data"][0]["GenName"], "Salmo");
        assert_eq!(requests, vec!["GET /genera HTTP/1.1".to_string()]);
    }

    #[test]
    fn transient_failures_are_retried() {
        let (base, handle) = serve(vec![
            http_response("503 Service Unavailable", "busy"),
            http_response("200 OK", r#"{"data": []}"#),
        ]);

        let body = client(&base, 3).get_json("species").unwrap();
        let requests = handle.join().unwrap();

        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn client_errors_fail_without_retry() {
        let (base, handle) = serve(vec![http_response("404 Not Found", "{}")]);

        let err = client(&base, 3).get_json("genera").unwrap_err();
        let requests = handle.join().unwrap();

        assert!(matches!(err, FisheryError::Transport(ref m) if m.contains("404")));
        assert_eq!(requests.len(), 1);
    }

    #[test]
    fn exhausted_retries_surface_transport_error() {
        let (base, handle) = serve(vec![
            http_response("500 Internal Server Error", ""),
            http_response("500 Internal Server Error", ""),
        ]);

        let err = client(&base, 2).get_json("genera").unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, FisheryError::Transport(ref m) if m.contains("after 2 attempts")));
    }

    #[test]
    fn unparseable_body_is_a_transport_error() {
        let (base, handle) = serve(vec![http_response("200 OK", "<html>nope</html>")]);

        let err = client(&base, 1).get_json("genera").unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, FisheryError::Transport(ref m) if m.contains("not valid JSON")));
    }
}
