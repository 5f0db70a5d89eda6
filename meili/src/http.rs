//! HTTP transport for the Meilisearch API.

use std::time::Duration;

use reqwest::{
    Client as ReqwestClient, Method, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-Meili-Api-Key";

/// HTTP client for the Meilisearch API.
///
/// One instance per [`Client`](crate::Client); shared by reference with
/// every [`Index`](crate::Index) handle derived from it. The underlying
/// connection pool supports concurrent in-flight requests; the pool is
/// released once the last reference drops.
#[derive(Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// `base_url` must not end with a slash. The header set is fixed here:
    /// the API key header (when a key is configured) and the JSON content
    /// type.
    pub(crate) fn new(
        base_url: String,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| Error::Config("api key contains invalid header characters".to_string()))?;
            headers.insert(API_KEY_HEADER, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    /// Returns the base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a GET request.
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request::<(), R>(Method::GET, path, None).await
    }

    /// Sends a POST request with an optional JSON body.
    pub async fn post<T, R>(&self, path: &str, body: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, path, body).await
    }

    /// Sends a PUT request with an optional JSON body.
    pub async fn put<T, R>(&self, path: &str, body: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PUT, path, body).await
    }

    /// Sends a DELETE request.
    pub async fn delete<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.request::<(), R>(Method::DELETE, path, None).await
    }

    /// Sends a request and validates the response.
    ///
    /// Network-level failures map to [`Error::Communication`]; non-2xx
    /// statuses map to [`Error::Api`] with the parsed error envelope.
    pub async fn request<T, R>(&self, method: Method, path: &str, body: Option<&T>) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(self.headers.clone());

        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "sending request");
        let response = request.send().await?;
        self.validate(response).await
    }

    /// Validates a response and deserializes its body.
    async fn validate<R>(&self, response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &body));
        }

        if body.is_empty() {
            // 204s and the health route carry no body; deserialize as JSON
            // null so ()-typed results work.
            return serde_json::from_slice(b"null").map_err(Error::from);
        }

        serde_json::from_slice(&body).map_err(Error::from)
    }
}

/// Parses a non-2xx response body into an API error.
fn parse_error(status_code: u16, body: &[u8]) -> Error {
    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ErrorBody {
        #[serde(default)]
        message: String,
        error_code: Option<String>,
        error_type: Option<String>,
        error_link: Option<String>,
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => Error::Api {
            status_code,
            message: parsed.message,
            error_code: parsed.error_code,
            error_type: parsed.error_type,
            error_link: parsed.error_link,
        },
        Err(_) => Error::Api {
            status_code,
            message: String::from_utf8_lossy(body).to_string(),
            error_code: None,
            error_type: None,
            error_link: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_envelope() {
        let body = br#"{
            "message": "Index movies not found",
            "errorCode": "index_not_found",
            "errorType": "invalid_request_error",
            "errorLink": "https://docs.meilisearch.com/errors#index_not_found"
        }"#;

        match parse_error(404, body) {
            Error::Api {
                status_code,
                message,
                error_code,
                error_type,
                error_link,
            } => {
                assert_eq!(status_code, 404);
                assert_eq!(message, "Index movies not found");
                assert_eq!(error_code.as_deref(), Some("index_not_found"));
                assert_eq!(error_type.as_deref(), Some("invalid_request_error"));
                assert!(error_link.unwrap().contains("index_not_found"));
            }
            other => panic!("expected Api error, got: {other}"),
        }
    }

    #[test]
    fn test_parse_error_non_json_body() {
        match parse_error(502, b"bad gateway") {
            Error::Api {
                status_code,
                message,
                error_code,
                ..
            } => {
                assert_eq!(status_code, 502);
                assert_eq!(message, "bad gateway");
                assert!(error_code.is_none());
            }
            other => panic!("expected Api error, got: {other}"),
        }
    }

    #[test]
    fn test_invalid_api_key_rejected_at_construction() {
        let err = HttpClient::new(
            "http://localhost:7700".to_string(),
            Some("bad\nkey"),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
