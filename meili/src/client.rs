//! Meilisearch API client.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    http::HttpClient,
    index::Index,
    types::{ClientStats, Dump, IndexInfo, IndexOptions, Keys, Version},
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Meilisearch API client.
///
/// The client owns the HTTP connection pool and hands out [`Index`]
/// handles sharing it. Configuration is immutable after construction.
///
/// # Example
///
/// ```rust,no_run
/// use meili::Client;
///
/// # async fn run() -> meili::Result<()> {
/// let client = Client::builder("http://localhost:7700")
///     .api_key("masterKey")
///     .build()?;
///
/// let index = client.get_or_create_index("movies", None).await?;
/// let version = client.get_version().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone, Debug)]
struct ClientConfig {
    url: String,
    api_key: Option<String>,
}

impl Client {
    /// Creates a new client without an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is empty or not a valid URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(url).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    /// Returns the configured instance URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    /// Returns a reference to the internal HTTP client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    // ==================== Indexes ====================

    /// Returns a handle on the index with this uid.
    ///
    /// No network call is made and the index is not checked for
    /// existence; the first operation on the handle is where a missing
    /// index surfaces as an API error.
    pub fn get_index(&self, uid: impl Into<String>) -> Index {
        Index::new(uid, self.http.clone())
    }

    /// Creates an index.
    ///
    /// Index creation is synchronous in this API: the returned handle is
    /// usable immediately. Creating an index that already exists fails
    /// with an API error carrying the `index_already_exists` code.
    pub async fn create_index(&self, uid: &str, options: Option<IndexOptions>) -> Result<Index> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Request<'a> {
            uid: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            primary_key: Option<String>,
        }

        let request = Request {
            uid,
            primary_key: options.and_then(|options| options.primary_key),
        };

        let info: IndexInfo = self.http.post("/indexes", Some(&request)).await?;
        Ok(Index::new(info.uid, self.http.clone()))
    }

    /// Returns a handle on the index with this uid, creating the index if
    /// it does not exist.
    ///
    /// Safe under concurrent callers: when two callers race on creation,
    /// the loser observes `index_already_exists` and treats it as
    /// success. Any other error propagates.
    pub async fn get_or_create_index(
        &self,
        uid: &str,
        options: Option<IndexOptions>,
    ) -> Result<Index> {
        let index = self.get_index(uid);
        match index.info().await {
            Ok(_) => Ok(index),
            Err(err) if err.is_not_found() => match self.create_index(uid, options).await {
                Ok(index) => Ok(index),
                // Lost a creation race with a concurrent caller.
                Err(err) if err.is_index_already_exists() => Ok(self.get_index(uid)),
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Lists all indexes of the instance.
    pub async fn get_indexes(&self) -> Result<Vec<IndexInfo>> {
        self.http.get("/indexes").await
    }

    // ==================== Administration ====================

    /// Fetches instance-wide statistics.
    pub async fn get_all_stats(&self) -> Result<ClientStats> {
        self.http.get("/stats").await
    }

    /// Fetches the instance version.
    pub async fn get_version(&self) -> Result<Version> {
        self.http.get("/version").await
    }

    /// Checks that the instance is up.
    pub async fn health(&self) -> Result<()> {
        self.http.get("/").await
    }

    /// Fetches the public and private API keys.
    pub async fn get_keys(&self) -> Result<Keys> {
        self.http.get("/keys").await
    }

    /// Triggers the creation of a dump of the whole instance.
    pub async fn create_dump(&self) -> Result<Dump> {
        self.http.post::<(), Dump>("/dumps", None).await
    }

    /// Fetches the status of a dump creation task.
    pub async fn get_dump_status(&self, uid: &str) -> Result<Dump> {
        self.http.get(&format!("/dumps/{uid}/status")).await
    }

    // ==================== Lifecycle ====================

    /// Closes the client.
    ///
    /// Consumes the facade; pooled connections are released once the last
    /// [`Index`] handle sharing the pool is dropped too. Using a closed
    /// client is a compile error rather than a runtime one.
    pub fn close(self) {}
}

/// Builder for creating a Meilisearch client.
pub struct ClientBuilder {
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the API key sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.url.is_empty() {
            return Err(Error::Config("url must be non-empty".to_string()));
        }
        url::Url::parse(&self.url)
            .map_err(|err| Error::Config(format!("invalid url {:?}: {err}", self.url)))?;

        let base_url = self.url.trim_end_matches('/').to_string();
        let http = HttpClient::new(base_url, self.api_key.as_deref(), self.timeout)?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                url: self.url,
                api_key: self.api_key,
            },
        })
    }
}
