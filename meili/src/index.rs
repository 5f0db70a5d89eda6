//! Index resource handle.

use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{Error, Result},
    http::HttpClient,
    search::{SearchQuery, SearchResponse},
    types::{IndexInfo, IndexStats, UpdateId},
    updates::{
        DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, PollDecision, UpdateStatus, poll_decision,
    },
};

/// Handle on a single Meilisearch index.
///
/// An `Index` is a cheap value descriptor: constructing one performs no
/// network call, and any number of handles may reference the same remote
/// index. Existence is only checked when an operation first hits the
/// server; a handle on a missing index fails with an API error at that
/// point.
#[derive(Clone, Debug)]
pub struct Index {
    uid: String,
    http: Arc<HttpClient>,
}

impl Index {
    pub(crate) fn new(uid: impl Into<String>, http: Arc<HttpClient>) -> Self {
        Self {
            uid: uid.into(),
            http,
        }
    }

    /// Returns the index uid.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Returns a reference to the underlying HTTP client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    // ==================== Metadata ====================

    /// Fetches the index metadata.
    pub async fn info(&self) -> Result<IndexInfo> {
        self.http.get(&format!("/indexes/{}", self.uid)).await
    }

    /// Fetches the index primary key.
    ///
    /// Derived from [`info`](Index::info) on every call, never cached.
    pub async fn get_primary_key(&self) -> Result<Option<String>> {
        Ok(self.info().await?.primary_key)
    }

    /// Sets the index primary key.
    ///
    /// Unlike document mutations this applies immediately; the updated
    /// metadata is returned synchronously.
    pub async fn update(&self, primary_key: &str) -> Result<IndexInfo> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Request<'a> {
            primary_key: &'a str,
        }

        self.http
            .put(
                &format!("/indexes/{}", self.uid),
                Some(&Request { primary_key }),
            )
            .await
    }

    /// Deletes the index.
    ///
    /// Deleting an already-deleted index fails with an API error.
    pub async fn delete(&self) -> Result<()> {
        self.http.delete(&format!("/indexes/{}", self.uid)).await
    }

    /// Fetches the index statistics.
    pub async fn get_stats(&self) -> Result<IndexStats> {
        self.http
            .get(&format!("/indexes/{}/stats", self.uid))
            .await
    }

    // ==================== Documents ====================

    /// Fetches documents, optionally paginated and projected.
    ///
    /// Unset query options are omitted so the server applies its own
    /// defaults.
    pub async fn get_documents<T>(&self, query: Option<&DocumentsQuery>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut path = format!("/indexes/{}/documents", self.uid);
        if let Some(query) = query {
            let qs = query.to_query_string();
            if !qs.is_empty() {
                path.push('?');
                path.push_str(&qs);
            }
        }
        self.http.get(&path).await
    }

    /// Fetches one document by id.
    pub async fn get_document<T>(&self, id: impl Display) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.http
            .get(&format!("/indexes/{}/documents/{}", self.uid, id))
            .await
    }

    /// Adds documents, replacing any existing document with the same id.
    ///
    /// Returns the enqueued update's id immediately; the documents are
    /// only searchable once that update is processed.
    pub async fn add_documents<T>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<UpdateId>
    where
        T: Serialize,
    {
        let path = match primary_key {
            Some(key) => format!("/indexes/{}/documents?primaryKey={}", self.uid, key),
            None => format!("/indexes/{}/documents", self.uid),
        };
        self.http.post(&path, Some(documents)).await
    }

    /// Updates documents, merging fields into existing documents.
    pub async fn update_documents<T>(&self, documents: &[T]) -> Result<UpdateId>
    where
        T: Serialize,
    {
        self.http
            .put(&format!("/indexes/{}/documents", self.uid), Some(documents))
            .await
    }

    /// Deletes one document by id.
    pub async fn delete_document(&self, id: impl Display) -> Result<UpdateId> {
        self.http
            .delete(&format!("/indexes/{}/documents/{}", self.uid, id))
            .await
    }

    /// Deletes a batch of documents by id.
    pub async fn delete_documents<T>(&self, ids: &[T]) -> Result<UpdateId>
    where
        T: Serialize,
    {
        self.http
            .post(
                &format!("/indexes/{}/documents/delete-batch", self.uid),
                Some(ids),
            )
            .await
    }

    /// Deletes all documents in the index.
    pub async fn delete_all_documents(&self) -> Result<UpdateId> {
        self.http
            .delete(&format!("/indexes/{}/documents", self.uid))
            .await
    }

    // ==================== Settings ====================

    /// Declares which attributes can be used as facets.
    pub async fn update_attributes_for_faceting(&self, attributes: &[&str]) -> Result<UpdateId> {
        self.http
            .post(
                &format!("/indexes/{}/settings/attributes-for-faceting", self.uid),
                Some(&attributes),
            )
            .await
    }

    // ==================== Search ====================

    /// Searches the index.
    ///
    /// `query` is the search terms; `None` runs the placeholder search
    /// matching every document. A `query` argument overrides any `q` set
    /// in `params`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use meili::{Client, SearchQuery};
    ///
    /// # async fn run() -> meili::Result<()> {
    /// let client = Client::new("http://localhost:7700")?;
    /// let index = client.get_index("movies");
    ///
    /// let response = index
    ///     .search::<serde_json::Value>(
    ///         Some("dragon"),
    ///         Some(SearchQuery {
    ///             limit: Some(5),
    ///             attributes_to_highlight: Some(vec!["title".to_string()]),
    ///             ..Default::default()
    ///         }),
    ///     )
    ///     .await?;
    ///
    /// for hit in &response.hits {
    ///     println!("{hit}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search<T>(
        &self,
        query: Option<&str>,
        params: Option<SearchQuery>,
    ) -> Result<SearchResponse<T>>
    where
        T: DeserializeOwned,
    {
        let mut body = params.unwrap_or_default();
        if let Some(q) = query {
            body.q = Some(q.to_string());
        }
        self.http
            .post(&format!("/indexes/{}/search", self.uid), Some(&body))
            .await
    }

    // ==================== Updates ====================

    /// Fetches the record of a single update.
    ///
    /// An unknown update id fails with an API error.
    pub async fn get_update_status(&self, update_id: u64) -> Result<UpdateStatus> {
        self.http
            .get(&format!("/indexes/{}/updates/{}", self.uid, update_id))
            .await
    }

    /// Fetches the records of all updates of this index.
    pub async fn get_all_update_status(&self) -> Result<Vec<UpdateStatus>> {
        self.http
            .get(&format!("/indexes/{}/updates", self.uid))
            .await
    }

    /// Waits until an update reaches a terminal state.
    ///
    /// Polls with the default deadline (5 s) and interval (50 ms); see
    /// [`wait_for_pending_update_with`](Index::wait_for_pending_update_with).
    pub async fn wait_for_pending_update(&self, update_id: u64) -> Result<UpdateStatus> {
        self.wait_for_pending_update_with(update_id, DEFAULT_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL)
            .await
    }

    /// Waits until an update reaches a terminal state, polling every
    /// `interval` until `timeout` has elapsed.
    ///
    /// Returns the update record as soon as its status is `processed` or
    /// `failed`. A failed update is a successful wait; inspect
    /// [`UpdateStatus::status`]. If the deadline passes first, fails with
    /// [`Error::Timeout`]; the server-side update is unaffected and can
    /// still be observed or waited on afterwards. An API error from a
    /// status poll (e.g. an unknown update id) propagates immediately and
    /// is never turned into a timeout.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use serde_json::json;
    ///
    /// # async fn run() -> meili::Result<()> {
    /// # let client = meili::Client::new("http://localhost:7700")?;
    /// # let index = client.get_index("movies");
    /// let ack = index
    ///     .add_documents(&[json!({ "id": 1, "title": "Carol" })], None)
    ///     .await?;
    /// let update = index.wait_for_pending_update(ack.update_id).await?;
    /// assert!(update.status.is_terminal());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_pending_update_with(
        &self,
        update_id: u64,
        timeout: Duration,
        interval: Duration,
    ) -> Result<UpdateStatus> {
        let start = Instant::now();
        loop {
            let status = self.get_update_status(update_id).await?;
            match poll_decision(status.status, start.elapsed(), timeout) {
                PollDecision::Return => return Ok(status),
                PollDecision::GiveUp => {
                    tracing::debug!(
                        uid = %self.uid,
                        update_id,
                        ?timeout,
                        "gave up waiting for pending update"
                    );
                    return Err(Error::Timeout { update_id, timeout });
                }
                PollDecision::Retry => tokio::time::sleep(interval).await,
            }
        }
    }
}

/// Pagination and projection options for the documents route.
#[derive(Debug, Clone, Default)]
pub struct DocumentsQuery {
    /// Number of documents to skip.
    pub offset: Option<usize>,

    /// Maximum number of documents to return.
    pub limit: Option<usize>,

    /// Fields to include in the returned documents.
    pub attributes_to_retrieve: Option<Vec<String>>,
}

impl DocumentsQuery {
    fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(offset) = self.offset {
            parts.push(format!("offset={offset}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if let Some(attributes) = &self.attributes_to_retrieve {
            parts.push(format!("attributesToRetrieve={}", attributes.join(",")));
        }
        parts.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_query_empty() {
        assert_eq!(DocumentsQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_documents_query_full() {
        let query = DocumentsQuery {
            offset: Some(1),
            limit: Some(3),
            attributes_to_retrieve: Some(vec!["title".to_string(), "overview".to_string()]),
        };
        assert_eq!(
            query.to_query_string(),
            "offset=1&limit=3&attributesToRetrieve=title,overview"
        );
    }

    #[test]
    fn test_documents_query_partial() {
        let query = DocumentsQuery {
            limit: Some(20),
            ..Default::default()
        };
        assert_eq!(query.to_query_string(), "limit=20");
    }
}
