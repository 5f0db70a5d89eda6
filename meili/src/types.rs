//! Common types for the Meilisearch API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Index Metadata ====================

/// Index metadata returned by the index routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    /// Unique index identifier.
    pub uid: String,

    /// Document field used as the unique identifier, if one is set.
    #[serde(default)]
    pub primary_key: Option<String>,

    /// When the index was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the index was last updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Options for index creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexOptions {
    /// Document field to use as the unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

// ==================== Update Acknowledgement ====================

/// Acknowledgement of an enqueued update.
///
/// Returned immediately by every mutating document or settings call; the
/// mutation is only guaranteed applied once the update with this id
/// reaches a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateId {
    /// Identifier to poll via the update routes.
    pub update_id: u64,
}

// ==================== Instance Administration ====================

/// Version of the Meilisearch instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub pkg_version: String,
    pub commit_sha: String,
    pub build_date: String,
}

/// API keys of the Meilisearch instance.
///
/// Both keys are absent when the instance runs without a master key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keys {
    #[serde(default)]
    pub public: Option<String>,
    #[serde(default)]
    pub private: Option<String>,
}

/// Instance-wide statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    /// Size of the database on disk, in bytes.
    pub database_size: u64,

    /// When any index was last updated.
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,

    /// Per-index statistics, keyed by index uid.
    #[serde(default)]
    pub indexes: HashMap<String, IndexStats>,
}

/// Statistics of a single index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub number_of_documents: u64,

    /// True while an update is being applied to the index.
    pub is_indexing: bool,

    /// Number of documents containing each field.
    #[serde(default)]
    pub fields_distribution: HashMap<String, u64>,
}

// ==================== Dumps ====================

/// Status of a dump creation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpStatus {
    /// Dump creation is running.
    Processing,
    /// The dump file is ready.
    Done,
    /// Dump creation failed.
    Failed,
}

/// A dump creation task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dump {
    /// Dump identifier, usable with the dump status route.
    pub uid: String,

    /// Current status.
    pub status: DumpStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_info_parses_null_primary_key() {
        let body = r#"{
            "uid": "movies",
            "primaryKey": null,
            "createdAt": "2019-11-20T09:40:33.711324Z",
            "updatedAt": "2019-11-20T09:40:33.711324Z"
        }"#;

        let info: IndexInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.uid, "movies");
        assert!(info.primary_key.is_none());
        assert!(info.created_at.is_some());
    }

    #[test]
    fn test_index_options_omits_unset_primary_key() {
        let options = IndexOptions::default();
        assert_eq!(serde_json::to_string(&options).unwrap(), "{}");

        let options = IndexOptions {
            primary_key: Some("book_id".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"primaryKey":"book_id"}"#
        );
    }

    #[test]
    fn test_update_id_wire_name() {
        let ack: UpdateId = serde_json::from_str(r#"{"updateId":2}"#).unwrap();
        assert_eq!(ack.update_id, 2);
    }

    #[test]
    fn test_client_stats_parse() {
        let body = r#"{
            "databaseSize": 447819776,
            "lastUpdate": "2019-11-15T11:15:22.092896Z",
            "indexes": {
                "movies": {
                    "numberOfDocuments": 19654,
                    "isIndexing": false,
                    "fieldsDistribution": { "poster": 19654, "title": 19654 }
                }
            }
        }"#;

        let stats: ClientStats = serde_json::from_str(body).unwrap();
        assert_eq!(stats.database_size, 447819776);
        assert!(stats.last_update.is_some());
        let movies = &stats.indexes["movies"];
        assert_eq!(movies.number_of_documents, 19654);
        assert!(!movies.is_indexing);
        assert_eq!(movies.fields_distribution["title"], 19654);
    }

    #[test]
    fn test_dump_status_wire_names() {
        let dump: Dump =
            serde_json::from_str(r#"{"uid":"20200929-114144097","status":"processing"}"#).unwrap();
        assert_eq!(dump.status, DumpStatus::Processing);
        let dump: Dump =
            serde_json::from_str(r#"{"uid":"20200929-114144097","status":"done"}"#).unwrap();
        assert_eq!(dump.status, DumpStatus::Done);
    }
}
