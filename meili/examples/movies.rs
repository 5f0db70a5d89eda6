//! End-to-end walkthrough: index lifecycle, ingestion, search.
//!
//! Run with:
//! ```bash
//! export MEILI_URL="http://127.0.0.1:7700"
//! export MEILI_MASTER_KEY="masterKey"
//! cargo run --example movies
//! ```

use std::env;

use meili::{Client, FacetFilter, SearchQuery};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let url = env::var("MEILI_URL").unwrap_or_else(|_| "http://127.0.0.1:7700".to_string());
    let mut builder = Client::builder(url);
    if let Ok(key) = env::var("MEILI_MASTER_KEY") {
        builder = builder.api_key(key);
    }
    let client = builder.build()?;

    let version = client.get_version().await?;
    println!("connected to Meilisearch {}", version.pkg_version);

    // Create the index and ingest a few documents.
    let movies = client.get_or_create_index("movies", None).await?;

    let ack = movies
        .add_documents(
            &[
                json!({ "id": 1, "title": "Carol", "genre": "drama" }),
                json!({ "id": 2, "title": "Wonder Woman", "genre": "action" }),
                json!({ "id": 3, "title": "Life of Pi", "genre": "adventure" }),
                json!({ "id": 4, "title": "Mad Max: Fury Road", "genre": "action" }),
            ],
            Some("id"),
        )
        .await?;

    // Document mutations are asynchronous; block until this one lands.
    let update = movies.wait_for_pending_update(ack.update_id).await?;
    println!("update {} -> {:?}", update.update_id, update.status);

    // Plain search.
    let results = movies.search::<serde_json::Value>(Some("wonder"), None).await?;
    println!("\n\"wonder\": {} hits in {} ms", results.nb_hits, results.processing_time_ms);
    for hit in &results.hits {
        println!("  {}", hit["title"]);
    }

    // Faceted search.
    let ack = movies.update_attributes_for_faceting(&["genre"]).await?;
    movies.wait_for_pending_update(ack.update_id).await?;

    let results = movies
        .search::<serde_json::Value>(
            None,
            Some(SearchQuery {
                facet_filters: Some(vec![FacetFilter::from("genre:action")]),
                facets_distribution: Some(vec!["genre".to_string()]),
                ..Default::default()
            }),
        )
        .await?;
    println!("\ngenre=action: {} hits", results.hits.len());
    if let Some(facets) = &results.facets_distribution {
        println!("genre distribution: {:?}", facets["genre"]);
    }

    movies.delete().await?;
    client.close();

    Ok(())
}
