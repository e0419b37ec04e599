//! Cloud Firestore pass-through client.
//!
//! Mirrors the Admin SDK shape: `CollectionReference` / `DocumentReference`
//! for document CRUD, a structured-query builder for filtered and paginated
//! reads, and write batches for bulk loads. Everything maps directly onto
//! the Firestore v1 REST API; no caching or retry policy is added here
//! beyond the transport middleware the shared client is built with.

pub mod batch;
pub mod models;
pub mod query;
pub mod reference;
pub mod snapshot;

#[cfg(test)]
mod tests;

use self::batch::WriteBatch;
use self::query::{ExecutableQuery, Query};
use self::reference::{CollectionReference, DocumentReference};
use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;

const FIRESTORE_V1_API: &str =
    "https://firestore.googleapis.com/v1/projects/{project_id}/databases/(default)/documents";

#[derive(Error, Debug)]
pub enum FirestoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Client for a project's default Firestore database.
#[derive(Clone)]
pub struct FirebaseFirestore {
    client: ClientWithMiddleware,
    base_url: String,
}

impl FirebaseFirestore {
    /// Typically obtained via `FirebaseApp::firestore()`.
    pub fn new(client: ClientWithMiddleware, project_id: String) -> Self {
        let base_url = FIRESTORE_V1_API.replace("{project_id}", &project_id);
        Self { client, base_url }
    }

    /// Points the client at a custom base URL, used by tests to talk to a
    /// mock server instead of Google.
    pub fn new_with_url(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Resource prefix of the database documents root, e.g.
    /// `projects/p/databases/(default)/documents`.
    pub fn resource_root(&self) -> &str {
        match self.base_url.find("/projects/") {
            Some(idx) => &self.base_url[idx + 1..],
            None => &self.base_url,
        }
    }

    /// Full resource name for a slash-separated document path.
    pub fn document_name(&self, document_path: &str) -> String {
        format!("{}/{}", self.resource_root(), document_path)
    }

    pub fn collection(&self, collection_id: &str) -> CollectionReference<'_> {
        CollectionReference {
            client: &self.client,
            path: format!("{}/{}", self.base_url, collection_id),
        }
    }

    pub fn doc(&self, document_path: &str) -> DocumentReference<'_> {
        DocumentReference {
            client: &self.client,
            path: format!("{}/{}", self.base_url, document_path),
        }
    }

    pub fn batch(&self) -> WriteBatch<'_> {
        WriteBatch::new(
            &self.client,
            self.base_url.clone(),
            self.resource_root().to_string(),
        )
    }

    pub fn query(&self, query: Query) -> ExecutableQuery<'_> {
        ExecutableQuery::new(&self.client, self.base_url.clone(), query)
    }
}
