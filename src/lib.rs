pub mod auth;
pub mod config;
pub mod core;
pub mod credentials;
pub mod error;
pub mod firestore;
pub mod handlers;
pub mod models;
pub mod repos;
pub mod sqldump;
pub mod state;

use crate::auth::verifier::IdTokenVerifier;
use crate::auth::FirebaseAuth;
use crate::core::middleware::GoogleAuthMiddleware;
use crate::credentials::CredentialError;
use crate::firestore::FirebaseFirestore;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use yup_oauth2::ServiceAccountKey;

/// Process-wide handle to the Firebase backend.
///
/// Built once at startup from a service account key and read-only afterwards.
/// Every service handed out by this struct shares a single authorized HTTP
/// client (transient-retry middleware plus bearer-token middleware).
pub struct FirebaseApp {
    client: ClientWithMiddleware,
    project_id: String,
}

impl FirebaseApp {
    pub fn new(key: ServiceAccountKey) -> Result<Self, CredentialError> {
        let project_id = key
            .project_id
            .clone()
            .ok_or(CredentialError::MissingProjectId)?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(GoogleAuthMiddleware::new(key))
            .build();

        Ok(Self { client, project_id })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn auth(&self) -> FirebaseAuth {
        FirebaseAuth::new(self.client.clone(), self.project_id.clone())
    }

    pub fn firestore(&self) -> FirebaseFirestore {
        FirebaseFirestore::new(self.client.clone(), self.project_id.clone())
    }

    pub fn verifier(&self) -> IdTokenVerifier {
        IdTokenVerifier::new(self.project_id.clone())
    }
}
