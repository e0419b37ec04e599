use crate::auth::verifier::IdTokenVerifier;
use crate::auth::FirebaseAuth;
use crate::config::AppConfig;
use crate::repos::CollectionRepo;
use crate::FirebaseApp;
use std::path::PathBuf;
use std::sync::Arc;

/// Per-process application state shared across request handlers.
pub struct AppState {
    pub auth: FirebaseAuth,
    pub verifier: IdTokenVerifier,
    pub clients: CollectionRepo,
    pub products: CollectionRepo,
    pub template_dir: PathBuf,
}

impl AppState {
    pub fn new(app: &FirebaseApp, config: &AppConfig) -> Self {
        let db = Arc::new(app.firestore());
        Self {
            auth: app.auth(),
            verifier: app.verifier(),
            clients: CollectionRepo::new(db.clone(), "clients"),
            products: CollectionRepo::new(db, "products"),
            template_dir: PathBuf::from(&config.site.template_dir),
        }
    }
}
