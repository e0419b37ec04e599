//! Loads the MySQL dump fixtures into Firestore.
//!
//! Parses `INSERT` statements straight from the dump text (no MySQL server
//! involved), stamps each row with load timestamps, and merge-upserts the
//! rows as `clients/{client_id}` and `products/{product_id}`.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use natural_beauty::config::AppConfig;
use natural_beauty::firestore::FirebaseFirestore;
use natural_beauty::sqldump::{clients_from_dump, products_from_dump};
use natural_beauty::{credentials, FirebaseApp};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

// Firestore caps a commit at 500 writes; leave headroom.
const BATCH_SIZE: usize = 400;

#[derive(Parser, Debug)]
#[command(
    name = "migrate",
    about = "Parse the MySQL dump fixtures and batch-load them into Firestore"
)]
struct Args {
    /// Path to the client table dump
    #[arg(long, default_value = "data/natural_beauty_client.sql")]
    client_sql: PathBuf,

    /// Path to the product table dump
    #[arg(long, default_value = "data/natural_beauty_product.sql")]
    product_sql: PathBuf,

    /// Application config file (for the credential path)
    #[arg(long, default_value = "app-config.toml")]
    config: String,

    /// Clear the target collections before loading
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();

    let config = AppConfig::load(&args.config).context("failed to load configuration")?;
    let key = credentials::load_service_account_key(&config.firebase.credentials_path)
        .context("a valid service account credential is required")?;
    let app = FirebaseApp::new(key)?;
    let db = app.firestore();

    if args.reset {
        for collection in ["clients", "products"] {
            clear_collection(&db, collection).await?;
        }
    }

    let client_sql = fs::read_to_string(&args.client_sql)
        .with_context(|| format!("failed to read {}", args.client_sql.display()))?;
    let mut clients = clients_from_dump(&client_sql)?;
    log::info!("found {} clients", clients.len());
    let now = Utc::now();
    for (_, client) in &mut clients {
        client.created_at = Some(now);
        client.updated_at = Some(now);
    }
    batch_upsert(&db, "clients", &clients).await?;

    let product_sql = fs::read_to_string(&args.product_sql)
        .with_context(|| format!("failed to read {}", args.product_sql.display()))?;
    let mut products = products_from_dump(&product_sql)?;
    log::info!("found {} products", products.len());
    for (_, product) in &mut products {
        product.created_at = Some(now);
        product.updated_at = Some(now);
    }
    batch_upsert(&db, "products", &products).await?;

    log::info!("migration completed successfully");
    Ok(())
}

async fn batch_upsert<T: Serialize>(
    db: &FirebaseFirestore,
    collection: &str,
    rows: &[(String, T)],
) -> anyhow::Result<()> {
    let mut committed = 0;
    for chunk in rows.chunks(BATCH_SIZE) {
        let mut batch = db.batch();
        for (id, row) in chunk {
            batch.set_merge(&format!("{}/{}", collection, id), row)?;
        }
        batch.commit().await?;
        committed += chunk.len();
        log::info!("[{}] committed {}/{}", collection, committed, rows.len());
    }
    Ok(())
}

async fn clear_collection(db: &FirebaseFirestore, collection: &str) -> anyhow::Result<()> {
    log::info!("clearing collection {}", collection);
    loop {
        let page = db.collection(collection).list_documents().await?;
        if page.documents.is_empty() {
            return Ok(());
        }
        for docs in page.documents.chunks(BATCH_SIZE) {
            let mut batch = db.batch();
            for doc in docs {
                let id = doc.name.rsplit('/').next().unwrap_or_default();
                batch.delete(&format!("{}/{}", collection, id));
            }
            batch.commit().await?;
        }
    }
}
