use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use natural_beauty::config::AppConfig;
use natural_beauty::state::AppState;
use natural_beauty::{credentials, handlers, FirebaseApp};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config_file =
        std::env::var("APP_CONFIG").unwrap_or_else(|_| "app-config.toml".to_string());
    let config = AppConfig::load(&config_file).context("failed to load configuration")?;

    // no credential, no server
    let key = credentials::load_service_account_key(&config.firebase.credentials_path)
        .context("a valid service account credential is required at startup")?;
    let app = FirebaseApp::new(key)?;
    log::info!("firebase project: {}", app.project_id());

    let state = web::Data::new(AppState::new(&app, &config));
    let static_dir = config.site.static_dir.clone();
    let address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("starting server on {}", address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
            .service(Files::new("/static", static_dir.clone()))
            // template pages resolve last so they can never shadow a route
            .default_service(web::route().to(handlers::pages::page))
    })
    .bind(&address)?
    .run()
    .await?;

    Ok(())
}
