use crate::error::AppError;
use crate::state::AppState;
use actix_files::NamedFile;
use actix_web::http::Method;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(health);
}

#[get("/")]
async fn index(state: web::Data<AppState>) -> Result<NamedFile, AppError> {
    open_template(&state, "index").await
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Catch-all page route: `GET /{page}` serves `templates/{page}.html` when
/// that file exists. Registered as the app's default service so every API
/// route takes precedence.
pub async fn page(req: HttpRequest, state: web::Data<AppState>) -> Result<NamedFile, AppError> {
    if req.method() != Method::GET {
        return Err(AppError::NotFound);
    }
    let name = req.path().trim_matches('/');
    if !is_valid_page_name(name) {
        return Err(AppError::NotFound);
    }
    open_template(&state, name).await
}

/// A page is a single path segment; anything with separators or dots can
/// never name a template, and never escapes the template directory.
fn is_valid_page_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

async fn open_template(state: &AppState, name: &str) -> Result<NamedFile, AppError> {
    let path = state.template_dir.join(format!("{}.html", name));
    if !path.is_file() {
        return Err(AppError::NotFound);
    }
    Ok(NamedFile::open_async(path).await?)
}
