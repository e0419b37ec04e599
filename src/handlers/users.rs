use crate::error::AppError;
use crate::models::{Client, Gender};
use crate::repos::Keyed;
use crate::state::AppState;
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(create_user)
        .service(patch_user)
        .service(delete_user);
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub cursor_after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserIn {
    pub name: String,
    pub gender: Gender,
    pub age: i64,
    pub username: String,
    pub password: String,
}

#[get("/api/users")]
async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let page = state
        .clients
        .list::<Client>(query.limit, query.cursor_after.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/api/users/{id}")]
async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let client: Client = state.clients.get(&id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(Keyed { id, data: client }))
}

#[post("/api/users")]
async fn create_user(
    state: web::Data<AppState>,
    payload: web::Json<UserIn>,
) -> Result<impl Responder, AppError> {
    let payload = payload.into_inner();
    let now = Utc::now();
    let client = Client {
        name: payload.name,
        gender: payload.gender,
        age: payload.age,
        username: payload.username,
        password: payload.password,
        created_at: Some(now),
        updated_at: Some(now),
    };
    let id = state.clients.create(&client).await?;
    Ok(HttpResponse::Ok().json(Keyed { id, data: client }))
}

#[patch("/api/users/{id}")]
async fn patch_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<serde_json::Value>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let payload = payload.into_inner();
    if !payload.is_object() {
        return Err(AppError::Validation("patch body must be a JSON object".into()));
    }

    // match the original's 404-before-update behavior
    let existing: Option<Client> = state.clients.get(&id).await?;
    if existing.is_none() {
        return Err(AppError::NotFound);
    }

    state.clients.patch(&id, &payload).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[delete("/api/users/{id}")]
async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.clients.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
