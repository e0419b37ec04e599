use crate::error::AppError;
use crate::models::{Client, Product};
use crate::repos::Keyed;
use crate::state::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_clients)
        .service(get_client)
        .service(delete_client)
        .service(list_products)
        .service(get_product)
        .service(delete_product)
        .service(promote);
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub cursor_after: Option<String>,
}

#[get("/admin/clients")]
async fn list_clients(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let page = state
        .clients
        .list::<Client>(query.limit, query.cursor_after.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/admin/clients/{id}")]
async fn get_client(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let client: Client = state.clients.get(&id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(Keyed { id, data: client }))
}

#[post("/admin/clients/{id}/delete")]
async fn delete_client(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.clients.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[get("/admin/products")]
async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let page = state
        .products
        .list::<Product>(query.limit, query.cursor_after.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/admin/products/{id}")]
async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let product: Product = state.products.get(&id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(Keyed { id, data: product }))
}

#[post("/admin/products/{id}/delete")]
async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.products.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Grants the `admin` custom claim; consumed by Firestore security rules,
/// not enforced by this layer.
#[post("/admin/promote/{uid}")]
async fn promote(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let uid = path.into_inner();
    let user = state
        .auth
        .set_custom_claims(&uid, &json!({ "admin": true }))
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "uid": user.local_id,
        "admin": true
    })))
}
