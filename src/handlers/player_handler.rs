use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::Value;

use crate::{app_state::AppState, errors::AppError, models::dto::request::CreatePlayerRequest};

#[post("/api/players")]
pub async fn create_player(
    state: web::Data<AppState>,
    request: web::Json<CreatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let player = state.player_service.create_player(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(player))
}

#[get("/api/players/{id}")]
pub async fn get_player(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let player = state.player_service.get_player(&id).await?;
    Ok(HttpResponse::Ok().json(player))
}

#[post("/api/players/{id}/login")]
pub async fn record_login(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let player = state.player_service.record_login(&id).await?;
    Ok(HttpResponse::Ok().json(player))
}

#[post("/api/players/{id}/favorites/{quiz_id}")]
pub async fn add_favorite(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, quiz_id) = path.into_inner();
    let player = state.player_service.add_favorite(&id, &quiz_id).await?;
    Ok(HttpResponse::Ok().json(player))
}

#[delete("/api/players/{id}/favorites/{quiz_id}")]
pub async fn remove_favorite(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, quiz_id) = path.into_inner();
    let player = state.player_service.remove_favorite(&id, &quiz_id).await?;
    Ok(HttpResponse::Ok().json(player))
}

#[patch("/api/players/{id}/settings")]
pub async fn update_settings(
    state: web::Data<AppState>,
    id: web::Path<String>,
    settings: web::Json<HashMap<String, Value>>,
) -> Result<HttpResponse, AppError> {
    let player = state
        .player_service
        .update_settings(&id, settings.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(player))
}
