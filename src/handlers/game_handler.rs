use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{CreateGameRequest, GameAnswerRequest},
};

#[post("/api/games")]
pub async fn create_game(
    state: web::Data<AppState>,
    request: web::Json<CreateGameRequest>,
) -> Result<HttpResponse, AppError> {
    let game = state.game_service.create_game(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(game))
}

#[get("/api/games/{id}")]
pub async fn get_game(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let game = state.game_service.get_game(&id).await?;
    Ok(HttpResponse::Ok().json(game))
}

#[post("/api/games/{id}/answer")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<GameAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .game_service
        .submit_answer(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/games/{id}/next")]
pub async fn next_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let game = state.game_service.next_question(&id).await?;
    Ok(HttpResponse::Ok().json(game))
}

#[post("/api/games/{id}/end")]
pub async fn end_game(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let game = state.game_service.end_game(&id).await?;
    Ok(HttpResponse::Ok().json(game))
}

#[delete("/api/games/{id}")]
pub async fn discard_game(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.game_service.discard(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
