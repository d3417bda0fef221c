use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{StartPlayRequest, SubmitAnswerRequest},
};

#[post("/api/plays")]
pub async fn start_play(
    state: web::Data<AppState>,
    request: web::Json<StartPlayRequest>,
) -> Result<HttpResponse, AppError> {
    let play = state.play_service.start_play(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(play))
}

#[get("/api/plays/{id}")]
pub async fn get_play(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let play = state.play_service.get_play(&id).await?;
    Ok(HttpResponse::Ok().json(play))
}

#[post("/api/plays/{id}/answer")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.play_service.submit_answer(&id, &request.answer).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/plays/{id}/timeout")]
pub async fn time_out(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.play_service.time_out(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/plays/{id}/advance")]
pub async fn advance(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let play = state.play_service.advance(&id).await?;
    Ok(HttpResponse::Ok().json(play))
}

#[post("/api/plays/{id}/finish")]
pub async fn finish(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let result = state.play_service.finish(&id).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[delete("/api/plays/{id}")]
pub async fn discard_play(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.play_service.discard(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
