use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{CreateQuestionRequest, CreateQuizRequest, UpdateQuizRequest},
        response::{DeleteResponse, QuestionView, QuizDetails},
    },
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

// Registered before `/api/quizzes/{id}` so the literal paths win.
#[get("/api/quizzes/popular")]
pub async fn list_popular(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_popular(query.limit).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/quizzes/recent")]
pub async fn list_recent(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_recent(query.limit).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/authors/{author_id}/quizzes")]
pub async fn list_by_author(
    state: web::Data<AppState>,
    author_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_by_author(&author_id).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.load_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(QuizDetails::from(quiz)))
}

#[post("/api/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.create_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(QuizDetails::from(quiz)))
}

#[put("/api/quizzes/{id}")]
pub async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.update_quiz(&id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(QuizDetails::from(quiz)))
}

#[delete("/api/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    state.quiz_service.delete_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { id, deleted: true }))
}

#[post("/api/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state.quiz_service.create_question(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(QuestionView::from(&question)))
}

#[delete("/api/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    state.quiz_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { id, deleted: true }))
}

/// Streams the question's media through the configured store.
#[get("/api/questions/{id}/media")]
pub async fn get_question_media(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let question = state.quiz_service.get_question(&id).await?;
    let media_url = question
        .media_url
        .ok_or_else(|| AppError::NotFound(format!("Question '{}' has no media", question.id)))?;

    let payload = state.media_store.resolve(&media_url).await?;
    let content_type = payload
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(HttpResponse::Ok().content_type(content_type).body(payload.bytes))
}
