use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, Quiz},
        dto::request::{CreateQuestionRequest, CreateQuizRequest, UpdateQuizRequest},
    },
    repositories::QuizRepository,
};

pub const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    /// Quiz document without its questions.
    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        let quiz = self
            .repository
            .find_quiz(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        Ok(quiz)
    }

    /// Quiz with its questions materialized in `questionIds` order.
    pub async fn load_quiz(&self, id: &str) -> AppResult<Quiz> {
        let mut quiz = self.get_quiz(id).await?;
        let questions = self.load_questions(&quiz.question_ids).await?;
        quiz.set_questions(questions);
        Ok(quiz)
    }

    pub async fn load_questions(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let questions = self.repository.find_questions_by_ids(ids).await?;
        if questions.len() != ids.len() {
            let missing: Vec<&str> = ids
                .iter()
                .filter(|id| !questions.iter().any(|q| &q.id == *id))
                .map(String::as_str)
                .collect();
            return Err(AppError::NotFound(format!(
                "Questions not found: {}",
                missing.join(", ")
            )));
        }
        Ok(questions)
    }

    pub async fn get_question(&self, id: &str) -> AppResult<Question> {
        self.repository
            .find_question(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;
        reject_duplicate_ids(&request.question_ids)?;

        let questions = self.load_questions(&request.question_ids).await?;

        let mut quiz = Quiz::new(
            &request.title,
            &request.author_id,
            request.game_mode.unwrap_or_default(),
        );
        quiz.description = request.description;
        quiz.image_url = request.image_url;
        quiz.category = request.category;
        quiz.sub_category = request.sub_category;
        quiz.author_name = request.author_name;
        quiz.custom_rules = request.custom_rules;
        if let Some(difficulty) = request.difficulty {
            quiz.difficulty = difficulty;
        }
        if let Some(is_public) = request.is_public {
            quiz.is_public = is_public;
        }
        if let Some(time_limit) = request.time_limit {
            quiz.time_limit = time_limit;
        }
        quiz.set_questions(questions);

        self.repository.create_quiz(quiz.clone()).await?;
        log::info!("Created quiz {} with {} questions", quiz.id, quiz.question_ids.len());
        Ok(quiz)
    }

    /// Stores a new question, appending it to `quiz_id` when one is given.
    /// The question document is removed again if the quiz update fails.
    pub async fn create_question(&self, request: CreateQuestionRequest) -> AppResult<Question> {
        request.validate()?;

        let mut question = Question::new(&Uuid::new_v4().to_string(), &request.text, request.question_type);
        question.options = request.options;
        question.correct_option = request.correct_option;
        question.correct_answers = request.correct_answers;
        question.media_url = request.media_url;
        question.media_type = request.media_type;
        question.explanation = request.explanation;
        question.category = request.category;
        question.created_by = request.created_by;
        if let Some(difficulty) = request.difficulty {
            question.difficulty = difficulty;
        }
        if let Some(points) = request.points {
            question.points = points;
        }
        if let Some(time_limit) = request.time_limit {
            question.time_limit = time_limit;
        }
        question.validate_playable()?;

        let target = match &request.quiz_id {
            Some(quiz_id) => Some(self.load_quiz(quiz_id).await?),
            None => None,
        };

        self.repository.add_question(question.clone()).await?;

        if let Some(mut quiz) = target {
            quiz.add_question(question.clone());
            if let Err(err) = self.repository.update_quiz(quiz).await {
                if let Err(cleanup) = self.repository.delete_question(&question.id).await {
                    log::warn!("Failed to remove orphaned question {}: {}", question.id, cleanup);
                }
                return Err(err);
            }
        }
        Ok(question)
    }

    pub async fn update_quiz(&self, id: &str, request: UpdateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let mut quiz = self.load_quiz(id).await?;
        if let Some(title) = request.title {
            quiz.title = title;
        }
        if let Some(description) = request.description {
            quiz.description = Some(description);
        }
        if let Some(category) = request.category {
            quiz.category = Some(category);
        }
        if let Some(game_mode) = request.game_mode {
            quiz.game_mode = game_mode;
        }
        if let Some(difficulty) = request.difficulty {
            quiz.difficulty = difficulty;
        }
        if let Some(is_public) = request.is_public {
            quiz.is_public = is_public;
        }
        if let Some(time_limit) = request.time_limit {
            quiz.time_limit = time_limit;
        }
        if let Some(question_ids) = request.question_ids {
            reject_duplicate_ids(&question_ids)?;
            let questions = self.load_questions(&question_ids).await?;
            quiz.set_questions(questions);
        }
        quiz.updated_at = Some(Utc::now());

        self.repository.update_quiz(quiz).await
    }

    pub async fn record_play(&self, quiz_id: &str) -> AppResult<()> {
        self.repository.increment_play_count(quiz_id).await
    }

    pub async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        self.repository.delete_quiz(id).await?;
        log::info!("Deleted quiz {}", id);
        Ok(())
    }

    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        self.repository.delete_question(id).await
    }

    pub async fn list_popular(&self, limit: Option<i64>) -> AppResult<Vec<Quiz>> {
        self.repository.list_popular(clamp_limit(limit)).await
    }

    pub async fn list_recent(&self, limit: Option<i64>) -> AppResult<Vec<Quiz>> {
        self.repository.list_recent(clamp_limit(limit)).await
    }

    pub async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<Quiz>> {
        self.repository.list_by_author(author_id).await
    }
}

fn reject_duplicate_ids(ids: &[String]) -> AppResult<()> {
    let mut seen = HashSet::new();
    match ids.iter().find(|id| !seen.insert(*id)) {
        Some(id) => Err(AppError::ValidationError(format!(
            "Question '{}' is listed more than once",
            id
        ))),
        None => Ok(()),
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{GameMode, QuestionType};
    use crate::repositories::quiz_repository::MockQuizRepository;
    use mockall::predicate::eq;

    fn stored_quiz() -> Quiz {
        let mut quiz = Quiz::new("Capitals", "author-1", GameMode::Standard);
        quiz.id = "quiz-1".to_string();
        quiz.question_ids = vec!["q1".to_string(), "q2".to_string()];
        quiz
    }

    fn stored_questions() -> Vec<Question> {
        vec![
            Question::single_choice("q1", "Capital of France?", &["Paris", "Rome"], "Paris"),
            Question::free_text("q2", "Capital of Japan?", "Tokyo"),
        ]
    }

    #[tokio::test]
    async fn get_quiz_maps_missing_to_not_found() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_quiz().returning(|_| Ok(None));

        let service = QuizService::new(Arc::new(repo));
        let result = service.get_quiz("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn load_quiz_materializes_questions_in_order() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_quiz()
            .with(eq("quiz-1"))
            .returning(|_| Ok(Some(stored_quiz())));
        repo.expect_find_questions_by_ids()
            .returning(|_| Ok(stored_questions()));

        let service = QuizService::new(Arc::new(repo));
        let quiz = service.load_quiz("quiz-1").await.expect("quiz should load");

        assert_eq!(quiz.questions.len(), 2);
        assert!(quiz.is_consistent());
        assert_eq!(quiz.max_possible_score(), 20);
    }

    #[tokio::test]
    async fn load_quiz_reports_missing_question_ids() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_quiz().returning(|_| Ok(Some(stored_quiz())));
        repo.expect_find_questions_by_ids()
            .returning(|_| Ok(vec![Question::free_text("q2", "Capital of Japan?", "Tokyo")]));

        let service = QuizService::new(Arc::new(repo));
        let result = service.load_quiz("quiz-1").await;

        match result {
            Err(AppError::NotFound(message)) => assert!(message.contains("q1")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_question_rejects_unplayable_choice() {
        let repo = MockQuizRepository::new();
        let service = QuizService::new(Arc::new(repo));

        let request = CreateQuestionRequest {
            quiz_id: None,
            text: "Pick one".to_string(),
            question_type: QuestionType::SingleChoice,
            options: vec!["only".to_string()],
            correct_option: Some("only".to_string()),
            correct_answers: None,
            media_url: None,
            media_type: None,
            explanation: None,
            difficulty: None,
            category: None,
            points: None,
            time_limit: None,
            created_by: None,
        };

        let result = service.create_question(request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn create_question_appends_to_quiz() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_quiz().returning(|_| Ok(Some(stored_quiz())));
        repo.expect_find_questions_by_ids()
            .returning(|_| Ok(stored_questions()));
        repo.expect_add_question()
            .times(1)
            .returning(|q| Ok(q.id));
        repo.expect_update_quiz()
            .times(1)
            .withf(|quiz| quiz.question_ids.len() == 3 && quiz.is_consistent())
            .returning(Ok);

        let service = QuizService::new(Arc::new(repo));
        let request = CreateQuestionRequest {
            quiz_id: Some("quiz-1".to_string()),
            text: "Capital of Italy?".to_string(),
            question_type: QuestionType::FreeText,
            options: Vec::new(),
            correct_option: None,
            correct_answers: Some(vec!["Rome".to_string()]),
            media_url: None,
            media_type: None,
            explanation: None,
            difficulty: Some(2),
            category: Some("Geography".to_string()),
            points: Some(15),
            time_limit: None,
            created_by: None,
        };

        let question = service.create_question(request).await.expect("question should be created");
        assert_eq!(question.points, 15);
        assert!(!question.id.is_empty());
    }

    #[tokio::test]
    async fn load_questions_repeats_ids_listed_twice() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_questions_by_ids()
            .returning(|ids| Ok(crate::repositories::quiz_repository::order_by_ids(ids, stored_questions())));

        let service = QuizService::new(Arc::new(repo));
        let questions = service
            .load_questions(&["q1".to_string(), "q1".to_string()])
            .await
            .expect("repeated ids should load");

        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.id == "q1"));
    }

    #[tokio::test]
    async fn create_and_update_reject_duplicate_question_ids() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_quiz().returning(|_| Ok(Some(stored_quiz())));
        repo.expect_find_questions_by_ids()
            .returning(|_| Ok(stored_questions()));
        repo.expect_create_quiz().never();
        repo.expect_update_quiz().never();

        let service = QuizService::new(Arc::new(repo));
        let duplicated = vec!["q1".to_string(), "q2".to_string(), "q1".to_string()];

        let created = service
            .create_quiz(CreateQuizRequest {
                title: "Capitals".to_string(),
                description: None,
                image_url: None,
                category: None,
                sub_category: None,
                author_id: "author-1".to_string(),
                author_name: None,
                question_ids: duplicated.clone(),
                game_mode: None,
                difficulty: None,
                is_public: None,
                time_limit: None,
                custom_rules: None,
            })
            .await;
        assert!(matches!(created, Err(AppError::ValidationError(message)) if message.contains("q1")));

        let updated = service
            .update_quiz(
                "quiz-1",
                UpdateQuizRequest {
                    question_ids: Some(duplicated),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(updated, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn create_question_removes_document_when_quiz_update_fails() {
        let mut repo = MockQuizRepository::new();
        repo.expect_find_quiz().returning(|_| Ok(Some(stored_quiz())));
        repo.expect_find_questions_by_ids()
            .returning(|_| Ok(stored_questions()));
        repo.expect_add_question().times(1).returning(|q| Ok(q.id));
        repo.expect_update_quiz()
            .times(1)
            .returning(|_| Err(AppError::DatabaseError("write conflict".to_string())));
        repo.expect_delete_question().times(1).returning(|_| Ok(()));

        let service = QuizService::new(Arc::new(repo));
        let request = CreateQuestionRequest {
            quiz_id: Some("quiz-1".to_string()),
            text: "Capital of Spain?".to_string(),
            question_type: QuestionType::FreeText,
            options: Vec::new(),
            correct_option: None,
            correct_answers: Some(vec!["Madrid".to_string()]),
            media_url: None,
            media_type: None,
            explanation: None,
            difficulty: None,
            category: None,
            points: None,
            time_limit: None,
            created_by: None,
        };

        let result = service.create_question(request).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn list_limits_are_clamped() {
        let mut repo = MockQuizRepository::new();
        repo.expect_list_popular()
            .with(eq(MAX_LIST_LIMIT))
            .returning(|_| Ok(Vec::new()));
        repo.expect_list_recent()
            .with(eq(DEFAULT_LIST_LIMIT))
            .returning(|_| Ok(Vec::new()));

        let service = QuizService::new(Arc::new(repo));
        service.list_popular(Some(5_000)).await.expect("list should succeed");
        service.list_recent(None).await.expect("list should succeed");
    }
}
