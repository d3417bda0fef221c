use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    config::Config,
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Question, Quiz},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_quiz(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_question(&self, id: &str) -> AppResult<Option<Question>>;
    /// Questions in the order of `ids`; ids with no document are skipped.
    async fn find_questions_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>>;
    async fn increment_play_count(&self, quiz_id: &str) -> AppResult<()>;
    async fn create_quiz(&self, quiz: Quiz) -> AppResult<String>;
    async fn add_question(&self, question: Question) -> AppResult<String>;
    async fn update_quiz(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn delete_quiz(&self, id: &str) -> AppResult<()>;
    async fn delete_question(&self, id: &str) -> AppResult<()>;
    async fn list_popular(&self, limit: i64) -> AppResult<Vec<Quiz>>;
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Quiz>>;
    async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<Quiz>>;
}

/// Puts fetched questions back into the requested id order. An id listed
/// twice yields the question twice.
pub fn order_by_ids(ids: &[String], questions: Vec<Question>) -> Vec<Question> {
    let by_id: HashMap<String, Question> =
        questions.into_iter().map(|q| (q.id.clone(), q)).collect();
    ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
}

pub struct MongoQuizRepository {
    quizzes: Collection<Quiz>,
    questions: Collection<Question>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        Self {
            quizzes: db.get_collection(&config.quizzes_collection),
            questions: db.get_collection(&config.questions_collection),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes and questions collections");

        let id_index = |name: &str| {
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(name.to_string())
                        .build(),
                )
                .build()
        };

        let popular_index = IndexModel::builder()
            .keys(doc! { "isPublic": 1, "playCount": -1 })
            .options(IndexOptions::builder().name("public_play_count".to_string()).build())
            .build();

        let author_index = IndexModel::builder()
            .keys(doc! { "authorId": 1 })
            .options(IndexOptions::builder().name("author_id".to_string()).build())
            .build();

        self.quizzes.create_index(id_index("id_unique")).await?;
        self.quizzes.create_index(popular_index).await?;
        self.quizzes.create_index(author_index).await?;
        self.questions.create_index(id_index("id_unique")).await?;

        log::info!("Successfully created indexes for quizzes and questions collections");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_quiz(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.quizzes.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_question(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.questions.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_questions_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let questions: Vec<Question> = self
            .questions
            .find(doc! { "id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(order_by_ids(ids, questions))
    }

    async fn increment_play_count(&self, quiz_id: &str) -> AppResult<()> {
        self.quizzes
            .update_one(doc! { "id": quiz_id }, doc! { "$inc": { "playCount": 1 } })
            .await?;
        Ok(())
    }

    async fn create_quiz(&self, quiz: Quiz) -> AppResult<String> {
        self.quizzes.insert_one(&quiz).await?;
        Ok(quiz.id)
    }

    async fn add_question(&self, question: Question) -> AppResult<String> {
        self.questions.insert_one(&question).await?;
        Ok(question.id)
    }

    async fn update_quiz(&self, quiz: Quiz) -> AppResult<Quiz> {
        let result = self
            .quizzes
            .replace_one(doc! { "id": &quiz.id }, &quiz)
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", quiz.id)));
        }
        Ok(quiz)
    }

    async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        let result = self.quizzes.delete_one(doc! { "id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn delete_question(&self, id: &str) -> AppResult<()> {
        let result = self.questions.delete_one(doc! { "id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Question with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn list_popular(&self, limit: i64) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .quizzes
            .find(doc! { "isPublic": true })
            .sort(doc! { "playCount": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .quizzes
            .find(doc! { "isPublic": true })
            .sort(doc! { "createdAt": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .quizzes
            .find(doc! { "authorId": author_id })
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }
}
