use std::env;

pub const DEFAULT_MAX_MEDIA_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub quizzes_collection: String,
    pub questions_collection: String,
    pub players_collection: String,
    pub media_root: String,
    /// Hosts remote media may be fetched from; empty disables remote fetch.
    pub media_allowed_hosts: Vec<String>,
    pub media_max_bytes: usize,
    pub web_server_host: String,
    pub web_server_port: u16,
    /// Shuffle question order (not just options) when a play starts.
    pub shuffle_questions: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "quizplay-local".to_string()),
            quizzes_collection: env::var("QUIZZES_COLLECTION")
                .unwrap_or_else(|_| "quizzes".to_string()),
            questions_collection: env::var("QUESTIONS_COLLECTION")
                .unwrap_or_else(|_| "questions".to_string()),
            players_collection: env::var("PLAYERS_COLLECTION")
                .unwrap_or_else(|_| "players".to_string()),
            media_root: env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string()),
            media_allowed_hosts: env::var("MEDIA_ALLOWED_HOSTS")
                .map(|hosts| {
                    hosts
                        .split(',')
                        .map(|h| h.trim().to_string())
                        .filter(|h| !h.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            media_max_bytes: env::var("MEDIA_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_MEDIA_BYTES),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            shuffle_questions: env::var("SHUFFLE_QUESTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizplay-test".to_string(),
            quizzes_collection: "quizzes".to_string(),
            questions_collection: "questions".to_string(),
            players_collection: "players".to_string(),
            media_root: "./media".to_string(),
            media_allowed_hosts: Vec::new(),
            media_max_bytes: DEFAULT_MAX_MEDIA_BYTES,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            shuffle_questions: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.mongo_conn_string.is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(!config.quizzes_collection.is_empty());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_conn_string, "mongodb://localhost:27017");
        assert_eq!(config.mongo_db_name, "quizplay-test");
        assert_eq!(config.questions_collection, "questions");
        assert!(!config.shuffle_questions);
        assert!(config.media_allowed_hosts.is_empty());
    }
}
