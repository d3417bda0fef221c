use actix_web::web;

pub mod game_handler;
pub mod health_handler;
pub mod play_handler;
pub mod player_handler;
pub mod quiz_handler;

pub use health_handler::{health_check, health_check_ready};

/// Registers every endpoint on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(quiz_handler::list_popular)
        .service(quiz_handler::list_recent)
        .service(quiz_handler::list_by_author)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::update_quiz)
        .service(quiz_handler::delete_quiz)
        .service(quiz_handler::create_question)
        .service(quiz_handler::delete_question)
        .service(quiz_handler::get_question_media)
        .service(play_handler::start_play)
        .service(play_handler::get_play)
        .service(play_handler::submit_answer)
        .service(play_handler::time_out)
        .service(play_handler::advance)
        .service(play_handler::finish)
        .service(play_handler::discard_play)
        .service(game_handler::create_game)
        .service(game_handler::get_game)
        .service(game_handler::submit_answer)
        .service(game_handler::next_question)
        .service(game_handler::end_game)
        .service(game_handler::discard_game)
        .service(player_handler::create_player)
        .service(player_handler::get_player)
        .service(player_handler::record_login)
        .service(player_handler::add_favorite)
        .service(player_handler::remove_favorite)
        .service(player_handler::update_settings);
}
