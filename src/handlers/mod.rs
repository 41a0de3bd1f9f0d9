pub mod admin_handler;
pub mod catalog_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod redemption_handler;
pub mod user_handler;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body: {}", err);
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}

/// Registers every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(health_handler::index)
        .service(health_handler::health_check)
        .service(health_handler::health_check_live)
        .service(health_handler::health_check_ready)
        .service(user_handler::create_user)
        .service(user_handler::search_users)
        .service(user_handler::list_users)
        .service(user_handler::make_admin)
        .service(user_handler::remove_admin)
        .service(user_handler::add_gems)
        .service(user_handler::set_avatar_image)
        .service(catalog_handler::list_avatars)
        .service(catalog_handler::create_avatar)
        .service(catalog_handler::list_reviews)
        .service(catalog_handler::create_review)
        .service(catalog_handler::list_lessons)
        .service(catalog_handler::create_lesson)
        .service(quiz_handler::submit_quiz_result)
        .service(quiz_handler::get_attempt)
        .service(quiz_handler::get_standings)
        .service(redemption_handler::create_redemption)
        .service(redemption_handler::list_redemptions)
        .service(redemption_handler::get_redemption)
        .service(redemption_handler::set_delivery_status)
        .service(admin_handler::overview);
}
