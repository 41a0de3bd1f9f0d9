use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateAvatarRequest, CreateLessonRequest, CreateReviewRequest},
};

#[get("/avatars")]
async fn list_avatars(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let avatars = state.catalog_service.list_avatars().await?;
    Ok(HttpResponse::Ok().json(avatars))
}

#[post("/avatars")]
async fn create_avatar(
    state: web::Data<AppState>,
    request: web::Json<CreateAvatarRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&state.user_service, &auth.0).await?;

    let avatar = state.catalog_service.create_avatar(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(avatar))
}

#[get("/reviews")]
async fn list_reviews(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let reviews = state.catalog_service.list_reviews().await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// The review is attributed to the token's email, never to a body field.
#[post("/reviews")]
async fn create_review(
    state: web::Data<AppState>,
    request: web::Json<CreateReviewRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let review = state
        .catalog_service
        .create_review(request.into_inner(), auth.email())
        .await?;
    Ok(HttpResponse::Created().json(review))
}

#[get("/lessons")]
async fn list_lessons(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let lessons = state.catalog_service.list_lessons().await?;
    Ok(HttpResponse::Ok().json(lessons))
}

#[post("/lessons")]
async fn create_lesson(
    state: web::Data<AppState>,
    request: web::Json<CreateLessonRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&state.user_service, &auth.0).await?;

    let lesson = state.catalog_service.create_lesson(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(lesson))
}
