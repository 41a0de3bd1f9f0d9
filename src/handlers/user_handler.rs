use actix_web::{get, patch, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, require_self_or_admin, AuthenticatedUser},
    errors::AppError,
    models::{
        domain::UserRole,
        dto::{
            request::{CreateUserRequest, EmailQuery, UpdateAvatarImageRequest, UpdateGemsRequest},
            response::MessageResponse,
        },
    },
    services::CreateUserOutcome,
};

#[post("/users")]
async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<CreateUserRequest>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    match state.user_service.create_user(request.into_inner()).await? {
        CreateUserOutcome::Created(user) => Ok(HttpResponse::Created().json(user)),
        CreateUserOutcome::AlreadyExists => {
            Ok(HttpResponse::Ok().json(MessageResponse::new("User already exists.")))
        }
    }
}

#[get("/users")]
async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<EmailQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let users = state.user_service.list_users(query.email()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/search")]
async fn search_users(
    state: web::Data<AppState>,
    query: web::Query<EmailQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&state.user_service, &auth.0).await?;

    let users = match query.email() {
        Some(term) => state.user_service.search_users(term).await?,
        None => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(users))
}

#[put("/users/{id}/make-admin")]
async fn make_admin(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&state.user_service, &auth.0).await?;

    let user = state.user_service.set_role(&id, UserRole::Admin).await?;
    log::info!("{} granted admin to {}", auth.email(), user.email);
    Ok(HttpResponse::Ok().json(user))
}

#[put("/users/{id}/remove-admin")]
async fn remove_admin(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&state.user_service, &auth.0).await?;

    let user = state.user_service.set_role(&id, UserRole::User).await?;
    log::info!("{} revoked admin from {}", auth.email(), user.email);
    Ok(HttpResponse::Ok().json(user))
}

#[patch("/users/gems/{email}")]
async fn add_gems(
    state: web::Data<AppState>,
    email: web::Path<String>,
    request: web::Json<UpdateGemsRequest>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .user_service
        .add_gems(&email, request.into_inner().gems)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/users/avatar/{email}")]
async fn set_avatar_image(
    state: web::Data<AppState>,
    email: web::Path<String>,
    request: web::Json<UpdateAvatarImageRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_self_or_admin(&state.user_service, &auth.0, &email).await?;

    let user = state
        .user_service
        .set_avatar_image(&email, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}
