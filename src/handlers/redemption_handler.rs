use actix_web::{get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, require_self_or_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{CreateRedemptionRequest, EmailQuery, UpdateDeliveryStatusRequest},
        response::RedemptionDto,
    },
};

#[post("/redemptions")]
async fn create_redemption(
    state: web::Data<AppState>,
    request: web::Json<CreateRedemptionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    // A missing email is left to the required-field check in the service.
    if let Some(email) = request.email.as_deref().filter(|e| !e.trim().is_empty()) {
        require_self_or_admin(&state.user_service, &auth.0, email).await?;
    }

    let redemption = state.redemption_service.create(request).await?;
    Ok(HttpResponse::Created().json(redemption))
}

#[get("/redemptions")]
async fn list_redemptions(
    state: web::Data<AppState>,
    query: web::Query<EmailQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    match query.email() {
        Some(email) => require_self_or_admin(&state.user_service, &auth.0, email).await?,
        None => require_admin(&state.user_service, &auth.0).await?,
    }

    let redemptions = state.redemption_service.list(query.email()).await?;
    Ok(HttpResponse::Ok().json(redemptions))
}

#[get("/redemptions/{id}")]
async fn get_redemption(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let redemption = state.redemption_service.find(&id).await?;
    require_self_or_admin(&state.user_service, &auth.0, &redemption.email).await?;

    Ok(HttpResponse::Ok().json(RedemptionDto::from(redemption)))
}

#[patch("/redemptions/{id}/delivery")]
async fn set_delivery_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateDeliveryStatusRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&state.user_service, &auth.0).await?;

    let redemption = state
        .redemption_service
        .set_delivery_status(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(redemption))
}
