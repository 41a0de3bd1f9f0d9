use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
};

#[get("/admin/overview")]
async fn overview(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&state.user_service, &auth.0).await?;

    let overview = state.admin_service.overview().await?;
    Ok(HttpResponse::Ok().json(overview))
}
