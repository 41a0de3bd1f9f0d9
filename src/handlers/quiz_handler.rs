use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::SubmitQuizResultRequest,
};

#[post("/quiz-results")]
async fn submit_quiz_result(
    state: web::Data<AppState>,
    request: web::Json<SubmitQuizResultRequest>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.quiz_result_service.submit(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/quiz-results/{user_id}/{quiz_id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (user_id, quiz_id) = path.into_inner();
    let response = state
        .quiz_result_service
        .get_attempt(&user_id, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/standings/{quiz_id}")]
async fn get_standings(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let standings = state.quiz_result_service.standings(&quiz_id).await?;
    Ok(HttpResponse::Ok().json(standings))
}
