use std::{sync::Arc, time::Duration};

use crate::{
    db::with_timeout,
    errors::{AppError, AppResult},
    models::{
        domain::quiz_result::rank_standings,
        dto::{
            request::SubmitQuizResultRequest,
            response::{AttemptResponse, MessageResponse, StandingDto},
        },
        ids::parse_object_id,
    },
    repositories::QuizResultRepository,
};

/// Records quiz results (one per user and quiz) and ranks them.
pub struct QuizResultService {
    repository: Arc<dyn QuizResultRepository>,
    timeout: Duration,
}

impl QuizResultService {
    pub fn new(repository: Arc<dyn QuizResultRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// Stores a new result. The uniqueness check and the write are one
    /// operation in the repository, so concurrent submissions for the same
    /// pair cannot both succeed.
    pub async fn submit(&self, request: SubmitQuizResultRequest) -> AppResult<MessageResponse> {
        let result = request.into_result()?;
        let (user_id, quiz_id) = (result.user_id, result.quiz_id);

        match with_timeout(self.timeout, self.repository.insert(result)).await {
            Ok(_) => {
                log::info!("Saved quiz result for user {} on quiz {}", user_id, quiz_id);
                Ok(MessageResponse::new("Result saved"))
            }
            Err(AppError::AlreadyExists(_)) => Err(AppError::Forbidden(
                "You have already taken this quiz.".to_string(),
            )),
            Err(err) => Err(err),
        }
    }

    pub async fn get_attempt(&self, user_id: &str, quiz_id: &str) -> AppResult<AttemptResponse> {
        let user_id = parse_object_id(user_id, "userId")?;
        let quiz_id = parse_object_id(quiz_id, "quizId")?;

        let result = with_timeout(
            self.timeout,
            self.repository.find_by_user_and_quiz(&user_id, &quiz_id),
        )
        .await?;

        Ok(AttemptResponse::from(result))
    }

    pub async fn standings(&self, quiz_id: &str) -> AppResult<Vec<StandingDto>> {
        let quiz_id = parse_object_id(quiz_id, "quizId")?;

        let mut standings = with_timeout(self.timeout, self.repository.standings(&quiz_id)).await?;
        rank_standings(&mut standings);

        Ok(standings.into_iter().map(StandingDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repositories::quiz_result_repository::MockQuizResultRepository,
        test_utils::fixtures::test_standing,
    };
    use mongodb::bson::oid::ObjectId;

    fn service(mock: MockQuizResultRepository) -> QuizResultService {
        QuizResultService::new(Arc::new(mock), Duration::from_secs(1))
    }

    fn request(score: Option<i32>, total: Option<i32>) -> SubmitQuizResultRequest {
        SubmitQuizResultRequest {
            user_id: Some(ObjectId::new().to_hex()),
            quiz_id: Some(ObjectId::new().to_hex()),
            score,
            total,
        }
    }

    #[tokio::test]
    async fn test_submit_saves_result() {
        let mut mock = MockQuizResultRepository::new();
        mock.expect_insert()
            .withf(|result| result.score == 0 && result.total == 10)
            .times(1)
            .returning(|result| Ok(result));

        let response = service(mock).submit(request(Some(0), Some(10))).await.unwrap();
        assert_eq!(response.message, "Result saved");
    }

    #[tokio::test]
    async fn test_submit_duplicate_is_forbidden() {
        let mut mock = MockQuizResultRepository::new();
        mock.expect_insert()
            .returning(|_| Err(AppError::AlreadyExists("duplicate".to_string())));

        let err = service(mock).submit(request(Some(3), Some(5))).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "You have already taken this quiz."));
    }

    #[tokio::test]
    async fn test_submit_missing_fields_never_reaches_storage() {
        let mut mock = MockQuizResultRepository::new();
        mock.expect_insert().never();

        let err = service(mock).submit(request(Some(3), None)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let mut mock = MockQuizResultRepository::new();
        mock.expect_standings()
            .returning(|_| Err(AppError::DatabaseError("server selection timeout".to_string())));

        let err = service(mock)
            .standings(&ObjectId::new().to_hex())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_attempt_absent_is_not_an_error() {
        let mut mock = MockQuizResultRepository::new();
        mock.expect_find_by_user_and_quiz().returning(|_, _| Ok(None));

        let response = service(mock)
            .get_attempt(&ObjectId::new().to_hex(), &ObjectId::new().to_hex())
            .await
            .unwrap();
        assert!(!response.attempted);
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn test_attempt_with_malformed_quiz_id() {
        let mock = MockQuizResultRepository::new();

        let err = service(mock)
            .get_attempt(&ObjectId::new().to_hex(), "not-an-id")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_standings_are_ranked_whatever_the_store_returns() {
        let quiz_id = ObjectId::new();
        let entries = vec![(5, 2), (9, 1), (5, 1)];

        let mut mock = MockQuizResultRepository::new();
        mock.expect_standings().returning(move |quiz_id| {
            Ok(entries
                .iter()
                .map(|&(score, millis)| test_standing(*quiz_id, score, millis))
                .collect())
        });

        let standings = service(mock).standings(&quiz_id.to_hex()).await.unwrap();
        let order: Vec<(i32, i64)> = standings
            .iter()
            .map(|s| (s.score, s.timestamp.timestamp_millis()))
            .collect();
        assert_eq!(order, vec![(9, 1), (5, 1), (5, 2)]);
    }
}
