use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::models::domain::{QuizResult, Standing, User, UserRole};

pub mod fixtures {
    use super::*;

    /// A stored user, id assigned.
    pub fn test_user(email: &str) -> User {
        let mut user = User::new(email, Some("Test Kid".to_string()), None);
        user.id = Some(ObjectId::new());
        user
    }

    pub fn test_admin(email: &str) -> User {
        let mut user = test_user(email);
        user.role = UserRole::Admin;
        user
    }

    /// A stored result for `user` taken at `millis` since the epoch.
    pub fn test_result(user: &User, quiz_id: ObjectId, score: i32, millis: i64) -> QuizResult {
        let mut result = QuizResult::new(user.id.unwrap_or_else(ObjectId::new), quiz_id, score, 10);
        result.id = Some(ObjectId::new());
        result.timestamp = BsonDateTime::from_millis(millis);
        result
    }

    pub fn test_standing(quiz_id: ObjectId, score: i32, millis: i64) -> Standing {
        let user = test_user("player@example.com");
        Standing::new(test_result(&user, quiz_id, score, millis), user)
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user("kid@example.com");
        assert!(user.id.is_some());
        assert!(!user.is_admin());
        assert_eq!(user.gems, 0);
    }

    #[test]
    fn test_fixtures_test_admin() {
        assert!(test_admin("boss@example.com").is_admin());
    }

    #[test]
    fn test_fixtures_result_links_user() {
        let user = test_user("kid@example.com");
        let quiz_id = mongodb::bson::oid::ObjectId::new();
        let result = test_result(&user, quiz_id, 4, 1_000);

        assert_eq!(Some(result.user_id), user.id);
        assert_eq!(result.quiz_id, quiz_id);
        assert_eq!(result.timestamp.timestamp_millis(), 1_000);
    }

    #[test]
    fn test_status_helpers() {
        assert_error_status(StatusCode::FORBIDDEN);
        assert_success_status(StatusCode::CREATED);
    }
}
