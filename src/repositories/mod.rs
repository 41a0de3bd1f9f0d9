pub mod avatar_repository;
pub mod lesson_repository;
pub mod quiz_result_repository;
pub mod redemption_repository;
pub mod review_repository;
pub mod user_repository;

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

pub use avatar_repository::{AvatarRepository, MongoAvatarRepository};
pub use lesson_repository::{LessonRepository, MongoLessonRepository};
pub use quiz_result_repository::{MongoQuizResultRepository, QuizResultRepository};
pub use redemption_repository::{MongoRedemptionRepository, RedemptionRepository};
pub use review_repository::{MongoReviewRepository, ReviewRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// True when a write was rejected by a unique index.
pub(crate) fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
