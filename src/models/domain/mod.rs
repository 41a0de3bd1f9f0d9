pub mod avatar;
pub mod lesson;
pub mod quiz_result;
pub mod redemption;
pub mod review;
pub mod user;

pub use avatar::Avatar;
pub use lesson::{Lesson, LessonQuestion};
pub use quiz_result::{QuizResult, Standing};
pub use redemption::{Redemption, ShippingAddress};
pub use review::Review;
pub use user::{User, UserRole};
