pub mod admin_service;
pub mod catalog_service;
pub mod quiz_result_service;
pub mod redemption_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use catalog_service::CatalogService;
pub use quiz_result_service::QuizResultService;
pub use redemption_service::RedemptionService;
pub use user_service::{CreateUserOutcome, UserService};
