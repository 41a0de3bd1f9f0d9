use std::{sync::Arc, time::Duration};

use crate::{
    auth::JwtService,
    config::Config,
    db::{Database, HealthCheck},
    errors::AppResult,
    repositories::{
        AvatarRepository, LessonRepository, MongoAvatarRepository, MongoLessonRepository,
        MongoQuizResultRepository, MongoRedemptionRepository, MongoReviewRepository,
        MongoUserRepository, QuizResultRepository, RedemptionRepository, ReviewRepository,
        UserRepository,
    },
    services::{AdminService, CatalogService, QuizResultService, RedemptionService, UserService},
};

/// Storage handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub avatars: Arc<dyn AvatarRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub quiz_results: Arc<dyn QuizResultRepository>,
    pub redemptions: Arc<dyn RedemptionRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub catalog_service: Arc<CatalogService>,
    pub quiz_result_service: Arc<QuizResultService>,
    pub redemption_service: Arc<RedemptionService>,
    pub admin_service: Arc<AdminService>,
    pub jwt_service: Arc<JwtService>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub async fn new(config: &Config) -> AppResult<Self> {
        let db = Database::connect(config).await?;

        let users = Arc::new(MongoUserRepository::new(&db));
        users.ensure_indexes().await?;
        let quiz_results = Arc::new(MongoQuizResultRepository::new(&db));
        quiz_results.ensure_indexes().await?;
        let redemptions = Arc::new(MongoRedemptionRepository::new(&db));
        redemptions.ensure_indexes().await?;

        let repositories = Repositories {
            users,
            avatars: Arc::new(MongoAvatarRepository::new(&db)),
            reviews: Arc::new(MongoReviewRepository::new(&db)),
            lessons: Arc::new(MongoLessonRepository::new(&db)),
            quiz_results,
            redemptions,
        };

        log::info!("Repositories ready on database '{}'", db.db_name());

        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        Ok(Self::from_repositories(
            repositories,
            jwt_service,
            Arc::new(db),
            config.storage_timeout(),
        ))
    }

    /// Wires services over any repository implementation.
    pub fn from_repositories(
        repositories: Repositories,
        jwt_service: JwtService,
        health: Arc<dyn HealthCheck>,
        storage_timeout: Duration,
    ) -> Self {
        let Repositories {
            users,
            avatars,
            reviews,
            lessons,
            quiz_results,
            redemptions,
        } = repositories;

        Self {
            user_service: Arc::new(UserService::new(users.clone(), storage_timeout)),
            catalog_service: Arc::new(CatalogService::new(
                avatars,
                reviews,
                lessons.clone(),
                storage_timeout,
            )),
            quiz_result_service: Arc::new(QuizResultService::new(
                quiz_results.clone(),
                storage_timeout,
            )),
            redemption_service: Arc::new(RedemptionService::new(
                redemptions.clone(),
                storage_timeout,
            )),
            admin_service: Arc::new(AdminService::new(
                users,
                lessons,
                quiz_results,
                redemptions,
                storage_timeout,
            )),
            jwt_service: Arc::new(jwt_service),
            health,
        }
    }
}
