#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use secrecy::SecretString;
use tokio::sync::RwLock;

use miniminds_server::{
    app_state::{AppState, Repositories},
    auth::JwtService,
    db::HealthCheck,
    errors::{AppError, AppResult},
    models::domain::{Avatar, Lesson, QuizResult, Redemption, Review, Standing, User, UserRole},
    repositories::{
        AvatarRepository, LessonRepository, QuizResultRepository, RedemptionRepository,
        ReviewRepository, UserRepository,
    },
};

pub const TEST_JWT_SECRET: &str = "integration_test_secret_key_0123456789";

type UserStore = Arc<RwLock<HashMap<ObjectId, User>>>;

pub struct InMemoryUserRepository {
    users: UserStore,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> UserStore {
        Arc::clone(&self.users)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }

        let id = user.id.unwrap_or_else(ObjectId::new);
        user.id = Some(id);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, email: Option<&str>) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users
            .values()
            .filter(|u| email.map_or(true, |email| u.email == email))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn search_by_email(&self, pattern: &str, limit: i64) -> AppResult<Vec<User>> {
        let matcher = regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| matcher.is_match(&u.email))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn set_role(&self, id: &ObjectId, role: UserRole) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn set_image(&self, email: &str, img: &str) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.values_mut().find(|u| u.email == email).map(|user| {
            user.img = Some(img.to_string());
            user.clone()
        }))
    }

    async fn increment_gems(&self, email: &str, gems: i64) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.gems += gems;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.role == role).count() as u64)
    }
}

/// Results joined against the user store they share with
/// `InMemoryUserRepository`.
pub struct InMemoryQuizResultRepository {
    results: RwLock<Vec<QuizResult>>,
    users: UserStore,
}

impl InMemoryQuizResultRepository {
    pub fn new(users: UserStore) -> Self {
        Self {
            results: RwLock::new(Vec::new()),
            users,
        }
    }

    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryQuizResultRepository {
    async fn insert(&self, mut result: QuizResult) -> AppResult<QuizResult> {
        // The write lock plays the part of the unique (userId, quizId) index.
        let mut results = self.results.write().await;
        if results
            .iter()
            .any(|r| r.user_id == result.user_id && r.quiz_id == result.quiz_id)
        {
            return Err(AppError::AlreadyExists("duplicate quiz result".to_string()));
        }

        result.id = Some(result.id.unwrap_or_else(ObjectId::new));
        results.push(result.clone());
        Ok(result)
    }

    async fn find_by_user_and_quiz(
        &self,
        user_id: &ObjectId,
        quiz_id: &ObjectId,
    ) -> AppResult<Option<QuizResult>> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .find(|r| &r.user_id == user_id && &r.quiz_id == quiz_id)
            .cloned())
    }

    async fn standings(&self, quiz_id: &ObjectId) -> AppResult<Vec<Standing>> {
        let results = self.results.read().await;
        let users = self.users.read().await;

        // Reverse insertion order, so callers must do their own ranking.
        Ok(results
            .iter()
            .rev()
            .filter(|r| &r.quiz_id == quiz_id)
            .filter_map(|r| {
                users
                    .get(&r.user_id)
                    .map(|user| Standing::new(r.clone(), user.clone()))
            })
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.results.read().await.len() as u64)
    }
}

/// Stalls every call for `delay`.
pub struct SlowQuizResultRepository {
    pub delay: Duration,
}

#[async_trait]
impl QuizResultRepository for SlowQuizResultRepository {
    async fn insert(&self, result: QuizResult) -> AppResult<QuizResult> {
        tokio::time::sleep(self.delay).await;
        Ok(result)
    }

    async fn find_by_user_and_quiz(
        &self,
        _user_id: &ObjectId,
        _quiz_id: &ObjectId,
    ) -> AppResult<Option<QuizResult>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn standings(&self, _quiz_id: &ObjectId) -> AppResult<Vec<Standing>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![])
    }

    async fn count(&self) -> AppResult<u64> {
        tokio::time::sleep(self.delay).await;
        Ok(0)
    }
}

#[derive(Default)]
pub struct InMemoryAvatarRepository {
    avatars: RwLock<Vec<Avatar>>,
}

#[async_trait]
impl AvatarRepository for InMemoryAvatarRepository {
    async fn create(&self, mut avatar: Avatar) -> AppResult<Avatar> {
        avatar.id = Some(ObjectId::new());
        self.avatars.write().await.push(avatar.clone());
        Ok(avatar)
    }

    async fn find_all(&self) -> AppResult<Vec<Avatar>> {
        Ok(self.avatars.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: RwLock<Vec<Review>>,
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create(&self, mut review: Review) -> AppResult<Review> {
        review.id = Some(ObjectId::new());
        self.reviews.write().await.push(review.clone());
        Ok(review)
    }

    async fn find_all(&self) -> AppResult<Vec<Review>> {
        let mut reviews = self.reviews.read().await.clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

#[derive(Default)]
pub struct InMemoryLessonRepository {
    lessons: RwLock<Vec<Lesson>>,
}

#[async_trait]
impl LessonRepository for InMemoryLessonRepository {
    async fn create(&self, mut lesson: Lesson) -> AppResult<Lesson> {
        lesson.id = Some(ObjectId::new());
        self.lessons.write().await.push(lesson.clone());
        Ok(lesson)
    }

    async fn find_all(&self) -> AppResult<Vec<Lesson>> {
        Ok(self.lessons.read().await.clone())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.lessons.read().await.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryRedemptionRepository {
    redemptions: RwLock<Vec<Redemption>>,
}

#[async_trait]
impl RedemptionRepository for InMemoryRedemptionRepository {
    async fn create(&self, mut redemption: Redemption) -> AppResult<Redemption> {
        redemption.id = Some(ObjectId::new());
        self.redemptions.write().await.push(redemption.clone());
        Ok(redemption)
    }

    async fn list(&self, email: Option<&str>) -> AppResult<Vec<Redemption>> {
        let mut items: Vec<Redemption> = self
            .redemptions
            .read()
            .await
            .iter()
            .filter(|r| email.map_or(true, |email| r.email == email))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Redemption>> {
        let redemptions = self.redemptions.read().await;
        Ok(redemptions.iter().find(|r| r.id.as_ref() == Some(id)).cloned())
    }

    async fn set_delivery_status(
        &self,
        id: &ObjectId,
        delivered: bool,
        updated_at: BsonDateTime,
    ) -> AppResult<Option<Redemption>> {
        let mut redemptions = self.redemptions.write().await;
        Ok(redemptions
            .iter_mut()
            .find(|r| r.id.as_ref() == Some(id))
            .map(|redemption| {
                redemption.delivery_status = delivered;
                redemption.updated_at = updated_at;
                redemption.clone()
            }))
    }

    async fn count(&self, delivered: Option<bool>) -> AppResult<u64> {
        let redemptions = self.redemptions.read().await;
        Ok(redemptions
            .iter()
            .filter(|r| delivered.map_or(true, |d| r.delivery_status == d))
            .count() as u64)
    }
}

pub struct StaticHealth(pub bool);

#[async_trait]
impl HealthCheck for StaticHealth {
    async fn ping(&self) -> AppResult<()> {
        if self.0 {
            Ok(())
        } else {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
    }
}

/// App state over in-memory storage, with handles kept for seeding and
/// inspecting it.
pub struct TestContext {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub quiz_results: Arc<InMemoryQuizResultRepository>,
    pub jwt: JwtService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::build(None, true, Duration::from_secs(2))
    }

    pub fn unhealthy() -> Self {
        Self::build(None, false, Duration::from_secs(2))
    }

    /// Quiz results served by `quiz_results` under `timeout`.
    pub fn with_quiz_results(
        quiz_results: Arc<dyn QuizResultRepository>,
        timeout: Duration,
    ) -> Self {
        Self::build(Some(quiz_results), true, timeout)
    }

    fn build(
        quiz_override: Option<Arc<dyn QuizResultRepository>>,
        healthy: bool,
        timeout: Duration,
    ) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let quiz_results = Arc::new(InMemoryQuizResultRepository::new(users.store()));
        let served_quiz_results: Arc<dyn QuizResultRepository> =
            quiz_override.unwrap_or_else(|| quiz_results.clone());
        let jwt = JwtService::new(&SecretString::from(TEST_JWT_SECRET), 1);

        let repositories = Repositories {
            users: users.clone(),
            avatars: Arc::new(InMemoryAvatarRepository::default()),
            reviews: Arc::new(InMemoryReviewRepository::default()),
            lessons: Arc::new(InMemoryLessonRepository::default()),
            quiz_results: served_quiz_results,
            redemptions: Arc::new(InMemoryRedemptionRepository::default()),
        };

        let state = AppState::from_repositories(
            repositories,
            jwt.clone(),
            Arc::new(StaticHealth(healthy)),
            timeout,
        );

        Self {
            state,
            users,
            quiz_results,
            jwt,
        }
    }

    pub fn token(&self, email: &str) -> String {
        self.jwt
            .create_token(&format!("uid-{}", email), email)
            .expect("token")
    }

    pub fn bearer(&self, email: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token(email)))
    }

    pub async fn seed_user(&self, email: &str, role: UserRole) -> User {
        let mut user = User::new(email, Some(email.to_string()), None);
        user.role = role;
        self.users.create(user).await.expect("seed user")
    }

    /// Stores a result with an explicit timestamp.
    pub async fn seed_result(
        &self,
        user: &User,
        quiz_id: ObjectId,
        score: i32,
        millis: i64,
    ) -> QuizResult {
        let mut result = QuizResult::new(user.id.expect("seeded user has an id"), quiz_id, score, 10);
        result.timestamp = BsonDateTime::from_millis(millis);
        self.quiz_results.insert(result).await.expect("seed result")
    }
}
