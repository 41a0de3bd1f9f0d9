use std::{sync::Arc, time::Duration};

use crate::{
    db::with_timeout,
    errors::AppResult,
    models::{domain::UserRole, dto::response::AdminOverview},
    repositories::{LessonRepository, QuizResultRepository, RedemptionRepository, UserRepository},
};

/// Collection counts for the admin dashboard.
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    lessons: Arc<dyn LessonRepository>,
    quiz_results: Arc<dyn QuizResultRepository>,
    redemptions: Arc<dyn RedemptionRepository>,
    timeout: Duration,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        lessons: Arc<dyn LessonRepository>,
        quiz_results: Arc<dyn QuizResultRepository>,
        redemptions: Arc<dyn RedemptionRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            lessons,
            quiz_results,
            redemptions,
            timeout,
        }
    }

    /// The counts are read concurrently; any failure fails the whole overview.
    pub async fn overview(&self) -> AppResult<AdminOverview> {
        let (
            total_users,
            total_admins,
            total_lessons,
            total_quiz_results,
            total_redemptions,
            delivered_redemptions,
        ) = futures::try_join!(
            with_timeout(self.timeout, self.users.count_by_role(UserRole::User)),
            with_timeout(self.timeout, self.users.count_by_role(UserRole::Admin)),
            with_timeout(self.timeout, self.lessons.count()),
            with_timeout(self.timeout, self.quiz_results.count()),
            with_timeout(self.timeout, self.redemptions.count(None)),
            with_timeout(self.timeout, self.redemptions.count(Some(true))),
        )?;

        Ok(AdminOverview {
            total_users,
            total_admins,
            total_lessons,
            total_quiz_results,
            total_redemptions,
            delivered_redemptions,
        })
    }
}
