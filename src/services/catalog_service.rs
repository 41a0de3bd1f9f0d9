use std::{sync::Arc, time::Duration};

use mongodb::bson::DateTime as BsonDateTime;
use validator::Validate;

use crate::{
    db::with_timeout,
    errors::AppResult,
    models::{
        domain::{Avatar, Lesson, Review},
        dto::{
            request::{CreateAvatarRequest, CreateLessonRequest, CreateReviewRequest},
            response::{AvatarDto, LessonDto, ReviewDto},
        },
    },
    repositories::{AvatarRepository, LessonRepository, ReviewRepository},
};

/// Avatars, reviews and lessons: plain list and create.
pub struct CatalogService {
    avatars: Arc<dyn AvatarRepository>,
    reviews: Arc<dyn ReviewRepository>,
    lessons: Arc<dyn LessonRepository>,
    timeout: Duration,
}

impl CatalogService {
    pub fn new(
        avatars: Arc<dyn AvatarRepository>,
        reviews: Arc<dyn ReviewRepository>,
        lessons: Arc<dyn LessonRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            avatars,
            reviews,
            lessons,
            timeout,
        }
    }

    pub async fn list_avatars(&self) -> AppResult<Vec<AvatarDto>> {
        let avatars = with_timeout(self.timeout, self.avatars.find_all()).await?;
        Ok(avatars.into_iter().map(AvatarDto::from).collect())
    }

    pub async fn create_avatar(&self, request: CreateAvatarRequest) -> AppResult<AvatarDto> {
        request.validate()?;
        let avatar = with_timeout(self.timeout, self.avatars.create(Avatar::from(request))).await?;
        Ok(avatar.into())
    }

    pub async fn list_reviews(&self) -> AppResult<Vec<ReviewDto>> {
        let reviews = with_timeout(self.timeout, self.reviews.find_all()).await?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }

    /// Creates a review attributed to `email`, the caller's verified address.
    pub async fn create_review(
        &self,
        request: CreateReviewRequest,
        email: &str,
    ) -> AppResult<ReviewDto> {
        request.validate()?;

        let review = Review {
            id: None,
            name: request.name,
            email: email.to_string(),
            photo: request.photo,
            rating: request.rating,
            comment: request.comment,
            created_at: BsonDateTime::now(),
        };
        let review = with_timeout(self.timeout, self.reviews.create(review)).await?;
        Ok(review.into())
    }

    pub async fn list_lessons(&self) -> AppResult<Vec<LessonDto>> {
        let lessons = with_timeout(self.timeout, self.lessons.find_all()).await?;
        Ok(lessons.into_iter().map(LessonDto::from).collect())
    }

    pub async fn create_lesson(&self, request: CreateLessonRequest) -> AppResult<LessonDto> {
        request.validate()?;

        let lesson = Lesson {
            id: None,
            title: request.title,
            description: request.description,
            questions: request.questions.into_iter().map(Into::into).collect(),
            created_at: BsonDateTime::now(),
        };
        let lesson = with_timeout(self.timeout, self.lessons.create(lesson)).await?;

        log::info!("Created lesson '{}'", lesson.title);
        Ok(lesson.into())
    }
}
