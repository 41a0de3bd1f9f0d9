use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::Serialize;

use crate::models::domain::{
    Avatar, Lesson, LessonQuestion, QuizResult, Redemption, Review, ShippingAddress, Standing,
    User, UserRole,
};

fn to_chrono(value: BsonDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn to_hex(id: Option<ObjectId>) -> Option<String> {
    id.map(|oid| oid.to_hex())
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub img: Option<String>,
    pub gems: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: to_hex(user.id),
            name: user.name,
            email: user.email,
            role: user.role,
            img: user.img,
            gems: user.gems,
            created_at: user.created_at.map(to_chrono),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GemsUpdatedResponse {
    pub success: bool,
    pub email: String,
    pub gems: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: String,
    pub img: String,
    pub price: i64,
}

impl From<Avatar> for AvatarDto {
    fn from(avatar: Avatar) -> Self {
        AvatarDto {
            id: to_hex(avatar.id),
            name: avatar.name,
            img: avatar.img,
            price: avatar.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        ReviewDto {
            id: to_hex(review.id),
            name: review.name,
            email: review.email,
            photo: review.photo,
            rating: review.rating,
            comment: review.comment,
            created_at: to_chrono(review.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub question_count: usize,
    pub questions: Vec<LessonQuestion>,
    pub created_at: DateTime<Utc>,
}

impl From<Lesson> for LessonDto {
    fn from(lesson: Lesson) -> Self {
        LessonDto {
            id: to_hex(lesson.id),
            question_count: lesson.question_count(),
            title: lesson.title,
            description: lesson.description,
            questions: lesson.questions,
            created_at: to_chrono(lesson.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub user_id: String,
    pub quiz_id: String,
    pub score: i32,
    pub total: i32,
    pub timestamp: DateTime<Utc>,
}

impl From<QuizResult> for QuizResultDto {
    fn from(result: QuizResult) -> Self {
        QuizResultDto {
            id: to_hex(result.id),
            user_id: result.user_id.to_hex(),
            quiz_id: result.quiz_id.to_hex(),
            score: result.score,
            total: result.total,
            timestamp: to_chrono(result.timestamp),
        }
    }
}

/// Answer to "has this user already taken this quiz?".
#[derive(Debug, Clone, Serialize)]
pub struct AttemptResponse {
    pub attempted: bool,
    pub result: Option<QuizResultDto>,
}

impl From<Option<QuizResult>> for AttemptResponse {
    fn from(result: Option<QuizResult>) -> Self {
        AttemptResponse {
            attempted: result.is_some(),
            result: result.map(QuizResultDto::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub user_id: String,
    pub quiz_id: String,
    pub score: i32,
    pub total: i32,
    pub timestamp: DateTime<Utc>,
    pub user_info: UserDto,
}

impl From<Standing> for StandingDto {
    fn from(standing: Standing) -> Self {
        StandingDto {
            id: to_hex(standing.id),
            user_id: standing.user_id.to_hex(),
            quiz_id: standing.quiz_id.to_hex(),
            score: standing.score,
            total: standing.total,
            timestamp: to_chrono(standing.timestamp),
            user_info: standing.user_info.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionDto {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub email: String,
    pub gift_id: String,
    pub gift_name: String,
    pub gift_img: String,
    pub cost: i64,
    pub address: ShippingAddress,
    pub delivery_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Redemption> for RedemptionDto {
    fn from(redemption: Redemption) -> Self {
        RedemptionDto {
            id: to_hex(redemption.id),
            email: redemption.email,
            gift_id: redemption.gift_id,
            gift_name: redemption.gift_name,
            gift_img: redemption.gift_img,
            cost: redemption.cost,
            address: redemption.address,
            delivery_status: redemption.delivery_status,
            created_at: to_chrono(redemption.created_at),
            updated_at: to_chrono(redemption.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub total_users: u64,
    pub total_admins: u64,
    pub total_lessons: u64,
    pub total_quiz_results: u64,
    pub total_redemptions: u64,
    pub delivered_redemptions: u64,
}
