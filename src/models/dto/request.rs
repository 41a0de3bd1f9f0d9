use mongodb::bson::DateTime as BsonDateTime;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Avatar, LessonQuestion, QuizResult, Redemption, ShippingAddress},
        ids::parse_object_id,
    },
};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(url)]
    pub img: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

impl EmailQuery {
    /// The filter value, ignoring blank input.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGemsRequest {
    pub gems: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAvatarImageRequest {
    #[validate(url)]
    pub img: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvatarRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(url)]
    pub img: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub price: i64,
}

impl From<CreateAvatarRequest> for Avatar {
    fn from(request: CreateAvatarRequest) -> Self {
        Avatar {
            id: None,
            name: request.name,
            img: request.img,
            price: request.price,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(url)]
    pub photo: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<LessonQuestionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_answer_in_options"))]
pub struct LessonQuestionInput {
    #[validate(length(min = 1, max = 500))]
    pub question: String,

    #[validate(length(min = 2, max = 10))]
    pub options: Vec<String>,

    #[validate(length(min = 1))]
    pub answer: String,
}

fn validate_answer_in_options(input: &LessonQuestionInput) -> Result<(), ValidationError> {
    if input.options.iter().any(|option| option == &input.answer) {
        Ok(())
    } else {
        Err(ValidationError::new("answer_not_in_options"))
    }
}

impl From<LessonQuestionInput> for LessonQuestion {
    fn from(input: LessonQuestionInput) -> Self {
        LessonQuestion {
            question: input.question,
            options: input.options,
            answer: input.answer,
        }
    }
}

/// Quiz submission body. Every field is optional at the wire level so that
/// absence can be told apart from a zero score.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResultRequest {
    pub user_id: Option<String>,
    pub quiz_id: Option<String>,
    pub score: Option<i32>,
    pub total: Option<i32>,
}

impl SubmitQuizResultRequest {
    pub fn into_result(self) -> AppResult<QuizResult> {
        let user_id = self.user_id.filter(|id| !id.is_empty());
        let quiz_id = self.quiz_id.filter(|id| !id.is_empty());

        let (Some(user_id), Some(quiz_id), Some(score), Some(total)) =
            (user_id, quiz_id, self.score, self.total)
        else {
            return Err(AppError::ValidationError("Missing fields".to_string()));
        };

        let user_id = parse_object_id(&user_id, "userId")?;
        let quiz_id = parse_object_id(&quiz_id, "quizId")?;

        Ok(QuizResult::new(user_id, quiz_id, score, total))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRedemptionRequest {
    pub email: Option<String>,
    pub gift_id: Option<String>,
    pub gift_name: Option<String>,
    pub gift_img: Option<String>,
    pub cost: Option<i64>,
    #[serde(default)]
    pub address: AddressInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required_address_field(value: Option<String>, key: &str) -> AppResult<String> {
    present(value).ok_or_else(|| AppError::ValidationError(format!("address.{} is required", key)))
}

impl CreateRedemptionRequest {
    /// Checks the required gift and address fields and fills defaults for the
    /// optional ones. Both timestamps are set to `now`.
    pub fn into_redemption(self, now: BsonDateTime) -> AppResult<Redemption> {
        let (Some(email), Some(gift_id), Some(gift_name)) = (
            present(self.email),
            present(self.gift_id),
            present(self.gift_name),
        ) else {
            return Err(AppError::ValidationError(
                "email, giftId, giftName are required".to_string(),
            ));
        };

        let address = self.address;
        let address = ShippingAddress {
            name: required_address_field(address.name, "name")?,
            phone: required_address_field(address.phone, "phone")?,
            address1: required_address_field(address.address1, "address1")?,
            city: required_address_field(address.city, "city")?,
            postal_code: required_address_field(address.postal_code, "postalCode")?,
            address2: address.address2.unwrap_or_default(),
            notes: address.notes.unwrap_or_default(),
        };

        Ok(Redemption {
            id: None,
            email,
            gift_id,
            gift_name,
            gift_img: self.gift_img.unwrap_or_default(),
            cost: self.cost.unwrap_or(0),
            address,
            delivery_status: false,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryStatusRequest {
    #[serde(default)]
    pub delivery_status: bool,
}
