use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// A lesson is also the quiz that quiz results point at through `quizId`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub questions: Vec<LessonQuestion>,
    pub created_at: BsonDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LessonQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Lesson {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
