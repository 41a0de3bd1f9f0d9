use std::cmp::Ordering;

use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use crate::models::domain::User;

/// One user's graded attempt at one quiz. At most one exists per
/// `(user_id, quiz_id)`; results are never updated or deleted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub quiz_id: ObjectId,
    pub score: i32,
    pub total: i32,
    pub timestamp: BsonDateTime,
}

impl QuizResult {
    /// Builds a result stamped with the current server time.
    pub fn new(user_id: ObjectId, quiz_id: ObjectId, score: i32, total: i32) -> Self {
        QuizResult {
            id: None,
            user_id,
            quiz_id,
            score,
            total,
            timestamp: BsonDateTime::now(),
        }
    }
}

/// A quiz result joined with the user who owns it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub quiz_id: ObjectId,
    pub score: i32,
    pub total: i32,
    pub timestamp: BsonDateTime,
    pub user_info: User,
}

impl Standing {
    pub fn new(result: QuizResult, user_info: User) -> Self {
        Standing {
            id: result.id,
            user_id: result.user_id,
            quiz_id: result.quiz_id,
            score: result.score,
            total: result.total,
            timestamp: result.timestamp,
            user_info,
        }
    }
}

/// Leaderboard order: higher score first, earlier submission wins ties,
/// then the result id so the order is total.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn rank_standings(standings: &mut [Standing]) {
    standings.sort_by(compare_standings);
}
