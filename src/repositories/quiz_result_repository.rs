use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{QuizResult, Standing},
    repositories::{is_duplicate_key, user_repository::USERS_COLLECTION},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Stores a result. A second result for the same user and quiz fails
    /// with `AppError::AlreadyExists` and leaves the first one untouched.
    async fn insert(&self, result: QuizResult) -> AppResult<QuizResult>;
    async fn find_by_user_and_quiz(
        &self,
        user_id: &ObjectId,
        quiz_id: &ObjectId,
    ) -> AppResult<Option<QuizResult>>;
    /// Results for `quiz_id` joined with their users. Results whose user
    /// no longer exists are left out.
    async fn standings(&self, quiz_id: &ObjectId) -> AppResult<Vec<Standing>>;
    async fn count(&self) -> AppResult<u64>;
}

pub struct MongoQuizResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoQuizResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_results");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_results collection");

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "userId": 1, "quizId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_quiz_unique".to_string())
                    .build(),
            )
            .build();

        let standings_index = IndexModel::builder()
            .keys(doc! { "quizId": 1, "score": -1, "timestamp": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_standings".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_quiz_index).await?;
        self.collection.create_index(standings_index).await?;

        log::info!("Successfully created indexes for quiz_results collection");
        Ok(())
    }
}

/// Match, join with users, drop orphans, rank.
pub fn standings_pipeline(quiz_id: &ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "quizId": *quiz_id } },
        doc! {
            "$lookup": {
                "from": USERS_COLLECTION,
                "localField": "userId",
                "foreignField": "_id",
                "as": "userInfo",
            }
        },
        doc! { "$unwind": "$userInfo" },
        doc! { "$sort": { "score": -1, "timestamp": 1, "_id": 1 } },
    ]
}

#[async_trait]
impl QuizResultRepository for MongoQuizResultRepository {
    async fn insert(&self, mut result: QuizResult) -> AppResult<QuizResult> {
        let inserted = self.collection.insert_one(&result).await.map_err(|err| {
            if is_duplicate_key(&err) {
                AppError::AlreadyExists(format!(
                    "Result for user '{}' on quiz '{}' already exists",
                    result.user_id, result.quiz_id
                ))
            } else {
                err.into()
            }
        })?;

        result.id = inserted.inserted_id.as_object_id();
        Ok(result)
    }

    async fn find_by_user_and_quiz(
        &self,
        user_id: &ObjectId,
        quiz_id: &ObjectId,
    ) -> AppResult<Option<QuizResult>> {
        let result = self
            .collection
            .find_one(doc! { "userId": *user_id, "quizId": *quiz_id })
            .await?;
        Ok(result)
    }

    async fn standings(&self, quiz_id: &ObjectId) -> AppResult<Vec<Standing>> {
        let documents: Vec<Document> = self
            .collection
            .aggregate(standings_pipeline(quiz_id))
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| bson::from_document::<Standing>(document).map_err(AppError::from))
            .collect()
    }

    async fn count(&self) -> AppResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_standings_pipeline_joins_on_typed_id() {
        let quiz_id = ObjectId::new();
        let pipeline = standings_pipeline(&quiz_id);

        assert_eq!(pipeline.len(), 4);
        assert_eq!(
            pipeline[0].get_document("$match").unwrap().get("quizId"),
            Some(&Bson::ObjectId(quiz_id))
        );

        let lookup = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "users");
        assert_eq!(lookup.get_str("localField").unwrap(), "userId");
        assert_eq!(lookup.get_str("foreignField").unwrap(), "_id");
    }

    #[test]
    fn test_standings_pipeline_drops_orphans_and_ranks() {
        let pipeline = standings_pipeline(&ObjectId::new());

        assert_eq!(pipeline[2].get_str("$unwind").unwrap(), "$userInfo");

        let sort = pipeline[3].get_document("$sort").unwrap();
        let keys: Vec<(&str, i32)> = sort
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_i32().unwrap()))
            .collect();
        assert_eq!(keys, vec![("score", -1), ("timestamp", 1), ("_id", 1)]);
    }

    #[test]
    fn test_standing_reads_aggregation_output() {
        let user_id = ObjectId::new();
        let document = doc! {
            "_id": ObjectId::new(),
            "userId": user_id,
            "quizId": ObjectId::new(),
            "score": 8,
            "total": 10,
            "timestamp": bson::DateTime::now(),
            "userInfo": { "_id": user_id, "email": "kid@example.com", "role": "user", "gems": 12_i64 },
        };

        let standing: Standing = bson::from_document(document).unwrap();
        assert_eq!(standing.score, 8);
        assert_eq!(standing.user_info.id, Some(user_id));
        assert_eq!(standing.user_info.gems, 12);
    }
}
