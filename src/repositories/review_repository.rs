use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::Review};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: Review) -> AppResult<Review>;
    /// Newest first.
    async fn find_all(&self) -> AppResult<Vec<Review>>;
}

pub struct MongoReviewRepository {
    collection: Collection<Review>,
}

impl MongoReviewRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("reviews");
        Self { collection }
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    async fn create(&self, mut review: Review) -> AppResult<Review> {
        let result = self.collection.insert_one(&review).await?;
        review.id = result.inserted_id.as_object_id();
        Ok(review)
    }

    async fn find_all(&self) -> AppResult<Vec<Review>> {
        let reviews = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(reviews)
    }
}
