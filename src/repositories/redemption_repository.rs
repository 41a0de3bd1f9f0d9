use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Redemption};

#[async_trait]
pub trait RedemptionRepository: Send + Sync {
    async fn create(&self, redemption: Redemption) -> AppResult<Redemption>;
    /// All redemptions, or only those placed by `email`, newest first.
    async fn list(&self, email: Option<&str>) -> AppResult<Vec<Redemption>>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Redemption>>;
    async fn set_delivery_status(
        &self,
        id: &ObjectId,
        delivered: bool,
        updated_at: BsonDateTime,
    ) -> AppResult<Option<Redemption>>;
    /// Counts every redemption, or only those with the given delivery status.
    async fn count(&self, delivered: Option<bool>) -> AppResult<u64>;
}

pub struct MongoRedemptionRepository {
    collection: Collection<Redemption>,
}

impl MongoRedemptionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("redemptions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "email": 1, "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("email_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created index on redemptions.email");

        Ok(())
    }
}

#[async_trait]
impl RedemptionRepository for MongoRedemptionRepository {
    async fn create(&self, mut redemption: Redemption) -> AppResult<Redemption> {
        let result = self.collection.insert_one(&redemption).await?;
        redemption.id = result.inserted_id.as_object_id();
        Ok(redemption)
    }

    async fn list(&self, email: Option<&str>) -> AppResult<Vec<Redemption>> {
        let filter = match email {
            Some(email) => doc! { "email": email },
            None => doc! {},
        };

        let redemptions = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(redemptions)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Redemption>> {
        let redemption = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(redemption)
    }

    async fn set_delivery_status(
        &self,
        id: &ObjectId,
        delivered: bool,
        updated_at: BsonDateTime,
    ) -> AppResult<Option<Redemption>> {
        let redemption = self
            .collection
            .find_one_and_update(
                doc! { "_id": *id },
                doc! { "$set": { "deliveryStatus": delivered, "updatedAt": updated_at } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(redemption)
    }

    async fn count(&self, delivered: Option<bool>) -> AppResult<u64> {
        let filter = match delivered {
            Some(delivered) => doc! { "deliveryStatus": delivered },
            None => doc! {},
        };

        let count = self.collection.count_documents(filter).await?;
        Ok(count)
    }
}
