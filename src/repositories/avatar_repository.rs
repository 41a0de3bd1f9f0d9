use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::Avatar};

#[async_trait]
pub trait AvatarRepository: Send + Sync {
    async fn create(&self, avatar: Avatar) -> AppResult<Avatar>;
    async fn find_all(&self) -> AppResult<Vec<Avatar>>;
}

pub struct MongoAvatarRepository {
    collection: Collection<Avatar>,
}

impl MongoAvatarRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("avatars");
        Self { collection }
    }
}

#[async_trait]
impl AvatarRepository for MongoAvatarRepository {
    async fn create(&self, mut avatar: Avatar) -> AppResult<Avatar> {
        let result = self.collection.insert_one(&avatar).await?;
        avatar.id = result.inserted_id.as_object_id();
        Ok(avatar)
    }

    async fn find_all(&self) -> AppResult<Vec<Avatar>> {
        let cursor = self.collection.find(doc! {}).await?;
        let avatars: Vec<Avatar> = cursor.try_collect().await?;
        Ok(avatars)
    }
}
