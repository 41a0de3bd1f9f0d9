use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{User, UserRole},
    repositories::is_duplicate_key,
};

pub const USERS_COLLECTION: &str = "users";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. A taken email yields `AppError::AlreadyExists`.
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// All users, or only the one with `email`, newest first.
    async fn list(&self, email: Option<&str>) -> AppResult<Vec<User>>;
    /// Case-insensitive match of `pattern` (a regex) against emails.
    async fn search_by_email(&self, pattern: &str, limit: i64) -> AppResult<Vec<User>>;
    async fn set_role(&self, id: &ObjectId, role: UserRole) -> AppResult<Option<User>>;
    async fn set_image(&self, email: &str, img: &str) -> AppResult<Option<User>>;
    /// Adds `gems` to the user's balance. Returns false when no user matched.
    async fn increment_gems(&self, email: &str, gems: i64) -> AppResult<bool>;
    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(USERS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .unique(true)
            .name("email_unique".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on users.email");

        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, mut user: User) -> AppResult<User> {
        let result = self.collection.insert_one(&user).await.map_err(|err| {
            if is_duplicate_key(&err) {
                AppError::AlreadyExists(format!("User with email '{}' already exists", user.email))
            } else {
                err.into()
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn list(&self, email: Option<&str>) -> AppResult<Vec<User>> {
        let mut filter = doc! {};
        if let Some(email) = email {
            filter.insert("email", email);
        }

        let users = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn search_by_email(&self, pattern: &str, limit: i64) -> AppResult<Vec<User>> {
        let users = self
            .collection
            .find(doc! { "email": { "$regex": pattern, "$options": "i" } })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn set_role(&self, id: &ObjectId, role: UserRole) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": { "role": role.as_str() } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn set_image(&self, email: &str, img: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one_and_update(doc! { "email": email }, doc! { "$set": { "img": img } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn increment_gems(&self, email: &str, gems: i64) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(doc! { "email": email }, doc! { "$inc": { "gems": gems } })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "role": role.as_str() })
            .await?;
        Ok(count)
    }
}
