use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::Lesson};

#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn create(&self, lesson: Lesson) -> AppResult<Lesson>;
    async fn find_all(&self) -> AppResult<Vec<Lesson>>;
    async fn count(&self) -> AppResult<u64>;
}

pub struct MongoLessonRepository {
    collection: Collection<Lesson>,
}

impl MongoLessonRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("lessons");
        Self { collection }
    }
}

#[async_trait]
impl LessonRepository for MongoLessonRepository {
    async fn create(&self, mut lesson: Lesson) -> AppResult<Lesson> {
        let result = self.collection.insert_one(&lesson).await?;
        lesson.id = result.inserted_id.as_object_id();
        Ok(lesson)
    }

    async fn find_all(&self) -> AppResult<Vec<Lesson>> {
        let cursor = self.collection.find(doc! {}).await?;
        let lessons: Vec<Lesson> = cursor.try_collect().await?;
        Ok(lessons)
    }

    async fn count(&self) -> AppResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }
}
