use mongodb::bson::oid::ObjectId;

use crate::errors::{AppError, AppResult};

/// Parses a 24-character hex identifier supplied by a client.
pub fn parse_object_id(raw: &str, field: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| {
        AppError::ValidationError(format!(
            "{} must be a 24-character hex identifier",
            field
        ))
    })
}
