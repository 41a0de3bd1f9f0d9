use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// A gift a user redeemed with gems, and where to ship it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub gift_id: String,
    pub gift_name: String,
    #[serde(default)]
    pub gift_img: String,
    #[serde(default)]
    pub cost: i64,
    pub address: ShippingAddress,
    #[serde(default)]
    pub delivery_status: bool,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub notes: String,
}
