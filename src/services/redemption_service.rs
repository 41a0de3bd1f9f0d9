use std::{sync::Arc, time::Duration};

use mongodb::bson::DateTime as BsonDateTime;

use crate::{
    db::with_timeout,
    errors::{AppError, AppResult},
    models::{
        domain::Redemption,
        dto::{
            request::{CreateRedemptionRequest, UpdateDeliveryStatusRequest},
            response::RedemptionDto,
        },
        ids::parse_object_id,
    },
    repositories::RedemptionRepository,
};

pub struct RedemptionService {
    repository: Arc<dyn RedemptionRepository>,
    timeout: Duration,
}

impl RedemptionService {
    pub fn new(repository: Arc<dyn RedemptionRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    pub async fn create(&self, request: CreateRedemptionRequest) -> AppResult<RedemptionDto> {
        let redemption = request.into_redemption(BsonDateTime::now())?;
        let redemption = with_timeout(self.timeout, self.repository.create(redemption)).await?;

        log::info!(
            "Redemption of '{}' recorded for {}",
            redemption.gift_name,
            redemption.email
        );
        Ok(redemption.into())
    }

    pub async fn list(&self, email: Option<&str>) -> AppResult<Vec<RedemptionDto>> {
        let redemptions = with_timeout(self.timeout, self.repository.list(email)).await?;
        Ok(redemptions.into_iter().map(RedemptionDto::from).collect())
    }

    /// Raw lookup, used where the caller's access must be checked against
    /// the owner before anything is returned.
    pub async fn find(&self, id: &str) -> AppResult<Redemption> {
        let id = parse_object_id(id, "id")?;
        with_timeout(self.timeout, self.repository.find_by_id(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Not found".to_string()))
    }

    pub async fn set_delivery_status(
        &self,
        id: &str,
        request: UpdateDeliveryStatusRequest,
    ) -> AppResult<RedemptionDto> {
        let id = parse_object_id(id, "id")?;
        let redemption = with_timeout(
            self.timeout,
            self.repository
                .set_delivery_status(&id, request.delivery_status, BsonDateTime::now()),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

        Ok(redemption.into())
    }
}
