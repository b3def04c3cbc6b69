use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    OwnerSummaryQuery, VehicleEfficiencyResponse, VehicleMaintenanceResponse,
};
use crate::models::Vehicle;
use crate::repositories::RecordStore;
use crate::services::efficiency::{efficiency_summary, recent_expense};
use crate::services::fleet_summary::{load_fleet_summary, FleetSummary, SummaryFilter};
use crate::services::maintenance_projector::maintenance_overview;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub struct VehicleController {
    records: Arc<dyn RecordStore>,
}

impl VehicleController {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    async fn vehicle(&self, id: Uuid) -> AppResult<Vehicle> {
        self.records
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn efficiency(&self, id: Uuid) -> AppResult<VehicleEfficiencyResponse> {
        let vehicle = self.vehicle(id).await?;
        let records = self.records.fuel_records(id, None, None).await?;
        let today = Utc::now().date_naive();

        Ok(VehicleEfficiencyResponse {
            efficiency: efficiency_summary(&records),
            recent_expense: recent_expense(&records, today),
            vehicle: vehicle.into(),
        })
    }

    pub async fn maintenance(&self, id: Uuid) -> AppResult<VehicleMaintenanceResponse> {
        let vehicle = self.vehicle(id).await?;
        let fuel = self.records.fuel_records(id, None, None).await?;
        let maintenance = self.records.maintenance_records(id).await?;

        Ok(VehicleMaintenanceResponse {
            overview: maintenance_overview(&maintenance, &fuel, Utc::now()),
            vehicle: vehicle.into(),
        })
    }

    pub async fn owner_summary(&self, owner_id: Uuid, query: OwnerSummaryQuery) -> AppResult<FleetSummary> {
        query.validate()?;
        if let Some(vehicle_id) = query.vehicle_id {
            let vehicle = self.vehicle(vehicle_id).await?;
            if vehicle.owner_id != owner_id {
                return Err(bad_request_error("vehicle_id does not belong to this owner"));
            }
        }
        let filter = SummaryFilter::from(query);
        load_fleet_summary(self.records.as_ref(), owner_id, &filter, Utc::now().date_naive()).await
    }
}
