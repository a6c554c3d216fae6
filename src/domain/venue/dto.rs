use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::venue::{self, AvailabilityStatus};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, max = 200, message = "장소명은 1~200자여야 합니다."))]
    pub name: String,
    #[validate(length(min = 1, max = 300, message = "위치는 1~300자여야 합니다."))]
    pub location: String,
    #[validate(range(min = 1, message = "수용 인원은 1명 이상이어야 합니다."))]
    pub capacity: i32,
    pub facilities: Option<String>,
    #[serde(default)]
    pub has_projector: bool,
    #[serde(default)]
    pub has_sound_system: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenueStatusRequest {
    pub availability_status: AvailabilityStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponse {
    pub venue_id: i64,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub facilities: Option<String>,
    pub has_projector: bool,
    pub has_sound_system: bool,
    pub availability_status: AvailabilityStatus,
}

impl From<venue::Model> for VenueResponse {
    fn from(model: venue::Model) -> Self {
        Self {
            venue_id: model.venue_id,
            name: model.name,
            location: model.location,
            capacity: model.capacity,
            facilities: model.facilities,
            has_projector: model.has_projector,
            has_sound_system: model.has_sound_system,
            availability_status: model.availability_status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVenueResponse {
    pub venue_id: i64,
    /// 장소 정보가 비워진 행사 수
    pub events_detached: u64,
}
