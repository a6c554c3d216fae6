use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::domain::audit::entity::audit_log::AuditAction;
use crate::domain::audit::logger::{entity_type, AuditEntry};
use crate::domain::event::entity::event;
use crate::state::AppState;
use crate::utils::auth::Actor;
use crate::utils::error::AppError;

use super::dto::{CreateVenueRequest, DeleteVenueResponse, UpdateVenueStatusRequest, VenueResponse};
use super::entity::venue::{self, AvailabilityStatus};

pub struct VenueService;

impl VenueService {
    pub async fn create_venue(
        state: &AppState,
        actor: &Actor,
        req: CreateVenueRequest,
    ) -> Result<VenueResponse, AppError> {
        let now = Utc::now().naive_utc();
        let saved = venue::ActiveModel {
            name: Set(req.name),
            location: Set(req.location),
            capacity: Set(req.capacity),
            facilities: Set(req.facilities),
            has_projector: Set(req.has_projector),
            has_sound_system: Set(req.has_sound_system),
            availability_status: Set(AvailabilityStatus::Available),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Create,
                    entity_type::VENUE,
                    saved.venue_id,
                    format!("Created venue {}", saved.name),
                ),
            )
            .await;

        Ok(saved.into())
    }

    pub async fn list_venues(state: &AppState) -> Result<Vec<VenueResponse>, AppError> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::Name)
            .all(&state.db)
            .await?;

        Ok(venues.into_iter().map(Into::into).collect())
    }

    pub async fn update_venue_status(
        state: &AppState,
        actor: &Actor,
        venue_id: i64,
        req: UpdateVenueStatusRequest,
    ) -> Result<VenueResponse, AppError> {
        let found = Self::find_venue(state, venue_id).await?;

        let mut active: venue::ActiveModel = found.into();
        active.availability_status = Set(req.availability_status);
        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(&state.db).await?;

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Update,
                    entity_type::VENUE,
                    venue_id,
                    format!(
                        "Changed availability of {} to {:?}",
                        updated.name, updated.availability_status
                    ),
                ),
            )
            .await;

        Ok(updated.into())
    }

    /// 장소 삭제. 이 장소를 쓰던 행사는 남기고 venue_id만 비웁니다.
    pub async fn delete_venue(
        state: &AppState,
        actor: &Actor,
        venue_id: i64,
    ) -> Result<DeleteVenueResponse, AppError> {
        let txn = state.db.begin().await?;

        let found = venue::Entity::find_by_id(venue_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::VenueNotFound("존재하지 않는 장소입니다.".to_string()))?;

        let detached = event::Entity::update_many()
            .col_expr(event::Column::VenueId, Expr::value(Option::<i64>::None))
            .filter(event::Column::VenueId.eq(venue_id))
            .exec(&txn)
            .await?;

        venue::Entity::delete_by_id(venue_id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            venue_id,
            events_detached = detached.rows_affected,
            "venue deleted"
        );

        state
            .audit
            .record(
                &state.db,
                actor,
                AuditEntry::new(
                    AuditAction::Delete,
                    entity_type::VENUE,
                    venue_id,
                    format!("Deleted venue {}", found.name),
                ),
            )
            .await;

        Ok(DeleteVenueResponse {
            venue_id,
            events_detached: detached.rows_affected,
        })
    }

    async fn find_venue(state: &AppState, venue_id: i64) -> Result<venue::Model, AppError> {
        venue::Entity::find_by_id(venue_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::VenueNotFound("존재하지 않는 장소입니다.".to_string()))
    }
}
