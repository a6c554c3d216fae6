pub mod config;
pub mod domain;
pub mod global;
pub mod state;
pub mod utils;

pub use state::AppState;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use domain::{audit, dashboard, event, health, registration, user, venue};
use global::middleware::request_id_middleware;
use global::rate_limit::with_rate_limit;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health_check,
        event::handler::create_event,
        event::handler::list_events,
        event::handler::get_event,
        event::handler::update_event,
        event::handler::delete_event,
        event::handler::publish_event,
        event::handler::start_event,
        event::handler::complete_event,
        event::handler::cancel_event,
        event::handler::add_coordinator,
        event::handler::list_coordinators,
        event::handler::add_resource,
        event::handler::list_resources,
        registration::handler::register,
        registration::handler::add_manual_registration,
        registration::handler::list_event_registrations,
        registration::handler::approve_registrations,
        registration::handler::reject_registrations,
        registration::handler::export_registrations,
        registration::handler::my_registrations,
        registration::handler::cancel_registration,
        registration::handler::mark_attendance,
        registration::handler::list_attendance,
        registration::handler::submit_feedback,
        registration::handler::list_feedback,
        user::handler::get_profile,
        user::handler::update_profile,
        user::handler::list_users,
        user::handler::change_role,
        user::handler::create_department,
        user::handler::list_departments,
        user::handler::delete_department,
        venue::handler::create_venue,
        venue::handler::list_venues,
        venue::handler::update_venue_status,
        venue::handler::delete_venue,
        audit::handler::list_audit_logs,
        dashboard::handler::admin_dashboard,
    ),
    components(
        schemas(
            health::dto::HealthStatus,
            health::dto::HealthState,
            health::dto::HealthChecks,
            health::dto::CheckResult,
            event::entity::event::EventStatus,
            event::entity::event::EventType,
            event::entity::event_resource::ResourceType,
            event::entity::event_resource::ResourceStatus,
            event::dto::CreateEventRequest,
            event::dto::UpdateEventRequest,
            event::dto::EventResponse,
            event::dto::EventListResponse,
            event::dto::CancelEventResponse,
            event::dto::DeleteEventResponse,
            event::dto::AddCoordinatorRequest,
            event::dto::CoordinatorResponse,
            event::dto::AddResourceRequest,
            event::dto::ResourceResponse,
            event::dto::SuccessEventResponse,
            event::dto::SuccessCancelEventResponse,
            registration::entity::registration::RegistrationStatus,
            registration::entity::registration::PaymentStatus,
            registration::entity::attendance::VerificationMethod,
            registration::dto::RegistrationResponse,
            registration::dto::ManualRegistrationRequest,
            registration::dto::ApproveRegistrationsRequest,
            registration::dto::ApproveRegistrationsResponse,
            registration::dto::RejectRegistrationsRequest,
            registration::dto::RejectRegistrationsResponse,
            registration::dto::MyRegistrationItem,
            registration::dto::EventRegistrationItem,
            registration::dto::MarkAttendanceRequest,
            registration::dto::AttendanceResponse,
            registration::dto::SubmitFeedbackRequest,
            registration::dto::FeedbackResponse,
            registration::dto::FeedbackListResponse,
            registration::dto::SuccessRegistrationResponse,
            user::entity::user::UserRole,
            user::dto::UserProfileResponse,
            user::dto::UpdateProfileRequest,
            user::dto::ChangeRoleRequest,
            user::dto::CreateDepartmentRequest,
            user::dto::DepartmentResponse,
            user::dto::SuccessProfileResponse,
            venue::entity::venue::AvailabilityStatus,
            venue::dto::CreateVenueRequest,
            venue::dto::UpdateVenueStatusRequest,
            venue::dto::VenueResponse,
            venue::dto::DeleteVenueResponse,
            audit::entity::audit_log::AuditAction,
            audit::dto::AuditLogItem,
            audit::dto::AuditLogListResponse,
            dashboard::dto::DashboardResponse,
            dashboard::dto::DashboardStats,
            dashboard::dto::RecentRegistrationItem,
            dashboard::dto::StatusCount,
            utils::response::ErrorResponse,
            utils::response::FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "헬스체크"),
        (name = "Event", description = "행사 관리 및 상태 전이"),
        (name = "Registration", description = "참가 신청 및 승인"),
        (name = "Attendance", description = "출석 관리"),
        (name = "Feedback", description = "행사 피드백"),
        (name = "User", description = "사용자 및 역할"),
        (name = "Department", description = "학과"),
        (name = "Venue", description = "행사 장소"),
        (name = "Admin", description = "관리자 대시보드 및 작업 로그")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // 행사
        .route(
            "/events",
            get(event::handler::list_events).post(event::handler::create_event),
        )
        .route(
            "/events/:event_id",
            get(event::handler::get_event)
                .patch(event::handler::update_event)
                .delete(event::handler::delete_event),
        )
        .route("/events/:event_id/publish", post(event::handler::publish_event))
        .route("/events/:event_id/start", post(event::handler::start_event))
        .route("/events/:event_id/complete", post(event::handler::complete_event))
        .route("/events/:event_id/cancel", post(event::handler::cancel_event))
        .route(
            "/events/:event_id/coordinators",
            get(event::handler::list_coordinators).post(event::handler::add_coordinator),
        )
        .route(
            "/events/:event_id/resources",
            get(event::handler::list_resources).post(event::handler::add_resource),
        )
        // 참가 신청
        .route(
            "/events/:event_id/registrations",
            get(registration::handler::list_event_registrations)
                .post(registration::handler::register),
        )
        .route(
            "/events/:event_id/registrations/manual",
            post(registration::handler::add_manual_registration),
        )
        .route(
            "/events/:event_id/registrations/approve",
            post(registration::handler::approve_registrations),
        )
        .route(
            "/events/:event_id/registrations/reject",
            post(registration::handler::reject_registrations),
        )
        .route(
            "/events/:event_id/registrations/export",
            get(registration::handler::export_registrations),
        )
        .route("/registrations/me", get(registration::handler::my_registrations))
        .route(
            "/registrations/:registration_id/cancel",
            post(registration::handler::cancel_registration),
        )
        // 출석 / 피드백
        .route(
            "/events/:event_id/attendance",
            get(registration::handler::list_attendance)
                .post(registration::handler::mark_attendance),
        )
        .route(
            "/events/:event_id/feedback",
            get(registration::handler::list_feedback).post(registration::handler::submit_feedback),
        )
        // 사용자 / 학과
        .route(
            "/users/me",
            get(user::handler::get_profile).patch(user::handler::update_profile),
        )
        .route(
            "/departments",
            get(user::handler::list_departments).post(user::handler::create_department),
        )
        .route(
            "/departments/:department_id",
            delete(user::handler::delete_department),
        )
        // 장소
        .route(
            "/venues",
            get(venue::handler::list_venues).post(venue::handler::create_venue),
        )
        .route("/venues/:venue_id", delete(venue::handler::delete_venue))
        .route(
            "/venues/:venue_id/status",
            put(venue::handler::update_venue_status),
        )
        // 관리자
        .route("/admin/users", get(user::handler::list_users))
        .route("/admin/users/:user_id/role", put(user::handler::change_role))
        .route("/admin/dashboard", get(dashboard::handler::admin_dashboard))
        .route("/admin/audit-logs", get(audit::handler::list_audit_logs))
}

/// 전체 라우터 구성
///
/// Rate limit은 설정이 있을 때만 `/api/v1` 하위에 적용됩니다.
pub fn app(state: AppState) -> Router {
    let api = match state.config.rate_limit.as_ref() {
        Some(config) => with_rate_limit(api_routes(), config),
        None => api_routes(),
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/v1", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
