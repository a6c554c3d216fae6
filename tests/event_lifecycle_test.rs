//! 행사 상태 전이 / 수정 / 삭제 통합 테스트

mod common;

use chrono::{Duration, NaiveTime, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};

use campus_event_server::domain::event::dto::{
    AddCoordinatorRequest, CreateEventRequest, EventListQuery, UpdateEventRequest,
};
use campus_event_server::domain::event::entity::event::{EventStatus, EventType};
use campus_event_server::domain::event::service::EventService;
use campus_event_server::domain::registration::entity::registration;
use campus_event_server::domain::registration::service::RegistrationService;
use campus_event_server::domain::user::entity::user::{self, UserRole};
use campus_event_server::domain::user::service::DepartmentService;
use campus_event_server::domain::venue::service::VenueService;
use campus_event_server::utils::error::AppError;

use common::{
    actor, reload_event, seed_department, seed_event, seed_user, seed_user_in, seed_venue, setup,
    EventSeed,
};

fn create_request(max_capacity: i32, venue_id: Option<i64>) -> CreateEventRequest {
    CreateEventRequest {
        title: "Campus Hackathon".to_string(),
        description: "24h coding".to_string(),
        event_date: (Utc::now() + Duration::days(14)).date_naive(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        venue_id,
        department_id: None,
        max_capacity,
        event_type: EventType::Competition,
        registration_fee: None,
        registration_deadline: None,
        poster_image: None,
    }
}

#[tokio::test]
async fn event_should_move_through_full_lifecycle() {
    let ctx = setup().await;
    let dept = seed_department(&ctx.state, "Computer Science", "CS").await;
    let admin = seed_user_in(&ctx.state, "admin", UserRole::Admin, Some(dept.department_id)).await;
    let admin = actor(&admin);

    let created = EventService::create_event(&ctx.state, &admin, create_request(50, None))
        .await
        .unwrap();
    assert_eq!(created.status, EventStatus::Draft);
    assert_eq!(created.department_id, Some(dept.department_id));

    let early = EventService::start_event(&ctx.state, &admin, created.event_id).await;
    assert!(matches!(early, Err(AppError::InvalidStatusTransition(_))));

    let published = EventService::publish_event(&ctx.state, &admin, created.event_id)
        .await
        .unwrap();
    assert_eq!(published.status, EventStatus::Published);

    let ongoing = EventService::start_event(&ctx.state, &admin, created.event_id)
        .await
        .unwrap();
    assert_eq!(ongoing.status, EventStatus::Ongoing);

    let completed = EventService::complete_event(&ctx.state, &admin, created.event_id)
        .await
        .unwrap();
    assert_eq!(completed.status, EventStatus::Completed);

    let cancel = EventService::cancel_event(&ctx.state, &admin, created.event_id).await;
    assert!(matches!(cancel, Err(AppError::InvalidStatusTransition(_))));
}

#[tokio::test]
async fn create_event_should_reject_capacity_above_venue() {
    let ctx = setup().await;
    let admin = actor(&seed_user(&ctx.state, "admin", UserRole::Admin).await);
    let venue = seed_venue(&ctx.state, 30).await;

    let result =
        EventService::create_event(&ctx.state, &admin, create_request(31, Some(venue.venue_id)))
            .await;

    match result {
        Err(AppError::ValidationError(errors)) => assert_eq!(errors[0].field, "maxCapacity"),
        other => panic!("expected validation error, got {:?}", other.map(|e| e.event_id)),
    }
}

#[tokio::test]
async fn cancel_should_notify_every_confirmed_registrant() {
    let ctx = setup().await;
    let admin = seed_user(&ctx.state, "admin", UserRole::Admin).await;
    let event = seed_event(&ctx.state, EventSeed::default()).await;

    for name in ["alice", "bob", "carol"] {
        let student = seed_user(&ctx.state, name, UserRole::Student).await;
        RegistrationService::add_manual_registration(
            &ctx.state,
            &actor(&admin),
            event.event_id,
            student.user_id,
        )
        .await
        .unwrap();
    }
    // pending 신청자는 취소 안내 대상이 아니다
    let dave = seed_user(&ctx.state, "dave", UserRole::Student).await;
    RegistrationService::register(&ctx.state, &actor(&dave), event.event_id)
        .await
        .unwrap();

    let result = EventService::cancel_event(&ctx.state, &actor(&admin), event.event_id)
        .await
        .unwrap();

    assert_eq!(result.event.status, EventStatus::Cancelled);
    assert_eq!(result.notifications_sent, 3);
    let sent = ctx.notifier.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|m| m.subject == "Event Cancelled: Rust Workshop"));
    assert!(sent.iter().all(|m| m.to != "dave@college.edu"));
}

#[tokio::test]
async fn update_should_not_shrink_capacity_below_registrations() {
    let ctx = setup().await;
    let admin = seed_user(&ctx.state, "admin", UserRole::Admin).await;
    let event = seed_event(&ctx.state, EventSeed::default()).await;
    for name in ["alice", "bob", "carol"] {
        let student = seed_user(&ctx.state, name, UserRole::Student).await;
        RegistrationService::register(&ctx.state, &actor(&student), event.event_id)
            .await
            .unwrap();
    }

    let shrink = EventService::update_event(
        &ctx.state,
        &actor(&admin),
        event.event_id,
        UpdateEventRequest {
            max_capacity: Some(2),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(shrink, Err(AppError::PreconditionFailed(_))));

    let updated = EventService::update_event(
        &ctx.state,
        &actor(&admin),
        event.event_id,
        UpdateEventRequest {
            max_capacity: Some(3),
            title: Some("Advanced Rust".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.max_capacity, 3);
    assert_eq!(updated.remaining_seats, 0);
    assert_eq!(updated.title, "Advanced Rust");
}

#[tokio::test]
async fn organizer_should_only_edit_own_draft_events() {
    let ctx = setup().await;
    let owner = seed_user(&ctx.state, "owner", UserRole::Organizer).await;
    let other = seed_user(&ctx.state, "other", UserRole::Organizer).await;
    let draft = seed_event(
        &ctx.state,
        EventSeed {
            status: EventStatus::Draft,
            created_by: Some(owner.user_id),
            ..Default::default()
        },
    )
    .await;

    let foreign = EventService::update_event(
        &ctx.state,
        &actor(&other),
        draft.event_id,
        UpdateEventRequest {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    EventService::update_event(
        &ctx.state,
        &actor(&owner),
        draft.event_id,
        UpdateEventRequest {
            title: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(reload_event(&ctx.state, draft.event_id).await.title, "Renamed");
}

#[tokio::test]
async fn non_staff_should_only_see_open_events() {
    let ctx = setup().await;
    let admin = actor(&seed_user(&ctx.state, "admin", UserRole::Admin).await);
    let student = actor(&seed_user(&ctx.state, "alice", UserRole::Student).await);
    let draft = seed_event(
        &ctx.state,
        EventSeed {
            title: "Hidden Draft",
            status: EventStatus::Draft,
            ..Default::default()
        },
    )
    .await;
    seed_event(&ctx.state, EventSeed::default()).await;

    let hidden = EventService::get_event(&ctx.state, Some(&student), draft.event_id).await;
    assert!(matches!(hidden, Err(AppError::EventNotFound(_))));
    assert!(EventService::get_event(&ctx.state, Some(&admin), draft.event_id)
        .await
        .is_ok());

    let query = || EventListQuery {
        status: None,
        department_id: None,
        page: None,
        size: None,
    };
    let anonymous = EventService::list_events(&ctx.state, None, query()).await.unwrap();
    assert_eq!(anonymous.total, 1);
    assert_eq!(anonymous.events[0].title, "Rust Workshop");

    let staff = EventService::list_events(&ctx.state, Some(&admin), query())
        .await
        .unwrap();
    assert_eq!(staff.total, 2);
}

#[tokio::test]
async fn delete_event_should_remove_registrations_and_notify_seat_holders() {
    let ctx = setup().await;
    let admin = seed_user(&ctx.state, "admin", UserRole::Admin).await;
    let alice = seed_user(&ctx.state, "alice", UserRole::Student).await;
    let event = seed_event(&ctx.state, EventSeed::default()).await;
    RegistrationService::register(&ctx.state, &actor(&alice), event.event_id)
        .await
        .unwrap();

    let result = EventService::delete_event(&ctx.state, &actor(&admin), event.event_id)
        .await
        .unwrap();

    assert_eq!(result.registrations_affected, 1);
    assert_eq!(ctx.notifier.sent().len(), 1);
    let remaining = registration::Entity::find()
        .count(&ctx.state.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    let gone = EventService::get_event(&ctx.state, Some(&actor(&admin)), event.event_id).await;
    assert!(matches!(gone, Err(AppError::EventNotFound(_))));
}

#[tokio::test]
async fn deleting_venue_should_detach_events() {
    let ctx = setup().await;
    let admin = actor(&seed_user(&ctx.state, "admin", UserRole::Admin).await);
    let venue = seed_venue(&ctx.state, 100).await;
    let event = seed_event(
        &ctx.state,
        EventSeed {
            venue_id: Some(venue.venue_id),
            ..Default::default()
        },
    )
    .await;

    let result = VenueService::delete_venue(&ctx.state, &admin, venue.venue_id)
        .await
        .unwrap();

    assert_eq!(result.events_detached, 1);
    assert_eq!(reload_event(&ctx.state, event.event_id).await.venue_id, None);
}

#[tokio::test]
async fn deleting_department_should_clear_references() {
    let ctx = setup().await;
    let admin = actor(&seed_user(&ctx.state, "admin", UserRole::Admin).await);
    let dept = seed_department(&ctx.state, "Physics", "PHY").await;
    let student = seed_user_in(&ctx.state, "alice", UserRole::Student, Some(dept.department_id)).await;
    let event = seed_event(
        &ctx.state,
        EventSeed {
            department_id: Some(dept.department_id),
            ..Default::default()
        },
    )
    .await;

    DepartmentService::delete_department(&ctx.state, &admin, dept.department_id)
        .await
        .unwrap();

    let reloaded = user::Entity::find_by_id(student.user_id)
        .one(&ctx.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.department_id, None);
    assert_eq!(reload_event(&ctx.state, event.event_id).await.department_id, None);
}

#[tokio::test]
async fn coordinator_must_be_faculty_and_unique() {
    let ctx = setup().await;
    let admin = actor(&seed_user(&ctx.state, "admin", UserRole::Admin).await);
    let prof = seed_user(&ctx.state, "prof", UserRole::Faculty).await;
    let student = seed_user(&ctx.state, "alice", UserRole::Student).await;
    let event = seed_event(&ctx.state, EventSeed::default()).await;

    let request = |faculty_id| AddCoordinatorRequest {
        faculty_id,
        role: None,
    };

    let added = EventService::add_coordinator(&ctx.state, &admin, event.event_id, request(prof.user_id))
        .await
        .unwrap();
    assert_eq!(added.role, "Coordinator");

    let duplicate =
        EventService::add_coordinator(&ctx.state, &admin, event.event_id, request(prof.user_id))
            .await;
    assert!(matches!(duplicate, Err(AppError::PreconditionFailed(_))));

    let not_faculty =
        EventService::add_coordinator(&ctx.state, &admin, event.event_id, request(student.user_id))
            .await;
    assert!(matches!(not_faculty, Err(AppError::UserNotFound(_))));

    let listed = EventService::list_coordinators(&ctx.state, event.event_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}
