//! 통합 테스트 공용 헬퍼
//!
//! 인메모리 SQLite에 스키마를 만들고 시드 데이터를 넣습니다.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use chrono::{Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use campus_event_server::config::{establish_connection, AppConfig, DatabaseConfig, LoggingConfig};
use campus_event_server::domain::event::entity::event::{self, EventStatus, EventType};
use campus_event_server::domain::notification::{EmailMessage, NotificationError, Notifier};
use campus_event_server::domain::user::entity::department;
use campus_event_server::domain::user::entity::user::{self, UserRole};
use campus_event_server::domain::venue::entity::venue::{self, AvailabilityStatus};
use campus_event_server::utils::auth::Actor;
use campus_event_server::utils::jwt::encode_access_token;
use campus_event_server::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

/// 발송된 메일을 모아두는 Notifier
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            schema_update: true,
        },
        jwt_secret: JWT_SECRET.to_string(),
        logging: LoggingConfig {
            log_dir: "logs".to_string(),
            default_filter: "warn".to_string(),
        },
        mail: None,
        rate_limit: None,
    }
}

pub async fn setup() -> TestContext {
    let config = test_config();
    let db = establish_connection(&config.database)
        .await
        .expect("in-memory database should be available");
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(db, config, notifier.clone());

    TestContext { state, notifier }
}

pub fn actor(user: &user::Model) -> Actor {
    Actor {
        user_id: user.user_id,
        role: user.role,
        ip_address: Some("127.0.0.1".to_string()),
    }
}

pub fn bearer(user: &user::Model) -> String {
    let token = encode_access_token(user.user_id, JWT_SECRET, 3600).unwrap();
    format!("Bearer {}", token)
}

pub async fn seed_department(state: &AppState, name: &str, code: &str) -> department::Model {
    let now = Utc::now().naive_utc();
    department::ActiveModel {
        name: Set(name.to_string()),
        code: Set(code.to_string()),
        head_of_department: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub async fn seed_user(state: &AppState, username: &str, role: UserRole) -> user::Model {
    seed_user_in(state, username, role, None).await
}

pub async fn seed_user_in(
    state: &AppState,
    username: &str,
    role: UserRole,
    department_id: Option<i64>,
) -> user::Model {
    let now = Utc::now().naive_utc();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@college.edu", username)),
        full_name: Set(format!("{} Kim", username)),
        role: Set(role),
        phone_number: Set(None),
        department_id: Set(department_id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub async fn seed_venue(state: &AppState, capacity: i32) -> venue::Model {
    let now = Utc::now().naive_utc();
    venue::ActiveModel {
        name: Set("Main Auditorium".to_string()),
        location: Set("Building A".to_string()),
        capacity: Set(capacity),
        facilities: Set(None),
        has_projector: Set(true),
        has_sound_system: Set(true),
        availability_status: Set(AvailabilityStatus::Available),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub struct EventSeed {
    pub title: &'static str,
    pub status: EventStatus,
    pub max_capacity: i32,
    pub venue_id: Option<i64>,
    pub department_id: Option<i64>,
    pub created_by: Option<i64>,
}

impl Default for EventSeed {
    fn default() -> Self {
        Self {
            title: "Rust Workshop",
            status: EventStatus::Published,
            max_capacity: 10,
            venue_id: None,
            department_id: None,
            created_by: None,
        }
    }
}

pub async fn seed_event(state: &AppState, seed: EventSeed) -> event::Model {
    let now = Utc::now().naive_utc();
    event::ActiveModel {
        title: Set(seed.title.to_string()),
        description: Set("Hands-on session".to_string()),
        event_date: Set((Utc::now() + Duration::days(7)).date_naive()),
        start_time: Set(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
        end_time: Set(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
        venue_id: Set(seed.venue_id),
        department_id: Set(seed.department_id),
        created_by: Set(seed.created_by),
        max_capacity: Set(seed.max_capacity),
        registered_count: Set(0),
        event_type: Set(EventType::Workshop),
        status: Set(seed.status),
        registration_fee: Set(Decimal::ZERO),
        registration_deadline: Set(None),
        poster_image: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub async fn reload_event(state: &AppState, event_id: i64) -> event::Model {
    event::Entity::find_by_id(event_id)
        .one(&state.db)
        .await
        .unwrap()
        .expect("event should exist")
}

pub fn json_request(method: Method, uri: &str, auth: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}
