use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use tracing::{debug, warn};

use super::entity::audit_log::{self, AuditAction};
use crate::utils::auth::Actor;

/// 감사 로그 대상 엔티티 이름
pub mod entity_type {
    pub const EVENT: &str = "Event";
    pub const REGISTRATION: &str = "Registration";
    pub const ATTENDANCE: &str = "Attendance";
    pub const DASHBOARD: &str = "Dashboard";
    pub const USER: &str = "User";
    pub const VENUE: &str = "Venue";
    pub const DEPARTMENT: &str = "Department";
}

/// 프로세스 내에서 단조 증가하는 타임스탬프 (마이크로초)
#[derive(Debug, Default)]
pub struct AuditClock {
    last_micros: AtomicI64,
}

impl AuditClock {
    pub fn next(&self) -> NaiveDateTime {
        let now = Utc::now().timestamp_micros();
        let mut prev = self.last_micros.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last_micros.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    return DateTime::from_timestamp_micros(candidate)
                        .unwrap_or_else(Utc::now)
                        .naive_utc()
                }
                Err(actual) => prev = actual,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub entity_type: &'static str,
    pub entity_id: i64,
    pub description: String,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        entity_type: &'static str,
        entity_id: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action,
            entity_type,
            entity_id,
            description: description.into(),
        }
    }
}

/// 관리자 작업 감사 로그 기록기
///
/// 기록 실패는 호출자에게 전파하지 않습니다. 본 작업은 이미 커밋된 뒤에 호출됩니다.
#[derive(Debug, Clone, Default)]
pub struct AuditLogger {
    clock: Arc<AuditClock>,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record<C>(&self, db: &C, actor: &Actor, entry: AuditEntry)
    where
        C: ConnectionTrait,
    {
        let model = audit_log::ActiveModel {
            admin_id: Set(Some(actor.user_id)),
            action_type: Set(entry.action),
            entity_type: Set(entry.entity_type.to_string()),
            entity_id: Set(entry.entity_id),
            description: Set(entry.description.clone()),
            created_at: Set(self.clock.next()),
            ip_address: Set(actor.ip_address.clone()),
            ..Default::default()
        };

        match model.insert(db).await {
            Ok(saved) => debug!(
                audit_log_id = saved.audit_log_id,
                action = ?entry.action,
                entity_type = entry.entity_type,
                entity_id = entry.entity_id,
                "audit log recorded"
            ),
            Err(e) => warn!(
                action = ?entry.action,
                entity_type = entry.entity_type,
                entity_id = entry.entity_id,
                error = %e,
                "failed to write audit log"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_should_be_strictly_monotonic() {
        let clock = AuditClock::default();

        let mut prev = clock.next();
        for _ in 0..1_000 {
            let next = clock.next();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn clock_should_stay_monotonic_across_threads() {
        let clock = Arc::new(AuditClock::default());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clock = Arc::clone(&clock);
                std::thread::spawn(move || (0..250).map(|_| clock.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<NaiveDateTime> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();

        assert_eq!(all.len(), total);
    }
}
