//! 신청자 명단 CSV 내보내기

use std::collections::HashMap;

use crate::domain::event::entity::event;
use crate::domain::user::entity::{department, user};
use crate::utils::error::AppError;

use super::entity::registration;

pub const CSV_HEADER: [&str; 6] = [
    "Roll Number",
    "Name",
    "Email",
    "Department",
    "Status",
    "Registration Date",
];

const REGISTRATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug)]
pub struct CsvExport {
    pub filename: String,
    pub body: Vec<u8>,
}

/// `<행사 제목>_registrations.csv`
pub fn export_filename(event: &event::Model) -> String {
    let title: String = event
        .title
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' | '\r' | '\n' => '_',
            other => other,
        })
        .collect();
    format!("{}_registrations.csv", title)
}

/// 신청 목록을 CSV로 직렬화합니다.
///
/// 학생 정보가 없는 신청은 건너뜁니다. 학과가 없으면 빈 칸입니다.
pub fn write_registrations(
    event: &event::Model,
    rows: Vec<(registration::Model, Option<user::Model>)>,
    departments: &HashMap<i64, department::Model>,
) -> Result<CsvExport, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::internal_error(e.to_string()))?;

    for (reg, student) in rows {
        let Some(student) = student else {
            continue;
        };

        let department_name = student
            .department_id
            .and_then(|id| departments.get(&id))
            .map(|d| d.name.as_str())
            .unwrap_or("");
        let registered_at = reg.registered_at.format(REGISTRATION_DATE_FORMAT).to_string();

        writer
            .write_record([
                student.username.as_str(),
                student.full_name.as_str(),
                student.email.as_str(),
                department_name,
                reg.status.as_str(),
                registered_at.as_str(),
            ])
            .map_err(|e| AppError::internal_error(e.to_string()))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| AppError::internal_error(e.to_string()))?;

    Ok(CsvExport {
        filename: export_filename(event),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal::Decimal;

    use crate::domain::event::entity::event::{EventStatus, EventType};
    use crate::domain::registration::entity::registration::{PaymentStatus, RegistrationStatus};
    use crate::domain::user::entity::user::UserRole;

    fn sample_event(title: &str) -> event::Model {
        let now = Utc::now().naive_utc();
        event::Model {
            event_id: 7,
            title: title.to_string(),
            description: String::new(),
            event_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            venue_id: None,
            department_id: None,
            created_by: None,
            max_capacity: 50,
            registered_count: 1,
            event_type: EventType::Seminar,
            status: EventStatus::Published,
            registration_fee: Decimal::ZERO,
            registration_deadline: None,
            poster_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_student(department_id: Option<i64>) -> user::Model {
        let now = Utc::now().naive_utc();
        user::Model {
            user_id: 3,
            username: "CS2024001".to_string(),
            email: "kim@campus.ac.kr".to_string(),
            full_name: "Kim, Minji".to_string(),
            role: UserRole::Student,
            phone_number: None,
            department_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_registration() -> registration::Model {
        let registered_at = NaiveDate::from_ymd_opt(2026, 11, 1)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();
        registration::Model {
            registration_id: 11,
            event_id: 7,
            student_id: 3,
            status: RegistrationStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            transaction_id: None,
            registered_at,
            updated_at: registered_at,
        }
    }

    #[test]
    fn export_should_write_header_and_quoted_rows() {
        let now = Utc::now().naive_utc();
        let mut departments = HashMap::new();
        departments.insert(
            1,
            department::Model {
                department_id: 1,
                name: "Computer Science".to_string(),
                code: "CS".to_string(),
                head_of_department: None,
                created_at: now,
                updated_at: now,
            },
        );

        let export = write_registrations(
            &sample_event("Rust Seminar"),
            vec![(sample_registration(), Some(sample_student(Some(1))))],
            &departments,
        )
        .unwrap();

        let text = String::from_utf8(export.body).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Roll Number,Name,Email,Department,Status,Registration Date")
        );
        assert_eq!(
            lines.next(),
            Some("CS2024001,\"Kim, Minji\",kim@campus.ac.kr,Computer Science,confirmed,2026-11-01 09:30:05")
        );
        assert_eq!(lines.next(), None);
        assert_eq!(export.filename, "Rust Seminar_registrations.csv");
    }

    #[test]
    fn export_should_leave_department_blank_when_missing() {
        let export = write_registrations(
            &sample_event("Hackathon"),
            vec![(sample_registration(), Some(sample_student(None)))],
            &HashMap::new(),
        )
        .unwrap();

        let text = String::from_utf8(export.body).unwrap();
        assert!(text.contains("kim@campus.ac.kr,,confirmed"));
    }

    #[test]
    fn filename_should_not_contain_quote_or_slash() {
        assert_eq!(
            export_filename(&sample_event("A/B \"Night\"")),
            "A_B _Night__registrations.csv"
        );
    }
}
