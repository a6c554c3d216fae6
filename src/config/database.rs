use crate::config::DatabaseConfig;
use crate::domain::{
    audit::entity::audit_log,
    event::entity::{event, event_coordinator, event_resource},
    registration::entity::{attendance, event_feedback, registration},
    user::entity::{department, user},
    venue::entity::venue,
};
use sea_orm::sea_query::{Alias, ColumnDef, Table, TableAlterStatement};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Schema,
    Statement,
};
use tracing::info;

pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options.sqlx_logging(false);
    // 인메모리 SQLite는 커넥션마다 별도 DB가 되므로 하나로 고정
    if config.url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Successfully connected to the database.");

    if config.schema_update {
        sync_schema(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

/// 엔티티 정의로 테이블과 인덱스를 생성합니다. 이미 있으면 건너뜁니다.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // 부모 테이블 먼저 (FK 순서)
    create_table_if_not_exists(db, &schema, department::Entity).await?;
    create_table_if_not_exists(db, &schema, venue::Entity).await?;
    create_table_if_not_exists(db, &schema, user::Entity).await?;

    create_table_if_not_exists(db, &schema, event::Entity).await?;

    create_table_if_not_exists(db, &schema, registration::Entity).await?;
    create_table_if_not_exists(db, &schema, attendance::Entity).await?;
    create_table_if_not_exists(db, &schema, event_feedback::Entity).await?;
    create_table_if_not_exists(db, &schema, event_coordinator::Entity).await?;
    create_table_if_not_exists(db, &schema, event_resource::Entity).await?;
    create_table_if_not_exists(db, &schema, audit_log::Entity).await?;

    if backend == DbBackend::MySql {
        db.execute(backend.build(&audit_log_time_precision())).await?;
    }

    // 학생당 행사별 1건
    create_unique_index_if_not_exists(
        db,
        "uq_registration_event_student",
        "registration",
        &["event_id", "student_id"],
    )
    .await?;
    create_unique_index_if_not_exists(
        db,
        "uq_attendance_event_student",
        "attendance",
        &["event_id", "student_id"],
    )
    .await?;
    create_unique_index_if_not_exists(
        db,
        "uq_event_feedback_event_student",
        "event_feedback",
        &["event_id", "student_id"],
    )
    .await?;
    create_unique_index_if_not_exists(
        db,
        "uq_event_coordinator_event_faculty",
        "event_coordinator",
        &["event_id", "faculty_id"],
    )
    .await?;

    create_index_if_not_exists(db, "idx_event_date_status", "event", &["event_date", "status"])
        .await?;
    create_index_if_not_exists(
        db,
        "idx_registration_event_status",
        "registration",
        &["event_id", "status"],
    )
    .await?;
    create_index_if_not_exists(
        db,
        "idx_audit_log_entity",
        "audit_log",
        &["entity_type", "entity_id"],
    )
    .await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

/// MySQL `DATETIME`은 초 단위라 작업 로그의 마이크로초 순서가 사라지므로 `DATETIME(6)`으로 바꿉니다.
fn audit_log_time_precision() -> TableAlterStatement {
    Table::alter()
        .table(audit_log::Entity)
        .modify_column(
            ColumnDef::new(audit_log::Column::CreatedAt)
                .custom(Alias::new("DATETIME(6)"))
                .not_null(),
        )
        .to_owned()
}

fn is_already_exists(err: &DbErr) -> bool {
    let err_str = err.to_string().to_lowercase();
    err_str.contains("duplicate") || err_str.contains("already exists")
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let cols = columns.join(", ");
    let sql = format!("CREATE INDEX {} ON {} ({})", index_name, table_name, cols);
    let stmt = Statement::from_string(backend, sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) if is_already_exists(&e) => Ok(()),
        Err(e) => {
            tracing::error!("Failed to create index {}: {}", index_name, e);
            Err(e)
        }
    }
}

async fn create_unique_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let cols = columns.join(", ");
    let sql = format!(
        "CREATE UNIQUE INDEX {} ON {} ({})",
        index_name, table_name, cols
    );
    let stmt = Statement::from_string(backend, sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) if is_already_exists(&e) => Ok(()),
        Err(e) => {
            tracing::error!("Failed to create unique index {}: {}", index_name, e);
            Err(e)
        }
    }
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    match db.execute(create_stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("Failed to create table: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_log_created_at_should_keep_microseconds_on_mysql() {
        let sql = DbBackend::MySql.build(&audit_log_time_precision()).sql;

        assert!(sql.starts_with("ALTER TABLE `audit_log` MODIFY COLUMN"));
        assert!(sql.contains("`created_at` DATETIME(6) NOT NULL"));
    }
}
