use chrono::{Days, NaiveDate, Utc};
use sqlx_postgres::Postgres;
use tracing::info;

use crate::PgPool;

/// Rows actually inserted by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub documents: u64,
}

const DEMO_USERS: [(&str, &str, &str); 3] = [
    ("admin", "admin@doctrack.local", "admin"),
    ("owner", "owner@doctrack.local", "owner"),
    ("viewer", "viewer@doctrack.local", "user"),
];

// (type, owner, number, expiry offset, action-due offset) relative to today.
const DEMO_DOCUMENTS: [(&str, &str, &str, u64, u64); 3] = [
    ("Trade License", "Acme Trading LLC", "TL-2024-001", 10, 3),
    ("Passport", "John Carter", "P-88231045", 25, 15),
    ("Vehicle Registration", "Acme Trading LLC", "VR-55012", 120, 90),
];

pub async fn seed_demo_data(pool: &PgPool) -> Result<SeedReport, sqlx_core::Error> {
    seed_demo_data_at(pool, Utc::now().date_naive()).await
}

pub async fn seed_demo_data_at(
    pool: &PgPool,
    today: NaiveDate,
) -> Result<SeedReport, sqlx_core::Error> {
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    for (username, email, role) in DEMO_USERS {
        let result = sqlx_core::query::query::<Postgres>(
            r#"
            INSERT INTO users (username, email, role)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(role)
        .execute(&mut *tx)
        .await?;
        report.users += result.rows_affected();
    }

    for (kind, owner, number, expiry_in, due_in) in DEMO_DOCUMENTS {
        let expiry = today + Days::new(expiry_in);
        let due = today + Days::new(due_in);
        let result = sqlx_core::query::query::<Postgres>(
            r#"
            INSERT INTO documents (document_type, document_owner, document_number, expiry_date, action_due_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (document_number) DO NOTHING
            "#,
        )
        .bind(kind)
        .bind(owner)
        .bind(number)
        .bind(expiry)
        .bind(due)
        .execute(&mut *tx)
        .await?;
        report.documents += result.rows_affected();
    }

    tx.commit().await?;
    info!(
        event = "seed_completed",
        users = report.users,
        documents = report.documents
    );
    Ok(report)
}
