use super::prelude::*;
use tracing::{instrument, Span};

const DOCUMENT_COLUMNS: &str = r#"
    sno,
    document_type,
    document_owner,
    document_number,
    expiry_date,
    action_due_date,
    created_at,
    updated_at
"#;

pub struct DocumentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DocumentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(
        level = "debug",
        skip(self, document),
        fields(
            document_number = %document.document_number,
            db.system = "postgresql",
            db.operation = "INSERT",
            db.query = "documents.create"
        )
    )]
    pub async fn create(&self, document: &NewDocument) -> Result<Document, sqlx_core::Error> {
        let sql = format!(
            r#"
            INSERT INTO documents (
                document_type,
                document_owner,
                document_number,
                expiry_date,
                action_due_date
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );
        query_as!(
            Document,
            &sql,
            document.document_type.as_str(),
            document.document_owner.as_str(),
            document.document_number.as_str(),
            document.expiry_date,
            document.action_due_date
        )
        .fetch_one(self.pool)
        .await
    }

    #[instrument(
        level = "debug",
        skip(self),
        fields(db.system = "postgresql", db.operation = "SELECT", db.query = "documents.get_by_sno")
    )]
    pub async fn get_by_sno(&self, sno: i32) -> Result<Option<Document>, sqlx_core::Error> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE sno = $1");
        query_as!(Document, &sql, sno)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn get_by_number(&self, number: &str) -> Result<Option<Document>, sqlx_core::Error> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE document_number = $1");
        query_as!(Document, &sql, number)
            .fetch_optional(self.pool)
            .await
    }

    /// Whether a row other than `sno` already uses `number`.
    pub async fn number_taken_by_other(
        &self,
        number: &str,
        sno: i32,
    ) -> Result<bool, sqlx_core::Error> {
        let row = query!(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM documents WHERE document_number = $1 AND sno <> $2
            ) AS taken
            "#,
            number,
            sno
        )
        .fetch_one(self.pool)
        .await?;
        sqlx_core::row::Row::try_get(&row, "taken")
    }

    #[instrument(
        level = "debug",
        skip(self),
        fields(db.system = "postgresql", db.operation = "SELECT", db.query = "documents.list", db.rows)
    )]
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Document>, sqlx_core::Error> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY sno ASC LIMIT $1 OFFSET $2"
        );
        let rows = query_as!(Document, &sql, limit, skip)
            .fetch_all(self.pool)
            .await?;
        Span::current().record("db.rows", rows.len() as i64);
        Ok(rows)
    }

    /// Applies the non-empty fields of `patch`; `None` when the row is gone.
    #[instrument(
        level = "debug",
        skip(self, patch),
        fields(db.system = "postgresql", db.operation = "UPDATE", db.query = "documents.update")
    )]
    pub async fn update(
        &self,
        sno: i32,
        patch: &DocumentPatch,
    ) -> Result<Option<Document>, sqlx_core::Error> {
        let sql = format!(
            r#"
            UPDATE documents
            SET document_type = COALESCE($2, document_type),
                document_owner = COALESCE($3, document_owner),
                document_number = COALESCE($4, document_number),
                expiry_date = COALESCE($5, expiry_date),
                action_due_date = COALESCE($6, action_due_date),
                updated_at = now()
            WHERE sno = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );
        query_as!(
            Document,
            &sql,
            sno,
            patch.document_type.as_deref(),
            patch.document_owner.as_deref(),
            patch.document_number.as_deref(),
            patch.expiry_date,
            patch.action_due_date
        )
        .fetch_optional(self.pool)
        .await
    }

    #[instrument(
        level = "debug",
        skip(self),
        fields(db.system = "postgresql", db.operation = "DELETE", db.query = "documents.delete")
    )]
    pub async fn delete(&self, sno: i32) -> Result<u64, sqlx_core::Error> {
        query!("DELETE FROM documents WHERE sno = $1", sno)
            .execute(self.pool)
            .await
            .map(|result| result.rows_affected())
    }

    /// Documents with `from <= expiry_date <= to`, soonest first.
    #[instrument(
        level = "debug",
        skip(self),
        fields(db.system = "postgresql", db.operation = "SELECT", db.query = "documents.list_expiring", db.rows)
    )]
    pub async fn list_expiring(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Document>, sqlx_core::Error> {
        let sql = format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE expiry_date >= $1 AND expiry_date <= $2
            ORDER BY expiry_date ASC, sno ASC
            "#
        );
        let rows = query_as!(Document, &sql, from, to)
            .fetch_all(self.pool)
            .await?;
        Span::current().record("db.rows", rows.len() as i64);
        Ok(rows)
    }
}
