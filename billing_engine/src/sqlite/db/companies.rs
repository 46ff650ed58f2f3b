use sqlx::SqliteConnection;

use crate::db_types::Company;

pub async fn fetch_company(company_id: &str, conn: &mut SqliteConnection) -> Result<Option<Company>, sqlx::Error> {
    let company = sqlx::query_as(
        r#"SELECT id, name, billing_address, tax_id, created_at FROM companies WHERE id = $1"#,
    )
    .bind(company_id)
    .fetch_optional(conn)
    .await?;
    Ok(company)
}
