use sqlx::SqliteConnection;

use crate::db_types::{Plan, PlanId};

pub async fn fetch_plan(plan_id: &PlanId, conn: &mut SqliteConnection) -> Result<Option<Plan>, sqlx::Error> {
    let plan = sqlx::query_as(
        r#"SELECT id, name, monthly_price, created_at FROM plans WHERE id = $1"#,
    )
    .bind(plan_id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(plan)
}
