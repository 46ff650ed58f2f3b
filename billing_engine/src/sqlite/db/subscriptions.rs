use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::db_types::{PlanId, Subscription};

/// Create or replace the subscription of a company in one statement. The primary key on
/// `company_id` makes the upsert atomic; whichever payment settles last owns the row.
pub async fn upsert_subscription(
    company_id: &str,
    plan_id: &PlanId,
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Subscription, sqlx::Error> {
    let subscription = sqlx::query_as(
        r#"
        INSERT INTO subscriptions (company_id, plan_id, status, current_period_start, current_period_end, updated_at)
        VALUES ($1, $2, 'Active', $3, $4, CURRENT_TIMESTAMP)
        ON CONFLICT (company_id) DO UPDATE SET
            plan_id = excluded.plan_id,
            status = excluded.status,
            current_period_start = excluded.current_period_start,
            current_period_end = excluded.current_period_end,
            updated_at = CURRENT_TIMESTAMP
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(plan_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_one(conn)
    .await?;
    Ok(subscription)
}

pub async fn fetch_subscription(
    company_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Subscription>, sqlx::Error> {
    let subscription = sqlx::query_as(r#"SELECT * FROM subscriptions WHERE company_id = $1"#)
        .bind(company_id)
        .fetch_optional(conn)
        .await?;
    Ok(subscription)
}
