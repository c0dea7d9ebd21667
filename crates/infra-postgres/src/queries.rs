// SQL shared by the pool-backed repository and the transaction handle

use crate::error::map_sqlx_error;
use sqlx::{Executor, Postgres, QueryBuilder};
use subscription_core::domain::{ListFilter, UpdateSubscriptionRequest};
use subscription_core::port::{StorageError, StorageResult};

pub(crate) const SELECT_COLUMNS: &str =
    "id, service_name, price, user_id, start_date, end_date, created_at, updated_at";

const UPDATE_SUBSCRIPTION: &str = r#"
    UPDATE subscriptions
    SET service_name = $1, price = $2, start_date = $3, end_date = $4, updated_at = $5
    WHERE id = $6
"#;

/// Update a row by id on any executor (pool or open transaction).
///
/// Zero affected rows is reported as `NotFound`.
pub(crate) async fn update_subscription<'e, E>(
    executor: E,
    req: &UpdateSubscriptionRequest,
) -> StorageResult<()>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(UPDATE_SUBSCRIPTION)
        .bind(req.title.clone())
        .bind(req.price)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.updated_at)
        .bind(req.id.clone())
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound);
    }
    Ok(())
}

/// `SELECT ... ORDER BY created_at, id [LIMIT] [OFFSET]`
pub(crate) fn list_query(filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM subscriptions", SELECT_COLUMNS));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY created_at, id");

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    if let Some(offset) = filter.offset {
        qb.push(" OFFSET ").push_bind(offset);
    }
    qb
}

/// Sum of prices over the filter predicates; pagination is ignored
pub(crate) fn sum_query(filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COALESCE(SUM(price), 0)::BIGINT FROM subscriptions");
    push_filter(&mut qb, filter);
    qb
}

fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, filter: &ListFilter) {
    let mut first = true;

    if let Some(title) = &filter.title {
        push_condition(qb, &mut first, "service_name = ");
        qb.push_bind(title.clone());
    }
    if let Some(user_id) = &filter.user_id {
        push_condition(qb, &mut first, "user_id = ");
        qb.push_bind(user_id.clone());
    }
    if let Some(price) = filter.price {
        push_condition(qb, &mut first, "price = ");
        qb.push_bind(price);
    }
    if let Some(from) = filter.start_date {
        push_condition(qb, &mut first, "start_date >= ");
        qb.push_bind(from);
    }
    // NULL end_date never satisfies this, so open-ended rows drop out
    if let Some(to) = filter.end_date {
        push_condition(qb, &mut first, "end_date <= ");
        qb.push_bind(to);
    }
}

fn push_condition(qb: &mut QueryBuilder<'static, Postgres>, first: &mut bool, sql: &str) {
    qb.push(if *first { " WHERE " } else { " AND " });
    qb.push(sql);
    *first = false;
}
