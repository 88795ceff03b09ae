//! Company denylist consulted before ingestion.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;

use data_model_jw::db::DbPool;
use data_model_jw::models::{BlockCompanyPayload, BlockedEntity, NewBlockedEntity};
use data_model_jw::schema::blocked_entities;

use crate::errors::Error;

/// Every blocked company name. Fetched once per scrape cycle.
pub async fn blocked_company_names(pool: &DbPool) -> Result<Vec<String>, Error> {
    let mut conn = pool.get().await?;

    let names = blocked_entities::table
        .filter(blocked_entities::entity_type.eq("company"))
        .select(blocked_entities::entity_name)
        .load::<String>(&mut conn)
        .await?;

    Ok(names)
}

/// Adds a company to the blocklist so later cycles skip its postings.
/// Returns `Error::AlreadyExists` when the company is already blocked.
pub async fn block_company(pool: &DbPool, request: BlockCompanyPayload) -> Result<BlockedEntity, Error> {
    let mut conn = pool.get().await?;

    let blocked = conn
        .transaction::<_, Error, _>(|conn| {
            async move {
                let existing = blocked_entities::table
                    .filter(blocked_entities::entity_name.eq(&request.entity_name))
                    .first::<BlockedEntity>(conn)
                    .await
                    .optional()?;

                if existing.is_some() {
                    return Err(Error::AlreadyExists);
                }

                let entity = diesel::insert_into(blocked_entities::table)
                    .values(&NewBlockedEntity {
                        entity_name: request.entity_name.clone(),
                        entity_type: "company".to_string(),
                        reason: request.reason.clone(),
                        blocked_by_user_id: Some(request.blocked_by_user_id.clone()),
                    })
                    .get_result::<BlockedEntity>(conn)
                    .await?;

                Ok(entity)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!("Blocked company '{}'", blocked.entity_name);
    Ok(blocked)
}
