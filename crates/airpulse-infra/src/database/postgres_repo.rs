//! PostgreSQL repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};

use airpulse_core::domain::PollutionRecord;
use airpulse_core::error::RepoError;
use airpulse_core::ports::PollutionRepository;

use super::entity::pollution_record::{ActiveModel, Column, Entity};

/// PostgreSQL-backed record store.
pub struct PostgresPollutionRepository {
    db: DbConn,
}

impl PostgresPollutionRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PollutionRepository for PostgresPollutionRepository {
    async fn latest_for_city(&self, city: &str) -> Result<Option<PollutionRecord>, RepoError> {
        let result = Entity::find()
            .filter(Column::City.eq(city))
            .order_by_desc(Column::Timestamp)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, record: PollutionRecord) -> Result<(), RepoError> {
        let active: ActiveModel = record.into();
        active.insert(&self.db).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint("Record already exists".to_string())
            } else {
                RepoError::Query(err_str)
            }
        })?;

        Ok(())
    }

    async fn history_for_city(
        &self,
        city: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PollutionRecord>, RepoError> {
        let result = Entity::find()
            .filter(Column::City.eq(city))
            .filter(Column::Timestamp.gte(since))
            .order_by_asc(Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
