use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::analytics::dtos::AnalyticsSummaryDto;
use crate::shared::format::format_file_size;

/// Service for usage events and per-user totals.
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a usage event.
    ///
    /// Best effort: a failed insert is logged and never fails the
    /// operation that produced the event.
    pub async fn record(&self, user_id: Uuid, event_type: &str, event_data: Value) {
        let result =
            sqlx::query("INSERT INTO analytics_events (user_id, event_type, event_data) VALUES ($1, $2, $3)")
                .bind(user_id)
                .bind(event_type)
                .bind(event_data)
                .execute(&self.pool)
                .await;

        if let Err(e) = result {
            tracing::warn!(event_type, "Failed to record analytics event: {}", e);
        }
    }

    /// Totals for the user's dashboard.
    pub async fn summary(&self, user_id: Uuid) -> Result<AnalyticsSummaryDto> {
        let total_files =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let total_stories =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stories WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let storage_used_bytes = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(file_size), 0) FROM files WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(AnalyticsSummaryDto {
            total_files,
            total_stories,
            storage_used: format_file_size(storage_used_bytes),
            storage_used_bytes,
        })
    }
}
