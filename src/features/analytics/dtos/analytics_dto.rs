use serde::Serialize;
use utoipa::ToSchema;

/// Per-user usage totals
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsSummaryDto {
    pub total_files: i64,
    pub total_stories: i64,
    /// Human-readable total, e.g. "12.4 MB"
    pub storage_used: String,
    pub storage_used_bytes: i64,
}
