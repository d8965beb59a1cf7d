//! Pagination types and utilities for consistent pagination across all endpoints

use crate::error::{PaginationInfo, ResponseMetadata};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// Standard limit/offset parameters for list endpoints
///
/// All list endpoints should use this type for consistent pagination behavior.
#[derive(Debug, Deserialize, IntoParams, ToSchema, Clone)]
pub struct ListParams {
    #[param(example = 10, minimum = 1, maximum = 100)]
    pub limit: Option<u32>,

    #[param(example = 0, minimum = 0)]
    pub offset: Option<u32>,
}

impl ListParams {
    /// Get the page size (defaults to 10, clamped between 1 and 100)
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Get the offset (defaults to 0)
    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Create response metadata with pagination info
    pub fn to_metadata(&self, total_count: u64) -> ResponseMetadata {
        let end = u64::from(self.offset()) + u64::from(self.limit());

        ResponseMetadata {
            pagination: Some(PaginationInfo {
                limit: self.limit(),
                offset: self.offset(),
                has_more: end < total_count,
            }),
            total_count: Some(total_count as i64),
        }
    }

    /// Wrap data with pagination metadata
    pub fn wrap_response<T>(&self, data: T, total_count: u64) -> crate::error::ApiResponse<T> {
        crate::error::api_success_with_meta(data, self.to_metadata(total_count))
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            offset: Some(0),
        }
    }
}
