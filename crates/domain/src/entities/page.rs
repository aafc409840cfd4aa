use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Which slice of the visible articles a list call wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
    pub published_only: bool,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64, published_only: bool) -> Self {
        Self {
            limit,
            offset,
            published_only,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.limit <= 0 {
            return Err(DomainError::validation(format!(
                "limit must be greater than 0, got {}",
                self.limit
            )));
        }
        if self.offset < 0 {
            return Err(DomainError::validation(format!(
                "offset must be greater than or equal to 0, got {}",
                self.offset
            )));
        }
        Ok(())
    }
}

/// Paged envelope. `total_count` covers the whole filtered set, not just `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: i64,
    pub limit: i64,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_count: i64) -> Self {
        Self {
            items,
            offset: request.offset,
            limit: request.limit,
            total_count,
        }
    }
}
