//! 1-based page/limit arithmetic.

/// Largest page size served in one request.
pub const MAX_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// `page` starts at 1. `limit` above [`MAX_PAGE_LIMIT`] is capped.
    pub fn new(page: i64, limit: i64) -> Result<Self, String> {
        if page < 1 {
            return Err(format!("page must be at least 1, got {}", page));
        }
        if limit < 1 {
            return Err(format!("limit must be at least 1, got {}", limit));
        }
        let limit = (limit as u64).min(MAX_PAGE_LIMIT as u64) as usize;
        let offset = ((page - 1) as u64).saturating_mul(limit as u64);
        Ok(Self {
            offset: usize::try_from(offset).unwrap_or(usize::MAX),
            limit,
        })
    }
}
