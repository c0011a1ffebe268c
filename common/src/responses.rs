use serde::{Deserialize, Serialize};

/// Page bookkeeping returned next to a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Pagination {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// JSON envelope wrapped around every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            count: None,
            token: None,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        ApiResponse {
            count: Some(count),
            ..ApiResponse::ok(items)
        }
    }

    pub fn paged(items: Vec<T>, pagination: Pagination) -> Self {
        ApiResponse {
            pagination: Some(pagination),
            ..ApiResponse::ok(items)
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            count: None,
            token: None,
            data: None,
            pagination: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            ..ApiResponse::message(message)
        }
    }
}
