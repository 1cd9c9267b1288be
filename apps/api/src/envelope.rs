use serde::Serialize;

/// Success envelope shared by every endpoint: `{success, data, message?, pagination?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Envelope {
            success: true,
            data,
            message: None,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Envelope {
            pagination: Some(pagination),
            ..Envelope::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Data-less acknowledgement: `{success, message}`.
#[derive(Debug, Serialize)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

impl Notice {
    pub fn ok(message: impl Into<String>) -> Self {
        Notice {
            success: true,
            message: message.into(),
        }
    }
}

/// Pagination block. Each endpoint keeps its established key names, so
/// only the fields a constructor sets are serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_jobs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_users: Option<i64>,
    pub limit: i64,
}

fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

impl Pagination {
    fn bare(page: i64, limit: i64) -> Self {
        Pagination {
            current_page: page,
            total_pages: None,
            total: None,
            total_jobs: None,
            total_users: None,
            limit,
        }
    }

    /// `GET /jobs`: `{currentPage, totalPages, totalJobs, limit}`, at least one page.
    pub fn job_listing(page: i64, limit: i64, total: i64) -> Self {
        Pagination {
            total_pages: Some(page_count(total, limit).max(1)),
            total_jobs: Some(total),
            ..Self::bare(page, limit)
        }
    }

    /// `GET /search/jobs`: `{currentPage, totalPages, total, limit}`.
    pub fn job_search(page: i64, limit: i64, total: i64) -> Self {
        Pagination {
            total_pages: Some(page_count(total, limit)),
            total: Some(total),
            ..Self::bare(page, limit)
        }
    }

    /// `GET /search/users`: `{currentPage, totalUsers, limit}`.
    pub fn user_search(page: i64, limit: i64, total: i64) -> Self {
        Pagination {
            total_users: Some(total),
            ..Self::bare(page, limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::job_search(1, 10, 0).total_pages, Some(0));
        assert_eq!(Pagination::job_search(1, 10, 10).total_pages, Some(1));
        assert_eq!(Pagination::job_search(2, 10, 11).total_pages, Some(2));
        assert_eq!(Pagination::job_listing(1, 10, 0).total_pages, Some(1));
    }

    #[test]
    fn test_listing_and_user_search_keys() {
        let listing = serde_json::to_value(Pagination::job_listing(1, 10, 25)).unwrap();
        assert_eq!(
            listing,
            json!({"currentPage": 1, "totalPages": 3, "totalJobs": 25, "limit": 10})
        );

        let users = serde_json::to_value(Pagination::user_search(2, 5, 7)).unwrap();
        assert_eq!(users, json!({"currentPage": 2, "totalUsers": 7, "limit": 5}));
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let value = serde_json::to_value(Envelope::ok(json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let env = Envelope::paginated(Vec::<i32>::new(), Pagination::job_search(3, 5, 12));
        let value = serde_json::to_value(env).unwrap();
        assert_eq!(
            value["pagination"],
            json!({"currentPage": 3, "totalPages": 3, "total": 12, "limit": 5})
        );
    }

    #[test]
    fn test_null_data_is_serialized() {
        let value = serde_json::to_value(Envelope::ok(Option::<i32>::None)).unwrap();
        assert_eq!(value, json!({"success": true, "data": null}));
    }
}
