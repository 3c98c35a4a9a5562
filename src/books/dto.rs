use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pagination::{default_limit, default_page, SortDir};

/// Creation body. Everything except `description` is required; fields arrive
/// as options so a missing one yields a 400 instead of a body-parse failure.
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub writer: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock_quantity: Option<i32>,
    pub genre_id: Option<Uuid>,
}

/// Patch body. Only these three fields are mutable post-creation.
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock_quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub order_by_title: SortDir,
    #[serde(default)]
    pub order_by_publish_date: SortDir,
}

impl ListBooksParams {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// List/detail shape; the genre is flattened to its name.
#[derive(Debug, Serialize)]
pub struct BookItem {
    pub id: Uuid,
    pub title: String,
    pub writer: String,
    pub publisher: String,
    pub description: Option<String>,
    pub publication_year: i32,
    pub price: i64,
    pub stock_quantity: i32,
    pub genre: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedBook {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct UpdatedBook {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults() {
        let p: ListBooksParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.order_by_title, SortDir::Asc);
        assert_eq!(p.order_by_publish_date, SortDir::Asc);
    }

    #[test]
    fn list_params_parse_both_directions() {
        let p: ListBooksParams = serde_json::from_str(
            r#"{"orderByTitle":"desc","orderByPublishDate":"asc","page":2}"#,
        )
        .unwrap();
        assert_eq!(p.order_by_title, SortDir::Desc);
        assert_eq!(p.order_by_publish_date, SortDir::Asc);
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn create_request_fields_are_optional_at_parse_time() {
        let req: CreateBookRequest = serde_json::from_str(r#"{"title":"Dune"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("Dune"));
        assert!(req.genre_id.is_none());
    }
}
