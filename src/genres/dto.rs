use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pagination::{default_limit, default_page, SortDir};

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGenresParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub order_by_name: SortDir,
}

impl ListGenresParams {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// List/detail shape: id and name only.
#[derive(Debug, Serialize)]
pub struct GenreItem {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedGenre {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct UpdatedGenre {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults() {
        let p: ListGenresParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.search, "");
        assert_eq!(p.order_by_name, SortDir::Asc);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn list_params_camel_case_order_key() {
        let p: ListGenresParams =
            serde_json::from_str(r#"{"page":3,"limit":5,"orderByName":"desc"}"#).unwrap();
        assert_eq!(p.order_by_name, SortDir::Desc);
        assert_eq!(p.offset(), 10);
    }
}
