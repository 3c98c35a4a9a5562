use serde::Deserialize;

/// Sort direction accepted by the list endpoints as `asc`/`desc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    /// Safe to splice into SQL: the value set is closed.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

pub fn default_page() -> i64 {
    1
}

pub fn default_limit() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default)]
        dir: SortDir,
    }

    #[test]
    fn parses_lowercase_directions() {
        let p: Params = serde_json::from_str(r#"{"dir":"desc"}"#).unwrap();
        assert_eq!(p.dir, SortDir::Desc);
        assert_eq!(p.dir.as_sql(), "DESC");
    }

    #[test]
    fn defaults_to_ascending() {
        let p: Params = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.dir, SortDir::Asc);
    }

    #[test]
    fn rejects_unknown_direction() {
        assert!(serde_json::from_str::<Params>(r#"{"dir":"sideways"}"#).is_err());
    }
}
