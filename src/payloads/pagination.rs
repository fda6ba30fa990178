use serde::{Deserialize, Serialize};

use crate::core::query::{FieldSet, QueryFields};
use crate::core::translate::parse_page_number;
use crate::messages;

pub const MAX_PER_PAGE: u64 = 5000;

/// `page` / `per_page` as received; empty means "use the repository default".
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub per_page: String,
}

impl QueryFields for Pagination {
    fn fields() -> FieldSet<Self> {
        FieldSet::<Self>::new()
            .integer("page", 1, None, |t, v| t.page = v)
            .integer("per_page", 1, Some(MAX_PER_PAGE), |t, v| t.per_page = v)
    }
}

impl Pagination {
    pub fn to_message(&self) -> messages::Pagination {
        messages::Pagination {
            page: parse_page_number(&self.page),
            per_page: parse_page_number(&self.per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;
    use crate::messages;

    #[test]
    fn empty_fields_stay_unset() {
        let pagination = Pagination {
            page: String::new(),
            per_page: "50".to_string(),
        };
        assert_eq!(
            pagination.to_message(),
            messages::Pagination {
                page: None,
                per_page: Some(50),
            }
        );
    }
}
