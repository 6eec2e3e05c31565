//! Paging and filtering query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::paging::Paging;

/// `?skip=&take=&name=` for list endpoints.
///
/// Uses `serde_with` to parse numbers from query strings. Out-of-range
/// values are normalised, never rejected.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub skip: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub take: Option<i64>,

    /// Case-insensitive name substring.
    #[serde(default)]
    pub name: Option<String>,
}

impl ListQuery {
    pub fn paging(&self) -> Paging {
        Paging::new(self.skip, self.take)
    }
}
