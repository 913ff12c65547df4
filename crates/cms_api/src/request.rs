//! Types for requests from the admin panel to the backend.

use crate::timestamp;
pub use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Login<'a> {
    pub email: Cow<'a, str>,
    pub password: Cow<'a, str>,
}

/// An update is the creation body plus the id of the updated record.
#[derive(Debug, Clone, Serialize)]
pub struct Update<'a, T> {
    pub id: Cow<'a, str>,
    #[serde(flatten)]
    pub fields: &'a T,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub is_published: bool,
    pub category_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub tech_stacks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub image_urls: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub completed_date: Option<DateTime<Utc>>,
    pub is_featured: bool,
}

/// Filter for a yes/no column: everything, only the rows where it is set,
/// or only the rows where it is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Toggle {
    #[default]
    All,
    Yes,
    No,
}

impl Toggle {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }

    /// Value used for `<select>` options.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Yes => "true",
            Self::No => "false",
        }
    }

    /// Anything that is not exactly `true` or `false` selects everything.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "true" => Self::Yes,
            "false" => Self::No,
            _ => Self::All,
        }
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::All,
            Some(true) => Self::Yes,
            Some(false) => Self::No,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Paging shared by every list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Paging {
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryFilter {
    pub paging: Paging,
    pub keyword: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostFilter {
    pub paging: Paging,
    pub keyword: String,
    pub category_id: Option<String>,
    pub published: Toggle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectFilter {
    pub paging: Paging,
    pub keyword: String,
    pub featured: Toggle,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DonationFilter {
    pub paging: Paging,
    pub keyword: String,
    pub confirmed: Toggle,
}

/// Query parameters of a list request, in the backend's naming.
pub trait QueryParams {
    fn paging(&self) -> Paging;

    fn paging_mut(&mut self) -> &mut Paging;

    fn query_params(&self) -> Vec<(&'static str, String)>;
}

fn base_params(paging: Paging, keyword: &str) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("PageNumber", paging.page_number.to_string()),
        ("PageSize", paging.page_size.to_string()),
    ];
    let keyword = keyword.trim();
    if !keyword.is_empty() {
        params.push(("Keyword", keyword.to_string()));
    }
    params
}

fn push_toggle(params: &mut Vec<(&'static str, String)>, name: &'static str, toggle: Toggle) {
    if let Some(value) = toggle.as_bool() {
        params.push((name, value.to_string()));
    }
}

impl QueryParams for CategoryFilter {
    fn paging(&self) -> Paging {
        self.paging
    }

    fn paging_mut(&mut self) -> &mut Paging {
        &mut self.paging
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        base_params(self.paging, &self.keyword)
    }
}

impl QueryParams for PostFilter {
    fn paging(&self) -> Paging {
        self.paging
    }

    fn paging_mut(&mut self) -> &mut Paging {
        &mut self.paging
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = base_params(self.paging, &self.keyword);
        if let Some(category_id) = self.category_id.as_deref().filter(|id| !id.is_empty()) {
            params.push(("CategoryId", category_id.to_string()));
        }
        push_toggle(&mut params, "IsPublished", self.published);
        params
    }
}

impl QueryParams for ProjectFilter {
    fn paging(&self) -> Paging {
        self.paging
    }

    fn paging_mut(&mut self) -> &mut Paging {
        &mut self.paging
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = base_params(self.paging, &self.keyword);
        push_toggle(&mut params, "IsFeatured", self.featured);
        if let Some(from) = self.from_date {
            params.push(("FromDate", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to_date {
            params.push(("ToDate", to.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

impl QueryParams for DonationFilter {
    fn paging(&self) -> Paging {
        self.paging
    }

    fn paging_mut(&mut self) -> &mut Paging {
        &mut self.paging
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = base_params(self.paging, &self.keyword);
        push_toggle(&mut params, "IsConfirmed", self.confirmed);
        params
    }
}
