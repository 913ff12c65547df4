//! Form state of the editors and its validation.

use cms_api::{
    request::{Login, NewCategory, NewPost, NewProject},
    response::{Category, Post, Project},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

/// Folder post thumbnails are uploaded to.
pub const POST_UPLOAD_FOLDER: &str = "blogs";
/// Folder project thumbnails are uploaded to.
pub const PROJECT_UPLOAD_FOLDER: &str = "projects";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A message per form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the backend's validation errors to form fields.
    ///
    /// The backend names fields `Title` or `$.title`, the forms name them `title`.
    pub fn from_server(errors: &BTreeMap<String, Vec<String>>) -> Self {
        let fields = errors
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(field, messages)| (field_name(field), messages.join(" ")))
            .collect();
        Self(fields)
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn field_name(server_name: &str) -> String {
    let name = server_name.trim_start_matches("$.");
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Editable form state.
pub trait Form {
    /// What the form submits.
    type Draft;

    fn validate(&self) -> Result<Self::Draft, FieldErrors>;
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Form for LoginForm {
    type Draft = Login<'static>;

    fn validate(&self) -> Result<Self::Draft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "Please enter your email");
        } else if !is_valid_email(email) {
            errors.insert("email", "Invalid email");
        }
        if self.password.is_empty() {
            errors.insert("password", "Please enter your password");
        }
        errors.into_result(|| Login {
            email: email.to_string().into(),
            password: self.password.clone().into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
    /// Empty for a root category.
    pub parent_id: String,
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            parent_id: category.parent_id.clone().unwrap_or_default(),
        }
    }
}

impl Form for CategoryForm {
    type Draft = NewCategory;

    fn validate(&self) -> Result<Self::Draft, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Please enter a name");
        errors.into_result(|| NewCategory {
            name: self.name.trim().to_string(),
            description: optional(&self.description),
            parent_id: optional(&self.parent_id),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub thumbnail_url: String,
    pub is_published: bool,
    pub category_id: String,
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            summary: post.summary.clone(),
            content: post.content.clone(),
            thumbnail_url: post.thumbnail_url.clone().unwrap_or_default(),
            is_published: post.is_published,
            category_id: post.category_id.clone(),
        }
    }
}

impl Form for PostForm {
    type Draft = NewPost;

    fn validate(&self) -> Result<Self::Draft, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", &self.title, "Please enter a title");
        require(&mut errors, "content", &self.content, "Please enter the content");
        require(
            &mut errors,
            "categoryId",
            &self.category_id,
            "Please choose a category",
        );
        errors.into_result(|| NewPost {
            title: self.title.trim().to_string(),
            summary: self.summary.trim().to_string(),
            content: self.content.clone(),
            thumbnail_url: optional(&self.thumbnail_url),
            is_published: self.is_published,
            category_id: self.category_id.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub client_name: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`, empty while the project is ongoing.
    pub completed_date: String,
    pub is_featured: bool,
    pub description: String,
    pub content: String,
    /// Comma separated.
    pub tech_stacks: String,
    pub live_demo_url: String,
    pub source_code_url: String,
    pub thumbnail_url: String,
}

impl ProjectForm {
    /// An empty form starting on `today`.
    pub fn starting(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            client_name: String::new(),
            start_date: today.format(DATE_FORMAT).to_string(),
            completed_date: String::new(),
            is_featured: false,
            description: String::new(),
            content: String::new(),
            tech_stacks: String::new(),
            live_demo_url: String::new(),
            source_code_url: String::new(),
            thumbnail_url: String::new(),
        }
    }
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self::starting(Utc::now().date_naive())
    }
}

impl From<&Project> for ProjectForm {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            client_name: project.client_name.clone().unwrap_or_default(),
            start_date: project.start_date.format(DATE_FORMAT).to_string(),
            completed_date: project
                .completed_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            is_featured: project.is_featured,
            description: project.description.clone(),
            content: project.content.clone().unwrap_or_default(),
            tech_stacks: project.tech_stacks.join(", "),
            live_demo_url: project.live_demo_url.clone().unwrap_or_default(),
            source_code_url: project.source_code_url.clone().unwrap_or_default(),
            thumbnail_url: project.thumbnail_url.clone().unwrap_or_default(),
        }
    }
}

/// Splits a comma separated list, dropping empty entries.
pub fn split_tech_stacks(tech_stacks: &str) -> Vec<String> {
    tech_stacks
        .split(',')
        .map(str::trim)
        .filter(|tech| !tech.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

impl Form for ProjectForm {
    type Draft = NewProject;

    fn validate(&self) -> Result<Self::Draft, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Please enter a name");

        let start_date = if self.start_date.trim().is_empty() {
            errors.insert("startDate", "Please choose a start date");
            None
        } else {
            let parsed = parse_date(&self.start_date);
            if parsed.is_none() {
                errors.insert("startDate", "Invalid date");
            }
            parsed
        };
        let completed_date = match optional(&self.completed_date) {
            None => None,
            Some(value) => {
                let parsed = parse_date(&value);
                if parsed.is_none() {
                    errors.insert("completedDate", "Invalid date");
                }
                parsed
            }
        };

        let thumbnail_url = optional(&self.thumbnail_url);
        errors.into_result(|| NewProject {
            name: self.name.trim().to_string(),
            slug: None,
            client_name: optional(&self.client_name),
            description: self.description.trim().to_string(),
            content: optional(&self.content),
            tech_stacks: split_tech_stacks(&self.tech_stacks),
            live_demo_url: optional(&self.live_demo_url),
            source_code_url: optional(&self.source_code_url),
            image_urls: thumbnail_url.iter().cloned().collect(),
            thumbnail_url,
            start_date,
            completed_date,
            is_featured: self.is_featured,
        })
    }
}
