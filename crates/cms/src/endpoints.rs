//! The backend's endpoints, one set per resource.

use crate::{
    client::{ApiClient, Credentials, Navigator, Part, Request, Transport},
    error::{ApiError, ApiResult},
    session::User,
};
use cms_api::{
    request::{
        CategoryFilter, DonationFilter, Login, NewCategory, NewPost, NewProject, PostFilter,
        ProjectFilter, QueryParams, Update,
    },
    response::{Authenticate, Category, Donation, PagedResult, Post, Project, UploadedFile},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;

/// Folder used for uploads that do not name one.
pub const DEFAULT_UPLOAD_FOLDER: &str = "general";

/// A collection served under [`Resource::PATH`].
pub trait Resource: Send + Sync + 'static {
    type Item: DeserializeOwned + Identified + Clone + Debug + Send + Sync + 'static;
    type Filter: QueryParams + Clone + PartialEq + Default + Debug + Send + Sync + 'static;

    const PATH: &'static str;
    /// Human readable name used in logs and messages.
    const NAME: &'static str;
}

/// A resource that can be created and updated from the admin panel.
pub trait Editable: Resource {
    type Draft: Serialize + Debug;
}

pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

identified!(Category, Post, Project, Donation);

#[derive(Debug, Clone, Copy)]
pub struct Categories;

impl Resource for Categories {
    type Item = Category;
    type Filter = CategoryFilter;
    const PATH: &'static str = "/Categories";
    const NAME: &'static str = "categories";
}

impl Editable for Categories {
    type Draft = NewCategory;
}

#[derive(Debug, Clone, Copy)]
pub struct Posts;

impl Resource for Posts {
    type Item = Post;
    type Filter = PostFilter;
    const PATH: &'static str = "/Posts";
    const NAME: &'static str = "posts";
}

impl Editable for Posts {
    type Draft = NewPost;
}

#[derive(Debug, Clone, Copy)]
pub struct Projects;

impl Resource for Projects {
    type Item = Project;
    type Filter = ProjectFilter;
    const PATH: &'static str = "/Projects";
    const NAME: &'static str = "projects";
}

impl Editable for Projects {
    type Draft = NewProject;
}

#[derive(Debug, Clone, Copy)]
pub struct Donations;

impl Resource for Donations {
    type Item = Donation;
    type Filter = DonationFilter;
    const PATH: &'static str = "/Donations";
    const NAME: &'static str = "donations";
}

/// Where an editor submits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Create,
    Update(String),
}

/// The upload endpoint answers with either an object holding the URL or the URL itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Uploaded {
    File(UploadedFile),
    Url(String),
}

/// API methods
impl<T, C, N> ApiClient<T, C, N>
where
    T: Transport,
    C: Credentials,
    N: Navigator,
{
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<(User, String)> {
        tracing::info!("Authenticating {email}");
        let request = Request::post("/Account/authenticate").json(&Login {
            email: email.into(),
            password: password.into(),
        })?;
        let res: Authenticate = self.send_raw(request).await?;
        match res.data {
            Some(authenticated) if res.success => {
                tracing::info!("Authenticated {email}");
                Ok(User::from_authenticated(authenticated))
            }
            _ => Err(ApiError::Rejected {
                message: res
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| "Login failed".to_string()),
            }),
        }
    }

    pub async fn list<R: Resource>(&self, filter: &R::Filter) -> ApiResult<PagedResult<R::Item>> {
        tracing::info!("Fetching {}", R::NAME);
        let request = Request::get(R::PATH).query(filter.query_params());
        let page: PagedResult<R::Item> = self.send(request).await?;
        tracing::info!(
            "Fetched {} {} of {}",
            page.data.len(),
            R::NAME,
            page.total_records
        );
        Ok(page)
    }

    pub async fn get<R: Resource>(&self, id: &str) -> ApiResult<R::Item> {
        tracing::info!("Fetching {} {id}", R::NAME);
        self.send(Request::get(format!("{}/{id}", R::PATH))).await
    }

    pub async fn create<R: Editable>(&self, draft: &R::Draft) -> ApiResult<()> {
        tracing::info!("Creating {}", R::NAME);
        let request = Request::post(R::PATH).json(draft)?;
        self.send_unit(request).await
    }

    pub async fn update<R: Editable>(&self, id: &str, draft: &R::Draft) -> ApiResult<()> {
        tracing::info!("Updating {} {id}", R::NAME);
        let request = Request::put(format!("{}/{id}", R::PATH)).json(&Update {
            id: id.into(),
            fields: draft,
        })?;
        self.send_unit(request).await
    }

    pub async fn save<R: Editable>(&self, target: &Target, draft: &R::Draft) -> ApiResult<()> {
        match target {
            Target::Create => self.create::<R>(draft).await,
            Target::Update(id) => self.update::<R>(id, draft).await,
        }
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> ApiResult<()> {
        tracing::info!("Deleting {} {id}", R::NAME);
        self.send_unit(Request::delete(format!("{}/{id}", R::PATH)))
            .await
    }

    pub async fn category_tree(&self) -> ApiResult<Vec<Category>> {
        tracing::info!("Fetching category tree");
        self.send(Request::get("/Categories/tree")).await
    }

    pub async fn all_categories(&self) -> ApiResult<Vec<Category>> {
        tracing::info!("Fetching all categories");
        self.send(Request::get("/Categories/all")).await
    }

    pub async fn toggle_donation_approval(&self, id: &str) -> ApiResult<()> {
        tracing::info!("Toggling approval of donation {id}");
        self.send_unit(Request::put(format!("/Donations/{id}/toggle-approval")))
            .await
    }

    /// Uploads a file and returns its public URL.
    pub async fn upload_file(&self, file: T::File, folder: &str) -> ApiResult<String> {
        let folder = match folder.trim() {
            "" => DEFAULT_UPLOAD_FOLDER,
            folder => folder,
        };
        tracing::info!("Uploading file to {folder}");
        let request = Request::post("/Files/upload").multipart(vec![
            ("file", Part::File(file)),
            ("folder", Part::Text(folder.to_string())),
        ]);
        let url = match self.send::<Uploaded>(request).await? {
            Uploaded::File(file) => file.url,
            Uploaded::Url(url) => url,
        };
        if url.is_empty() {
            return Err(ApiError::Decode("upload response has no url".to_string()));
        }
        tracing::info!("Uploaded {url}");
        Ok(url)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{client::Method, testing::Harness};
    use cms_api::request::Toggle;
    use futures::executor::block_on;

    #[test]
    fn login_returns_the_user_and_token() {
        let harness = Harness::anonymous();
        let (user, token) = block_on(harness.client.login("admin@example.com", "secret")).unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert_eq!(user.user_name, "Admin");
        assert_eq!(token, "t0k");
    }

    #[test]
    fn failed_login_carries_the_server_message() {
        let harness = Harness::anonymous();
        let error = block_on(harness.client.login("admin@example.com", "wrong")).unwrap_err();
        assert_eq!(error.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn list_sends_the_filter_as_query() {
        let harness = Harness::logged_in();
        harness.backend.seed_posts(5);
        harness.backend.publish_posts(&["post-2", "post-4"]);
        let filter = PostFilter {
            keyword: "post".into(),
            published: Toggle::Yes,
            ..Default::default()
        };

        let page = block_on(harness.client.list::<Posts>(&filter)).unwrap();
        let ids: Vec<&str> = page.data.iter().map(|post| post.id.as_str()).collect();
        assert_eq!(ids, ["post-2", "post-4"]);
        assert_eq!(page.total_records, 2);

        let request = harness.backend.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/Posts");
        assert!(request.query.contains(&("Keyword", "post".to_string())));
        assert!(request.query.contains(&("IsPublished", "true".to_string())));
    }

    #[test]
    fn get_accepts_wrapped_and_bare_payloads() {
        let harness = Harness::logged_in();
        harness.backend.seed_categories(&[("c1", None)]);
        harness.backend.seed_projects(1);

        let category = block_on(harness.client.get::<Categories>("c1")).unwrap();
        assert_eq!(category.id, "c1");
        let project = block_on(harness.client.get::<Projects>("p1")).unwrap();
        assert_eq!(project.id, "p1");
    }

    #[test]
    fn update_puts_the_id_next_to_the_fields() {
        let harness = Harness::logged_in();
        harness.backend.seed_categories(&[("c1", None)]);
        let draft = NewCategory {
            name: "Renamed".into(),
            ..Default::default()
        };

        block_on(harness.client.save::<Categories>(&Target::Update("c1".into()), &draft)).unwrap();
        let request = harness.backend.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/Categories/c1");
        let body = request.json.unwrap();
        assert_eq!(body["id"], "c1");
        assert_eq!(body["name"], "Renamed");
    }

    #[test]
    fn toggling_approval_flips_the_donation() {
        let harness = Harness::logged_in();
        harness.backend.seed_donations(1);

        block_on(harness.client.toggle_donation_approval("d1")).unwrap();
        let page = block_on(harness.client.list::<Donations>(&DonationFilter::default())).unwrap();
        assert!(page.data[0].is_confirmed);
    }

    #[test]
    fn uploads_default_to_the_general_folder() {
        let harness = Harness::logged_in();
        let url = block_on(harness.client.upload_file("cat.png".into(), "")).unwrap();
        assert_eq!(url, "https://cdn.example.com/general/cat.png");

        let url = block_on(harness.client.upload_file("dog.png".into(), "blogs")).unwrap();
        assert_eq!(url, "https://cdn.example.com/blogs/dog.png");
    }

    #[test]
    fn category_tree_and_flat_list() {
        let harness = Harness::logged_in();
        harness
            .backend
            .seed_categories(&[("c1", None), ("c2", Some("c1")), ("c3", None)]);

        let tree = block_on(harness.client.category_tree()).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 1);
        let all = block_on(harness.client.all_categories()).unwrap();
        assert_eq!(all.len(), 3);
    }
}
