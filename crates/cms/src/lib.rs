//! Provides the CMS admin panel's core functionality: the session and its
//! storage, route guards, the request wrapper and the state behind the
//! resource pages.

pub mod client;
pub mod display;
pub mod endpoints;
pub mod error;
pub mod form;
pub mod guard;
pub mod listing;
pub mod migration;
pub mod page;
pub mod session;
pub mod storage;
pub mod store;
pub mod tree;

#[cfg(test)]
mod testing;

pub use client::{ApiClient, Credentials, Navigator, Transport};
pub use error::{ApiError, ApiResult, StorageError};
pub use session::{Session, User};
pub use store::SessionStore;
