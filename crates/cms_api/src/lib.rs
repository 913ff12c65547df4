//! Types for communication between the CMS backend and the admin panel.

pub mod request;
pub mod response;
pub mod timestamp;
