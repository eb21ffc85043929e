//! Storage module for uploaded media
//!
//! Files live on local disk under the configured uploads root and are served
//! back through the `/uploads` static route.

mod local_store;

pub use local_store::{LocalStore, UPLOADS_URL_PREFIX};
