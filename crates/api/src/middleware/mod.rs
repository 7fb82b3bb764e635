//! Request extractors that guard routes.
//!
//! - [`auth::AdminAuth`] -- requires the configured admin Bearer token.

pub mod auth;
