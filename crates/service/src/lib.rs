//! Storefront customer services built on top of the `common` GraphQL transport.
//! - `auth` exchanges customer credentials for a session token.
//! - `session` owns where that token lives.
//! - `customer` refreshes the cached profile once the session changes.

pub mod errors;
pub mod auth;
pub mod customer;
pub mod hook;
pub mod mock;
pub mod session;
