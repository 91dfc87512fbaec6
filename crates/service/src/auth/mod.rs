//! Customer authentication against the storefront.

pub mod domain;
pub mod login;
pub mod mutations;

pub use domain::Credentials;
pub use login::{LoginHandler, LoginHook};
