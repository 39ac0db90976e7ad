//! Entity generators for seed data.
//!
//! - [`UserGenerator`]: users with fake names, emails and a shared password hash
//! - [`AuthorGenerator`]: author profiles for author-role users

pub mod author;
pub mod user;

pub use author::AuthorGenerator;
pub use user::{SEED_PASSWORD, UserGenConfig, UserGenerator};
