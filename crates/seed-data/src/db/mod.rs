//! Catalog integration for seeding generated data.
//!
//! The [`Seeder`] inserts generated users and authors through any
//! [`bookshelf::Catalog`], in chunks with progress reporting.

mod seeder;

pub use seeder::{SeedError, Seeder};
