//! Seeding routines run by the `seed` binary.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use bookshelf::models::{UserRecord, UserRole};
use bookshelf::{AssetStore, Catalog};

use crate::batch::{BatchReport, pair_with_authors, publish_batch};
use crate::config::{GenerationSettings, ManifestSettings};
use crate::db::{SeedError, Seeder};
use crate::generators::{AuthorGenerator, UserGenConfig, UserGenerator};
use crate::manifest::Manifest;
use crate::publisher::BookPublisher;

/// Generates and inserts `count` users.
pub async fn seed_users<C: Catalog>(
    catalog: &C,
    generation: &GenerationSettings,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<UserRecord>, SeedError> {
    let generator = UserGenerator::with_config(UserGenConfig {
        author_ratio: generation.author_ratio,
        ..Default::default()
    });
    let users = generator.generate_batch(count, rng)?;

    Seeder::new(catalog)
        .with_batch_size(generation.batch_size)
        .seed_users(&users)
        .await?;

    Ok(users)
}

/// Creates an author profile for every author-role user that has none yet.
pub async fn seed_authors<C: Catalog>(
    catalog: &C,
    generation: &GenerationSettings,
    rng: &mut impl Rng,
) -> Result<usize, SeedError> {
    let mut profiled = HashSet::new();
    for id in catalog.author_ids().await? {
        if let Some(author) = catalog.find_author(id).await? {
            profiled.insert(author.user_id);
        }
    }

    let without_profile: Vec<UserRecord> = catalog
        .find_users_by_role(UserRole::Author)
        .await?
        .into_iter()
        .filter(|u| !profiled.contains(&u.id))
        .collect();

    if without_profile.is_empty() {
        warn!("No author-role users without a profile; seed users first");
        return Ok(0);
    }

    let authors = AuthorGenerator::new().generate_for_users(&without_profile, rng);
    Seeder::new(catalog)
        .with_batch_size(generation.batch_size)
        .seed_authors(&authors)
        .await?;

    Ok(authors.len())
}

/// Publishes one book per manifest entry, paired with existing authors.
pub async fn seed_books<C, A>(
    publisher: Arc<BookPublisher<C, A>>,
    manifest: &ManifestSettings,
    rng: &mut impl Rng,
) -> Result<BatchReport, SeedError>
where
    C: Catalog + 'static,
    A: AssetStore + 'static,
{
    let requests = Manifest::load(manifest).await?.into_requests(manifest, rng);
    let author_ids = publisher.catalog().author_ids().await?;
    info!(
        "Pairing {} books with {} authors",
        requests.len(),
        author_ids.len()
    );

    let items = pair_with_authors(requests, &author_ids);
    Ok(publish_batch(publisher, items).await)
}
