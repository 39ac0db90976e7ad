//! Author profile generation for author-role users.

use std::ops::Range;

use fake::{Fake, faker::lorem::en::Paragraph};
use rand::Rng;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use bookshelf::models::{AuthorRecord, UserRecord, UserRole};
use bookshelf::slug::derive_slug;

/// Generates author profiles backed by existing users.
pub struct AuthorGenerator {
    about_sentences: Range<usize>,
}

impl AuthorGenerator {
    pub fn new() -> Self {
        Self {
            about_sentences: 3..6,
        }
    }

    /// Builds the author profile of one user. The profile starts with no books.
    pub fn generate(&self, user: &UserRecord, rng: &mut impl Rng) -> AuthorRecord {
        let id = Uuid::new_v4();
        let about: String = Paragraph(self.about_sentences.clone()).fake_with_rng(rng);

        // Profiles are created shortly after the account
        let delay = Duration::minutes(rng.gen_range(1..=120));

        AuthorRecord {
            id,
            user_id: user.id,
            name: user.name.clone(),
            about,
            slug: derive_slug(&user.name, &id.to_string(), None),
            books: Vec::new(),
            created_at: (user.created_at + delay).min(OffsetDateTime::now_utc()),
        }
    }

    /// Generates a profile for every author-role user, skipping readers.
    pub fn generate_for_users(
        &self,
        users: &[UserRecord],
        rng: &mut impl Rng,
    ) -> Vec<AuthorRecord> {
        users
            .iter()
            .filter(|u| u.role == UserRole::Author)
            .map(|u| self.generate(u, rng))
            .collect()
    }
}

impl Default for AuthorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn user(name: &str, role: UserRole) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: "x@example.com".to_string(),
            password_hash: "h".to_string(),
            role,
            created_at: OffsetDateTime::now_utc() - Duration::days(3),
        }
    }

    #[test]
    fn test_only_authors_get_profiles() {
        let mut rng = StdRng::seed_from_u64(1);
        let users = vec![
            user("Ann Reader", UserRole::Reader),
            user("Bea Writer", UserRole::Author),
            user("Cy Writer", UserRole::Author),
        ];

        let authors = AuthorGenerator::new().generate_for_users(&users, &mut rng);

        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].user_id, users[1].id);
        assert_eq!(authors[1].user_id, users[2].id);
        assert!(authors.iter().all(|a| a.books.is_empty()));
        assert!(authors.iter().all(|a| !a.about.is_empty()));
    }

    #[test]
    fn test_slug_from_name_and_id() {
        let mut rng = StdRng::seed_from_u64(2);
        let author = AuthorGenerator::new().generate(&user("Mary Shelley", UserRole::Author), &mut rng);

        assert_eq!(author.slug, format!("mary-shelley-{}", author.id));
        assert!(author.created_at <= OffsetDateTime::now_utc());
    }
}
