//! User generation.

use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use bookshelf::models::{UserRecord, UserRole};

use crate::db::SeedError;

/// Password every generated account can log in with.
pub const SEED_PASSWORD: &str = "bookshelf.rs";

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Probability that a generated user is an author.
    pub author_ratio: f64,
    /// Domains used for generated email addresses.
    pub email_domains: Vec<String>,
    /// How far back account creation dates may go, in days.
    pub max_account_age_days: i64,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            author_ratio: 0.5,
            email_domains: vec![
                "gmail.com".to_string(),
                "outlook.com".to_string(),
                "yahoo.com".to_string(),
                "proton.me".to_string(),
            ],
            max_account_age_days: 730,
        }
    }
}

/// Generates realistic user data for testing.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single user carrying the given password hash.
    pub fn generate(&self, password_hash: &str, rng: &mut impl Rng) -> UserRecord {
        let name: String = Name().fake_with_rng(rng);
        let email = self.generate_email(&name, rng);

        let role = if rng.gen_bool(self.config.author_ratio.clamp(0.0, 1.0)) {
            UserRole::Author
        } else {
            UserRole::Reader
        };

        let age = Duration::days(rng.gen_range(0..=self.config.max_account_age_days.max(0)));

        UserRecord {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash: password_hash.to_string(),
            role,
            created_at: OffsetDateTime::now_utc() - age,
        }
    }

    /// Generates multiple users sharing one hash of [`SEED_PASSWORD`].
    pub fn generate_batch(
        &self,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<UserRecord>, SeedError> {
        let password_hash = bookshelf::auth::hash_password(SEED_PASSWORD)
            .map_err(|e| SeedError::PasswordHash(e.to_string()))?;

        Ok((0..count)
            .map(|_| self.generate(&password_hash, rng))
            .collect())
    }

    /// Generates an email from a name.
    fn generate_email(&self, name: &str, rng: &mut impl Rng) -> String {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        let suffix: u32 = rng.gen_range(1..9999);
        let domain = match self.config.email_domains.len() {
            0 => "example.com",
            n => self.config.email_domains[rng.gen_range(0..n)].as_str(),
        };

        format!("{normalized}{suffix}@{domain}")
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}
