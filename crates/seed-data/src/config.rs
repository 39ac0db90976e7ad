//! Configuration for seeding runs.
//!
//! Everything is read from the process environment once at startup into a
//! [`Settings`] value that is passed by reference from then on.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use bookshelf::assets::{
    CdnSettings, DEFAULT_PUBLIC_HOST, LocalCdnSettings, ObjectStorageSettings, StorageSettings,
};
use bookshelf::errors::ConfigError;
use time::{Date, Month, OffsetDateTime};

/// Complete configuration for a seeding run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Catalog URI. Absence is reported when connecting, not here.
    pub database_url: Option<String>,
    pub storage: StorageSettings,
    pub manifest: ManifestSettings,
    pub generation: GenerationSettings,
}

/// Where the local book files and their metadata live.
#[derive(Debug, Clone)]
pub struct ManifestSettings {
    pub epub_dir: PathBuf,
    pub cover_dir: PathBuf,
    pub metadata_path: PathBuf,
    /// Earliest random publication date.
    pub published_after: OffsetDateTime,
    /// Latest random publication date.
    pub published_before: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Number of users to generate.
    pub user_count: usize,
    /// Fraction of generated users that become authors.
    pub author_ratio: f64,
    /// Batch size for catalog insertions.
    pub batch_size: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            user_count: 20,
            author_ratio: 0.5,
            batch_size: 50,
        }
    }
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    ///
    /// The storage backend is resolved first so a missing or unknown
    /// `STORAGE_BACKEND` is always the error reported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let storage = env.storage()?;
        let database_url = env.optional("DATABASE_URL");

        let from_year: i32 = env.parsed("SEED_PUBLISHED_FROM_YEAR", 1990)?;
        let published_after = year_start("SEED_PUBLISHED_FROM_YEAR", from_year)?;
        let published_before = OffsetDateTime::now_utc();
        if published_after >= published_before {
            return Err(ConfigError::InvalidVar {
                name: "SEED_PUBLISHED_FROM_YEAR",
                reason: format!("{from_year} is not in the past"),
            });
        }

        let manifest = ManifestSettings {
            epub_dir: env.path("SEED_EPUB_DIR", "./data/epubs"),
            cover_dir: env.path("SEED_COVER_DIR", "./data/covers"),
            metadata_path: env.path("SEED_METADATA", "./data/books.json"),
            published_after,
            published_before,
        };

        let defaults = GenerationSettings::default();
        let author_ratio: f64 = env.parsed("SEED_AUTHOR_RATIO", defaults.author_ratio)?;
        if !(0.0..=1.0).contains(&author_ratio) {
            return Err(ConfigError::InvalidVar {
                name: "SEED_AUTHOR_RATIO",
                reason: format!("{author_ratio} is outside 0.0..=1.0"),
            });
        }
        let batch_size: usize = env.parsed("SEED_BATCH_SIZE", defaults.batch_size)?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidVar {
                name: "SEED_BATCH_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }

        let generation = GenerationSettings {
            user_count: env.parsed("SEED_USER_COUNT", defaults.user_count)?,
            author_ratio,
            batch_size,
        };

        Ok(Self {
            database_url,
            storage,
            manifest,
            generation,
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::MissingVar(name))
    }

    fn path(&self, name: &str, default: &str) -> PathBuf {
        PathBuf::from(self.optional(name).unwrap_or_else(|| default.to_string()))
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(name) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
                name,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn storage(&self) -> Result<StorageSettings, ConfigError> {
        let backend = self
            .optional("STORAGE_BACKEND")
            .ok_or(ConfigError::MissingBackend)?;

        match backend.as_str() {
            "s3" => Ok(StorageSettings::ObjectStorage(ObjectStorageSettings {
                region: self.required("S3_REGION")?,
                access_key_id: self.required("S3_ACCESS_KEY_ID")?,
                secret_access_key: self.required("S3_SECRET_ACCESS_KEY")?,
                private_bucket: self.required("S3_PRIVATE_BUCKET")?,
                public_bucket: self.required("S3_PUBLIC_BUCKET")?,
                public_host: self
                    .optional("S3_PUBLIC_HOST")
                    .unwrap_or_else(|| DEFAULT_PUBLIC_HOST.to_string()),
                endpoint: self.optional("S3_ENDPOINT"),
            })),
            "local" => Ok(StorageSettings::LocalCdn(LocalCdnSettings {
                upload_dir: self.path("LOCAL_UPLOAD_DIR", "./uploads"),
                cdn: CdnSettings {
                    upload_url: self.required("CDN_UPLOAD_URL")?,
                    upload_preset: self.required("CDN_UPLOAD_PRESET")?,
                    folder: self.optional("CDN_FOLDER"),
                },
            })),
            _ => Err(ConfigError::UnknownBackend(backend)),
        }
    }
}

fn year_start(name: &'static str, year: i32) -> Result<OffsetDateTime, ConfigError> {
    Date::from_calendar_date(year, Month::January, 1)
        .map(|date| date.midnight().assume_utc())
        .map_err(|e| ConfigError::InvalidVar {
            name,
            reason: e.to_string(),
        })
}
