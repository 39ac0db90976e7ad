//! URL-safe identifiers for catalog entities and storage keys.

/// Derives a slug from human-readable text plus a uniqueness discriminator.
///
/// The base text is lowercased and every run of characters outside
/// `[a-z0-9]` collapses into a single `-`. The discriminator (normally the
/// entity's generated id) is slugified the same way and appended, and the
/// optional suffix (e.g. `.epub`) is appended verbatim.
///
/// ```
/// use bookshelf::slug::derive_slug;
///
/// assert_eq!(derive_slug("The Old Man & the Sea", "42", None), "the-old-man-the-sea-42");
/// assert_eq!(derive_slug("Dune", "7", Some(".epub")), "dune-7.epub");
/// ```
pub fn derive_slug(base: &str, discriminator: &str, suffix: Option<&str>) -> String {
    let mut slug = slugify(base);
    let discriminator = slugify(discriminator);

    if !discriminator.is_empty() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&discriminator);
    }

    if let Some(suffix) = suffix {
        slug.push_str(suffix);
    }

    slug
}

fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}
