//! URL slug derivation.

/// Normalize a string into a URL slug.
///
/// Lowercases, replaces spaces with underscores, and strips apostrophes.
/// The function is idempotent: applying it to its own output is a no-op,
/// so it is safe to re-apply on every write.
pub fn derive_slug(source: &str) -> String {
    source.to_lowercase().replace(' ', "_").replace('\'', "")
}
