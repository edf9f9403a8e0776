//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based row ID.
    ///
    /// Lowercased so ids compare the same way in `PostgreSQL` and `SQLite`.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque code, used for invitation links.
    #[must_use]
    pub fn generate_code(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Generate a blob key for an image of the given format.
    #[must_use]
    pub fn generate_blob_key(&self, format: &str) -> String {
        format!("{}.{}", Uuid::now_v7().simple(), format.trim_start_matches('.'))
    }
}
