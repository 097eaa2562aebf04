//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database("my_test");
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!
//!     let title = builder.title(1);
//!     let price = builder.price(1);
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for deterministic test data.
///
/// The same seed always yields the same ids, titles and prices, so failing
/// tests are reproducible.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic id for the `n`th record.
    pub fn id(&self, n: u64) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        bytes[8..].copy_from_slice(&n.to_le_bytes());
        Uuid::from_bytes(bytes)
    }

    /// Short title (at most 20 characters), unique per `n`.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let title = TestDataBuilder::new(42).title(3);
    /// assert!(title.len() <= 20);
    /// ```
    pub fn title(&self, n: u64) -> String {
        format!("item-{:04}-{}", self.seed % 10_000, n % 1_000)
    }

    /// Price within 50..=2000.
    pub fn price(&self, n: u64) -> f64 {
        let spread = self.seed.wrapping_add(n.wrapping_mul(7919)) % 1951;
        50.0 + spread as f64
    }

    /// Name for a per-test database, so parallel tests do not collide.
    pub fn database_name(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.seed)
    }
}
