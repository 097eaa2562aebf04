//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with the standard error envelope, so handlers only
//! ever see well-formed input.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
