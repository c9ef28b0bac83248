//! Data models shared across the engine.

pub mod metadata;

pub use metadata::FileMetadata;
