//! Resource resolution adapters

pub mod filesystem;

pub use filesystem::FileSystemResourceResolver;
