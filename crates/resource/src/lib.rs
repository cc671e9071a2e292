//! Resource resolvers for the vista theme engine.
//!
//! This crate provides the native implementation of the
//! `ResourceResolver` trait from vista-traits.
//!
//! ## Available Resolvers
//!
//! - [`FilesystemResourceResolver`]: Reads theme files from the local filesystem
//!
//! ## Re-exports
//!
//! For convenience, we also re-export the in-memory resolver from vista-traits:
//! - [`InMemoryResourceResolver`]: Pre-populated in-memory storage

mod filesystem;

pub use filesystem::FilesystemResourceResolver;

pub use vista_traits::InMemoryResourceResolver;
