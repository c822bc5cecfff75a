//! Shared types, error model, and configuration for rstextract.
//!
//! This crate is the foundation depended on by all other rstextract crates.
//! It provides:
//! - [`RstExtractError`], the unified error type
//! - Domain types ([`CompilationUnit`], [`MemberFile`], [`CommentBlock`], [`SourceTree`])
//! - Configuration ([`AppConfig`], [`WriteErrorPolicy`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_MARKER, ExtractSection, OutputSection, WriteErrorPolicy, config_dir,
    config_file_path, init_config, load_config_from, resolve_config,
};
pub use error::{Result, RstExtractError};
pub use types::{CommentBlock, CompilationUnit, MemberFile, SourceTree, base_name};
