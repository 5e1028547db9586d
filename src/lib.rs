//! catalog-export: Repository and Catalog Exporter
//!
//! Walks a document repository's category and product folders, reconciles banner images
//! with catalog categories, and renders the result as a content import document. Record
//! identifiers are reused from the previous export so repeated runs update instead of
//! duplicating.

pub mod catalog;
pub mod concurrency;
pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod identity;
pub mod logging;
pub mod mapper;
pub mod reconcile;
pub mod repository;
pub mod tooling;
pub mod types;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_support;
