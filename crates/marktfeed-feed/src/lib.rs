//! Feed transcoding pipeline for marktfeed.
//!
//! Fetches a Google Merchant-style product feed, reads it into
//! [`SourceItem`]s with per-field namespace fallback, and transcodes the
//! items into the configured Dutch classifieds dialect. The whole pipeline
//! is a pure function of the fetched bytes plus the immutable listing
//! configuration; nothing is cached between requests.

pub mod clean;
pub mod client;
pub mod error;
pub mod price;
pub mod source;
pub mod transcode;

pub use client::FeedClient;
pub use error::FeedError;
pub use source::{parse_source_feed, SourceItem};
pub use transcode::transcode;
