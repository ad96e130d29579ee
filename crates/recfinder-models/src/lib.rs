//! Shared data models for recording retrieval.
//!
//! This crate provides Serde-serializable types for:
//! - Conversation identifiers
//! - Normalized recording records and the "not available" sentinel
//! - Recordings query bodies, intervals and result pages
//! - Export profiles (CSV header shapes)

pub mod conversation;
pub mod export_profile;
pub mod query;
pub mod recording;

// Re-export common types
pub use conversation::ConversationId;
pub use export_profile::ExportProfile;
pub use query::{
    parse_date, ConversationRef, IntervalError, QueryInterval, RecordingQuery, RecordingQueryPage,
    DEFAULT_PAGE_SIZE, DEFAULT_SORT_ORDER,
};
pub use recording::{RecordingRecord, NOT_AVAILABLE};
