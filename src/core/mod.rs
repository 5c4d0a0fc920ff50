//! Core business logic - framework-agnostic screening, session, and history
//! operations. Nothing in here knows about any transport; the async functions
//! take a database connection and return structured data.

/// Account CRUD and the ownership cascade
pub mod account;

/// Aggregation over persisted interactions
pub mod analytics;

/// Contact CRUD and caller resolution
pub mod contact;

/// Business-hours schedule evaluation
pub mod hours;

/// Caller-left messages
pub mod message;

/// Terminal-record persistence and history reads
pub mod recorder;

/// Call-rule CRUD and predicate matching
pub mod rule;

/// The screening decision engine
pub mod screening;

/// In-memory store for in-progress interactions
pub mod session;

/// Phone settings and their weekday schedule
pub mod settings;

/// Transcript summarization and sentiment scoring
pub mod summary;
