//! Interaction entity - The terminal record of one phone or web conversation.
//!
//! A row is written exactly once, when an interaction is finalized; the active
//! phase lives in the in-memory session store. The `session_id` column is
//! unique and immutable, which is what makes duplicate finalize attempts
//! collapse into a single persisted record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Interaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interactions")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the account the interaction belongs to
    pub account_id: i64,
    /// Session identifier (UUIDv4), unique and immutable once created
    #[sea_orm(unique)]
    pub session_id: String,
    /// Interaction channel: `"phone"` or `"web"`
    pub channel: String,
    /// Caller metadata (name/phone/email) as JSON
    pub caller_info: Json,
    /// Ordered conversation turns as JSON
    pub transcript: Json,
    /// Derived summary as JSON
    pub summary: Json,
    /// Sentiment of the caller side, in [-1.0, 1.0]
    pub sentiment_score: Option<f64>,
    /// The screening decision and its audit reference as JSON
    pub screening: Json,
    /// Total interaction length in seconds
    pub duration_seconds: i32,
    /// Terminal status: `"completed"`, `"abandoned"`, `"voicemail"` or `"blocked"`
    pub status: String,
    /// When the interaction started
    pub started_at: DateTimeUtc,
    /// When the terminal record was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Interaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each interaction belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// One interaction may have messages attached
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
