//! Message entity - A note left by a caller for the account owner.
//!
//! Messages are created when a caller leaves one, optionally tied to the
//! interaction they came from. They are only ever mutated by marking them
//! read or flagging them for follow-up, and are never deleted automatically.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the account the message was left for
    pub account_id: i64,
    /// Interaction the message was taken during, if any
    pub interaction_id: Option<i64>,
    /// Name the caller gave, if any
    pub caller_name: Option<String>,
    /// Phone number the caller gave, if any
    pub caller_phone: Option<String>,
    /// The message text
    pub content: String,
    /// Urgency tier: `"low"`, `"normal"`, `"high"` or `"urgent"`
    pub urgency: String,
    /// Whether the owner has read the message
    pub is_read: bool,
    /// Whether the owner flagged the message for follow-up
    pub needs_follow_up: bool,
    /// When the message was left
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Message and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each message belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// A message may belong to one interaction
    #[sea_orm(
        belongs_to = "super::interaction::Entity",
        from = "Column::InteractionId",
        to = "super::interaction::Column::Id"
    )]
    Interaction,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::interaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
