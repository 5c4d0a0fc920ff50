//! Call rule entity - Represents one configured screening rule.
//!
//! The `conditions` and `action` columns hold JSON blobs that are parsed into
//! tagged variants by the core layer and validated on write. Among active
//! rules, evaluation order is priority ascending with ties broken by id
//! ascending, first match wins. Rules are soft-disabled via `active = false`
//! rather than deleted when in doubt.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Call rule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "call_rules")]
pub struct Model {
    /// Unique identifier for the rule
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the account that owns this rule
    pub account_id: i64,
    /// Rule category: `"blacklist"`, `"whitelist"`, `"redirect"`,
    /// `"voicemail"` or `"custom"`
    pub rule_type: String,
    /// Condition predicate as JSON, e.g. `{"keyword": "warranty"}`
    pub conditions: Json,
    /// Action payload as JSON, e.g. `{"type": "block"}`
    pub action: Json,
    /// Evaluation priority; lower numbers are evaluated first
    pub priority: i32,
    /// Whether the rule participates in screening
    pub active: bool,
    /// When the rule was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between CallRule and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each rule belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
