//! Contact entity - Represents a known caller in an account's address book.
//!
//! Each contact carries a relationship category, a screening priority and a
//! blocked flag. Resolution against incoming callers is exact on phone first,
//! then exact on email. A blocked contact is an absolute veto: it can never
//! receive a transfer or priority outcome.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contact database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    /// Unique identifier for the contact
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the account that owns this contact
    pub account_id: i64,
    /// Display name of the contact
    pub name: String,
    /// Phone number, matched exactly during resolution
    pub phone: Option<String>,
    /// Email address, the fallback resolution key
    pub email: Option<String>,
    /// Optional company name
    pub company: Option<String>,
    /// Relationship category: `"colleague"`, `"family"`, `"friend"`,
    /// `"client"`, `"vip"`, `"vendor"` or `"other"`
    pub relationship: String,
    /// Screening priority, always within 1-10; 9 and above is the VIP fast-path
    pub priority: i32,
    /// Whether calls from this contact are always blocked
    pub is_blocked: bool,
    /// Free-text notes about the contact
    pub notes: Option<String>,
    /// When the contact was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Contact and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each contact belongs to one account
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
