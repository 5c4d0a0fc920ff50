//! Account entity - Represents an owner of screening configuration.
//!
//! Every other entity in the system (contacts, call rules, phone settings,
//! interactions, messages) belongs to exactly one account and is removed
//! together with it. Authentication is handled outside this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the account owner
    pub name: String,
    /// Contact email, unique across accounts
    #[sea_orm(unique)]
    pub email: String,
    /// Optional phone number of the owner
    pub phone: Option<String>,
    /// Optional company name
    pub company: Option<String>,
    /// Whether the account is active; inactive accounts are never screened for
    pub is_active: bool,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Account and the entities it owns
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many contacts
    #[sea_orm(has_many = "super::contact::Entity")]
    Contacts,
    /// One account has many call rules
    #[sea_orm(has_many = "super::call_rule::Entity")]
    CallRules,
    /// One account has at most one phone settings row
    #[sea_orm(has_one = "super::phone_settings::Entity")]
    PhoneSettings,
    /// One account has many recorded interactions
    #[sea_orm(has_many = "super::interaction::Entity")]
    Interactions,
    /// One account has many caller-left messages
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl Related<super::call_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CallRules.def()
    }
}

impl Related<super::phone_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhoneSettings.def()
    }
}

impl Related<super::interaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interactions.def()
    }
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
