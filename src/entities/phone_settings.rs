//! Phone settings entity - Per-account telephony configuration.
//!
//! At most one row exists per account (unique constraint on `account_id`).
//! The `business_hours` column stores the weekday schedule as JSON; outside
//! the configured hours, unmatched callers default to voicemail.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Phone settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phone_settings")]
pub struct Model {
    /// Unique identifier for the settings row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning account; unique, one settings row per account
    #[sea_orm(unique)]
    pub account_id: i64,
    /// Whether phone screening is enabled for the account
    pub enabled: bool,
    /// The configured inbound phone number
    pub phone_number: Option<String>,
    /// Whether callers may leave voicemail
    pub voicemail_enabled: bool,
    /// Whether calls are recorded
    pub recording_enabled: bool,
    /// Weekday schedule as JSON: per-day `{"enabled", "start", "end"}`
    pub business_hours: Json,
    /// Offset of the account's local zone from UTC, in minutes
    pub utc_offset_minutes: i32,
    /// When the settings row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between PhoneSettings and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each settings row belongs to one account
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
