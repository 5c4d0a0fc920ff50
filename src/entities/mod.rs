//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod call_rule;
pub mod contact;
pub mod interaction;
pub mod message;
pub mod phone_settings;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use call_rule::{Column as CallRuleColumn, Entity as CallRule, Model as CallRuleModel};
pub use contact::{Column as ContactColumn, Entity as Contact, Model as ContactModel};
pub use interaction::{
    Column as InteractionColumn, Entity as Interaction, Model as InteractionModel,
};
pub use message::{Column as MessageColumn, Entity as Message, Model as MessageModel};
pub use phone_settings::{
    Column as PhoneSettingsColumn, Entity as PhoneSettings, Model as PhoneSettingsModel,
};
