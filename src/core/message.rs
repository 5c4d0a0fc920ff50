//! Caller message business logic.
//!
//! Messages are created when a caller leaves one, then only ever mutated by
//! marking them read or flagging them for follow-up. Nothing here deletes
//! messages; cleanup is the account cascade's job.

use crate::{
    entities::{Message, message},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Urgency tier stored in the `urgency` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Can wait
    Low,
    /// Ordinary message
    Normal,
    /// Should be seen soon
    High,
    /// Needs immediate attention
    Urgent,
}

impl Urgency {
    /// The storage representation of this urgency tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parses a stored urgency tier, rejecting unknown values.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(Error::UnknownVariant {
                field: "urgency",
                value: other.to_string(),
            }),
        }
    }
}

/// Creates a message a caller left for the account owner, validating the
/// urgency tier and rejecting empty content.
pub async fn create_message(
    db: &DatabaseConnection,
    account_id: i64,
    interaction_id: Option<i64>,
    caller_name: Option<String>,
    caller_phone: Option<String>,
    content: String,
    urgency: &str,
) -> Result<message::Model> {
    if content.trim().is_empty() {
        return Err(Error::Config {
            message: "Message content cannot be empty".to_string(),
        });
    }
    let parsed_urgency = Urgency::parse(urgency)?;

    let model = message::ActiveModel {
        account_id: Set(account_id),
        interaction_id: Set(interaction_id),
        caller_name: Set(caller_name),
        caller_phone: Set(caller_phone),
        content: Set(content.trim().to_string()),
        urgency: Set(parsed_urgency.as_str().to_string()),
        is_read: Set(false),
        needs_follow_up: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Retrieves messages for an account, newest first, optionally only unread.
pub async fn get_messages_for_account(
    db: &DatabaseConnection,
    account_id: i64,
    unread_only: bool,
) -> Result<Vec<message::Model>> {
    let mut query = Message::find()
        .filter(message::Column::AccountId.eq(account_id))
        .order_by_desc(message::Column::CreatedAt);
    if unread_only {
        query = query.filter(message::Column::IsRead.eq(false));
    }
    query.all(db).await.map_err(Into::into)
}

/// Marks a message as read.
pub async fn mark_read(db: &DatabaseConnection, message_id: i64) -> Result<message::Model> {
    let existing = Message::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or(Error::MessageNotFound { id: message_id })?;

    let mut model: message::ActiveModel = existing.into();
    model.is_read = Set(true);
    model.update(db).await.map_err(Into::into)
}

/// Sets or clears a message's follow-up flag.
pub async fn set_follow_up(
    db: &DatabaseConnection,
    message_id: i64,
    needs_follow_up: bool,
) -> Result<message::Model> {
    let existing = Message::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or(Error::MessageNotFound { id: message_id })?;

    let mut model: message::ActiveModel = existing.into();
    model.needs_follow_up = Set(needs_follow_up);
    model.update(db).await.map_err(Into::into)
}
