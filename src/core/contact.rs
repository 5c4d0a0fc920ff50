//! Contact business logic - contact CRUD and caller resolution.
//!
//! Resolution is deliberately strict: exact match on phone first, falling back
//! to exact match on email, no fuzzy matching. Priority is validated into the
//! 1-10 range at every write boundary and rejected outright when out of range.

use crate::{
    entities::{Contact, contact},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Relationship category stored in the `relationship` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// A coworker of the account owner
    Colleague,
    /// A family member
    Family,
    /// A personal friend
    Friend,
    /// A business client
    Client,
    /// A very important contact
    Vip,
    /// A supplier or service provider
    Vendor,
    /// Anything else
    Other,
}

impl Relationship {
    /// The storage representation of this relationship.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Colleague => "colleague",
            Self::Family => "family",
            Self::Friend => "friend",
            Self::Client => "client",
            Self::Vip => "vip",
            Self::Vendor => "vendor",
            Self::Other => "other",
        }
    }

    /// Parses a stored relationship, rejecting unknown values.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "colleague" => Ok(Self::Colleague),
            "family" => Ok(Self::Family),
            "friend" => Ok(Self::Friend),
            "client" => Ok(Self::Client),
            "vip" => Ok(Self::Vip),
            "vendor" => Ok(Self::Vendor),
            "other" => Ok(Self::Other),
            other => Err(Error::UnknownVariant {
                field: "relationship",
                value: other.to_string(),
            }),
        }
    }
}

/// Contacts with this priority or higher take the VIP fast-path.
pub const VIP_PRIORITY: i32 = 9;

/// Validates a contact priority, rejecting values outside 1-10.
/// Out-of-range values are never clamped or truncated.
pub fn validate_priority(priority: i32) -> Result<()> {
    if !(1..=10).contains(&priority) {
        return Err(Error::PriorityOutOfRange { value: priority });
    }
    Ok(())
}

/// Creates a new contact with the given attributes, performing input
/// validation on the name, relationship category, and priority range.
#[allow(clippy::too_many_arguments)]
pub async fn create_contact(
    db: &DatabaseConnection,
    account_id: i64,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    company: Option<String>,
    relationship: &str,
    priority: i32,
    notes: Option<String>,
) -> Result<contact::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Contact name cannot be empty".to_string(),
        });
    }
    let parsed_relationship = Relationship::parse(relationship)?;
    validate_priority(priority)?;

    let model = contact::ActiveModel {
        account_id: Set(account_id),
        name: Set(name.trim().to_string()),
        phone: Set(phone),
        email: Set(email),
        company: Set(company),
        relationship: Set(parsed_relationship.as_str().to_string()),
        priority: Set(priority),
        is_blocked: Set(false),
        notes: Set(notes),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds a contact by its unique ID.
pub async fn get_contact_by_id(
    db: &DatabaseConnection,
    contact_id: i64,
) -> Result<Option<contact::Model>> {
    Contact::find_by_id(contact_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all contacts for an account, ordered alphabetically by name.
pub async fn get_contacts_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<contact::Model>> {
    Contact::find()
        .filter(contact::Column::AccountId.eq(account_id))
        .order_by_asc(contact::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks up the best matching contact for an incoming caller.
///
/// Matching is exact on phone, falling back to exact on email. Returns None
/// for unknown callers. Read-only, no side effects.
pub async fn resolve_contact(
    db: &DatabaseConnection,
    account_id: i64,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<Option<contact::Model>> {
    if let Some(phone) = phone {
        let by_phone = Contact::find()
            .filter(contact::Column::AccountId.eq(account_id))
            .filter(contact::Column::Phone.eq(phone))
            .one(db)
            .await?;
        if by_phone.is_some() {
            return Ok(by_phone);
        }
    }

    if let Some(email) = email {
        let by_email = Contact::find()
            .filter(contact::Column::AccountId.eq(account_id))
            .filter(contact::Column::Email.eq(email))
            .one(db)
            .await?;
        return Ok(by_email);
    }

    Ok(None)
}

/// Fields an edit may change; everything left as None keeps its current value.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    /// New display name
    pub name: Option<String>,
    /// New phone number
    pub phone: Option<Option<String>>,
    /// New email address
    pub email: Option<Option<String>>,
    /// New company name
    pub company: Option<Option<String>>,
    /// New relationship category
    pub relationship: Option<String>,
    /// New screening priority
    pub priority: Option<i32>,
    /// New notes
    pub notes: Option<Option<String>>,
}

/// Edits a contact, re-validating the relationship category and priority
/// range at the boundary exactly as creation does.
pub async fn update_contact(
    db: &DatabaseConnection,
    contact_id: i64,
    update: ContactUpdate,
) -> Result<contact::Model> {
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(Error::Config {
                message: "Contact name cannot be empty".to_string(),
            });
        }
    }
    let relationship = update
        .relationship
        .as_deref()
        .map(Relationship::parse)
        .transpose()?;
    if let Some(priority) = update.priority {
        validate_priority(priority)?;
    }

    let existing = Contact::find_by_id(contact_id)
        .one(db)
        .await?
        .ok_or(Error::ContactNotFound { id: contact_id })?;

    let mut model: contact::ActiveModel = existing.into();
    if let Some(name) = update.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(phone) = update.phone {
        model.phone = Set(phone);
    }
    if let Some(email) = update.email {
        model.email = Set(email);
    }
    if let Some(company) = update.company {
        model.company = Set(company);
    }
    if let Some(relationship) = relationship {
        model.relationship = Set(relationship.as_str().to_string());
    }
    if let Some(priority) = update.priority {
        model.priority = Set(priority);
    }
    if let Some(notes) = update.notes {
        model.notes = Set(notes);
    }
    model.update(db).await.map_err(Into::into)
}

/// Updates a contact's screening priority, enforcing the 1-10 range.
pub async fn update_contact_priority(
    db: &DatabaseConnection,
    contact_id: i64,
    priority: i32,
) -> Result<contact::Model> {
    validate_priority(priority)?;

    let existing = Contact::find_by_id(contact_id)
        .one(db)
        .await?
        .ok_or(Error::ContactNotFound { id: contact_id })?;

    let mut model: contact::ActiveModel = existing.into();
    model.priority = Set(priority);
    model.update(db).await.map_err(Into::into)
}

/// Sets or clears a contact's blocked flag.
pub async fn set_contact_blocked(
    db: &DatabaseConnection,
    contact_id: i64,
    blocked: bool,
) -> Result<contact::Model> {
    let existing = Contact::find_by_id(contact_id)
        .one(db)
        .await?
        .ok_or(Error::ContactNotFound { id: contact_id })?;

    let mut model: contact::ActiveModel = existing.into();
    model.is_blocked = Set(blocked);
    model.update(db).await.map_err(Into::into)
}

/// Permanently removes a contact.
pub async fn delete_contact(db: &DatabaseConnection, contact_id: i64) -> Result<()> {
    let result = Contact::delete_by_id(contact_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ContactNotFound { id: contact_id });
    }
    Ok(())
}
