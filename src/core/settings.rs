//! Phone settings business logic.
//!
//! Each account has at most one settings row; the upsert below is the only
//! writer and keeps it that way. The business-hours schedule is validated
//! into its typed form before anything reaches the JSON column.

use crate::{
    core::hours::BusinessHours,
    entities::{PhoneSettings, phone_settings},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Offsets must stay within the real-world UTC-12:00..UTC+14:00 band.
const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Fields an upsert may change; everything left as None keeps its current
/// (or default) value.
#[derive(Debug, Clone, Default)]
pub struct PhoneSettingsUpdate {
    /// Whether phone screening is enabled
    pub enabled: Option<bool>,
    /// The configured inbound phone number
    pub phone_number: Option<String>,
    /// Whether callers may leave voicemail
    pub voicemail_enabled: Option<bool>,
    /// Whether calls are recorded
    pub recording_enabled: Option<bool>,
    /// The weekday schedule
    pub business_hours: Option<BusinessHours>,
    /// Offset of the account's local zone from UTC, in minutes
    pub utc_offset_minutes: Option<i32>,
}

/// Retrieves the settings row for an account, if one exists.
pub async fn get_phone_settings(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<phone_settings::Model>> {
    PhoneSettings::find()
        .filter(phone_settings::Column::AccountId.eq(account_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates or updates the single settings row for an account.
///
/// A first call creates the row from defaults plus the given fields; later
/// calls update the existing row in place, preserving the one-row-per-account
/// invariant. Out-of-band UTC offsets are rejected at this boundary.
pub async fn upsert_phone_settings(
    db: &DatabaseConnection,
    account_id: i64,
    update: PhoneSettingsUpdate,
) -> Result<phone_settings::Model> {
    if let Some(offset) = update.utc_offset_minutes {
        if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&offset) {
            return Err(Error::Config {
                message: format!("UTC offset {offset} minutes is out of range"),
            });
        }
    }

    let existing = get_phone_settings(db, account_id).await?;

    match existing {
        Some(settings) => {
            let mut model: phone_settings::ActiveModel = settings.into();
            if let Some(enabled) = update.enabled {
                model.enabled = Set(enabled);
            }
            if let Some(phone_number) = update.phone_number {
                model.phone_number = Set(Some(phone_number));
            }
            if let Some(voicemail_enabled) = update.voicemail_enabled {
                model.voicemail_enabled = Set(voicemail_enabled);
            }
            if let Some(recording_enabled) = update.recording_enabled {
                model.recording_enabled = Set(recording_enabled);
            }
            if let Some(hours) = update.business_hours {
                model.business_hours = Set(hours.to_json());
            }
            if let Some(offset) = update.utc_offset_minutes {
                model.utc_offset_minutes = Set(offset);
            }
            model.update(db).await.map_err(Into::into)
        }
        None => {
            let hours = update.business_hours.unwrap_or_default();
            let model = phone_settings::ActiveModel {
                account_id: Set(account_id),
                enabled: Set(update.enabled.unwrap_or(true)),
                phone_number: Set(update.phone_number),
                voicemail_enabled: Set(update.voicemail_enabled.unwrap_or(true)),
                recording_enabled: Set(update.recording_enabled.unwrap_or(false)),
                business_hours: Set(hours.to_json()),
                utc_offset_minutes: Set(update.utc_offset_minutes.unwrap_or(0)),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            };
            model.insert(db).await.map_err(Into::into)
        }
    }
}
