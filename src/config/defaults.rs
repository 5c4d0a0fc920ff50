//! Screening defaults loading from config.toml
//!
//! This module provides functionality to load default screening configuration
//! from a TOML file: the business-hours schedule new accounts start with and
//! optional seed rules. The defaults are used to provision phone settings and
//! starter rules for accounts that have none yet.

use crate::{
    core::{hours::BusinessHours, rule, settings},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct DefaultsConfig {
    /// Business-hours schedule to provision new accounts with
    pub business_hours: Option<BusinessHours>,
    /// Seed rules to provision new accounts with
    #[serde(default)]
    pub rules: Vec<SeedRule>,
}

/// Configuration for a single seed rule
#[derive(Debug, Deserialize, Clone)]
pub struct SeedRule {
    /// Rule category: blacklist, whitelist, redirect, voicemail or custom
    pub rule_type: String,
    /// Evaluation priority; lower numbers are evaluated first
    pub priority: i32,
    /// Keyword condition, mutually exclusive with `number` and `prefix`
    pub keyword: Option<String>,
    /// Exact-number condition
    pub number: Option<String>,
    /// Number-prefix condition
    pub prefix: Option<String>,
    /// Action: block, redirect, voicemail or allow
    pub action: String,
    /// Redirect destination, required when `action` is redirect
    pub redirect_target: Option<String>,
}

impl SeedRule {
    /// Builds the condition JSON blob from whichever condition field is set.
    fn condition_json(&self) -> Result<serde_json::Value> {
        match (&self.keyword, &self.number, &self.prefix) {
            (Some(keyword), None, None) => Ok(json!({ "keyword": keyword })),
            (None, Some(number), None) => Ok(json!({ "number": number })),
            (None, None, Some(prefix)) => Ok(json!({ "prefix": prefix })),
            _ => Err(Error::Config {
                message: format!(
                    "Seed rule needs exactly one of keyword/number/prefix: {self:?}"
                ),
            }),
        }
    }

    /// Builds the action JSON blob.
    fn action_json(&self) -> Result<serde_json::Value> {
        match self.action.as_str() {
            "block" => Ok(json!({ "type": "block" })),
            "voicemail" => Ok(json!({ "type": "voicemail" })),
            "allow" => Ok(json!({ "type": "allow" })),
            "redirect" => {
                let target = self.redirect_target.as_ref().ok_or_else(|| Error::Config {
                    message: "Seed redirect rule is missing redirect_target".to_string(),
                })?;
                Ok(json!({ "type": "redirect", "target": target }))
            }
            other => Err(Error::Config {
                message: format!("Unknown seed rule action: {other}"),
            }),
        }
    }
}

/// Loads screening defaults from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DefaultsConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads screening defaults from the default location (./config.toml)
pub fn load_default_config() -> Result<DefaultsConfig> {
    load_config("config.toml")
}

/// Provisions an account with the configured defaults.
///
/// Creates the phone-settings row with the default schedule when the account
/// has none, and inserts the seed rules when the account has no rules yet.
/// Already-configured accounts are left untouched.
pub async fn provision_account_defaults(
    db: &DatabaseConnection,
    account_id: i64,
    defaults: &DefaultsConfig,
) -> Result<()> {
    if settings::get_phone_settings(db, account_id).await?.is_none() {
        settings::upsert_phone_settings(
            db,
            account_id,
            settings::PhoneSettingsUpdate {
                business_hours: defaults.business_hours.clone(),
                ..Default::default()
            },
        )
        .await?;
        info!(account_id, "provisioned default phone settings");
    }

    if rule::list_rules(db, account_id).await?.is_empty() && !defaults.rules.is_empty() {
        for seed in &defaults.rules {
            rule::create_rule(
                db,
                account_id,
                &seed.rule_type,
                seed.condition_json()?,
                seed.action_json()?,
                seed.priority,
                true,
            )
            .await?;
        }
        info!(
            account_id,
            count = defaults.rules.len(),
            "provisioned seed rules"
        );
    }

    Ok(())
}
