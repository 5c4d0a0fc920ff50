//! Shared test utilities for `callscreen`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        account, contact,
        recorder::{InteractionOutcome, InteractionStatus},
        rule,
        screening::{Audit, Channel, Decision, Screening},
        session::CallerInfo,
        summary::CallSummary,
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test account with the given email and a fixed name.
pub async fn create_test_account(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::account::Model> {
    account::create_account(db, "Test Owner".to_string(), email.to_string()).await
}

/// Sets up a complete test environment with one account.
/// Returns (db, account) for common test scenarios.
pub async fn setup_with_account() -> Result<(DatabaseConnection, entities::account::Model)> {
    let db = setup_test_db().await?;
    let account = create_test_account(&db, "owner@example.com").await?;
    Ok((db, account))
}

/// Creates a test contact with sensible defaults.
///
/// # Defaults
/// * `relationship`: "client"
/// * `priority`: 5
/// * `email`, `company`, `notes`: None
pub async fn create_test_contact(
    db: &DatabaseConnection,
    account_id: i64,
    name: &str,
    phone: &str,
) -> Result<entities::contact::Model> {
    contact::create_contact(
        db,
        account_id,
        name.to_string(),
        Some(phone.to_string()),
        None,
        None,
        "client",
        5,
        None,
    )
    .await
}

/// Creates a test contact with custom relationship and priority.
/// Use this when you need to test specific contact configurations.
pub async fn create_custom_contact(
    db: &DatabaseConnection,
    account_id: i64,
    name: &str,
    phone: Option<String>,
    email: Option<String>,
    relationship: &str,
    priority: i32,
) -> Result<entities::contact::Model> {
    contact::create_contact(
        db,
        account_id,
        name.to_string(),
        phone,
        email,
        None,
        relationship,
        priority,
        None,
    )
    .await
}

/// Creates an active keyword rule with a block/voicemail/allow action derived
/// from the rule type.
///
/// Blacklist rules block, voicemail rules send to voicemail, anything else
/// allows. For more exotic rules, call `rule::create_rule` directly.
pub async fn create_custom_rule(
    db: &DatabaseConnection,
    account_id: i64,
    rule_type: &str,
    priority: i32,
    keyword: &str,
) -> Result<entities::call_rule::Model> {
    let action = match rule_type {
        "blacklist" => json!({ "type": "block" }),
        "voicemail" => json!({ "type": "voicemail" }),
        _ => json!({ "type": "allow" }),
    };
    rule::create_rule(
        db,
        account_id,
        rule_type,
        json!({ "keyword": keyword }),
        action,
        priority,
        true,
    )
    .await
}

/// Builds an unsaved contact model for pure `decide` tests.
#[must_use]
pub fn sample_contact(id: i64, priority: i32) -> entities::contact::Model {
    entities::contact::Model {
        id,
        account_id: 1,
        name: "Sample Contact".to_string(),
        phone: Some("+15550001111".to_string()),
        email: None,
        company: None,
        relationship: "client".to_string(),
        priority,
        is_blocked: false,
        notes: None,
        created_at: chrono::Utc::now(),
    }
}

/// Builds an unsaved rule model for parse/skip tests.
#[must_use]
pub fn sample_rule_model(
    id: i64,
    priority: i32,
    conditions: serde_json::Value,
    action: serde_json::Value,
) -> entities::call_rule::Model {
    entities::call_rule::Model {
        id,
        account_id: 1,
        rule_type: "custom".to_string(),
        conditions,
        action,
        priority,
        active: true,
        created_at: chrono::Utc::now(),
    }
}

/// The default-allow screening used when a test doesn't care about the decision.
#[must_use]
pub fn allow_default_screening() -> Screening {
    Screening {
        decision: Decision::Allow,
        audit: Audit::Default,
        redirect_target: None,
    }
}

/// Builds a complete interaction outcome for recorder and analytics tests.
///
/// # Defaults
/// * `channel`: web
/// * `duration_seconds`: 90
/// * `sentiment_score`: Some(0.0)
/// * empty transcript and caller info
#[must_use]
pub fn sample_outcome(
    account_id: i64,
    session_id: &str,
    status: InteractionStatus,
) -> InteractionOutcome {
    InteractionOutcome {
        session_id: session_id.to_string(),
        account_id,
        channel: Channel::Web,
        caller: CallerInfo::default(),
        transcript: Vec::new(),
        screening: allow_default_screening(),
        summary: CallSummary {
            headline: String::new(),
            message_taken: false,
            caller_turns: 0,
            total_turns: 0,
        },
        sentiment_score: Some(0.0),
        duration_seconds: 90,
        status,
        started_at: chrono::Utc::now(),
    }
}
