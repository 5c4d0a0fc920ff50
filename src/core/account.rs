//! Account business logic.
//!
//! Accounts own everything else in the system. Deleting one removes all of
//! its contacts, rules, settings, interactions, and messages in a single
//! database transaction - the cascade is a contract enforced here, not an
//! accident of foreign keys.

use crate::{
    entities::{
        Account, CallRule, Contact, Interaction, Message, PhoneSettings, account, call_rule,
        contact, interaction, message, phone_settings,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Creates a new account, validating that name and email are present.
pub async fn create_account(
    db: &DatabaseConnection,
    name: String,
    email: String,
) -> Result<account::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Account name cannot be empty".to_string(),
        });
    }
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(Error::Config {
            message: "Account email cannot be empty".to_string(),
        });
    }

    let model = account::ActiveModel {
        name: Set(name.trim().to_string()),
        email: Set(email),
        phone: Set(None),
        company: Set(None),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds an account by its unique ID.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active accounts, ordered by id.
pub async fn list_active_accounts(db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::IsActive.eq(true))
        .order_by_asc(account::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active account by email.
pub async fn get_account_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<account::Model>> {
    Account::find()
        .filter(account::Column::Email.eq(email.trim().to_lowercase()))
        .filter(account::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes an account and everything it owns, atomically.
///
/// All owned rows go in the same transaction as the account itself, so a
/// failure partway leaves the database untouched.
pub async fn delete_account(db: &DatabaseConnection, account_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let account = Account::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    Message::delete_many()
        .filter(message::Column::AccountId.eq(account_id))
        .exec(&txn)
        .await?;
    Interaction::delete_many()
        .filter(interaction::Column::AccountId.eq(account_id))
        .exec(&txn)
        .await?;
    CallRule::delete_many()
        .filter(call_rule::Column::AccountId.eq(account_id))
        .exec(&txn)
        .await?;
    Contact::delete_many()
        .filter(contact::Column::AccountId.eq(account_id))
        .exec(&txn)
        .await?;
    PhoneSettings::delete_many()
        .filter(phone_settings::Column::AccountId.eq(account_id))
        .exec(&txn)
        .await?;

    let account_model: account::ActiveModel = account.into();
    account_model.delete(&txn).await?;

    txn.commit().await?;
    info!(account_id, "account and all owned data deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{message as message_core, recorder, rule as rule_core, settings};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_account_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_account(&db, String::new(), "a@example.com".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_account(&db, "Dana".to_string(), "   ".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive_on_write() -> Result<()> {
        let db = setup_test_db().await?;
        create_account(&db, "Dana".to_string(), "Dana@Example.COM".to_string()).await?;

        let found = get_account_by_email(&db, "dana@example.com").await?;
        assert!(found.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_account_cascades() -> Result<()> {
        let db = setup_test_db().await?;
        let account = create_test_account(&db, "owner@example.com").await?;
        let bystander = create_test_account(&db, "bystander@example.com").await?;

        // Populate every owned table for both accounts.
        for owner in [account.id, bystander.id] {
            create_test_contact(&db, owner, "Dana", &format!("+1555000{owner}")).await?;
            create_custom_rule(&db, owner, "blacklist", 1, "warranty").await?;
            settings::upsert_phone_settings(&db, owner, settings::PhoneSettingsUpdate::default())
                .await?;
            recorder::finalize_interaction(
                &db,
                sample_outcome(
                    owner,
                    &format!("session-{owner}"),
                    recorder::InteractionStatus::Completed,
                ),
            )
            .await?;
            message_core::create_message(
                &db,
                owner,
                None,
                None,
                None,
                "call back".to_string(),
                "normal",
            )
            .await?;
        }

        delete_account(&db, account.id).await?;

        assert!(get_account_by_id(&db, account.id).await?.is_none());
        assert!(
            crate::core::contact::get_contacts_for_account(&db, account.id)
                .await?
                .is_empty()
        );
        assert!(rule_core::list_rules(&db, account.id).await?.is_empty());
        assert!(settings::get_phone_settings(&db, account.id).await?.is_none());
        assert!(
            recorder::get_interactions_for_account(&db, account.id, None)
                .await?
                .is_empty()
        );
        assert!(
            message_core::get_messages_for_account(&db, account.id, false)
                .await?
                .is_empty()
        );

        // The bystander account is untouched.
        assert!(get_account_by_id(&db, bystander.id).await?.is_some());
        assert_eq!(rule_core::list_rules(&db, bystander.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_account() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_account(&db, 404).await;
        assert!(matches!(result.unwrap_err(), Error::AccountNotFound { id: 404 }));
        Ok(())
    }
}
