//! Call-rule business logic - rule CRUD and predicate matching.
//!
//! Rule conditions and actions live in JSON columns and are modeled here as
//! tagged variants rather than open-ended dynamic structures. Writes validate
//! the blobs before persistence; reads fail closed, so a malformed stored rule
//! is skipped during screening instead of crashing or matching by accident.

use crate::{
    core::screening::CallerContext,
    entities::{CallRule, call_rule},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Rule category stored in the `rule_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    /// Callers matching the condition are blocked
    Blacklist,
    /// Callers matching the condition are let through
    Whitelist,
    /// Callers matching the condition are redirected
    Redirect,
    /// Callers matching the condition go straight to voicemail
    Voicemail,
    /// Owner-defined rule; the action payload decides the outcome
    Custom,
}

impl RuleType {
    /// The storage representation of this rule type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blacklist => "blacklist",
            Self::Whitelist => "whitelist",
            Self::Redirect => "redirect",
            Self::Voicemail => "voicemail",
            Self::Custom => "custom",
        }
    }

    /// Parses a stored rule type, rejecting unknown values.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "blacklist" => Ok(Self::Blacklist),
            "whitelist" => Ok(Self::Whitelist),
            "redirect" => Ok(Self::Redirect),
            "voicemail" => Ok(Self::Voicemail),
            "custom" => Ok(Self::Custom),
            other => Err(Error::UnknownVariant {
                field: "rule_type",
                value: other.to_string(),
            }),
        }
    }
}

/// Condition predicate of a call rule.
///
/// The variants are distinguished by their field names, matching the stored
/// JSON shapes: `{"keyword": ..}`, `{"number": ..}`, `{"prefix": ..}` and
/// `{"numbers": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleCondition {
    /// Case-insensitive containment against the caller's message text or
    /// declared name
    Keyword {
        /// The keyword to look for
        keyword: String,
    },
    /// Exact match on the caller's number
    Number {
        /// The full number to compare against
        number: String,
    },
    /// Prefix match on the caller's number
    NumberPrefix {
        /// The number prefix, e.g. a country or area code
        prefix: String,
    },
    /// Membership test against a set of caller numbers
    NumberSet {
        /// The numbers in the set
        numbers: Vec<String>,
    },
}

/// Action payload of a call rule, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Reject the interaction
    Block,
    /// Redirect the interaction to another destination
    Redirect {
        /// Where to send the caller, e.g. a forwarding number
        target: String,
    },
    /// Send the caller to voicemail
    Voicemail,
    /// Let the interaction through unchanged
    Allow,
}

/// Evaluates one condition predicate against an interaction's caller context.
///
/// Pure and side-effect-free: keyword conditions test case-insensitive
/// containment against the message text and the declared caller name, number
/// conditions compare the caller's phone exactly, by prefix, or against a set.
/// A context without the relevant field never matches.
#[must_use]
pub fn condition_matches(condition: &RuleCondition, ctx: &CallerContext) -> bool {
    match condition {
        RuleCondition::Keyword { keyword } => {
            let needle = keyword.to_lowercase();
            if needle.is_empty() {
                return false;
            }
            let message_hit = ctx
                .message
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle));
            let name_hit = ctx
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            message_hit || name_hit
        }
        RuleCondition::Number { number } => {
            ctx.phone.as_deref().is_some_and(|phone| phone == number)
        }
        RuleCondition::NumberPrefix { prefix } => {
            !prefix.is_empty()
                && ctx
                    .phone
                    .as_deref()
                    .is_some_and(|phone| phone.starts_with(prefix.as_str()))
        }
        RuleCondition::NumberSet { numbers } => ctx
            .phone
            .as_deref()
            .is_some_and(|phone| numbers.iter().any(|number| number == phone)),
    }
}

/// Parses a stored condition blob, returning None for unknown shapes.
#[must_use]
pub fn parse_condition(raw: &serde_json::Value) -> Option<RuleCondition> {
    serde_json::from_value(raw.clone()).ok()
}

/// Parses a stored action blob, returning None for unknown shapes.
#[must_use]
pub fn parse_action(raw: &serde_json::Value) -> Option<RuleAction> {
    serde_json::from_value(raw.clone()).ok()
}

/// Creates a new call rule, validating the rule type and both JSON payloads
/// at the write boundary.
///
/// Unknown rule types and condition/action blobs that do not parse into a
/// known variant are rejected; screening never has to guess what a rule the
/// owner just saved means.
pub async fn create_rule(
    db: &DatabaseConnection,
    account_id: i64,
    rule_type: &str,
    conditions: serde_json::Value,
    action: serde_json::Value,
    priority: i32,
    active: bool,
) -> Result<call_rule::Model> {
    let parsed_type = RuleType::parse(rule_type)?;

    if parse_condition(&conditions).is_none() {
        return Err(Error::Config {
            message: format!("Unrecognized rule condition: {conditions}"),
        });
    }
    if parse_action(&action).is_none() {
        return Err(Error::Config {
            message: format!("Unrecognized rule action: {action}"),
        });
    }

    let rule = call_rule::ActiveModel {
        account_id: Set(account_id),
        rule_type: Set(parsed_type.as_str().to_string()),
        conditions: Set(conditions),
        action: Set(action),
        priority: Set(priority),
        active: Set(active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = rule.insert(db).await?;
    Ok(result)
}

/// Retrieves the active rules for an account in evaluation order:
/// priority ascending, ties broken by id ascending.
pub async fn list_active_rules(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<call_rule::Model>> {
    CallRule::find()
        .filter(call_rule::Column::AccountId.eq(account_id))
        .filter(call_rule::Column::Active.eq(true))
        .order_by_asc(call_rule::Column::Priority)
        .order_by_asc(call_rule::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every rule for an account, active or not, in evaluation order.
pub async fn list_rules(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<call_rule::Model>> {
    CallRule::find()
        .filter(call_rule::Column::AccountId.eq(account_id))
        .order_by_asc(call_rule::Column::Priority)
        .order_by_asc(call_rule::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Soft-disables a rule by clearing its active flag, keeping the row for
/// later re-enablement or audit.
pub async fn set_rule_active(
    db: &DatabaseConnection,
    rule_id: i64,
    active: bool,
) -> Result<call_rule::Model> {
    let rule = CallRule::find_by_id(rule_id)
        .one(db)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    let mut model: call_rule::ActiveModel = rule.into();
    model.active = Set(active);
    model.update(db).await.map_err(Into::into)
}

/// Permanently removes a rule. Prefer `set_rule_active(db, id, false)` when
/// in doubt.
pub async fn delete_rule(db: &DatabaseConnection, rule_id: i64) -> Result<()> {
    let result = CallRule::delete_by_id(rule_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RuleNotFound { id: rule_id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::screening::Channel;
    use crate::test_utils::*;
    use serde_json::json;

    fn ctx(phone: Option<&str>, name: Option<&str>, message: Option<&str>) -> CallerContext {
        CallerContext {
            phone: phone.map(str::to_string),
            email: None,
            name: name.map(str::to_string),
            message: message.map(str::to_string),
            timestamp: chrono::Utc::now(),
            channel: Channel::Phone,
        }
    }

    #[test]
    fn test_keyword_matches_message_case_insensitive() {
        let condition = RuleCondition::Keyword {
            keyword: "warranty".to_string(),
        };
        assert!(condition_matches(
            &condition,
            &ctx(None, None, Some("WARRANTY extension offer"))
        ));
        assert!(!condition_matches(
            &condition,
            &ctx(None, None, Some("calling about the invoice"))
        ));
    }

    #[test]
    fn test_keyword_matches_caller_name() {
        let condition = RuleCondition::Keyword {
            keyword: "acme".to_string(),
        };
        assert!(condition_matches(
            &condition,
            &ctx(None, Some("Acme Sales"), None)
        ));
    }

    #[test]
    fn test_keyword_without_text_never_matches() {
        let condition = RuleCondition::Keyword {
            keyword: "warranty".to_string(),
        };
        assert!(!condition_matches(&condition, &ctx(Some("+15550001"), None, None)));
    }

    #[test]
    fn test_number_exact_match() {
        let condition = RuleCondition::Number {
            number: "+15550001111".to_string(),
        };
        assert!(condition_matches(
            &condition,
            &ctx(Some("+15550001111"), None, None)
        ));
        assert!(!condition_matches(
            &condition,
            &ctx(Some("+15550001112"), None, None)
        ));
    }

    #[test]
    fn test_number_prefix_match() {
        let condition = RuleCondition::NumberPrefix {
            prefix: "+1555".to_string(),
        };
        assert!(condition_matches(
            &condition,
            &ctx(Some("+15550001111"), None, None)
        ));
        assert!(!condition_matches(
            &condition,
            &ctx(Some("+4915550001111"), None, None)
        ));
    }

    #[test]
    fn test_number_set_membership() {
        let condition = RuleCondition::NumberSet {
            numbers: vec!["+15550001111".to_string(), "+15550002222".to_string()],
        };
        assert!(condition_matches(
            &condition,
            &ctx(Some("+15550002222"), None, None)
        ));
        assert!(!condition_matches(
            &condition,
            &ctx(Some("+15550003333"), None, None)
        ));
    }

    #[test]
    fn test_parse_condition_known_shapes() {
        assert_eq!(
            parse_condition(&json!({"keyword": "warranty"})),
            Some(RuleCondition::Keyword {
                keyword: "warranty".to_string()
            })
        );
        assert_eq!(
            parse_condition(&json!({"prefix": "+1555"})),
            Some(RuleCondition::NumberPrefix {
                prefix: "+1555".to_string()
            })
        );
    }

    #[test]
    fn test_parse_condition_fails_closed_on_unknown_shape() {
        assert_eq!(parse_condition(&json!({"regex": ".*"})), None);
        assert_eq!(parse_condition(&json!("warranty")), None);
    }

    #[test]
    fn test_parse_action_tagged_variants() {
        assert_eq!(parse_action(&json!({"type": "block"})), Some(RuleAction::Block));
        assert_eq!(
            parse_action(&json!({"type": "redirect", "target": "+15550009999"})),
            Some(RuleAction::Redirect {
                target: "+15550009999".to_string()
            })
        );
        assert_eq!(parse_action(&json!({"type": "page_owner"})), None);
    }

    #[tokio::test]
    async fn test_create_rule_rejects_unknown_type() -> Result<()> {
        let (db, account) = setup_with_account().await?;

        let result = create_rule(
            &db,
            account.id,
            "greylist",
            json!({"keyword": "warranty"}),
            json!({"type": "block"}),
            1,
            true,
        )
        .await;

        assert!(matches!(
            result.unwrap_err(),
            Error::UnknownVariant { field: "rule_type", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rule_rejects_malformed_condition() -> Result<()> {
        let (db, account) = setup_with_account().await?;

        let result = create_rule(
            &db,
            account.id,
            "blacklist",
            json!({"regex": ".*"}),
            json!({"type": "block"}),
            1,
            true,
        )
        .await;

        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_active_rules_ordering() -> Result<()> {
        let (db, account) = setup_with_account().await?;

        // Same priority: id breaks the tie. Lower priority number comes first.
        let second = create_custom_rule(&db, account.id, "voicemail", 5, "invoice").await?;
        let third = create_custom_rule(&db, account.id, "voicemail", 5, "billing").await?;
        let first = create_custom_rule(&db, account.id, "blacklist", 1, "warranty").await?;

        let rules = list_active_rules(&db, account.id).await?;
        let ids: Vec<i64> = rules.iter().map(|rule| rule.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_disable_excludes_from_active_list() -> Result<()> {
        let (db, account) = setup_with_account().await?;

        let rule = create_custom_rule(&db, account.id, "blacklist", 1, "warranty").await?;
        set_rule_active(&db, rule.id, false).await?;

        assert!(list_active_rules(&db, account.id).await?.is_empty());
        assert_eq!(list_rules(&db, account.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_rule_missing_id() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_rule(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::RuleNotFound { id: 999 }));
        Ok(())
    }
}
