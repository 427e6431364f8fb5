//! Account model types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for an account.
///
/// Generated ids are decimal millisecond timestamps, but any string read
/// from storage is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account ID from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as a timestamp, if it is one.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How the account authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccountType {
    /// Directory (LDAP) account.
    #[serde(rename = "LDAP")]
    Ldap,
    /// Local account. Older data spells it "Локальная".
    #[default]
    #[serde(rename = "Local", alias = "Локальная")]
    Local,
}

impl AccountType {
    /// The literal stored in the `type` field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ldap => "LDAP",
            Self::Local => "Local",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known account type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown account type: {0}")]
pub struct ParseAccountTypeError(String);

impl FromStr for AccountType {
    type Err = ParseAccountTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LDAP" => Ok(Self::Ldap),
            "Local" | "Локальная" => Ok(Self::Local),
            other => Err(ParseAccountTypeError(other.to_string())),
        }
    }
}

/// A stored login credential set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, fixed at creation.
    pub id: AccountId,
    /// Free-text label shown to the user.
    #[serde(default)]
    pub label: String,
    /// Authentication type.
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    /// Login name.
    #[serde(default)]
    pub login: String,
    /// Password, if one is kept.
    pub password: Option<String>,
}

impl Account {
    /// Create a blank local account with the given id.
    ///
    /// Every text field is empty, including the password.
    #[must_use]
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            label: String::new(),
            account_type: AccountType::Local,
            login: String::new(),
            password: Some(String::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod account_id_tests {
        use super::*;

        #[test]
        fn display() {
            let id = AccountId::new("1718000000000");
            assert_eq!(format!("{id}"), "1718000000000");
        }

        #[test]
        fn timestamp_ids_parse() {
            assert_eq!(AccountId::new("42").as_timestamp(), Some(42));
            assert_eq!(AccountId::new("abc").as_timestamp(), None);
        }

        #[test]
        fn serializes_as_plain_string() {
            let json = serde_json::to_string(&AccountId::new("7")).unwrap();
            assert_eq!(json, r#""7""#);
        }
    }

    mod account_type_tests {
        use super::*;

        #[test]
        fn default_is_local() {
            assert_eq!(AccountType::default(), AccountType::Local);
        }

        #[test]
        fn wire_literals() {
            assert_eq!(serde_json::to_string(&AccountType::Ldap).unwrap(), r#""LDAP""#);
            assert_eq!(serde_json::to_string(&AccountType::Local).unwrap(), r#""Local""#);
        }

        #[test]
        fn legacy_literal_reads_as_local() {
            let parsed: AccountType = serde_json::from_str(r#""Локальная""#).unwrap();
            assert_eq!(parsed, AccountType::Local);
            assert_eq!("Локальная".parse::<AccountType>().unwrap(), AccountType::Local);
        }

        #[test]
        fn unknown_literal_is_rejected() {
            assert!(serde_json::from_str::<AccountType>(r#""Kerberos""#).is_err());
            assert!("ldap".parse::<AccountType>().is_err());
        }
    }

    mod account_tests {
        use super::*;

        #[test]
        fn new_creates_blank_local_account() {
            let account = Account::new(AccountId::new("1"));
            assert_eq!(account.id.as_str(), "1");
            assert!(account.label.is_empty());
            assert_eq!(account.account_type, AccountType::Local);
            assert!(account.login.is_empty());
            assert_eq!(account.password.as_deref(), Some(""));
        }

        #[test]
        fn field_names_match_storage_format() {
            let account = Account::new(AccountId::new("1"));
            let value = serde_json::to_value(&account).unwrap();
            assert_eq!(
                value,
                serde_json::json!({
                    "id": "1",
                    "label": "",
                    "type": "Local",
                    "login": "",
                    "password": ""
                })
            );
        }

        #[test]
        fn null_password_round_trips() {
            let json = r#"{"id":"9","label":"ci","type":"LDAP","login":"bot","password":null}"#;
            let account: Account = serde_json::from_str(json).unwrap();
            assert_eq!(account.password, None);
            assert_eq!(serde_json::to_string(&account).unwrap(), json);
        }

        #[test]
        fn missing_text_fields_default() {
            let account: Account = serde_json::from_str(r#"{"id":"3"}"#).unwrap();
            assert_eq!(account.label, "");
            assert_eq!(account.account_type, AccountType::Local);
            assert_eq!(account.password, None);
        }
    }
}
