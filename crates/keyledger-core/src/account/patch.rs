//! Partial account updates.

use serde::{Deserialize, Deserializer};

use super::model::{Account, AccountType};

/// A subset of account fields to overwrite.
///
/// Fields left as `None` keep their current value. `password` is doubly
/// optional: `Some(None)` clears the password, `None` leaves it alone.
/// The id is never part of a patch.
///
/// Deserializes from the same JSON shape as [`Account`]; absent fields are
/// left out of the patch and unknown fields (including `id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountPatch {
    /// New label.
    #[serde(default)]
    pub label: Option<String>,
    /// New authentication type.
    #[serde(rename = "type", default)]
    pub account_type: Option<AccountType>,
    /// New login.
    #[serde(default)]
    pub login: Option<String>,
    /// New password, or `Some(None)` to clear it.
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
}

/// Wrap whatever was present, `null` included, so it is not mistaken for absence.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl AccountPatch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the authentication type.
    #[must_use]
    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// Set the login.
    #[must_use]
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Set the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Some(password.into()));
        self
    }

    /// Clear the password.
    #[must_use]
    pub fn clear_password(mut self) -> Self {
        self.password = Some(None);
        self
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.account_type.is_none()
            && self.login.is_none()
            && self.password.is_none()
    }

    /// Shallow-merge the patch into `account`.
    pub fn apply(self, account: &mut Account) {
        if let Some(label) = self.label {
            account.label = label;
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(login) = self.login {
            account.login = login;
        }
        if let Some(password) = self.password {
            account.password = password;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::account::AccountId;

    fn sample() -> Account {
        Account {
            id: AccountId::new("100"),
            label: "Work".to_string(),
            account_type: AccountType::Ldap,
            login: "jdoe".to_string(),
            password: Some("hunter2".to_string()),
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut account = sample();
        let patch = AccountPatch::new();
        assert!(patch.is_empty());
        patch.apply(&mut account);
        assert_eq!(account, sample());
    }

    #[test]
    fn only_given_fields_change() {
        let mut account = sample();
        AccountPatch::new().login("alice").apply(&mut account);
        assert_eq!(account.login, "alice");
        assert_eq!(account.label, "Work");
        assert_eq!(account.account_type, AccountType::Ldap);
        assert_eq!(account.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn clear_password_sets_null() {
        let mut account = sample();
        AccountPatch::new().clear_password().apply(&mut account);
        assert_eq!(account.password, None);
    }

    #[test]
    fn from_json_distinguishes_null_and_absent() {
        let absent: AccountPatch = serde_json::from_str(r#"{"label":"x"}"#).unwrap();
        assert_eq!(absent.password, None);

        let null: AccountPatch = serde_json::from_str(r#"{"password":null}"#).unwrap();
        assert_eq!(null.password, Some(None));
    }

    #[test]
    fn from_json_ignores_id() {
        let patch: AccountPatch =
            serde_json::from_str(r#"{"id":"999","type":"LDAP","login":"root"}"#).unwrap();
        let mut account = Account::new(AccountId::new("1"));
        patch.apply(&mut account);
        assert_eq!(account.id.as_str(), "1");
        assert_eq!(account.account_type, AccountType::Ldap);
        assert_eq!(account.login, "root");
    }
}
