use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(AccountId);

/// A bank account record as the backend stores it. The id is always
/// backend-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub account_holder_name: String,
    pub account_number: String,
    pub balance: f64,
}

impl Account {
    pub fn draft(&self) -> AccountDraft {
        AccountDraft {
            account_holder_name: self.account_holder_name.clone(),
            account_number: self.account_number.clone(),
            balance: self.balance,
        }
    }
}

/// Account fields without an id, as sent on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDraft {
    pub account_holder_name: String,
    pub account_number: String,
    pub balance: f64,
}

impl AccountDraft {
    pub fn new(
        account_holder_name: impl Into<String>,
        account_number: impl Into<String>,
        balance: f64,
    ) -> Self {
        Self {
            account_holder_name: account_holder_name.into(),
            account_number: account_number.into(),
            balance,
        }
    }

    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            account_holder_name: self.account_holder_name,
            account_number: self.account_number,
            balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_uses_camel_case_wire_names() {
        let account = AccountDraft::new("John Doe", "1234567890", 1000.0).with_id(AccountId(4));
        let value = serde_json::to_value(&account).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "id": 4,
                "accountHolderName": "John Doe",
                "accountNumber": "1234567890",
                "balance": 1000.0
            })
        );
    }

    #[test]
    fn draft_omits_id_and_accepts_integer_balance() {
        let draft: AccountDraft = serde_json::from_str(
            r#"{"accountHolderName":"Jane","accountNumber":"9876543210","balance":2500}"#,
        )
        .expect("deserialize");
        assert_eq!(draft.balance, 2500.0);
        assert!(serde_json::to_value(&draft)
            .expect("serialize")
            .get("id")
            .is_none());
    }
}
