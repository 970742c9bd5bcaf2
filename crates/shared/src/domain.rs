use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseTokenError;

/// Element identifiers the wallet page templates expose.
pub mod element {
    pub const TRANSACT_BUTTON: &str = "transact-btn";
    pub const ADD_CHILD_BUTTON: &str = "add-child-btn";
    pub const ADD_PARENT_BUTTON: &str = "add-parent-btn";
    pub const TO_ADDRESS_INPUT: &str = "to_address";
    pub const ERROR_REGION: &str = "errorMsg";
}

pub const WALLET_PATH: &str = "/wallet";
pub const MANAGE_ACCOUNT_PATH: &str = "/manage-account";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const CREATE_ACCOUNT_PATH: &str = "/create";

macro_rules! text_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

// Either a parent's email or a child's name; the server branches on '@'.
text_newtype!(RecipientId);
text_newtype!(WalletAddress);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Transfer,
    AddChild,
    AddParent,
    ResolveAddress,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Transfer,
        ActionKind::AddChild,
        ActionKind::AddParent,
        ActionKind::ResolveAddress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Transfer => "transfer",
            ActionKind::AddChild => "add_child",
            ActionKind::AddParent => "add_parent",
            ActionKind::ResolveAddress => "resolve_address",
        }
    }

    /// Control that is locked while the request is pending.
    pub fn trigger_id(self) -> Option<&'static str> {
        match self {
            ActionKind::Transfer => Some(element::TRANSACT_BUTTON),
            ActionKind::AddChild => Some(element::ADD_CHILD_BUTTON),
            ActionKind::AddParent => Some(element::ADD_PARENT_BUTTON),
            ActionKind::ResolveAddress => None,
        }
    }

    pub fn busy_label(self) -> Option<&'static str> {
        match self {
            ActionKind::Transfer => Some("Processing..."),
            ActionKind::AddChild | ActionKind::AddParent => Some("Adding..."),
            ActionKind::ResolveAddress => None,
        }
    }

    pub fn idle_label(self) -> Option<&'static str> {
        match self {
            ActionKind::Transfer => Some("Transfer"),
            ActionKind::AddChild => Some("Add Child"),
            ActionKind::AddParent => Some("Add Parent"),
            ActionKind::ResolveAddress => None,
        }
    }

    /// Where the page goes once the server accepts the action.
    pub fn success_path(self) -> Option<&'static str> {
        match self {
            ActionKind::Transfer => Some(WALLET_PATH),
            ActionKind::AddChild | ActionKind::AddParent => Some(MANAGE_ACCOUNT_PATH),
            ActionKind::ResolveAddress => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransferToken {
    #[default]
    #[serde(rename = "STP")]
    Stp,
    #[serde(rename = "BNB")]
    Bnb,
}

impl TransferToken {
    pub fn as_path_segment(self) -> &'static str {
        match self {
            TransferToken::Stp => "STP",
            TransferToken::Bnb => "BNB",
        }
    }
}

impl fmt::Display for TransferToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path_segment())
    }
}

impl FromStr for TransferToken {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STP" | "STAKEUP" => Ok(TransferToken::Stp),
            "BNB" => Ok(TransferToken::Bnb),
            _ => Err(ParseTokenError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_actions_carry_both_labels() {
        for kind in ActionKind::ALL {
            let guarded = kind.trigger_id().is_some();
            assert_eq!(kind.busy_label().is_some(), guarded, "{kind}");
            assert_eq!(kind.idle_label().is_some(), guarded, "{kind}");
            assert_eq!(kind.success_path().is_some(), guarded, "{kind}");
        }
    }

    #[test]
    fn add_actions_return_to_manage_account() {
        assert_eq!(ActionKind::Transfer.success_path(), Some("/wallet"));
        assert_eq!(ActionKind::AddChild.success_path(), Some("/manage-account"));
        assert_eq!(ActionKind::AddParent.success_path(), Some("/manage-account"));
    }

    #[test]
    fn parses_tokens_case_insensitively() {
        assert_eq!("stp".parse::<TransferToken>().unwrap(), TransferToken::Stp);
        assert_eq!(" BNB ".parse::<TransferToken>().unwrap(), TransferToken::Bnb);
        assert!("doge".parse::<TransferToken>().is_err());
        assert_eq!(TransferToken::default().as_path_segment(), "STP");
    }
}
