use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::WalletAddress,
    error::{ApplicationError, EnvelopeError, FALLBACK_APPLICATION_MESSAGE},
};

/// Ordered form fields, sent as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPayload(Vec<(String, String)>);

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferForm {
    pub to_address: WalletAddress,
    pub amount: u64,
    pub password: String,
}

impl From<&TransferForm> for FormPayload {
    fn from(form: &TransferForm) -> Self {
        FormPayload::new()
            .field("to_address", form.to_address.0.as_str())
            .field("amount", form.amount.to_string())
            .field("password", form.password.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildAccountForm {
    pub name: String,
    pub password: String,
}

impl From<&ChildAccountForm> for FormPayload {
    fn from(form: &ChildAccountForm) -> Self {
        FormPayload::new()
            .field("child-name", form.name.as_str())
            .field("child-password", form.password.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentAccountForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<&ParentAccountForm> for FormPayload {
    fn from(form: &ParentAccountForm) -> Self {
        FormPayload::new()
            .field("parent-name", form.name.as_str())
            .field("parent-email", form.email.as_str())
            .field("parent-password", form.password.as_str())
    }
}

/// Sign-up form for a new parent account. Without a private key the server
/// generates a fresh wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccountForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub private_key: Option<String>,
}

impl From<&NewAccountForm> for FormPayload {
    fn from(form: &NewAccountForm) -> Self {
        FormPayload::new()
            .field("email", form.email.as_str())
            .field("password", form.password.as_str())
            .field("name", form.name.as_str())
            .field("private_key", form.private_key.as_deref().unwrap_or_default())
    }
}

/// Raw `{error, msg, ...}` shape every form endpoint answers with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    pub fn into_result(self) -> Result<EnvelopeBody, ApplicationError> {
        if self.error {
            return Err(ApplicationError {
                msg: self
                    .msg
                    .unwrap_or_else(|| FALLBACK_APPLICATION_MESSAGE.to_string()),
                title: self.title,
            });
        }
        Ok(EnvelopeBody {
            fields: self.fields,
        })
    }
}

/// Endpoint-specific fields of a successful response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvelopeBody {
    pub fields: Map<String, Value>,
}

impl EnvelopeBody {
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn require_str(&self, key: &str) -> Result<&str, EnvelopeError> {
        self.str_field(key)
            .ok_or_else(|| EnvelopeError::MissingField(key.to_string()))
    }

    pub fn address(&self) -> Result<WalletAddress, EnvelopeError> {
        self.require_str("address")
            .map(|address| WalletAddress(address.to_string()))
    }

    pub fn receipt(&self) -> TransferReceipt {
        TransferReceipt {
            transaction: self.str_field("transaction").map(str::to_string),
            tx_status: self.fields.get("tx_status").and_then(Value::as_u64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub transaction: Option<String>,
    pub tx_status: Option<u64>,
}

/// Decodes a response body into an [`Envelope`].
///
/// The server writes `json.dumps(...)` output with a text content type, so the
/// body is parsed regardless of headers. A body that decodes to a JSON string
/// is treated as double-encoded and decoded once more; anything else that is
/// not an object is malformed.
pub fn decode_envelope(body: &str) -> Result<Envelope, EnvelopeError> {
    let value: Value = serde_json::from_str(body.trim())?;
    let value = match value {
        Value::String(inner) => serde_json::from_str(inner.trim())?,
        other => other,
    };
    if !value.is_object() {
        return Err(EnvelopeError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_body_is_success() {
        let envelope = decode_envelope(r#"{"status": "OK"}"#).expect("decode");
        let body = envelope.into_result().expect("success");
        assert_eq!(body.str_field("status"), Some("OK"));
    }

    #[test]
    fn error_body_carries_message_and_title() {
        let envelope = decode_envelope(
            r#"{"error": true, "title": "error", "msg": "Incorrect Password"}"#,
        )
        .expect("decode");
        let err = envelope.into_result().expect_err("application error");
        assert_eq!(err.msg, "Incorrect Password");
        assert_eq!(err.title.as_deref(), Some("error"));
    }

    #[test]
    fn error_without_message_falls_back() {
        let err = decode_envelope(r#"{"error": true}"#)
            .expect("decode")
            .into_result()
            .expect_err("application error");
        assert_eq!(err.msg, FALLBACK_APPLICATION_MESSAGE);
    }

    #[test]
    fn double_encoded_body_is_unwrapped_once() {
        let inner = r#"{"status": "OK", "address": "0xABC"}"#;
        let outer = serde_json::to_string(inner).expect("encode");
        let body = decode_envelope(&outer)
            .expect("decode")
            .into_result()
            .expect("success");
        assert_eq!(body.address().expect("address").0, "0xABC");
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        assert!(matches!(
            decode_envelope("[1, 2]"),
            Err(EnvelopeError::NotAnObject)
        ));
        assert!(matches!(
            decode_envelope("<html>login</html>"),
            Err(EnvelopeError::InvalidJson(_))
        ));
        assert!(matches!(
            decode_envelope(r#""not json inside""#),
            Err(EnvelopeError::InvalidJson(_))
        ));
    }

    #[test]
    fn missing_address_is_reported_by_name() {
        let body = decode_envelope(r#"{"status": "OK"}"#)
            .expect("decode")
            .into_result()
            .expect("success");
        match body.address() {
            Err(EnvelopeError::MissingField(field)) => assert_eq!(field, "address"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn transfer_receipt_reads_transaction_fields() {
        let body = decode_envelope(r#"{"status": "OK", "transaction": "0xfeed", "tx_status": 2}"#)
            .expect("decode")
            .into_result()
            .expect("success");
        assert_eq!(
            body.receipt(),
            TransferReceipt {
                transaction: Some("0xfeed".to_string()),
                tx_status: Some(2),
            }
        );
    }

    #[test]
    fn typed_forms_use_page_field_names() {
        let payload = FormPayload::from(&ParentAccountForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "hunter22".into(),
        });
        let names: Vec<&str> = payload.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["parent-name", "parent-email", "parent-password"]);

        let payload = FormPayload::from(&TransferForm {
            to_address: "0x1".into(),
            amount: 25,
            password: "secret1".into(),
        });
        assert_eq!(payload.get("amount"), Some("25"));
        assert_eq!(payload.get("to_address"), Some("0x1"));
    }

    #[test]
    fn new_account_form_sends_empty_key_when_generating_wallet() {
        let payload = FormPayload::from(&NewAccountForm {
            email: "sam@example.com".into(),
            password: "hunter22".into(),
            name: "Sam".into(),
            private_key: None,
        });
        let names: Vec<&str> = payload.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["email", "password", "name", "private_key"]);
        assert_eq!(payload.get("private_key"), Some(""));
    }
}
