use shared::{
    domain::{CREATE_ACCOUNT_PATH, LOGIN_PATH, LOGOUT_PATH, WALLET_PATH},
    protocol::{FormPayload, NewAccountForm},
};
use tracing::{info, warn};

use crate::{
    error::{SessionError, TransportError},
    transport::{Endpoint, HttpTransport},
};

/// Parents sign in with their email, children with the name a parent gave them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Parent { email: String, password: String },
    Child { name: String, password: String },
}

impl Credentials {
    pub fn principal(&self) -> &str {
        match self {
            Credentials::Parent { email, .. } => email,
            Credentials::Child { name, .. } => name,
        }
    }

    /// Field set of the login page, including the hidden field left empty.
    fn form_fields(&self) -> [(&'static str, &str); 3] {
        match self {
            Credentials::Parent { email, password } => {
                [("email", email.as_str()), ("password", password.as_str()), ("name", "")]
            }
            Credentials::Child { name, password } => {
                [("email", ""), ("password", password.as_str()), ("name", name.as_str())]
            }
        }
    }
}

impl HttpTransport {
    /// Signs in and keeps the session cookie for later form actions.
    ///
    /// The server redirects to the wallet page on success and re-renders the
    /// login page otherwise, so the final url decides the outcome.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let endpoint = Endpoint::new(LOGIN_PATH);
        let res = self
            .http()
            .post(self.resolve(&endpoint))
            .form(&credentials.form_fields())
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let res = Self::check_status(&endpoint, res)?;
        if res.url().path().trim_end_matches('/').ends_with(WALLET_PATH) {
            info!(principal = credentials.principal(), "signed in");
            Ok(())
        } else {
            warn!(principal = credentials.principal(), landed = res.url().path(), "login rejected");
            Err(SessionError::Rejected(credentials.principal().to_string()))
        }
    }

    /// Registers a parent account. The server redirects to the login page once
    /// the account exists and renders the sign-up page again otherwise.
    pub async fn create_account(&self, form: &NewAccountForm) -> Result<(), SessionError> {
        let endpoint = Endpoint::new(CREATE_ACCOUNT_PATH);
        let res = self
            .http()
            .post(self.resolve(&endpoint))
            .form(&FormPayload::from(form))
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let res = Self::check_status(&endpoint, res)?;
        if res.url().path().trim_end_matches('/').ends_with(LOGIN_PATH) {
            info!(email = %form.email, "account created");
            Ok(())
        } else {
            warn!(email = %form.email, landed = res.url().path(), "account creation rejected");
            Err(SessionError::AccountRejected(form.email.clone()))
        }
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        let endpoint = Endpoint::new(LOGOUT_PATH);
        let res = self
            .http()
            .get(self.resolve(&endpoint))
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Self::check_status(&endpoint, res)?;
        info!("signed out");
        Ok(())
    }
}
