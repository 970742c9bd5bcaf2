//! Guarded form actions: lock the trigger, post once, resolve to exactly one
//! of navigation, an input fill, or an inline error with the trigger restored.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{
    domain::{element, ActionKind},
    error::ApplicationError,
    protocol::{decode_envelope, EnvelopeBody, FormPayload},
};
use tracing::{info, warn};

use crate::{
    error::{ActionError, TransportError},
    page::{Control, Page},
    transport::{Endpoint, FormTransport},
};

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// The control that started an action, with the labels it cycles through.
pub struct Trigger<'a> {
    pub control: &'a dyn Control,
    pub busy_label: &'a str,
    pub idle_label: &'a str,
}

impl Trigger<'_> {
    fn lock(&self) {
        self.control.set_enabled(false);
        self.control.set_label(self.busy_label);
    }

    fn restore(&self) {
        self.control.set_enabled(true);
        self.control.set_label(self.idle_label);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnSuccess {
    Navigate(String),
    FillInput { field: String, response_key: String },
}

pub struct GuardedAction<'a> {
    pub kind: ActionKind,
    pub endpoint: Endpoint,
    pub trigger: Option<Trigger<'a>>,
    pub payload: FormPayload,
    pub on_success: OnSuccess,
}

impl<'a> GuardedAction<'a> {
    /// Builds the action with the success behavior `kind` defines.
    pub fn for_kind(kind: ActionKind, endpoint: Endpoint, payload: FormPayload) -> Self {
        let on_success = match kind.success_path() {
            Some(path) => OnSuccess::Navigate(path.to_string()),
            None => OnSuccess::FillInput {
                field: element::TO_ADDRESS_INPUT.to_string(),
                response_key: "address".to_string(),
            },
        };
        Self {
            kind,
            endpoint,
            trigger: None,
            payload,
            on_success,
        }
    }

    /// Attaches `control` as the trigger using the labels of `self.kind`.
    /// Kinds without labels keep no trigger.
    pub fn with_trigger(mut self, control: &'a dyn Control) -> Self {
        if let (Some(busy_label), Some(idle_label)) =
            (self.kind.busy_label(), self.kind.idle_label())
        {
            self.trigger = Some(Trigger {
                control,
                busy_label,
                idle_label,
            });
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Navigated {
        path: String,
        body: EnvelopeBody,
    },
    InputFilled {
        field: String,
        value: String,
        body: EnvelopeBody,
    },
}

impl Resolution {
    pub fn body(&self) -> &EnvelopeBody {
        match self {
            Resolution::Navigated { body, .. } | Resolution::InputFilled { body, .. } => body,
        }
    }
}

pub struct FormActionController {
    transport: Arc<dyn FormTransport>,
    inflight: Mutex<HashSet<ActionKind>>,
}

struct InflightSlot<'c> {
    inflight: &'c Mutex<HashSet<ActionKind>>,
    kind: ActionKind,
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        lock_set(self.inflight).remove(&self.kind);
    }
}

fn lock_set(set: &Mutex<HashSet<ActionKind>>) -> MutexGuard<'_, HashSet<ActionKind>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FormActionController {
    pub fn new(transport: Arc<dyn FormTransport>) -> Self {
        Self {
            transport,
            inflight: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_in_flight(&self, kind: ActionKind) -> bool {
        lock_set(&self.inflight).contains(&kind)
    }

    fn claim(&self, kind: ActionKind) -> Result<InflightSlot<'_>, ActionError> {
        if !lock_set(&self.inflight).insert(kind) {
            warn!(action = %kind, "duplicate submission ignored while request is pending");
            return Err(ActionError::AlreadyInFlight(kind));
        }
        Ok(InflightSlot {
            inflight: &self.inflight,
            kind,
        })
    }

    /// Runs one guarded action to completion and reflects the outcome on `page`.
    ///
    /// Actions with a trigger are exclusive per [`ActionKind`]: a second call
    /// while one is pending returns [`ActionError::AlreadyInFlight`] with no
    /// request and no page change. On success with navigation the trigger is
    /// left busy; every failure path re-enables it.
    pub async fn submit(
        &self,
        action: GuardedAction<'_>,
        page: &dyn Page,
    ) -> Result<Resolution, ActionError> {
        let GuardedAction {
            kind,
            endpoint,
            trigger,
            payload,
            on_success,
        } = action;

        let _slot = match &trigger {
            Some(_) => Some(self.claim(kind)?),
            None => None,
        };
        if let Some(trigger) = &trigger {
            trigger.lock();
        }

        info!(action = %kind, %endpoint, fields = payload.len(), "dispatching form action");
        let outcome = match self.exchange(&endpoint, &payload).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(fail_transport(kind, trigger.as_ref(), page, err)),
        };

        let body = match outcome {
            Ok(body) => body,
            Err(rejection) => {
                info!(action = %kind, msg = %rejection.msg, "server rejected form action");
                if let Some(trigger) = &trigger {
                    trigger.restore();
                }
                page.show_error(&rejection.msg);
                return Err(ActionError::Application {
                    kind,
                    source: rejection,
                });
            }
        };

        match on_success {
            OnSuccess::Navigate(path) => {
                info!(action = %kind, %path, "form action accepted, navigating");
                page.navigate(&path);
                Ok(Resolution::Navigated { path, body })
            }
            OnSuccess::FillInput {
                field,
                response_key,
            } => {
                let value = match body.require_str(&response_key) {
                    Ok(value) => value.to_string(),
                    Err(source) => {
                        let err = TransportError::Malformed {
                            endpoint: endpoint.to_string(),
                            source,
                        };
                        return Err(fail_transport(kind, trigger.as_ref(), page, err));
                    }
                };
                info!(action = %kind, %field, "form action accepted, filling input");
                page.set_input_value(&field, &value);
                Ok(Resolution::InputFilled { field, value, body })
            }
        }
    }

    async fn exchange(
        &self,
        endpoint: &Endpoint,
        payload: &FormPayload,
    ) -> Result<Result<EnvelopeBody, ApplicationError>, TransportError> {
        let raw = self.transport.post_form(endpoint, payload).await?;
        let envelope = decode_envelope(&raw).map_err(|source| TransportError::Malformed {
            endpoint: endpoint.to_string(),
            source,
        })?;
        Ok(envelope.into_result())
    }
}

fn fail_transport(
    kind: ActionKind,
    trigger: Option<&Trigger<'_>>,
    page: &dyn Page,
    err: TransportError,
) -> ActionError {
    warn!(action = %kind, error = %err, "form action failed in transport");
    if let Some(trigger) = trigger {
        trigger.restore();
    }
    page.show_error(GENERIC_FAILURE_MESSAGE);
    ActionError::Transport(err)
}
