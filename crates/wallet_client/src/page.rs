//! Page surfaces the controller writes to, passed in explicitly by callers.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use shared::domain::ActionKind;

/// A clickable control that can be locked while its request is pending.
pub trait Control: Send + Sync {
    fn id(&self) -> &str;
    fn set_enabled(&self, enabled: bool);
    fn set_label(&self, label: &str);
}

pub trait Page: Send + Sync {
    fn navigate(&self, path: &str);
    /// Writes `msg` into the shared error region and reveals it.
    fn show_error(&self, msg: &str);
    fn set_input_value(&self, field: &str, value: &str);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSnapshot {
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug)]
pub struct ButtonState {
    id: String,
    inner: Mutex<ButtonSnapshot>,
}

impl ButtonState {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inner: Mutex::new(ButtonSnapshot {
                enabled: true,
                label: label.into(),
            }),
        }
    }

    /// The trigger button for `kind` in its idle state, if the action has one.
    pub fn for_action(kind: ActionKind) -> Option<Self> {
        Some(Self::new(kind.trigger_id()?, kind.idle_label()?))
    }

    pub fn snapshot(&self) -> ButtonSnapshot {
        lock(&self.inner).clone()
    }

    pub fn is_enabled(&self) -> bool {
        lock(&self.inner).enabled
    }

    pub fn label(&self) -> String {
        lock(&self.inner).label.clone()
    }
}

impl Control for ButtonState {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_enabled(&self, enabled: bool) {
        lock(&self.inner).enabled = enabled;
    }

    fn set_label(&self, label: &str) {
        lock(&self.inner).label = label.to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub navigations: Vec<String>,
    pub error_text: String,
    pub error_hidden: bool,
    pub inputs: BTreeMap<String, String>,
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self {
            navigations: Vec::new(),
            error_text: String::new(),
            error_hidden: true,
            inputs: BTreeMap::new(),
        }
    }
}

/// In-memory page that keeps every effect for later inspection.
#[derive(Debug, Default)]
pub struct RecordingPage {
    inner: Mutex<PageSnapshot>,
}

impl RecordingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        lock(&self.inner).clone()
    }

    pub fn input(&self, field: &str) -> Option<String> {
        lock(&self.inner).inputs.get(field).cloned()
    }

    pub fn last_navigation(&self) -> Option<String> {
        lock(&self.inner).navigations.last().cloned()
    }
}

impl Page for RecordingPage {
    fn navigate(&self, path: &str) {
        lock(&self.inner).navigations.push(path.to_string());
    }

    fn show_error(&self, msg: &str) {
        let mut page = lock(&self.inner);
        page.error_text = msg.to_string();
        page.error_hidden = false;
    }

    fn set_input_value(&self, field: &str, value: &str) {
        lock(&self.inner)
            .inputs
            .insert(field.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_lookup_has_no_trigger_button() {
        assert!(ButtonState::for_action(ActionKind::ResolveAddress).is_none());
        let button = ButtonState::for_action(ActionKind::AddParent).expect("button");
        assert_eq!(button.id(), "add-parent-btn");
        assert_eq!(button.label(), "Add Parent");
        assert!(button.is_enabled());
    }

    #[test]
    fn error_region_starts_hidden() {
        let page = RecordingPage::new();
        assert!(page.snapshot().error_hidden);
        page.show_error("nope");
        let snapshot = page.snapshot();
        assert!(!snapshot.error_hidden);
        assert_eq!(snapshot.error_text, "nope");
    }
}
