//! Terminal rendering of page effects.

use shared::domain::element;
use wallet_client::{Page, PageSnapshot, RecordingPage};

/// Prints each page effect as it happens and keeps the record for the exit summary.
#[derive(Default)]
pub struct ConsolePage {
    record: RecordingPage,
}

impl ConsolePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.record.snapshot()
    }
}

impl Page for ConsolePage {
    fn navigate(&self, path: &str) {
        println!("-> {path}");
        self.record.navigate(path);
    }

    fn show_error(&self, msg: &str) {
        eprintln!("[{}] {msg}", element::ERROR_REGION);
        self.record.show_error(msg);
    }

    fn set_input_value(&self, field: &str, value: &str) {
        println!("{field} = {value}");
        self.record.set_input_value(field, value);
    }
}
