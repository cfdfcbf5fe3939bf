//! Terminal rendering port used by the command-line tool.

use crate::actions::{ItemType, ACTION_DENIED};
use crate::notify::{Toast, ToastId};
use crate::render::{Affordance, ElementState, RenderPort};
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prints to stdout/stderr and prompts on stdin. There are no gated elements in
/// a terminal, so capability toggling is a no-op.
#[derive(Debug, Default)]
pub struct ConsolePort {
    auto_yes: bool,
    next_toast: AtomicU64,
}

impl ConsolePort {
    pub fn new(auto_yes: bool) -> Self {
        Self {
            auto_yes,
            next_toast: AtomicU64::new(0),
        }
    }
}

fn removed_line(item: ItemType, item_id: &str) -> String {
    format!("تم حذف {} رقم: {}", item.display_name(), item_id)
}

impl RenderPort for ConsolePort {
    fn elements(&self, affordance: Affordance) -> Vec<String> {
        tracing::trace!(selectors = ?affordance.selectors(), "terminal has no gated elements");
        Vec::new()
    }

    fn set_element_state(&self, element: &str, state: ElementState) {
        tracing::debug!(element, display = state.display.as_css(), "element state");
    }

    fn show_toast(&self, toast: &Toast) -> ToastId {
        let id = ToastId(self.next_toast.fetch_add(1, Ordering::Relaxed) + 1);
        println!("[{}] {}", toast.kind.as_str(), toast.message);
        id
    }

    fn fade_toast(&self, _id: ToastId) {}

    fn remove_toast(&self, _id: ToastId) {}

    fn confirm(&self, message: &str) -> bool {
        if self.auto_yes {
            return true;
        }

        println!("{}", message);
        print!("Confirm? [y/N]: ");
        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_ok() {
            let input = input.trim().to_lowercase();
            input == "y" || input == "yes" || input == "نعم"
        } else {
            false
        }
    }

    fn permission_error(&self, message: &str) {
        let message = if message.is_empty() {
            ACTION_DENIED
        } else {
            message
        };
        eprintln!("{}", message);
    }

    fn open_edit_form(&self, item: ItemType, item_id: &str) {
        println!("تعديل {}", item.display_name());
        println!("نافذة تعديل {} رقم: {}", item.display_name(), item_id);
    }

    fn remove_row(&self, item: ItemType, item_id: &str) -> bool {
        println!("{}", removed_line(item, item_id));
        true
    }
}
