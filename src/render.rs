//! Rendering port and the capability gate that drives it.
//!
//! The core never touches a page directly. Everything visible goes through a
//! [`RenderPort`]: toggling gated controls, toasts, confirmation prompts, edit
//! forms and row removal.

use crate::actions::ItemType;
use crate::notify::{Toast, ToastId};
use crate::permissions::Capabilities;

/// A class of gated UI controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    /// Edit buttons
    Edit,
    /// Delete buttons
    Delete,
    /// Admin-only buttons
    AdminOnly,
    /// Admin-only page sections
    AdminSection,
}

impl Affordance {
    pub const ALL: [Affordance; 4] = [
        Affordance::Edit,
        Affordance::Delete,
        Affordance::AdminOnly,
        Affordance::AdminSection,
    ];

    /// CSS selectors the console tags these controls with
    pub fn selectors(&self) -> &'static [&'static str] {
        match self {
            Affordance::Edit => &[".edit-btn", ".btn-edit"],
            Affordance::Delete => &[".delete-btn", ".btn-delete"],
            Affordance::AdminOnly => &[".admin-only"],
            Affordance::AdminSection => &[".admin-only-section"],
        }
    }

    pub fn allowed(&self, caps: Capabilities) -> bool {
        match self {
            Affordance::Edit => caps.edit,
            Affordance::Delete => caps.delete,
            Affordance::AdminOnly | Affordance::AdminSection => caps.admin,
        }
    }
}

/// CSS display value applied to a gated element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    InlineBlock,
    Block,
    None,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::InlineBlock => "inline-block",
            Display::Block => "block",
            Display::None => "none",
        }
    }
}

/// Target state for one gated element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementState {
    pub display: Display,
    /// `None` leaves the element's disabled flag untouched
    pub disabled: Option<bool>,
}

impl ElementState {
    pub fn for_affordance(affordance: Affordance, allowed: bool) -> Self {
        match (affordance, allowed) {
            (Affordance::AdminSection, true) => Self {
                display: Display::Block,
                disabled: None,
            },
            (Affordance::AdminSection, false) => Self {
                display: Display::None,
                disabled: None,
            },
            (_, true) => Self {
                display: Display::InlineBlock,
                disabled: Some(false),
            },
            (_, false) => Self {
                display: Display::None,
                disabled: Some(true),
            },
        }
    }
}

/// The rendering surface. Shared with the toast dismissal thread, hence `Send + Sync`.
pub trait RenderPort: Send + Sync {
    /// Ids of the elements currently tagged with `affordance`; empty when there are none
    fn elements(&self, affordance: Affordance) -> Vec<String>;
    fn set_element_state(&self, element: &str, state: ElementState);

    fn show_toast(&self, toast: &Toast) -> ToastId;
    fn fade_toast(&self, id: ToastId);
    fn remove_toast(&self, id: ToastId);

    /// Blocking yes/no question
    fn confirm(&self, message: &str) -> bool;
    fn permission_error(&self, message: &str);
    fn open_edit_form(&self, item: ItemType, item_id: &str);
    /// Returns false when no row carries `item_id`
    fn remove_row(&self, item: ItemType, item_id: &str) -> bool;
}

/// Show or hide every gated element according to `caps`.
/// Returns the number of elements updated; affordances with no elements are skipped.
pub fn apply_capabilities<P: RenderPort + ?Sized>(port: &P, caps: Capabilities) -> usize {
    let mut updated = 0;
    for affordance in Affordance::ALL {
        let state = ElementState::for_affordance(affordance, affordance.allowed(caps));
        let elements = port.elements(affordance);
        if elements.is_empty() {
            tracing::trace!(?affordance, "no elements to gate");
            continue;
        }
        for element in &elements {
            port.set_element_state(element, state);
        }
        updated += elements.len();
    }
    tracing::debug!(?caps, updated, "applied capabilities");
    updated
}
