//! Edit and delete actions on table items, gated by capability.
//!
//! Item types form a closed vocabulary; anything else is logged and otherwise
//! left alone. The role descriptor is passed on every call, never stored.

use crate::notify::{show_success, ToastTimings};
use crate::permissions::{Capabilities, CapabilityResolver, RoleDescriptor};
use crate::render::RenderPort;
use std::sync::Arc;

pub const EDIT_DENIED: &str = "ليس لديك صلاحية للتعديل";
pub const DELETE_DENIED: &str = "ليس لديك صلاحية للحذف";
pub const ACTION_DENIED: &str = "ليس لديك صلاحية لتنفيذ هذا الإجراء";
pub const CONFIRM_DELETE: &str = "هل أنت متأكد من حذف هذا العنصر؟ لا يمكن التراجع عن هذا الإجراء.";
/// Display name for tags outside the vocabulary
pub const GENERIC_ITEM_NAME: &str = "العنصر";

/// The item types the console knows how to edit and delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Sticker,
    Parking,
    ImmobilizedCar,
    Violation,
    Incident,
    SecurityEvent,
    Resident,
    Building,
    Apartment,
}

impl ItemType {
    pub const ALL: [ItemType; 9] = [
        ItemType::Sticker,
        ItemType::Parking,
        ItemType::ImmobilizedCar,
        ItemType::Violation,
        ItemType::Incident,
        ItemType::SecurityEvent,
        ItemType::Resident,
        ItemType::Building,
        ItemType::Apartment,
    ];

    /// Exact, case-sensitive tag lookup
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ItemType::Sticker => "sticker",
            ItemType::Parking => "parking",
            ItemType::ImmobilizedCar => "immobilized_car",
            ItemType::Violation => "violation",
            ItemType::Incident => "incident",
            ItemType::SecurityEvent => "security_event",
            ItemType::Resident => "resident",
            ItemType::Building => "building",
            ItemType::Apartment => "apartment",
        }
    }

    /// Arabic display name with the definite article
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemType::Sticker => "الملصق",
            ItemType::Parking => "الموقف",
            ItemType::ImmobilizedCar => "السيارة المكبوحة",
            ItemType::Violation => "المخالفة",
            ItemType::Incident => "الحادث",
            ItemType::SecurityEvent => "الواقعة الأمنية",
            ItemType::Resident => "الساكن",
            ItemType::Building => "المبنى",
            ItemType::Apartment => "الشقة",
        }
    }
}

/// Display name for any tag, falling back to the generic name
pub fn item_type_name(tag: &str) -> &'static str {
    ItemType::from_tag(tag)
        .map(|t| t.display_name())
        .unwrap_or(GENERIC_ITEM_NAME)
}

/// What happened to a requested action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The actor lacks the capability; a permission error was shown
    Denied,
    /// The actor declined the confirmation prompt
    Cancelled,
    Performed(ItemType),
    /// Unknown item tag; only logged
    Unrouted,
}

/// A per-row action button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub fn title(&self) -> &'static str {
        match self {
            RowAction::Edit => "تعديل",
            RowAction::Delete => "حذف",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            RowAction::Edit => "btn btn-sm btn-warning edit-btn",
            RowAction::Delete => "btn btn-sm btn-danger delete-btn",
        }
    }
}

/// Buttons to put in a row's actions cell; only admins get any
pub fn row_actions(caps: Capabilities) -> Vec<RowAction> {
    if caps.admin {
        vec![RowAction::Edit, RowAction::Delete]
    } else {
        Vec::new()
    }
}

/// A row's item id, falling back to its 1-based position
pub fn row_item_id(data_id: Option<&str>, index: usize) -> String {
    match data_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Routes edit/delete requests to the rendering port after a capability check
pub struct ActionDispatcher<P: RenderPort + ?Sized> {
    port: Arc<P>,
    success_timings: ToastTimings,
}

impl<P: RenderPort + ?Sized + 'static> ActionDispatcher<P> {
    pub fn new(port: Arc<P>) -> Self {
        Self {
            port,
            success_timings: ToastTimings::SUCCESS,
        }
    }

    pub fn with_success_timings(mut self, timings: ToastTimings) -> Self {
        self.success_timings = timings;
        self
    }

    pub fn port(&self) -> &Arc<P> {
        &self.port
    }

    fn deny(&self, message: &str, action: &str, item_id: &str, tag: &str) -> ActionOutcome {
        tracing::info!(action, item_id, item_type = tag, "permission denied");
        self.port.permission_error(message);
        ActionOutcome::Denied
    }

    pub fn edit_item(&self, role: Option<&RoleDescriptor>, item_id: &str, tag: &str) -> ActionOutcome {
        if !CapabilityResolver::new(role).can_edit() {
            return self.deny(EDIT_DENIED, "edit", item_id, tag);
        }

        let Some(item) = ItemType::from_tag(tag) else {
            tracing::info!(item_id, item_type = tag, "edit requested for unrouted item type");
            return ActionOutcome::Unrouted;
        };

        self.port.open_edit_form(item, item_id);
        ActionOutcome::Performed(item)
    }

    pub fn delete_item(&self, role: Option<&RoleDescriptor>, item_id: &str, tag: &str) -> ActionOutcome {
        if !CapabilityResolver::new(role).can_delete() {
            return self.deny(DELETE_DENIED, "delete", item_id, tag);
        }

        if !self.port.confirm(CONFIRM_DELETE) {
            return ActionOutcome::Cancelled;
        }

        let Some(item) = ItemType::from_tag(tag) else {
            tracing::info!(item_id, item_type = tag, "delete requested for unrouted item type");
            return ActionOutcome::Unrouted;
        };

        if !self.port.remove_row(item, item_id) {
            tracing::debug!(item_id, "no row to remove");
        }
        tracing::info!(item_id, item_type = item.tag(), "item deleted");

        let message = format!("تم حذف {} بنجاح", item.display_name());
        show_success(&self.port, &message, self.success_timings);
        ActionOutcome::Performed(item)
    }
}
