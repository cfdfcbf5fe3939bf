// End-to-end flows through the public API: stored role -> capabilities -> page state -> actions.

use housing_guard::actions::{
    row_actions, ActionDispatcher, ActionOutcome, ItemType, RowAction, DELETE_DENIED, EDIT_DENIED,
};
use housing_guard::config::{Config, MissingRolePolicy};
use housing_guard::format::{format_currency, format_date, Locale};
use housing_guard::notify::{AlertKind, Toast, ToastId, ToastTimings};
use housing_guard::permissions::{CapabilityResolver, RoleDescriptor};
use housing_guard::render::{apply_capabilities, Affordance, Display, ElementState, RenderPort};
use housing_guard::sanitize::{safe_table_row, sanitize_url, strip_tags, Cell};
use housing_guard::store::{load_role, MemoryRoleStore, RoleStore, ROLE_STORE_KEY};
use housing_guard::validate::Validators;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Page {
    elements: HashMap<Affordance, Vec<String>>,
    states: Mutex<HashMap<String, ElementState>>,
    rows: Mutex<Vec<String>>,
    toasts: Mutex<Vec<Toast>>,
    errors: Mutex<Vec<String>>,
    forms: Mutex<Vec<(ItemType, String)>>,
    confirm_answer: bool,
}

impl Page {
    fn admin_page(rows: &[&str]) -> Self {
        let mut elements = HashMap::new();
        elements.insert(Affordance::Edit, vec!["btn-edit-1".to_string()]);
        elements.insert(Affordance::Delete, vec!["btn-delete-1".to_string()]);
        elements.insert(Affordance::AdminOnly, vec!["btn-users".to_string()]);
        elements.insert(Affordance::AdminSection, vec!["settings".to_string()]);
        Self {
            elements,
            rows: Mutex::new(rows.iter().map(|r| r.to_string()).collect()),
            confirm_answer: true,
            ..Default::default()
        }
    }

    fn state(&self, element: &str) -> ElementState {
        self.states.lock().unwrap()[element]
    }
}

impl RenderPort for Page {
    fn elements(&self, affordance: Affordance) -> Vec<String> {
        self.elements.get(&affordance).cloned().unwrap_or_default()
    }

    fn set_element_state(&self, element: &str, state: ElementState) {
        self.states
            .lock()
            .unwrap()
            .insert(element.to_string(), state);
    }

    fn show_toast(&self, toast: &Toast) -> ToastId {
        let mut toasts = self.toasts.lock().unwrap();
        toasts.push(toast.clone());
        ToastId(toasts.len() as u64)
    }

    fn fade_toast(&self, _id: ToastId) {}

    fn remove_toast(&self, _id: ToastId) {}

    fn confirm(&self, _message: &str) -> bool {
        self.confirm_answer
    }

    fn permission_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn open_edit_form(&self, item: ItemType, item_id: &str) {
        self.forms
            .lock()
            .unwrap()
            .push((item, item_id.to_string()));
    }

    fn remove_row(&self, _item: ItemType, item_id: &str) -> bool {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r != item_id);
        rows.len() != before
    }
}

const QUICK: ToastTimings = ToastTimings {
    dismiss_after: Duration::from_millis(1),
    fade: Duration::ZERO,
};

fn stored(role: &RoleDescriptor) -> Option<RoleDescriptor> {
    let store = MemoryRoleStore::with_role(role).unwrap();
    load_role(&store, MissingRolePolicy::Deny).unwrap()
}

#[test]
fn test_editor_page_state() {
    let role = stored(&RoleDescriptor::new("sara", "officer", ["read", "edit"]));
    let caps = CapabilityResolver::new(role.as_ref()).capabilities();
    let page = Page::admin_page(&[]);

    assert_eq!(apply_capabilities(&page, caps), 4);
    assert_eq!(page.state("btn-edit-1").display, Display::InlineBlock);
    assert_eq!(page.state("btn-edit-1").disabled, Some(false));
    assert_eq!(page.state("btn-delete-1").display, Display::None);
    assert_eq!(page.state("btn-delete-1").disabled, Some(true));
    assert_eq!(page.state("btn-users").display, Display::None);
    assert_eq!(page.state("settings").display, Display::None);
    assert_eq!(page.state("settings").disabled, None);
}

#[test]
fn test_admin_by_role_sees_everything() {
    let role = stored(&RoleDescriptor::new("omar", "admin", Vec::<String>::new()));
    let caps = CapabilityResolver::new(role.as_ref()).capabilities();
    let page = Page::admin_page(&[]);
    apply_capabilities(&page, caps);

    assert_eq!(page.state("settings").display, Display::Block);
    assert_eq!(page.state("btn-users").display, Display::InlineBlock);
    assert_eq!(row_actions(caps), vec![RowAction::Edit, RowAction::Delete]);
}

#[test]
fn test_no_stored_role_hides_everything() {
    let store = MemoryRoleStore::new();
    assert_eq!(store.get(ROLE_STORE_KEY).unwrap(), None);
    let role = load_role(&store, MissingRolePolicy::default()).unwrap();
    let caps = CapabilityResolver::new(role.as_ref()).capabilities();
    let page = Page::admin_page(&[]);
    apply_capabilities(&page, caps);

    for element in ["btn-edit-1", "btn-delete-1", "btn-users", "settings"] {
        assert_eq!(page.state(element).display, Display::None, "{}", element);
    }
    assert!(row_actions(caps).is_empty());
}

#[test]
fn test_delete_flow_for_admin() {
    let page = Arc::new(Page::admin_page(&["7", "8"]));
    let dispatcher = ActionDispatcher::new(Arc::clone(&page)).with_success_timings(QUICK);
    let admin = RoleDescriptor::new("omar", "staff", ["admin"]);

    let outcome = dispatcher.delete_item(Some(&admin), "7", "building");
    assert_eq!(outcome, ActionOutcome::Performed(ItemType::Building));
    assert_eq!(*page.rows.lock().unwrap(), vec!["8".to_string()]);

    let toasts = page.toasts.lock().unwrap();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, AlertKind::Success);
    assert_eq!(toasts[0].message, "تم حذف المبنى بنجاح");
}

#[test]
fn test_denied_actions_report_and_touch_nothing() {
    let page = Arc::new(Page::admin_page(&["7"]));
    let dispatcher = ActionDispatcher::new(Arc::clone(&page));
    let viewer = RoleDescriptor::new("guest", "viewer", ["read"]);

    assert_eq!(
        dispatcher.edit_item(Some(&viewer), "7", "building"),
        ActionOutcome::Denied
    );
    assert_eq!(dispatcher.delete_item(None, "7", "building"), ActionOutcome::Denied);

    assert_eq!(
        *page.errors.lock().unwrap(),
        vec![EDIT_DENIED.to_string(), DELETE_DENIED.to_string()]
    );
    assert!(page.forms.lock().unwrap().is_empty());
    assert_eq!(page.rows.lock().unwrap().len(), 1);
    assert!(page.toasts.lock().unwrap().is_empty());
}

#[test]
fn test_edit_flow_opens_form() {
    let page = Arc::new(Page::admin_page(&[]));
    let dispatcher = ActionDispatcher::new(Arc::clone(&page));
    let editor = RoleDescriptor::new("sara", "officer", ["edit"]);

    let outcome = dispatcher.edit_item(Some(&editor), "42", "violation");
    assert_eq!(outcome, ActionOutcome::Performed(ItemType::Violation));
    assert_eq!(
        *page.forms.lock().unwrap(),
        vec![(ItemType::Violation, "42".to_string())]
    );
}

#[test]
fn test_configured_patterns_drive_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[patterns]
national_id = ["[12][0-9]{9}", "9[0-9]{9}"]
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.validate().is_ok());
    let validators = Validators::compile(&config.patterns.table()).unwrap();

    assert!(validators.national_id("9123456789"));
    assert!(validators.national_id("1123456789"));
    // untouched fields keep the built-in patterns
    assert!(validators.phone("0512345678"));
    assert!(!validators.phone("0412345678"));
}

#[test]
fn test_untrusted_row_rendering() {
    let name = "<img src=x onerror=alert(1)>أحمد";
    let link = sanitize_url("javascript:alert(1)");
    let row = safe_table_row(&[
        Cell::from(name),
        Cell::from(strip_tags("<b>مبنى</b> ٣")),
        Cell::from(format_currency(Some(1500.0))),
        Cell::from(link),
    ]);

    assert!(!row.contains("<img"));
    assert!(row.contains("&lt;img src=x onerror=alert(1)&gt;أحمد"));
    assert!(row.contains("<td>مبنى ٣</td>"));
    assert!(row.contains("<td>1,500.00 ريال</td>"));
    assert!(row.ends_with("<td></td></tr>"));
}

#[test]
fn test_dates_render_per_locale() {
    assert_eq!(format_date("2024-03-05", Locale::En), "03/05/2024");
    assert_eq!(format_date("2024-03-05", Locale::Ar), "٠٥/٠٣/٢٠٢٤");
    assert_eq!(format_date("", Locale::Ar), "");
    assert_eq!(format_date("not a date", Locale::En), "");
}
