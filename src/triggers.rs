use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::store::js_reason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerAction {
    ThemeToggle,
    SidebarToggle,
}

impl TriggerAction {
    /// Marker value carried in the action attribute.
    pub fn marker(self) -> &'static str {
        match self {
            TriggerAction::ThemeToggle => "theme-toggle",
            TriggerAction::SidebarToggle => "sidebar-toggle",
        }
    }
}

impl fmt::Display for TriggerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// An interactive element carrying an action marker.
pub trait Trigger {
    fn is_bound(&self, action: TriggerAction) -> bool;
    /// Attach `handler` to the activation event and mark the element bound.
    fn bind(&self, action: TriggerAction, handler: Rc<dyn Fn()>);
}

pub trait TriggerSource {
    fn triggers(&self, action: TriggerAction) -> Vec<Rc<dyn Trigger>>;
}

/// Wire every trigger for `action` that is not wired yet. Returns how many
/// elements were newly bound.
pub fn bind_triggers(
    source: &dyn TriggerSource,
    action: TriggerAction,
    handler: Rc<dyn Fn()>,
) -> usize {
    let mut bound = 0;
    for trigger in source.triggers(action) {
        if trigger.is_bound(action) {
            continue;
        }
        trigger.bind(action, handler.clone());
        bound += 1;
    }
    debug!("Bound {} new '{}' trigger(s)", bound, action);
    bound
}

/// Triggers found in the document by `[data-action="..."]`.
///
/// Bound elements are remembered in weak sets rather than marked in the
/// markup, so a cloned or re-rendered button is seen as unbound.
pub struct DomTriggers {
    document: web_sys::Document,
    action_attribute: String,
    bound: Rc<BoundElements>,
}

struct BoundElements {
    theme: js_sys::WeakSet,
    sidebar: js_sys::WeakSet,
}

impl BoundElements {
    fn for_action(&self, action: TriggerAction) -> &js_sys::WeakSet {
        match action {
            TriggerAction::ThemeToggle => &self.theme,
            TriggerAction::SidebarToggle => &self.sidebar,
        }
    }
}

impl DomTriggers {
    pub fn new(document: web_sys::Document, action_attribute: &str) -> Self {
        Self {
            document,
            action_attribute: action_attribute.to_string(),
            bound: Rc::new(BoundElements {
                theme: js_sys::WeakSet::new(),
                sidebar: js_sys::WeakSet::new(),
            }),
        }
    }
}

impl TriggerSource for DomTriggers {
    fn triggers(&self, action: TriggerAction) -> Vec<Rc<dyn Trigger>> {
        let selector = format!("[{}=\"{}\"]", self.action_attribute, action.marker());
        let nodes = match self.document.query_selector_all(&selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!("Trigger query '{}' failed: {}", selector, js_reason(&e));
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(|element| {
                Rc::new(DomTrigger {
                    element,
                    bound: self.bound.clone(),
                }) as Rc<dyn Trigger>
            })
            .collect()
    }
}

struct DomTrigger {
    element: web_sys::Element,
    bound: Rc<BoundElements>,
}

impl Trigger for DomTrigger {
    fn is_bound(&self, action: TriggerAction) -> bool {
        self.bound.for_action(action).has(&self.element)
    }

    fn bind(&self, action: TriggerAction, handler: Rc<dyn Fn()>) {
        let listener =
            Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| handler());
        if let Err(e) = self
            .element
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
        {
            warn!("Failed to bind '{}' trigger: {}", action, js_reason(&e));
            return;
        }
        listener.forget();
        self.bound.for_action(action).add(&self.element);
    }
}

/// Test double for a button. Like a DOM element, it keeps every listener
/// attached to it, so double binding shows up as a double toggle.
pub struct FakeTrigger {
    marker: TriggerAction,
    listeners: RefCell<Vec<(TriggerAction, Rc<dyn Fn()>)>>,
}

impl FakeTrigger {
    pub fn new(marker: TriggerAction) -> Self {
        Self {
            marker,
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn click(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in listeners {
            handler();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Trigger for FakeTrigger {
    fn is_bound(&self, action: TriggerAction) -> bool {
        self.listeners.borrow().iter().any(|(a, _)| *a == action)
    }

    fn bind(&self, action: TriggerAction, handler: Rc<dyn Fn()>) {
        self.listeners.borrow_mut().push((action, handler));
    }
}

#[derive(Default)]
pub struct FakeTriggerSource {
    triggers: RefCell<Vec<Rc<FakeTrigger>>>,
}

impl FakeTriggerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element carrying `marker` and return a handle to click it.
    pub fn add(&self, marker: TriggerAction) -> Rc<FakeTrigger> {
        let trigger = Rc::new(FakeTrigger::new(marker));
        self.triggers.borrow_mut().push(trigger.clone());
        trigger
    }
}

impl TriggerSource for FakeTriggerSource {
    fn triggers(&self, action: TriggerAction) -> Vec<Rc<dyn Trigger>> {
        self.triggers
            .borrow()
            .iter()
            .filter(|t| t.marker == action)
            .map(|t| t.clone() as Rc<dyn Trigger>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_bind_triggers_skips_bound_elements() {
        let source = FakeTriggerSource::new();
        let button = source.add(TriggerAction::ThemeToggle);
        let other = source.add(TriggerAction::SidebarToggle);

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handler: Rc<dyn Fn()> = Rc::new(move || c.set(c.get() + 1));

        assert_eq!(bind_triggers(&source, TriggerAction::ThemeToggle, handler.clone()), 1);
        assert_eq!(bind_triggers(&source, TriggerAction::ThemeToggle, handler), 0);

        button.click();
        assert_eq!(count.get(), 1);
        assert_eq!(button.listener_count(), 1);
        assert_eq!(other.listener_count(), 0);
    }

    #[test]
    fn test_marker_values() {
        assert_eq!(TriggerAction::ThemeToggle.marker(), "theme-toggle");
        assert_eq!(TriggerAction::SidebarToggle.to_string(), "sidebar-toggle");
    }
}
