use std::cell::{Cell, RefCell};

use tracing::{debug, warn};

use crate::config::ControllerConfig;
use crate::store::js_reason;
use crate::theme::SidebarState;

pub const SIDEBAR_ATTRIBUTE: &str = "data-sidebar-collapsed";

/// The visible state the controller reads and mutates.
pub trait AppearanceSurface {
    fn is_dark(&self) -> bool;
    fn set_dark(&self, dark: bool);
    /// A missing container or attribute reads as expanded.
    fn sidebar_collapsed(&self) -> bool;
    fn set_sidebar_collapsed(&self, collapsed: bool);
}

/// Document-backed surface: a class on `<html>` for the theme, and the
/// `data-sidebar-collapsed` attribute on the application container.
pub struct DomSurface {
    document: web_sys::Document,
    dark_class: String,
    container_selector: String,
}

impl DomSurface {
    pub fn new(document: web_sys::Document, config: &ControllerConfig) -> Self {
        Self {
            document,
            dark_class: config.dark_class.clone(),
            container_selector: config.container_selector.clone(),
        }
    }

    fn container(&self) -> Option<web_sys::Element> {
        let enclosing = self
            .document
            .body()
            .and_then(|body| body.closest(&self.container_selector).ok().flatten());
        if enclosing.is_some() {
            return enclosing;
        }
        match self.document.query_selector(&self.container_selector) {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    "Invalid container selector '{}': {}",
                    self.container_selector,
                    js_reason(&e)
                );
                None
            }
        }
    }
}

impl AppearanceSurface for DomSurface {
    fn is_dark(&self) -> bool {
        self.document
            .document_element()
            .map(|root| root.class_list().contains(&self.dark_class))
            .unwrap_or_default()
    }

    fn set_dark(&self, dark: bool) {
        let Some(root) = self.document.document_element() else {
            return;
        };
        if let Err(e) = root.class_list().toggle_with_force(&self.dark_class, dark) {
            warn!("Failed to toggle '{}': {}", self.dark_class, js_reason(&e));
        }
    }

    fn sidebar_collapsed(&self) -> bool {
        let value = self
            .container()
            .and_then(|container| container.get_attribute(SIDEBAR_ATTRIBUTE));
        SidebarState::parse_attribute(value.as_deref())
    }

    fn set_sidebar_collapsed(&self, collapsed: bool) {
        let Some(container) = self.container() else {
            debug!("No '{}' container, sidebar state not applied", self.container_selector);
            return;
        };
        if let Err(e) =
            container.set_attribute(SIDEBAR_ATTRIBUTE, SidebarState::attribute_value(collapsed))
        {
            warn!("Failed to set {}: {}", SIDEBAR_ATTRIBUTE, js_reason(&e));
        }
    }
}

/// Surface kept in memory. The sidebar attribute starts absent, like a
/// container the controller has not touched yet.
#[derive(Default)]
pub struct MemorySurface {
    dark: Cell<bool>,
    sidebar_attribute: RefCell<Option<String>>,
    no_container: bool,
    mutations: Cell<usize>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page without the application container: sidebar writes are dropped.
    pub fn without_container() -> Self {
        Self {
            no_container: true,
            ..Self::default()
        }
    }

    /// Raw `data-sidebar-collapsed` value, if ever set.
    pub fn sidebar_attribute(&self) -> Option<String> {
        self.sidebar_attribute.borrow().clone()
    }

    pub fn set_sidebar_attribute(&self, value: Option<&str>) {
        *self.sidebar_attribute.borrow_mut() = value.map(str::to_string);
    }

    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }
}

impl AppearanceSurface for MemorySurface {
    fn is_dark(&self) -> bool {
        self.dark.get()
    }

    fn set_dark(&self, dark: bool) {
        self.dark.set(dark);
        self.mutations.set(self.mutations.get() + 1);
    }

    fn sidebar_collapsed(&self) -> bool {
        SidebarState::parse_attribute(self.sidebar_attribute.borrow().as_deref())
    }

    fn set_sidebar_collapsed(&self, collapsed: bool) {
        if self.no_container {
            return;
        }
        self.set_sidebar_attribute(Some(SidebarState::attribute_value(collapsed)));
        self.mutations.set(self.mutations.get() + 1);
    }
}
