use leptos::prelude::*;

use crate::triggers::TriggerAction;

/// Button carrying the `theme-toggle` marker. The controller binds it.
#[component]
pub fn ThemeToggle(
    /// Button text
    #[prop(optional, into)]
    label: Option<String>,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class="btn theme-toggle"
            aria-label="Toggle dark mode"
            data-action={TriggerAction::ThemeToggle.marker()}
        >
            {label.unwrap_or_else(|| "Toggle theme".to_string())}
        </button>
    }
}

#[component]
pub fn SidebarToggle(
    #[prop(optional, into)]
    label: Option<String>,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class="btn sidebar-toggle"
            aria-label="Collapse sidebar"
            data-action={TriggerAction::SidebarToggle.marker()}
        >
            {label.unwrap_or_else(|| "\u{2630}".to_string())}
        </button>
    }
}
