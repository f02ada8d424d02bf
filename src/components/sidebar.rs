use leptos::prelude::*;

use crate::components::toggles::SidebarToggle;

/// Navigation panel whose header holds the collapse trigger.
#[component]
pub fn Sidebar(
    #[prop(into)]
    title: String,
    #[prop(optional, into)]
    subtitle: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">{title}</h1>
                <p class="sidebar-subtitle">{subtitle.unwrap_or_default()}</p>
                <SidebarToggle />
            </div>
            {children()}
        </nav>
    }
}
