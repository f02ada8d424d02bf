use leptos::prelude::*;

use crate::components::sidebar::Sidebar;
use crate::components::toggles::ThemeToggle;

/// Standalone page used when the host document has no application container.
/// `data-sidebar-collapsed` is owned by the controller, so it is not rendered here.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="app app-layout">
            <Sidebar title="Preferences" subtitle="Appearance settings">
                <ul class="nav-list">
                    <li class="nav-item">
                        <a href="/" class="nav-link">"Home"</a>
                    </li>
                    <li class="nav-item">
                        <a href="/settings" class="nav-link">"Settings"</a>
                    </li>
                </ul>
            </Sidebar>
            <main class="content">
                <header class="content-header">
                    <ThemeToggle />
                </header>
                <section class="page">
                    <h2>"Appearance"</h2>
                    <p class="section-description">
                        "Theme and sidebar choices are saved in this browser. Until a theme is chosen, the system setting is followed."
                    </p>
                </section>
            </main>
        </div>
    }
}
