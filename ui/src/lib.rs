use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use spark::store::SelectionStore;

mod api;
mod components;

use components::agent_secrets::AgentSecrets;
use components::mcp_connect::McpConnect;
use components::register_agent::RegisterAgent;

#[component]
pub fn App() -> impl IntoView {
    provide_context(RwSignal::new(SelectionStore::new()));

    view! {
        <Router>
            <div class="flex h-screen bg-gray-100">
                // Sidebar
                <div class="w-64 bg-gray-800 text-white p-4 flex flex-col">
                    <h1 class="text-2xl font-bold mb-8">"Spark"</h1>
                    <nav class="space-y-1 flex-1">
                        <NavLink href="/agents/register" label="Register Agent" />
                        <NavLink href="/mcp/connect" label="Connect MCP Server" />
                    </nav>
                    <div class="text-xs text-gray-500 mt-4">
                        "Spark Forms"
                    </div>
                </div>

                // Main Content
                <div class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=RegisterAgent/>
                        <Route path=path!("/agents/register") view=RegisterAgent/>
                        <Route path=path!("/agents/:name/secrets") view=AgentSecrets/>
                        <Route path=path!("/mcp/connect") view=McpConnect/>
                    </Routes>
                </div>
            </div>
        </Router>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="block p-2 hover:bg-gray-700 rounded transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(App);
}
