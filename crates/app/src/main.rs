use dioxus::prelude::*;

mod components;
mod guard;
mod routes;
mod session;

use backend_client::{BackendClient, BackendConfig};
use routes::Route;
use session::use_session_provider;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    dotenvy::dotenv().ok();

    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // The backend handle is built exactly once. A missing SUPABASE_URL or
    // SUPABASE_ANON_KEY renders an error page instead of a broken app.
    let backend = use_hook(|| BackendConfig::from_env().and_then(BackendClient::new));

    match backend {
        Ok(client) => rsx! {
            Shell { client }
        },
        Err(err) => rsx! {
            div { class: "startup-error",
                h1 { "Configuration error" }
                p { "{err.message}" }
            }
        },
    }
}

/// Provides the backend handle and the session/profile store to every route,
/// then mounts the router.
#[component]
fn Shell(client: BackendClient) -> Element {
    use_context_provider({
        let client = client.clone();
        move || client.clone()
    });
    use_session_provider();

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}
