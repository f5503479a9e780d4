pub mod admin;
pub mod public;
pub mod staff;

use dioxus::prelude::*;

use crate::guard::dashboard_route_for_role;
use crate::routes::Route;
use crate::session::use_session;

/// Generic `/dashboard` entry. Dispatches to the role-specific dashboard,
/// or back to the entry view when no usable profile exists.
#[component]
pub fn DashboardRedirect() -> Element {
    let session = use_session();
    let target = session
        .core
        .read()
        .profile
        .as_ref()
        .map(|profile| dashboard_route_for_role(&profile.role))
        .unwrap_or(Route::Login { redirect: None });
    navigator().replace(target);

    rsx! {
        div { class: "guard-loading",
            p { "Redirecting..." }
        }
    }
}
