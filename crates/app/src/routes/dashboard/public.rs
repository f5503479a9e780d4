use dioxus::prelude::*;

use crate::components::LogoutButton;
use crate::session::use_session;

const PUBLIC_FEATURES: [&str; 5] = [
    "View nearby health centers",
    "Find available equipment",
    "Report equipment issues",
    "View public health statistics",
    "Contact health centers",
];

/// Public user landing view.
#[component]
pub fn PublicDashboardPage() -> Element {
    let session = use_session();
    let full_name = session
        .core
        .read()
        .profile
        .as_ref()
        .map(|p| p.full_name.clone())
        .unwrap_or_else(|| "Public User".to_string());

    rsx! {
        div { class: "dashboard-page",
            LogoutButton {}
            h1 { "Welcome {full_name}" }
            p { "Role: Public User" }
            div {
                h2 { "Public Dashboard Features:" }
                ul {
                    for feature in PUBLIC_FEATURES {
                        li { "{feature}" }
                    }
                }
            }
        }
    }
}
