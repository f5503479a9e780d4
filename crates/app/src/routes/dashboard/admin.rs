use backend_client::BackendClient;
use dioxus::prelude::*;
use shared_types::Center;

use crate::components::LogoutButton;
use crate::session::use_session;

const ADMIN_FEATURES: [(&str, &str, &str); 4] = [
    (
        "Manage Centers",
        "Oversee all health centers in the district.",
        "View Centers",
    ),
    (
        "Equipment Reports",
        "District-wide equipment status and reports.",
        "View Reports",
    ),
    (
        "Manage Staff",
        "Manage staff accounts and permissions.",
        "Manage Staff",
    ),
    (
        "System Settings",
        "Configure system settings and preferences.",
        "Settings",
    ),
];

/// District administrator landing view. Shows the administrator's profile
/// card, their primary center when one is assigned, and the district-level
/// feature entry points.
#[component]
pub fn AdminDashboardPage() -> Element {
    let client = use_context::<BackendClient>();
    let session = use_session();
    let profile = session.core.read().profile.clone();

    let center_id = profile.as_ref().and_then(|p| p.center_id);
    let center = use_resource(move || {
        let client = client.clone();
        async move {
            let id = center_id?;
            client
                .from("centers")
                .select("id,name,type,district")
                .eq("id", &id.to_string())
                .limit(1)
                .execute::<Center>()
                .await
                .ok()
                .and_then(|mut rows| rows.pop())
        }
    });

    let Some(profile) = profile else {
        return rsx! {
            div { class: "dashboard-loading",
                p { "Loading user profile..." }
            }
        };
    };

    rsx! {
        div { class: "dashboard-page",
            LogoutButton {}
            div { class: "dashboard-card",
                h1 { "Admin Dashboard - Welcome, {profile.full_name}!" }

                div { class: "dashboard-profile dashboard-profile-admin",
                    h2 { "Administrator Profile" }
                    div { class: "dashboard-profile-grid",
                        div {
                            p { strong { "Role: " } "District Administrator" }
                            p { strong { "Employee ID: " } {profile.employee_id.as_deref().unwrap_or("-")} }
                            p { strong { "Designation: " } {profile.designation.as_deref().unwrap_or("-")} }
                        }
                        div {
                            p { strong { "Department: " } {profile.department.as_deref().unwrap_or("-")} }
                            p { strong { "Email: " } "{profile.email}" }
                            if let Some(phone) = profile.phone.as_deref() {
                                p { strong { "Phone: " } "{phone}" }
                            }
                        }
                    }
                    if let Some(Some(center)) = center() {
                        div { class: "dashboard-profile-center",
                            p { strong { "Primary Center: " } "{center.label()}" }
                        }
                    }
                }

                div { class: "dashboard-feature-grid",
                    for (title, description, action) in ADMIN_FEATURES {
                        div { class: "dashboard-feature-card",
                            h3 { "{title}" }
                            p { "{description}" }
                            button { class: "dashboard-feature-button", "{action}" }
                        }
                    }
                }
            }
        }
    }
}
