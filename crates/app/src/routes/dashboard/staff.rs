use dioxus::prelude::*;

use crate::components::LogoutButton;
use crate::session::use_session;

const STAFF_FEATURES: [&str; 5] = [
    "View center equipment",
    "Create maintenance requests",
    "Update equipment status",
    "View maintenance history",
    "Generate center reports",
];

/// Healthcare staff landing view.
#[component]
pub fn StaffDashboardPage() -> Element {
    let session = use_session();
    let profile = session.core.read().profile.clone();

    let full_name = profile
        .as_ref()
        .map(|p| p.full_name.clone())
        .unwrap_or_else(|| "Staff Member".to_string());
    let designation = profile
        .as_ref()
        .and_then(|p| p.designation.clone())
        .unwrap_or_default();
    let department = profile
        .as_ref()
        .and_then(|p| p.department.clone())
        .unwrap_or_default();

    rsx! {
        div { class: "dashboard-page",
            LogoutButton {}
            h1 { "Welcome {full_name}" }
            p { "Role: Healthcare Staff" }
            p { "Designation: {designation}" }
            p { "Department: {department}" }
            div {
                h2 { "Staff Dashboard Features:" }
                ul {
                    for feature in STAFF_FEATURES {
                        li { "{feature}" }
                    }
                }
            }
        }
    }
}
