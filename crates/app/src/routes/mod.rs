pub mod dashboard;
pub mod login;
pub mod signup;

use dioxus::prelude::*;
use shared_types::UserRole;

use crate::guard::RouteGuard;

use login::LoginPage;
use signup::SignupPage;

/// Application routes. The entry view doubles as the login form; `/login`
/// is kept as an alias so bookmarked links keep working.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/?:redirect")]
    Login { redirect: Option<String> },
    #[route("/login?:redirect")]
    LoginAlias { redirect: Option<String> },
    #[route("/signup")]
    Signup {},
    #[route("/dashboard")]
    DashboardDispatch {},
    #[route("/admin-dashboard")]
    AdminDashboard {},
    #[route("/staff-dashboard")]
    StaffDashboard {},
    #[route("/public-dashboard")]
    PublicDashboard {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn Login(redirect: Option<String>) -> Element {
    rsx! {
        LoginPage { redirect }
    }
}

#[component]
fn LoginAlias(redirect: Option<String>) -> Element {
    rsx! {
        LoginPage { redirect }
    }
}

#[component]
fn Signup() -> Element {
    rsx! {
        SignupPage {}
    }
}

#[component]
fn DashboardDispatch() -> Element {
    rsx! {
        RouteGuard { dashboard::DashboardRedirect {} }
    }
}

#[component]
fn AdminDashboard() -> Element {
    rsx! {
        RouteGuard { allowed_roles: vec![UserRole::DistrictAdmin],
            dashboard::admin::AdminDashboardPage {}
        }
    }
}

#[component]
fn StaffDashboard() -> Element {
    rsx! {
        RouteGuard { allowed_roles: vec![UserRole::Staff],
            dashboard::staff::StaffDashboardPage {}
        }
    }
}

#[component]
fn PublicDashboard() -> Element {
    rsx! {
        RouteGuard { allowed_roles: vec![UserRole::Public],
            dashboard::public::PublicDashboardPage {}
        }
    }
}

/// Unrecognized paths fall back to the entry view.
#[component]
fn NotFound(segments: Vec<String>) -> Element {
    navigator().replace(Route::Login { redirect: None });
    rsx! {
        div { class: "guard-loading",
            p { "Redirecting..." }
        }
    }
}
