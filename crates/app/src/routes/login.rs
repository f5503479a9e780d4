use backend_client::BackendClient;
use dioxus::prelude::*;
use shared_types::{LoginRequest, UserRole};

use crate::routes::Route;
use crate::session::{use_session, SessionCore};

/// Login page with email/password. Doubles as the application entry view.
/// Navigation away from it is driven by the session store, not by the
/// submit handler: once a signed-in session carries a valid profile, the
/// effect below routes to the role's dashboard.
#[component]
pub fn LoginPage(redirect: Option<String>) -> Element {
    let client = use_context::<BackendClient>();
    let session = use_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Keep the requested location readable from the effect closure.
    let redirect_target = use_signal(move || redirect);

    use_effect(move || {
        let core = session.core.read();
        let Some(by_role) = post_login_destination(&core) else {
            return;
        };
        let target = redirect_target
            .read()
            .as_deref()
            .and_then(parse_return_route)
            .unwrap_or(by_role);
        navigator().replace(target);
    });

    let handle_login = move |evt: FormEvent| {
        let client = client.clone();
        async move {
            evt.prevent_default();
            error_msg.set(None);

            let form = LoginRequest {
                email: email().trim().to_string(),
                password: password(),
            };
            if let Err(err) = form.validate_form() {
                error_msg.set(Some(err.summary()));
                return;
            }

            loading.set(true);
            if let Err(err) = client
                .sign_in_with_password(&form.email, &form.password)
                .await
            {
                error_msg.set(Some(err.login_message()));
            }
            loading.set(false);
        }
    };

    // Profile fetch failures reported by the store surface on this view.
    let store_error = session.core.read().error.clone();
    let (will_redirect, unrecognized_role) = {
        let core = session.core.read();
        (
            post_login_destination(&core).is_some(),
            core.has_valid_profile() && core.role().is_none(),
        )
    };

    if will_redirect {
        return rsx! {
            div { class: "auth-page",
                p { "Redirecting..." }
            }
        };
    }

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                div { class: "auth-card-header",
                    h2 { "Sign In" }
                    p { "Rural Health Equipment Management System" }
                }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }
                if let Some(err) = store_error {
                    div { class: "auth-error", "{err}" }
                }
                if unrecognized_role {
                    div { class: "auth-error",
                        "Your account role is not recognized. Please contact your administrator."
                    }
                }

                form { onsubmit: handle_login,
                    div { class: "auth-field",
                        label { r#for: "email", "Email" }
                        input {
                            r#type: "email",
                            id: "email",
                            placeholder: "user@example.com",
                            value: email(),
                            oninput: move |e: FormEvent| email.set(e.value()),
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "password", "Password" }
                        input {
                            r#type: "password",
                            id: "password",
                            placeholder: "Enter your password",
                            value: password(),
                            oninput: move |e: FormEvent| password.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "auth-submit",
                        disabled: loading(),
                        if loading() { "Signing in..." } else { "Sign In" }
                    }
                }

                p { class: "auth-link",
                    "Don't have an account? "
                    Link { to: Route::Signup {}, "Sign up" }
                }
            }
        }
    }
}

/// The dashboard a finished sign-in should land on, or `None` when the
/// session should stay on the entry view: still loading, not signed in, no
/// valid profile, or a role outside the known set. An unrecognized role has
/// no dashboard; navigating it anywhere else would bounce straight back
/// here, so the entry view is its stable landing.
fn post_login_destination(core: &SessionCore) -> Option<Route> {
    if core.loading || !core.is_authenticated() || !core.has_valid_profile() {
        return None;
    }
    match core.role()? {
        UserRole::DistrictAdmin => Some(Route::AdminDashboard {}),
        UserRole::Staff => Some(Route::StaffDashboard {}),
        UserRole::Public => Some(Route::PublicDashboard {}),
    }
}

/// Rebuild the preserved location into an in-app route so the return
/// navigation stays inside the router. A full browser navigation would
/// reload the page and drop the in-memory session. Paths that do not parse,
/// or that point back at the entry views, are ignored in favor of the
/// role's dashboard.
fn parse_return_route(path: &str) -> Option<Route> {
    match path.parse::<Route>().ok()? {
        Route::Login { .. } | Route::LoginAlias { .. } | Route::NotFound { .. } => None,
        route => Some(route),
    }
}
