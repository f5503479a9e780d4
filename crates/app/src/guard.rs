use backend_client::BackendClient;
use dioxus::prelude::*;
use shared_types::UserRole;

use crate::routes::Route;
use crate::session::{use_session, SessionCore};

/// Outcome of one guard evaluation for a requested view.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Loading,
    RedirectToLogin,
    Deactivated,
    AccessDenied {
        role: String,
        required: Vec<UserRole>,
    },
    Allow,
}

/// The access decision, recomputed from the store's current snapshot on
/// every evaluation. Nothing here persists state. This is a UX convenience
/// only; the backend's row-level access control is the authority.
///
/// Order of checks:
/// 1. an in-flight profile fetch shows the loading state;
/// 2. auth required but no identity redirects to login;
/// 3. a present-but-inactive profile is the deactivated state, regardless
///    of role;
/// 4. when roles are restricted, a missing profile or a role outside the
///    set is denied;
/// 5. otherwise the view renders.
pub fn evaluate(
    session: &SessionCore,
    allowed_roles: &[UserRole],
    require_auth: bool,
) -> GuardDecision {
    if session.loading {
        return GuardDecision::Loading;
    }
    if require_auth && !session.is_authenticated() {
        return GuardDecision::RedirectToLogin;
    }
    if session.is_authenticated() {
        if let Some(profile) = &session.profile {
            if !profile.is_active {
                return GuardDecision::Deactivated;
            }
        }
    }
    if !allowed_roles.is_empty() {
        let role_allowed = session
            .profile
            .as_ref()
            .and_then(|p| p.parsed_role())
            .map(|role| allowed_roles.contains(&role))
            .unwrap_or(false);
        if !role_allowed {
            return GuardDecision::AccessDenied {
                role: session
                    .profile
                    .as_ref()
                    .map(|p| p.role.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                required: allowed_roles.to_vec(),
            };
        }
    }
    GuardDecision::Allow
}

/// Dashboard destination for a profile role string. Unknown roles land back
/// on the entry view instead of looping through the dispatcher.
pub fn dashboard_route_for_role(role: &str) -> Route {
    match UserRole::parse(role) {
        Some(UserRole::DistrictAdmin) => Route::AdminDashboard {},
        Some(UserRole::Staff) => Route::StaffDashboard {},
        Some(UserRole::Public) => Route::PublicDashboard {},
        None => Route::Login { redirect: None },
    }
}

/// Gate for protected views. Wrap a page's content and declare which roles
/// may see it; an empty set admits any authenticated active profile.
#[component]
pub fn RouteGuard(
    #[props(default = Vec::new())] allowed_roles: Vec<UserRole>,
    #[props(default = true)] require_auth: bool,
    children: Element,
) -> Element {
    let session = use_session();
    let client = use_context::<BackendClient>();
    let route: Route = use_route();
    let snapshot = session.core.read().clone();

    match evaluate(&snapshot, &allowed_roles, require_auth) {
        GuardDecision::Loading => rsx! {
            div { class: "guard-loading",
                p { "Loading..." }
            }
        },
        GuardDecision::RedirectToLogin => {
            // Keep the requested location so a future login could return here.
            navigator().replace(Route::Login {
                redirect: Some(route.to_string()),
            });
            rsx! {
                div { class: "guard-loading",
                    p { "Redirecting to login..." }
                }
            }
        }
        GuardDecision::Deactivated => rsx! {
            div { class: "guard-page",
                div { class: "guard-card guard-card-deactivated",
                    h3 { "Account Deactivated" }
                    p {
                        "Your account has been deactivated. Please contact your administrator for assistance."
                    }
                    button {
                        class: "guard-signout-button",
                        onclick: move |_| {
                            let client = client.clone();
                            spawn(async move {
                                let _ = client.sign_out().await;
                            });
                        },
                        "Sign Out"
                    }
                }
            }
        },
        GuardDecision::AccessDenied { role, required } => {
            let required_list = required
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            rsx! {
                div { class: "guard-page",
                    div { class: "guard-card guard-card-denied",
                        h3 { "Access Denied" }
                        p { "You don't have permission to access this page. Your role: {role}" }
                        p { "Required roles: {required_list}" }
                        button {
                            class: "guard-back-button",
                            onclick: move |_| {
                                navigator().go_back();
                            },
                            "Go Back"
                        }
                    }
                }
            }
        }
        GuardDecision::Allow => rsx! {
            {children}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{Identity, Profile};
    use uuid::Uuid;

    fn session_with(role: &str, active: bool) -> SessionCore {
        let mut core = SessionCore::default();
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "user@example.org".into(),
        };
        let generation = core.begin_sign_in(identity.clone());
        core.resolve_profile(
            generation,
            Ok(Profile {
                auth_id: identity.id,
                email: identity.email,
                role: role.into(),
                full_name: "User".into(),
                is_active: active,
                employee_id: None,
                designation: None,
                department: None,
                phone: None,
                center_id: None,
            }),
        );
        core
    }

    fn loading_session() -> SessionCore {
        let mut core = SessionCore::default();
        core.begin_sign_in(Identity {
            id: Uuid::new_v4(),
            email: "user@example.org".into(),
        });
        core
    }

    #[test]
    fn loading_wins_over_everything() {
        let decision = evaluate(&loading_session(), &[UserRole::Staff], true);
        assert_eq!(decision, GuardDecision::Loading);
    }

    #[test]
    fn no_identity_redirects_regardless_of_allowed_roles() {
        let core = SessionCore::default();
        for allowed in [
            Vec::new(),
            vec![UserRole::Staff],
            vec![UserRole::Public, UserRole::DistrictAdmin],
        ] {
            assert_eq!(
                evaluate(&core, &allowed, true),
                GuardDecision::RedirectToLogin
            );
        }
    }

    #[test]
    fn no_identity_without_require_auth_is_allowed() {
        let core = SessionCore::default();
        assert_eq!(evaluate(&core, &[], false), GuardDecision::Allow);
    }

    #[test]
    fn inactive_profile_is_deactivated_even_when_role_is_allowed() {
        let core = session_with("staff", false);
        assert_eq!(
            evaluate(&core, &[UserRole::Staff], true),
            GuardDecision::Deactivated
        );
    }

    #[test]
    fn empty_allowed_roles_admits_any_active_profile() {
        for role in ["public", "staff", "district_admin"] {
            let core = session_with(role, true);
            assert_eq!(evaluate(&core, &[], true), GuardDecision::Allow);
        }
    }

    #[test]
    fn disallowed_role_is_denied_with_details() {
        let core = session_with("public", true);
        assert_eq!(
            evaluate(&core, &[UserRole::Staff], true),
            GuardDecision::AccessDenied {
                role: "public".into(),
                required: vec![UserRole::Staff],
            }
        );
    }

    #[test]
    fn allowed_role_renders_children() {
        let core = session_with("staff", true);
        assert_eq!(evaluate(&core, &[UserRole::Staff], true), GuardDecision::Allow);
    }

    #[test]
    fn missing_profile_denies_role_gated_access() {
        // Profile fetch came back empty: authenticated, but no valid profile.
        let mut core = loading_session();
        core.resolve_profile(1, Err("User profile not found".into()));
        let decision = evaluate(&core, &[UserRole::Staff], true);
        assert_eq!(
            decision,
            GuardDecision::AccessDenied {
                role: "unknown".into(),
                required: vec![UserRole::Staff],
            }
        );
    }

    #[test]
    fn unknown_role_string_is_denied() {
        let core = session_with("superuser", true);
        let decision = evaluate(&core, &[UserRole::Staff], true);
        assert_eq!(
            decision,
            GuardDecision::AccessDenied {
                role: "superuser".into(),
                required: vec![UserRole::Staff],
            }
        );
    }

    #[test]
    fn dashboard_routes_cover_the_closed_role_set() {
        assert_eq!(
            dashboard_route_for_role("district_admin"),
            Route::AdminDashboard {}
        );
        assert_eq!(dashboard_route_for_role("staff"), Route::StaffDashboard {});
        assert_eq!(
            dashboard_route_for_role("public"),
            Route::PublicDashboard {}
        );
    }

    #[test]
    fn unknown_roles_dispatch_back_to_the_entry_view() {
        for role in ["", "superuser", "admin", "STAFF2"] {
            assert_eq!(
                dashboard_route_for_role(role),
                Route::Login { redirect: None }
            );
        }
    }
}
