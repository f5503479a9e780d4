use backend_client::{AuthEvent, BackendClient};
use dioxus::prelude::*;
use futures::StreamExt;
use shared_types::{Identity, Profile, UserRole};
use uuid::Uuid;

/// Columns the profile lookup reads from the `users` table.
const PROFILE_COLUMNS: &str =
    "auth_id,email,role,full_name,is_active,employee_id,designation,department,phone,center_id";

/// Session/profile state as a plain value, independent of any UI runtime.
///
/// The generation counter guards against stale writes: every sign-in and
/// sign-out bumps it, and a profile fetch result is only applied if the
/// generation it started under is still current. A fetch abandoned by a
/// sign-out therefore cannot write into the signed-out store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionCore {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl SessionCore {
    /// A sign-in notification arrived: hold the identity, clear any previous
    /// profile and error, and mark the profile fetch as in flight. Returns
    /// the generation the fetch must present when it resolves.
    pub fn begin_sign_in(&mut self, identity: Identity) -> u64 {
        self.identity = Some(identity);
        self.profile = None;
        self.error = None;
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    /// Apply a finished profile fetch. A result from a superseded generation
    /// is discarded without touching the state.
    pub fn resolve_profile(&mut self, generation: u64, result: Result<Profile, String>) {
        if generation != self.generation {
            tracing::debug!(generation, "discarding stale profile fetch result");
            return;
        }
        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        self.loading = false;
    }

    /// A sign-out notification clears everything synchronously.
    pub fn sign_out(&mut self) {
        *self = SessionCore {
            generation: self.generation + 1,
            ..SessionCore::default()
        };
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// A profile exists and the account is active. Authorization decisions
    /// key off this, not off `is_authenticated` alone.
    pub fn has_valid_profile(&self) -> bool {
        self.profile.as_ref().map(|p| p.is_active).unwrap_or(false)
    }

    pub fn role(&self) -> Option<UserRole> {
        self.profile.as_ref().and_then(Profile::parsed_role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::DistrictAdmin)
    }

    pub fn is_staff(&self) -> bool {
        self.role() == Some(UserRole::Staff)
    }
}

/// The session/profile store shared through context.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionState {
    pub core: Signal<SessionCore>,
}

pub fn use_session() -> SessionState {
    use_context::<SessionState>()
}

/// Create the store, subscribe to the backend's auth-state stream, and react
/// to its events for as long as the owning scope lives. Dropping the scope
/// drops the subscription, which unsubscribes it from the client.
pub fn use_session_provider() -> SessionState {
    let client = use_context::<BackendClient>();
    let state = use_context_provider(|| SessionState {
        core: Signal::new(SessionCore::default()),
    });

    let mut core = state.core;
    use_future(move || {
        let client = client.clone();
        async move {
            let mut events = client.on_auth_state_change();
            while let Some(event) = events.next().await {
                match event {
                    AuthEvent::SignedIn(identity) => {
                        tracing::info!(email = %identity.email, "auth event: signed in");
                        let generation = core.write().begin_sign_in(identity.clone());
                        let result = fetch_profile(&client, identity.id).await;
                        core.write().resolve_profile(generation, result);
                    }
                    AuthEvent::SignedOut => {
                        tracing::info!("auth event: signed out");
                        core.write().sign_out();
                    }
                }
            }
        }
    });

    state
}

/// Look up the profile row for an identity. Failures come back as display
/// strings; every failure is terminal for this attempt. No retry, and no
/// distinction between a transient fault and a genuinely missing row.
pub async fn fetch_profile(client: &BackendClient, auth_id: Uuid) -> Result<Profile, String> {
    // Probe the table first so a permissions problem reads differently from
    // a missing row.
    if let Err(e) = client.from("users").count().await {
        tracing::warn!(error = %e, "users table probe failed");
        return Err(format!("Table access error: {}", e.message));
    }

    let rows: Vec<Profile> = client
        .from("users")
        .select(PROFILE_COLUMNS)
        .eq("auth_id", auth_id)
        .execute()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, %auth_id, "profile lookup failed");
            format!("User search error: {}", e.message)
        })?;

    rows.into_iter()
        .next()
        .ok_or_else(|| "User profile not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "nurse@example.org".into(),
        }
    }

    fn staff_profile(auth_id: Uuid, active: bool) -> Profile {
        Profile {
            auth_id,
            email: "nurse@example.org".into(),
            role: "staff".into(),
            full_name: "A Nurse".into(),
            is_active: active,
            employee_id: Some("EMP-7".into()),
            designation: Some("Staff Nurse".into()),
            department: None,
            phone: None,
            center_id: None,
        }
    }

    #[test]
    fn default_state_is_signed_out() {
        let core = SessionCore::default();
        assert!(!core.is_authenticated());
        assert!(!core.has_valid_profile());
        assert!(!core.loading);
        assert_eq!(core.error, None);
    }

    #[test]
    fn sign_in_then_successful_fetch_reaches_valid_staff_state() {
        let mut core = SessionCore::default();
        let id = identity();
        let generation = core.begin_sign_in(id.clone());
        assert!(core.loading);
        assert!(core.is_authenticated());
        assert_eq!(core.profile, None);

        core.resolve_profile(generation, Ok(staff_profile(id.id, true)));
        assert!(!core.loading);
        assert_eq!(core.error, None);
        assert!(core.has_valid_profile());
        assert!(core.is_staff());
        assert!(!core.is_admin());
    }

    #[test]
    fn zero_row_fetch_leaves_error_and_no_profile() {
        let mut core = SessionCore::default();
        let generation = core.begin_sign_in(identity());
        core.resolve_profile(generation, Err("User profile not found".into()));
        assert!(!core.loading);
        assert_eq!(core.profile, None);
        assert_eq!(core.error.as_deref(), Some("User profile not found"));
        assert!(!core.has_valid_profile());
    }

    #[test]
    fn successful_fetch_clears_previous_error() {
        let mut core = SessionCore::default();
        let id = identity();
        let first = core.begin_sign_in(id.clone());
        core.resolve_profile(first, Err("Table access error: down".into()));
        assert!(core.error.is_some());

        let second = core.begin_sign_in(id.clone());
        core.resolve_profile(second, Ok(staff_profile(id.id, true)));
        assert_eq!(core.error, None);
        assert!(core.has_valid_profile());
    }

    #[test]
    fn sign_out_clears_everything_synchronously() {
        let mut core = SessionCore::default();
        let id = identity();
        let generation = core.begin_sign_in(id.clone());
        core.resolve_profile(generation, Ok(staff_profile(id.id, true)));

        core.sign_out();
        assert_eq!(core.identity, None);
        assert_eq!(core.profile, None);
        assert!(!core.loading);
        assert_eq!(core.error, None);
    }

    #[test]
    fn fetch_resolving_after_sign_out_is_discarded() {
        let mut core = SessionCore::default();
        let id = identity();
        let generation = core.begin_sign_in(id.clone());

        // Sign-out arrives while the fetch is still in flight.
        core.sign_out();
        core.resolve_profile(generation, Ok(staff_profile(id.id, true)));

        assert_eq!(core.identity, None);
        assert_eq!(core.profile, None);
        assert!(!core.loading);
        assert_eq!(core.error, None);
    }

    #[test]
    fn fetch_from_superseded_sign_in_is_discarded() {
        let mut core = SessionCore::default();
        let first_id = identity();
        let stale = core.begin_sign_in(first_id.clone());

        let second_id = identity();
        let current = core.begin_sign_in(second_id.clone());

        core.resolve_profile(stale, Ok(staff_profile(first_id.id, true)));
        assert_eq!(core.profile, None, "stale result must not land");
        assert!(core.loading, "current fetch is still outstanding");

        core.resolve_profile(current, Ok(staff_profile(second_id.id, true)));
        assert_eq!(core.profile.as_ref().map(|p| p.auth_id), Some(second_id.id));
    }

    #[test]
    fn inactive_profile_is_not_a_valid_profile() {
        let mut core = SessionCore::default();
        let id = identity();
        let generation = core.begin_sign_in(id.clone());
        core.resolve_profile(generation, Ok(staff_profile(id.id, false)));
        assert!(!core.has_valid_profile());
        assert!(core.is_staff(), "role checks still reflect the row");
    }
}
