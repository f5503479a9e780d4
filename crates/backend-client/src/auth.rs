use crate::{transport_error, BackendClient};
use futures::channel::mpsc;
use futures::Stream;
use serde::Deserialize;
use shared_types::{AppError, Identity, SignupRequest};
use std::pin::Pin;
use std::task::{Context, Poll};
use uuid::Uuid;

/// An established auth session: the bearer token plus the identity it names.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub identity: Identity,
}

/// Auth state transitions, delivered to subscribers in order.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Identity),
    SignedOut,
}

/// A live subscription to auth state changes. Dropping it unsubscribes;
/// the client prunes the dead channel on its next emit.
pub struct AuthStateSubscription {
    receiver: mpsc::UnboundedReceiver<AuthEvent>,
}

impl Stream for AuthStateSubscription {
    type Item = AuthEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserPayload,
}

#[derive(Deserialize)]
struct UserPayload {
    id: Uuid,
    email: String,
}

impl BackendClient {
    /// Subscribe to auth state changes. Events produced after this call are
    /// delivered in order until the subscription is dropped.
    pub fn on_auth_state_change(&self) -> AuthStateSubscription {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribe(sender);
        AuthStateSubscription { receiver }
    }

    /// Password sign-in. On success the session is stored in memory and a
    /// `SignedIn` event is emitted; consumers react to the event rather than
    /// the return value.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AppError> {
        let url = self.auth_url("token?grant_type=password")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_auth_response(status, &body));
        }

        let token: TokenResponse = response.json().await.map_err(transport_error)?;
        let identity = Identity {
            id: token.user.id,
            email: token.user.email,
        };
        self.set_session(Some(Session {
            access_token: token.access_token,
            identity: identity.clone(),
        }));
        tracing::info!(email = %identity.email, "signed in");
        self.emit(AuthEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    /// Create an account. The signup form's profile fields travel as auth
    /// metadata; the backend materializes the `users` row from them. No
    /// session is established: the account must verify email and sign in.
    pub async fn sign_up(&self, form: &SignupRequest) -> Result<Identity, AppError> {
        let url = self.auth_url("signup")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&serde_json::json!({
                "email": form.email,
                "password": form.password,
                "data": form.metadata(),
            }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_auth_response(status, &body));
        }

        let body: serde_json::Value = response.json().await.map_err(transport_error)?;
        let identity = parse_signup_identity(&body)?;
        tracing::info!(email = %identity.email, "account created");
        Ok(identity)
    }

    /// Sign out. The local session is cleared and `SignedOut` is emitted
    /// unconditionally; the remote token revocation is best-effort.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let token = self.session().map(|s| s.access_token);
        self.set_session(None);

        if let Some(token) = token {
            let url = self.auth_url("logout")?;
            let result = self
                .request(reqwest::Method::POST, url)
                .bearer_auth(token)
                .send()
                .await;
            if let Err(e) = result {
                tracing::warn!(error = %e, "remote sign-out failed; session cleared locally");
            }
        }

        tracing::info!("signed out");
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    fn auth_url(&self, path: &str) -> Result<reqwest::Url, AppError> {
        let raw = format!("{}/auth/v1/{}", self.config().url, path);
        reqwest::Url::parse(&raw)
            .map_err(|e| AppError::internal(format!("invalid auth URL {}: {}", raw, e)))
    }
}

/// The signup endpoint answers with the user object at the top level when
/// email confirmation is pending, or nested under `user` when a session is
/// returned. Accept both shapes.
fn parse_signup_identity(body: &serde_json::Value) -> Result<Identity, AppError> {
    let user = body.get("user").filter(|u| !u.is_null()).unwrap_or(body);
    let id = user
        .get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok());
    let email = user.get("email").and_then(|v| v.as_str());
    match (id, email) {
        (Some(id), Some(email)) => Ok(Identity {
            id,
            email: email.to_string(),
        }),
        _ => Err(AppError::internal(
            "signup response did not include a user identity",
        )),
    }
}
