//! Supabase GoTrue authentication: password sign-in, sign-up, token refresh and
//! sign-out, plus the locally stored session.

mod session;

use serde::Deserialize;
use serde_json::json;

use crate::core::config::SupabaseConfig;

pub use session::{Session, SessionUser, clear_session, load_session, store_session};

/// Refresh the access token when it expires within this many seconds.
pub const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Supabase is not configured (set SUPABASE_URL and SUPABASE_ANON_KEY)")]
    NotConfigured,
    #[error("No config directory available")]
    NoConfigDir,
    #[error("Not signed in (run `chatburak login`)")]
    NotSignedIn,
    #[error("Auth request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("Invalid auth response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to store session: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    /// GoTrue refused the credentials themselves (400 or 401), as opposed to a
    /// transport failure or a server error.
    pub fn rejects_credentials(&self) -> bool {
        matches!(
            self,
            AuthError::Rejected { status, .. }
                if *status == reqwest::StatusCode::BAD_REQUEST
                    || *status == reqwest::StatusCode::UNAUTHORIZED
        )
    }
}

/// Result of a sign-up: either an immediate session, or the project requires the
/// address to be confirmed first.
#[derive(Debug)]
pub enum SignUpOutcome {
    SignedIn(Session),
    ConfirmationRequired { email: String },
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at.unwrap_or(now + self.expires_in),
            user: self.user,
        }
    }
}

/// Pull a human-readable message out of a GoTrue error body.
fn error_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.trim().to_string(),
    };
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

fn parse_sign_up(body: &str, email: &str, now: i64) -> Result<SignUpOutcome, AuthError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(value)?;
        return Ok(SignUpOutcome::SignedIn(token.into_session(now)));
    }
    Ok(SignUpOutcome::ConfirmationRequired {
        email: email.to_string(),
    })
}

#[derive(Clone, Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl AuthClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_config(config: Option<&SupabaseConfig>) -> Result<Self, AuthError> {
        config
            .cloned()
            .map(Self::new)
            .ok_or(AuthError::NotConfigured)
    }

    async fn post(
        &self,
        path: &str,
        bearer: &str,
        body: serde_json::Value,
    ) -> Result<String, AuthError> {
        let url = self.config.endpoint(path);
        log::debug!("POST {url}");
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status,
                message: error_message(&text),
            });
        }
        Ok(text)
    }

    async fn token(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, AuthError> {
        let path = format!("/auth/v1/token?grant_type={grant_type}");
        let text = self.post(&path, &self.config.anon_key, body).await?;
        let token: TokenResponse = serde_json::from_str(&text)?;
        Ok(token.into_session(now_secs()))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.token("password", json!({ "email": email, "password": password }))
            .await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let text = self
            .post(
                "/auth/v1/signup",
                &self.config.anon_key,
                json!({ "email": email, "password": password }),
            )
            .await?;
        parse_sign_up(&text, email, now_secs())
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.token("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    /// Revoke the session server-side.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.post("/auth/v1/logout", access_token, json!({}))
            .await
            .map(|_| ())
    }
}

/// `session` while it is valid beyond [`REFRESH_MARGIN_SECS`], otherwise a
/// refreshed one (also stored for the next run).
pub async fn ensure_fresh(client: &AuthClient, session: Session) -> Result<Session, AuthError> {
    if !session.expires_within(now_secs(), REFRESH_MARGIN_SECS) {
        return Ok(session);
    }
    log::info!("Refreshing session for {}", session.email());
    let fresh = client.refresh(&session.refresh_token).await?;
    if let Err(e) = store_session(&fresh) {
        log::warn!("Failed to store refreshed session: {e}");
    }
    Ok(fresh)
}

/// The current session, refreshed when it is about to expire.
/// `Ok(None)` when signed out or when the refresh token was refused.
pub async fn get_session(client: &AuthClient) -> Result<Option<Session>, AuthError> {
    let Some(session) = load_session() else {
        return Ok(None);
    };
    match ensure_fresh(client, session).await {
        Ok(session) => Ok(Some(session)),
        Err(e) if e.rejects_credentials() => {
            log::warn!("Session refresh refused: {e}");
            clear_session()?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Sign in and persist the session.
pub async fn login(client: &AuthClient, email: &str, password: &str) -> Result<Session, AuthError> {
    let session = client.sign_in(email, password).await?;
    store_session(&session)?;
    log::info!("Signed in as {}", session.email());
    Ok(session)
}

/// Register; persists the session when the project signs the user in right away.
pub async fn register(
    client: &AuthClient,
    email: &str,
    password: &str,
) -> Result<SignUpOutcome, AuthError> {
    let outcome = client.sign_up(email, password).await?;
    if let SignUpOutcome::SignedIn(session) = &outcome {
        store_session(session)?;
    }
    Ok(outcome)
}

/// Revoke the session (best effort) and always remove it locally.
pub async fn logout(client: &AuthClient) -> Result<(), AuthError> {
    if let Some(session) = load_session()
        && let Err(e) = client.sign_out(&session.access_token).await
    {
        log::warn!("Remote sign-out failed: {e}");
    }
    clear_session()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_uses_expires_at_when_present() {
        let body = r#"{
            "access_token": "a", "token_type": "bearer", "expires_in": 3600,
            "expires_at": 1700003600, "refresh_token": "r",
            "user": {"id": "u1", "email": "x@y.z", "role": "authenticated"}
        }"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        let session = token.into_session(1);
        assert_eq!(session.expires_at, 1_700_003_600);
        assert_eq!(session.user.id, "u1");
        assert_eq!(session.email(), "x@y.z");
    }

    #[test]
    fn token_response_falls_back_to_expires_in() {
        let body = r#"{"access_token": "a", "expires_in": 3600, "refresh_token": "r",
                       "user": {"id": "u1"}}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.into_session(1000).expires_at, 4600);
    }

    #[test]
    fn error_message_prefers_description() {
        assert_eq!(
            error_message(
                r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
        assert_eq!(
            error_message(r#"{"code":422,"msg":"User already registered"}"#),
            "User already registered"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn sign_up_without_session_needs_confirmation() {
        let body = r#"{"id": "u1", "email": "new@example.com", "confirmation_sent_at": "2024-01-01T00:00:00Z"}"#;
        match parse_sign_up(body, "new@example.com", 0).unwrap() {
            SignUpOutcome::ConfirmationRequired { email } => assert_eq!(email, "new@example.com"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sign_up_with_session_signs_in() {
        let body = r#"{"access_token": "a", "expires_in": 60, "refresh_token": "r",
                       "user": {"id": "u1", "email": "new@example.com"}}"#;
        assert!(matches!(
            parse_sign_up(body, "new@example.com", 0).unwrap(),
            SignUpOutcome::SignedIn(_)
        ));
    }

    fn rejected(status: reqwest::StatusCode) -> AuthError {
        AuthError::Rejected {
            status,
            message: "nope".into(),
        }
    }

    #[test]
    fn only_client_errors_reject_credentials() {
        assert!(rejected(reqwest::StatusCode::BAD_REQUEST).rejects_credentials());
        assert!(rejected(reqwest::StatusCode::UNAUTHORIZED).rejects_credentials());
        assert!(!rejected(reqwest::StatusCode::INTERNAL_SERVER_ERROR).rejects_credentials());
        assert!(!rejected(reqwest::StatusCode::SERVICE_UNAVAILABLE).rejects_credentials());
        assert!(!AuthError::NotSignedIn.rejects_credentials());
    }

    fn unreachable_client() -> AuthClient {
        AuthClient::new(SupabaseConfig {
            url: "http://127.0.0.1:9".into(),
            anon_key: "anon".into(),
        })
    }

    fn session_expiring_at(expires_at: i64) -> Session {
        Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at,
            user: SessionUser {
                id: "u1".into(),
                email: None,
            },
        }
    }

    #[tokio::test]
    async fn fresh_session_is_kept_without_a_request() {
        let session = session_expiring_at(now_secs() + 3600);
        let kept = ensure_fresh(&unreachable_client(), session.clone())
            .await
            .unwrap();
        assert_eq!(kept, session);
    }

    #[tokio::test]
    async fn expiring_session_is_refreshed() {
        let session = session_expiring_at(now_secs() + REFRESH_MARGIN_SECS - 1);
        // Nothing listens on the port, so the refresh attempt fails in transport.
        let err = ensure_fresh(&unreachable_client(), session)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Http(_)), "{err:?}");
        assert!(!err.rejects_credentials());
    }

    #[test]
    fn client_requires_supabase() {
        assert!(matches!(
            AuthClient::from_config(None),
            Err(AuthError::NotConfigured)
        ));
    }
}
