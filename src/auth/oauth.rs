//! Hosted sign-in (OAuth2 authorization code + PKCE)
//!
//! The browser is sent to the hosted authorize page; a short-lived localhost
//! listener receives the redirect with the authorization code, which is then
//! exchanged for tokens. The session is persisted so later runs can restore
//! it, and refreshed with the refresh token once it expires.

use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use url::Url;

use super::session::{AuthSession, IdentityProvider, Navigator, User, UserProfile};
use crate::config::AuthConfig;
use crate::core::AuthError;

/// File name of the persisted session inside the data directory
pub const SESSION_FILE: &str = "session.json";

/// OAuth2 token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Session as persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile: UserProfile,
}

impl StoredSession {
    fn from_tokens(tokens: TokenResponse, previous: Option<&StoredSession>) -> Self {
        let expires_at = tokens
            .expires_in
            .map(|secs| Utc::now() + ChronoDuration::seconds(secs));
        // Refresh grants may omit the id and refresh tokens; keep the old ones
        let id_token = tokens
            .id_token
            .or_else(|| previous.and_then(|p| p.id_token.clone()));
        let refresh_token = tokens
            .refresh_token
            .or_else(|| previous.and_then(|p| p.refresh_token.clone()));
        let profile = id_token
            .as_deref()
            .and_then(profile_from_id_token)
            .or_else(|| previous.map(|p| p.profile.clone()))
            .unwrap_or_default();

        Self {
            access_token: tokens.access_token,
            refresh_token,
            id_token,
            expires_at,
            profile,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    fn to_auth_session(&self) -> AuthSession {
        AuthSession::authenticated(User {
            profile: self.profile.clone(),
        })
    }
}

/// Read profile claims from the payload segment of an id token
///
/// The token comes straight from the token endpoint over TLS, so the
/// signature is not checked here.
pub fn profile_from_id_token(id_token: &str) -> Option<UserProfile> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Authorization code received on the callback
#[derive(Debug)]
struct Callback {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Hosted identity provider with a file-backed session
pub struct HostedIdentity {
    config: AuthConfig,
    http_client: reqwest::Client,
    session_path: PathBuf,
    snapshot: RwLock<AuthSession>,
}

impl HostedIdentity {
    /// Create the provider; the snapshot stays "loading" until [`restore`](Self::restore)
    pub fn new(config: AuthConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            config,
            http_client,
            session_path: data_dir.join(SESSION_FILE),
            snapshot: RwLock::new(AuthSession::loading()),
        })
    }

    fn set_snapshot(&self, session: AuthSession) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    /// Load the stored session, refreshing it if it has expired
    pub async fn restore(&self) -> AuthSession {
        let session = match self.load_session() {
            Ok(None) => AuthSession::signed_out(),
            Ok(Some(stored)) if !stored.is_expired(Utc::now()) => stored.to_auth_session(),
            Ok(Some(stored)) => match stored.refresh_token.clone() {
                Some(refresh_token) => match self.refresh(&refresh_token, &stored).await {
                    Ok(refreshed) => refreshed.to_auth_session(),
                    Err(e) => {
                        tracing::warn!("Session refresh failed: {}", e);
                        AuthSession::signed_out()
                    }
                },
                None => {
                    tracing::debug!("Stored session expired without refresh token");
                    AuthSession::signed_out()
                }
            },
            Err(e) => AuthSession::failed(e.to_string()),
        };

        self.set_snapshot(session.clone());
        session
    }

    fn load_session(&self) -> Result<Option<StoredSession>, AuthError> {
        if !self.session_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.session_path)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| AuthError::Storage(format!("{}: {}", self.session_path.display(), e)))
    }

    /// Save session with owner-only permissions
    pub fn save_session(&self, session: &StoredSession) -> anyhow::Result<()> {
        if let Some(parent) = self.session_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(&self.session_path, serde_json::to_string_pretty(session)?)
            .with_context(|| format!("Failed to write {}", self.session_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&self.session_path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&self.session_path, perms)?;
        }

        tracing::info!("Saved session to {}", self.session_path.display());
        Ok(())
    }

    /// Generate PKCE code verifier (random 128-character string)
    fn generate_code_verifier(&self) -> String {
        rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(128)
            .map(char::from)
            .collect()
    }

    /// Generate PKCE code challenge from verifier (SHA256 + base64url)
    fn generate_code_challenge(&self, verifier: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    /// Random state parameter for CSRF protection
    fn generate_state(&self) -> String {
        let random_bytes: [u8; 32] = rand::random();
        URL_SAFE_NO_PAD.encode(random_bytes)
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        let base = self.config.hosted_domain.trim_end_matches('/');
        Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| AuthError::SignIn(format!("invalid hosted domain: {}", e)))
    }

    /// Hosted authorize URL with PKCE parameters
    pub fn authorization_url(&self, code_challenge: &str, state: &str) -> Result<Url, AuthError> {
        let mut url = self.endpoint("oauth2/authorize")?;
        url.query_pairs_mut()
            .append_pair("response_type", &self.config.response_type)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("state", state);
        Ok(url)
    }

    /// Origin of the redirect URI, used as the post-logout destination
    fn redirect_origin(&self) -> Result<String, AuthError> {
        let redirect = Url::parse(&self.config.redirect_uri)
            .map_err(|e| AuthError::SignIn(format!("invalid redirect_uri: {}", e)))?;
        Ok(redirect.origin().ascii_serialization())
    }

    /// Start local HTTP server to receive the OAuth callback
    async fn start_callback_server(
        &self,
    ) -> Result<(oneshot::Receiver<Callback>, tokio::task::JoinHandle<()>), AuthError> {
        use axum::{extract::Query, response::Html, routing::get, Router};

        #[derive(serde::Deserialize)]
        struct CallbackQuery {
            code: Option<String>,
            state: Option<String>,
            error: Option<String>,
            error_description: Option<String>,
        }

        let redirect = Url::parse(&self.config.redirect_uri)
            .map_err(|e| AuthError::SignIn(format!("invalid redirect_uri: {}", e)))?;
        let port = redirect
            .port_or_known_default()
            .ok_or_else(|| AuthError::SignIn("redirect_uri has no port".to_string()))?;
        let path = redirect.path().to_string();

        let (tx, rx) = oneshot::channel::<Callback>();
        let tx = Arc::new(Mutex::new(Some(tx)));

        let app = Router::new().route(
            &path,
            get(move |Query(query): Query<CallbackQuery>| async move {
                let page = if query.code.is_some() {
                    "<h1>Signed in</h1><p>You can close this window and return to the terminal.</p>"
                        .to_string()
                } else {
                    let error = query
                        .error_description
                        .clone()
                        .or_else(|| query.error.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    format!(
                        "<h1>Sign-in failed</h1><p>Error: {}</p><p>Close this window and try again.</p>",
                        error
                    )
                };
                if let Some(sender) = tx.lock().await.take() {
                    let _ = sender.send(Callback {
                        code: query.code,
                        state: query.state,
                        error: query.error_description.or(query.error),
                    });
                }
                Html(page)
            }),
        );

        let addr = format!("127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AuthError::SignIn(format!("cannot listen on {}: {}", addr, e)))?;
        tracing::debug!("OAuth callback server listening on {}", addr);

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("OAuth callback server error: {}", e);
            }
        });

        Ok((rx, server_handle))
    }

    /// Exchange authorization code for tokens
    async fn exchange_code_for_tokens(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];
        self.token_request(&params).await
    }

    /// Refresh an expired session using its refresh token
    async fn refresh(
        &self,
        refresh_token: &str,
        previous: &StoredSession,
    ) -> Result<StoredSession, AuthError> {
        tracing::debug!("Refreshing session");

        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let tokens = self.token_request(&params).await?;
        let session = StoredSession::from_tokens(tokens, Some(previous));
        self.save_session(&session)?;
        Ok(session)
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let url = self.endpoint("oauth2/token")?;
        let response = self
            .http_client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!("{}: {}", status, body)));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("invalid token response: {}", e)))
    }

    async fn run_signin(&self, navigator: &dyn Navigator) -> Result<StoredSession, AuthError> {
        let code_verifier = self.generate_code_verifier();
        let code_challenge = self.generate_code_challenge(&code_verifier);
        let state = self.generate_state();
        let auth_url = self.authorization_url(&code_challenge, &state)?;

        let (callback_rx, server_handle) = self.start_callback_server().await?;

        println!("Opening browser for sign-in...");
        println!();
        println!("If the browser doesn't open automatically, visit:");
        println!("{}", auth_url);
        println!();
        if let Err(e) = navigator.navigate(&auth_url) {
            tracing::warn!("Failed to open browser: {}", e);
        }

        let wait = Duration::from_secs(self.config.callback_timeout_secs);
        let callback = tokio::time::timeout(wait, callback_rx).await;
        server_handle.abort();

        let callback = match callback {
            Ok(Ok(callback)) => callback,
            Ok(Err(_)) => return Err(AuthError::SignIn("callback listener stopped".to_string())),
            Err(_) => {
                return Err(AuthError::SignIn(format!(
                    "no response after {} seconds",
                    wait.as_secs()
                )))
            }
        };

        if let Some(error) = callback.error {
            return Err(AuthError::SignIn(error));
        }
        if callback.state.as_deref() != Some(state.as_str()) {
            return Err(AuthError::SignIn("state mismatch in callback".to_string()));
        }
        let code = callback
            .code
            .ok_or_else(|| AuthError::SignIn("callback carried no code".to_string()))?;

        let tokens = self.exchange_code_for_tokens(&code, &code_verifier).await?;
        let session = StoredSession::from_tokens(tokens, None);
        self.save_session(&session)?;
        Ok(session)
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentity {
    fn snapshot(&self) -> AuthSession {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn signin_redirect(&self, navigator: &dyn Navigator) -> Result<AuthSession, AuthError> {
        self.set_snapshot(AuthSession::loading());
        match self.run_signin(navigator).await {
            Ok(stored) => {
                let session = stored.to_auth_session();
                self.set_snapshot(session.clone());
                Ok(session)
            }
            Err(e) => {
                self.set_snapshot(AuthSession::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn remove_user(&self) -> Result<(), AuthError> {
        self.set_snapshot(AuthSession::signed_out());
        match std::fs::remove_file(&self.session_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }

    fn logout_url(&self) -> Result<Url, AuthError> {
        let mut url = self.endpoint("logout")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("logout_uri", &self.redirect_origin()?);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn identity(dir: &Path) -> HostedIdentity {
        identity_at(dir, "https://auth.example.com/", 5)
    }

    fn identity_at(dir: &Path, hosted_domain: &str, request_timeout_secs: u64) -> HostedIdentity {
        let config = AuthConfig {
            hosted_domain: hosted_domain.to_string(),
            client_id: "client123".to_string(),
            redirect_uri: "http://localhost:8976/callback".to_string(),
            request_timeout_secs,
            ..Default::default()
        };
        HostedIdentity::new(config, dir).unwrap()
    }

    #[derive(Clone)]
    struct TokenStub {
        forms: Arc<std::sync::Mutex<Vec<String>>>,
        status: axum::http::StatusCode,
        delay: Option<Duration>,
    }

    async fn token_endpoint(
        axum::extract::State(stub): axum::extract::State<TokenStub>,
        body: String,
    ) -> (axum::http::StatusCode, String) {
        stub.forms.lock().unwrap().push(body);
        if let Some(delay) = stub.delay {
            tokio::time::sleep(delay).await;
        }
        let body = if stub.status.is_success() {
            serde_json::json!({"access_token": "new", "expires_in": 3600, "token_type": "Bearer"})
                .to_string()
        } else {
            r#"{"error":"invalid_grant"}"#.to_string()
        };
        (stub.status, body)
    }

    /// Serve `/oauth2/token` on an ephemeral port; returns the base URL
    async fn spawn_token_endpoint(stub: TokenStub) -> String {
        let app = axum::Router::new()
            .route("/oauth2/token", axum::routing::post(token_endpoint))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn token_stub(status: axum::http::StatusCode, delay: Option<Duration>) -> TokenStub {
        TokenStub {
            forms: Arc::new(std::sync::Mutex::new(Vec::new())),
            status,
            delay,
        }
    }

    fn expired_session() -> StoredSession {
        StoredSession {
            access_token: "old".to_string(),
            refresh_token: Some("rt".to_string()),
            id_token: Some(id_token(serde_json::json!({"email": "a@b.c"}))),
            expires_at: Some(Utc::now() - ChronoDuration::minutes(5)),
            profile: UserProfile {
                email: Some("a@b.c".to_string()),
                ..Default::default()
            },
        }
    }

    fn id_token(claims: serde_json::Value) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }

    #[test]
    fn test_authorization_url() {
        let dir = TempDir::new().unwrap();
        let url = identity(dir.path())
            .authorization_url("challenge", "xyz")
            .unwrap();

        assert_eq!(url.path(), "/oauth2/authorize");
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["client_id"], "client123");
        assert_eq!(pairs["redirect_uri"], "http://localhost:8976/callback");
        assert_eq!(pairs["scope"], "email openid phone");
        assert_eq!(pairs["code_challenge_method"], "S256");
        assert_eq!(pairs["state"], "xyz");
    }

    #[test]
    fn test_logout_url_uses_redirect_origin() {
        let dir = TempDir::new().unwrap();
        let url = identity(dir.path()).logout_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://auth.example.com/logout?client_id=client123&logout_uri=http%3A%2F%2Flocalhost%3A8976"
        );
    }

    #[test]
    fn test_pkce_challenge_is_s256() {
        let dir = TempDir::new().unwrap();
        let id = identity(dir.path());
        let verifier = id.generate_code_verifier();
        assert_eq!(verifier.len(), 128);
        // RFC 7636 appendix B test vector
        assert_eq!(
            id.generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_profile_from_id_token() {
        let token = id_token(serde_json::json!({"email": "user@example.com", "sub": "42"}));
        let profile = profile_from_id_token(&token).unwrap();
        assert_eq!(profile.email.as_deref(), Some("user@example.com"));
        assert_eq!(profile.sub.as_deref(), Some("42"));

        assert!(profile_from_id_token("not-a-jwt").is_none());
    }

    #[tokio::test]
    async fn test_restore_states() {
        let dir = TempDir::new().unwrap();
        let id = identity(dir.path());
        assert!(id.snapshot().is_loading);

        // No session file
        assert_eq!(id.restore().await, AuthSession::signed_out());

        // Valid session
        let stored = StoredSession {
            access_token: "at".to_string(),
            refresh_token: None,
            id_token: None,
            expires_at: Some(Utc::now() + ChronoDuration::hours(1)),
            profile: UserProfile {
                email: Some("user@example.com".to_string()),
                ..Default::default()
            },
        };
        id.save_session(&stored).unwrap();
        let session = id.restore().await;
        assert!(session.is_authenticated);
        assert_eq!(session.email(), Some("user@example.com"));
        assert_eq!(id.snapshot(), session);

        // Expired without refresh token
        let expired = StoredSession {
            expires_at: Some(Utc::now() - ChronoDuration::minutes(1)),
            ..stored
        };
        id.save_session(&expired).unwrap();
        assert_eq!(id.restore().await, AuthSession::signed_out());

        // Corrupt file surfaces as an error view
        std::fs::write(&id.session_path, "{").unwrap();
        let session = id.restore().await;
        assert!(session.error.is_some());
    }

    #[test]
    fn test_remove_user() {
        let dir = TempDir::new().unwrap();
        let id = identity(dir.path());
        id.remove_user().unwrap();

        std::fs::write(&id.session_path, "{}").unwrap();
        id.remove_user().unwrap();
        assert!(!id.session_path.exists());
        assert_eq!(id.snapshot(), AuthSession::signed_out());
    }

    #[test]
    fn test_refresh_keeps_previous_tokens() {
        let previous = StoredSession {
            access_token: "old".to_string(),
            refresh_token: Some("rt".to_string()),
            id_token: Some(id_token(serde_json::json!({"email": "a@b.c"}))),
            expires_at: None,
            profile: UserProfile {
                email: Some("a@b.c".to_string()),
                ..Default::default()
            },
        };
        let refreshed = StoredSession::from_tokens(
            TokenResponse {
                access_token: "new".to_string(),
                refresh_token: None,
                id_token: None,
                expires_in: Some(3600),
                token_type: Some("Bearer".to_string()),
            },
            Some(&previous),
        );
        assert_eq!(refreshed.access_token, "new");
        assert_eq!(refreshed.refresh_token.as_deref(), Some("rt"));
        assert_eq!(refreshed.profile.email.as_deref(), Some("a@b.c"));
        assert!(!refreshed.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_restore_refreshes_expired_session() {
        let dir = TempDir::new().unwrap();
        let stub = token_stub(axum::http::StatusCode::OK, None);
        let base = spawn_token_endpoint(stub.clone()).await;
        let id = identity_at(dir.path(), &base, 5);
        id.save_session(&expired_session()).unwrap();

        let session = id.restore().await;
        assert!(session.is_authenticated);
        assert_eq!(session.email(), Some("a@b.c"));

        let forms = stub.forms.lock().unwrap().clone();
        assert_eq!(forms.len(), 1);
        assert!(forms[0].contains("client_id=client123"));
        assert!(forms[0].contains("grant_type=refresh_token"));
        assert!(forms[0].contains("refresh_token=rt"));

        let written: StoredSession =
            serde_json::from_str(&std::fs::read_to_string(&id.session_path).unwrap()).unwrap();
        assert_eq!(written.access_token, "new");
        assert_eq!(written.refresh_token.as_deref(), Some("rt"));
        assert_eq!(written.profile.email.as_deref(), Some("a@b.c"));
        assert!(!written.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_rejected_refresh_signs_out() {
        let dir = TempDir::new().unwrap();
        let stub = token_stub(axum::http::StatusCode::BAD_REQUEST, None);
        let base = spawn_token_endpoint(stub.clone()).await;
        let id = identity_at(dir.path(), &base, 5);
        id.save_session(&expired_session()).unwrap();

        assert_eq!(id.restore().await, AuthSession::signed_out());
        assert_eq!(stub.forms.lock().unwrap().len(), 1);

        // The stale session stays on disk untouched
        let kept: StoredSession =
            serde_json::from_str(&std::fs::read_to_string(&id.session_path).unwrap()).unwrap();
        assert_eq!(kept.access_token, "old");
    }

    #[tokio::test]
    async fn test_slow_token_endpoint_times_out() {
        let dir = TempDir::new().unwrap();
        let stub = token_stub(axum::http::StatusCode::OK, Some(Duration::from_secs(3)));
        let base = spawn_token_endpoint(stub).await;
        let id = identity_at(dir.path(), &base, 1);
        id.save_session(&expired_session()).unwrap();

        let started = std::time::Instant::now();
        assert_eq!(id.restore().await, AuthSession::signed_out());
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
