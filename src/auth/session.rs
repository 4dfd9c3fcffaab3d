//! Session snapshot and the gate that maps it to a view

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::AuthError;

/// Claims read from the identity token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub profile: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
}

/// Snapshot of the identity collaborator's state; never mutated by the gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,
    pub is_authenticated: bool,
    pub user: Option<User>,
}

impl AuthSession {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(ErrorInfo {
                message: message.into(),
            }),
            ..Default::default()
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.profile.email.as_deref())
    }
}

/// Exactly one of these is shown per render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    Loading,
    Error { message: String },
    Login,
    Authenticated { email: String },
    /// Development mode: authentication skipped
    DevBypass,
}

impl GateView {
    /// Whether the summarizer screen is reachable from this view
    pub fn allows_workbench(&self) -> bool {
        matches!(self, Self::Authenticated { .. } | Self::DevBypass)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGate {
    dev_bypass: bool,
}

impl SessionGate {
    pub fn new(dev_bypass: bool) -> Self {
        Self { dev_bypass }
    }

    pub fn evaluate(&self, session: &AuthSession) -> GateView {
        if self.dev_bypass {
            return GateView::DevBypass;
        }
        if session.is_loading {
            return GateView::Loading;
        }
        if let Some(error) = &session.error {
            return GateView::Error {
                message: error.message.clone(),
            };
        }
        if session.is_authenticated {
            return GateView::Authenticated {
                email: session.email().unwrap_or_default().to_string(),
            };
        }
        GateView::Login
    }
}

/// Hosted identity provider as seen by the application
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current session snapshot
    fn snapshot(&self) -> AuthSession;

    /// Run the hosted sign-in and return the resulting snapshot
    async fn signin_redirect(&self, navigator: &dyn Navigator) -> Result<AuthSession, AuthError>;

    /// Forget the local session
    fn remove_user(&self) -> Result<(), AuthError>;

    /// Hosted logout endpoint for this client
    fn logout_url(&self) -> Result<Url, AuthError>;
}

/// Opens URLs outside the application (the system browser)
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &Url) -> anyhow::Result<()> {
        open::that(url.as_str())?;
        Ok(())
    }
}

/// Clear the local session, then hand off to the hosted logout page
///
/// Never fails: a session that cannot be removed or a browser that cannot be
/// opened is logged, and the logout URL is returned for the caller to show.
pub fn sign_out(identity: &dyn IdentityProvider, navigator: &dyn Navigator) -> Option<Url> {
    if let Err(e) = identity.remove_user() {
        tracing::warn!("Failed to remove local session: {}", e);
    }

    let url = match identity.logout_url() {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Cannot build logout URL: {}", e);
            return None;
        }
    };

    if let Err(e) = navigator.navigate(&url) {
        tracing::warn!("Failed to open browser: {}", e);
    }
    Some(url)
}
