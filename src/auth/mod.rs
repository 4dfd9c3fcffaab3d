//! Authentication: the session gate and the hosted identity provider
//!
//! The gate only reads session snapshots. Everything that changes the session
//! (sign-in, refresh, removal) belongs to the identity provider.

mod oauth;
mod session;

pub use oauth::{profile_from_id_token, HostedIdentity, StoredSession, TokenResponse};
pub use session::{
    sign_out, AuthSession, BrowserNavigator, ErrorInfo, GateView, IdentityProvider, Navigator,
    SessionGate, User, UserProfile,
};
