//! Session hydration against the identity provider. Only non-sensitive session
//! metadata is kept in memory; the session cookie stays inside the HTTP client.

use super::IdentityProvider;
use crate::gate::{SessionSource, SessionStatus, WatchSession};
use serde::Deserialize;
use std::cell::RefCell;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct UserSession {
    pub user: Option<SessionUser>,
    pub expires: Option<String>,
}

/// `SessionSource` that resolves its status from the provider's session endpoint.
pub struct ProviderSession {
    provider: IdentityProvider,
    status: WatchSession,
    session: RefCell<Option<UserSession>>,
}

impl ProviderSession {
    #[must_use]
    pub fn new(provider: IdentityProvider) -> Self {
        Self {
            provider,
            status: WatchSession::new(),
            session: RefCell::new(None),
        }
    }

    /// Fetches the session and publishes the resulting status. Also used to
    /// refresh after sign-in. A failed fetch counts as signed out.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> SessionStatus {
        let status = match self.provider.fetch_session().await {
            Ok(Some(session)) => {
                info!("existing session found");
                *self.session.borrow_mut() = Some(session);
                SessionStatus::Authenticated
            }
            Ok(None) => {
                *self.session.borrow_mut() = None;
                SessionStatus::Unauthenticated
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch session");
                *self.session.borrow_mut() = None;
                SessionStatus::Unauthenticated
            }
        };

        self.status.publish(status);
        status
    }

    /// Session metadata from the last successful hydration.
    #[must_use]
    pub fn session(&self) -> Option<UserSession> {
        self.session.borrow().clone()
    }
}

impl SessionSource for ProviderSession {
    fn status(&self) -> SessionStatus {
        self.status.status()
    }

    fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }
}
