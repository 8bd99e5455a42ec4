use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::value_objects::users::UserModel,
    infrastructure::axum_http::error_responses::AppError,
};

pub const SESSION_COOKIE: &str = "streamflow_session";

const PRUNE_INTERVAL_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug)]
struct Session {
    user: Option<UserModel>,
    flash: Option<Flash>,
    last_seen: DateTime<Utc>,
}

/// Per-browser state. A session is created on the first request without a live cookie and
/// discarded on logout or once it has been idle longer than the TTL.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    last_pruned: Mutex<DateTime<Utc>>,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64, cookie_secure: bool) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            last_pruned: Mutex::new(Utc::now()),
            ttl: Duration::minutes(ttl_minutes),
            cookie_secure,
        }
    }

    pub fn start(&self) -> Uuid {
        let now = Utc::now();
        let session_id = Uuid::new_v4();
        let mut sessions = self.sessions.write();

        // Expired sessions are swept here, at most once per interval, rather than by a
        // background task.
        if self.prune_due(now) {
            let ttl = self.ttl;
            let before = sessions.len();
            sessions.retain(|_, session| now - session.last_seen <= ttl);
            debug!(pruned = before - sessions.len(), "session: pruned expired");
        }
        sessions.insert(
            session_id,
            Session {
                user: None,
                flash: None,
                last_seen: now,
            },
        );

        debug!(active_sessions = sessions.len(), "session: started");
        session_id
    }

    fn prune_due(&self, now: DateTime<Utc>) -> bool {
        let mut last_pruned = self.last_pruned.lock();
        if now - *last_pruned < Duration::seconds(PRUNE_INTERVAL_SECONDS) {
            return false;
        }
        *last_pruned = now;
        true
    }

    /// Refreshes the idle timer. False when the session is unknown or has expired.
    pub fn touch(&self, session_id: Uuid) -> bool {
        let now = Utc::now();
        let mut sessions = self.sessions.write();

        match sessions.get_mut(&session_id) {
            Some(session) if now - session.last_seen <= self.ttl => {
                session.last_seen = now;
                true
            }
            Some(_) => {
                sessions.remove(&session_id);
                debug!("session: expired");
                false
            }
            None => false,
        }
    }

    pub fn user(&self, session_id: Uuid) -> Option<UserModel> {
        self.sessions
            .read()
            .get(&session_id)
            .and_then(|session| session.user.clone())
    }

    pub fn sign_in(&self, session_id: Uuid, user: UserModel) {
        if let Some(session) = self.sessions.write().get_mut(&session_id) {
            session.user = Some(user);
        }
    }

    pub fn end(&self, session_id: Uuid) {
        self.sessions.write().remove(&session_id);
    }

    pub fn set_flash(&self, session_id: Uuid, flash: Flash) {
        if let Some(session) = self.sessions.write().get_mut(&session_id) {
            session.flash = Some(flash);
        }
    }

    pub fn take_flash(&self, session_id: Uuid) -> Option<Flash> {
        self.sessions
            .write()
            .get_mut(&session_id)
            .and_then(|session| session.flash.take())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cookie(&self, session_id: Uuid) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session_id.to_string()))
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// The current request's session, placed in request extensions by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    store: Arc<SessionStore>,
}

impl SessionHandle {
    pub fn user(&self) -> Option<UserModel> {
        self.store.user(self.id)
    }

    pub fn sign_in(&self, user: UserModel) {
        self.store.sign_in(self.id, user);
    }

    pub fn sign_out(&self) {
        self.store.end(self.id);
    }

    pub fn flash(&self, kind: FlashKind, message: impl Into<String>) {
        self.store.set_flash(
            self.id,
            Flash {
                kind,
                message: message.into(),
            },
        );
    }

    pub fn take_flash(&self) -> Option<Flash> {
        self.store.take_flash(self.id)
    }
}

pub async fn session_middleware(
    State(sessions): State<Arc<SessionStore>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .filter(|session_id| sessions.touch(*session_id));

    let (session_id, is_new) = match existing {
        Some(session_id) => (session_id, false),
        None => (sessions.start(), true),
    };

    request.extensions_mut().insert(SessionHandle {
        id: session_id,
        store: Arc::clone(&sessions),
    });

    let response = next.run(request).await;

    if is_new {
        (jar.add(sessions.cookie(session_id)), response).into_response()
    } else {
        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session middleware is not installed")))
    }
}

/// A signed-in user. Pages that take this send anonymous visitors to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserModel,
    pub session: SessionHandle,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionHandle::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session.user() {
            Some(user) => Ok(CurrentUser { user, session }),
            None => Err(Redirect::to("/login").into_response()),
        }
    }
}
