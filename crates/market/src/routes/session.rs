//! Session login/logout routes.
//!
//! There is no password flow here; an upstream identity service hands
//! the gateway a verified profile and this route binds it to the session.

use axum::Json;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::{CurrentUser, session_keys};

/// Login/logout acknowledgement.
#[derive(Debug, Serialize)]
pub struct SessionAck {
    pub ok: bool,
}

/// Bind a verified user profile to the session.
#[instrument(skip(session, user), fields(user_id = %user.id))]
pub async fn login(session: Session, Json(user): Json<CurrentUser>) -> Result<Json<SessionAck>> {
    session.insert(session_keys::CURRENT_USER, &user).await?;
    Ok(Json(SessionAck { ok: true }))
}

/// Drop the session, including any cart it was carrying.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<SessionAck>> {
    session.flush().await?;
    Ok(Json(SessionAck { ok: true }))
}
