//! Follow ledger service: validation over the transactional store.
//!
//! The store guarantees edge+counter atomicity; this layer adds the request
//! checks (self-follow, artisan existence) and reports only confirmed state.

use thiserror::Error;
use tracing::instrument;

use terracotta_core::ArtisanId;

use crate::db::{FollowState, FollowStore, RepositoryError};
use crate::models::CurrentUser;

/// Follow operation failures.
#[derive(Debug, Error)]
pub enum FollowError {
    /// An artisan cannot follow themselves.
    #[error("you cannot follow yourself")]
    SelfFollow,

    /// The artisan does not exist.
    #[error("artisan {0} not found")]
    ArtisanNotFound(ArtisanId),

    /// Storage failed; the ledger is unchanged.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// The follow ledger.
pub struct FollowLedger<S> {
    store: S,
}

impl<S: FollowStore> FollowLedger<S> {
    /// Create a ledger over a follow store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Follow an artisan. Idempotent: a repeated follow is a no-op for both
    /// the edge and the counter.
    ///
    /// # Errors
    ///
    /// `SelfFollow` when the user sells as this artisan, `ArtisanNotFound`
    /// when the artisan does not exist, `Store` on storage failure.
    #[instrument(skip(self), fields(user = %user.id))]
    pub async fn follow(
        &self,
        user: &CurrentUser,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, FollowError> {
        if user.artisan_id == Some(artisan_id) {
            return Err(FollowError::SelfFollow);
        }

        if self.store.get_artisan(artisan_id).await?.is_none() {
            return Err(FollowError::ArtisanNotFound(artisan_id));
        }

        match self.store.follow(user.id, artisan_id).await {
            Ok(state) => Ok(state),
            // The artisan vanished between the existence check and the
            // transaction; report it the same way.
            Err(RepositoryError::NotFound) => Err(FollowError::ArtisanNotFound(artisan_id)),
            Err(e) => Err(FollowError::Store(e)),
        }
    }

    /// Unfollow an artisan. The counter never goes negative, and a missing
    /// artisan record is tolerated (the edge is still removed).
    ///
    /// # Errors
    ///
    /// `Store` on storage failure.
    #[instrument(skip(self), fields(user = %user.id))]
    pub async fn unfollow(
        &self,
        user: &CurrentUser,
        artisan_id: ArtisanId,
    ) -> Result<FollowState, FollowError> {
        Ok(self.store.unfollow(user.id, artisan_id).await?)
    }
}
