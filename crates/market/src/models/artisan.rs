//! Artisan domain types.

use serde::{Deserialize, Serialize};

use terracotta_core::ArtisanId;

/// An artisan (seller) profile.
///
/// `followers` is the denormalized counter maintained by the follow ledger;
/// it always equals the number of follow edges pointing at this artisan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artisan {
    pub id: ArtisanId,
    pub name: String,
    pub followers: u32,
}
