// SPDX-License-Identifier: GPL-2.0-or-later
//
// Provides structures and functions for interacting with the database.
use async_trait::async_trait;

#[cfg(test)]
pub(crate) mod memory;
mod sound;

pub use sound::{add_sound, mark_played, sounds_list, NewSound, PgCatalog, Sound};

/// The storage behind the request handler.
///
/// Each method is one request's worth of work: implementations acquire whatever resources
/// they need when called and release them before returning, on success or failure. Nothing
/// is held between calls.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All sounds, ordered by id.
    async fn list(&self) -> Result<Vec<Sound>, crate::Error>;

    /// Insert a sound with zero plays and return the stored row.
    async fn create(&self, sound: NewSound) -> Result<Sound, crate::Error>;

    /// Increment the play counter of the sound with the given id.
    ///
    /// Returns the new counter, or `None` if no sound has that id.
    async fn play(&self, id: i32) -> Result<Option<i32>, crate::Error>;

    /// The backend's version, if it reports one; an error means it is unreachable.
    async fn server_version(&self) -> Result<Option<u32>, crate::Error>;
}
