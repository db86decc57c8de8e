// SPDX-License-Identifier: GPL-2.0-or-later
//
// An in-process catalog for exercising the handler and router without PostgreSQL.
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::{Catalog, NewSound, Sound};

#[derive(Debug, Default)]
pub(crate) struct MemoryCatalog {
    sounds: Mutex<Vec<Sound>>,
    /// How many times any method was called; each call stands in for one connection.
    connections: AtomicUsize,
    unavailable: bool,
}

impl MemoryCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A catalog whose every call fails the way an unreachable database does.
    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub(crate) fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub(crate) fn snapshot(&self) -> Vec<Sound> {
        self.sounds.lock().unwrap().clone()
    }

    fn open(&self) -> Result<(), crate::Error> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(crate::Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list(&self) -> Result<Vec<Sound>, crate::Error> {
        self.open()?;
        Ok(self.snapshot())
    }

    async fn create(&self, sound: NewSound) -> Result<Sound, crate::Error> {
        self.open()?;
        let mut sounds = self.sounds.lock().unwrap();
        let sound = Sound {
            id: sounds.last().map(|s| s.id + 1).unwrap_or(1),
            name: sound.name,
            emoji: sound.emoji,
            audio_url: sound.audio_url,
            plays: 0,
            created_at: chrono::Utc::now().naive_utc(),
        };
        sounds.push(sound.clone());
        Ok(sound)
    }

    async fn play(&self, id: i32) -> Result<Option<i32>, crate::Error> {
        self.open()?;
        let mut sounds = self.sounds.lock().unwrap();
        Ok(sounds.iter_mut().find(|s| s.id == id).map(|sound| {
            sound.plays += 1;
            sound.plays
        }))
    }

    async fn server_version(&self) -> Result<Option<u32>, crate::Error> {
        self.open()?;
        Ok(None)
    }
}
