// SPDX-License-Identifier: GPL-2.0-or-later
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{postgres::PgConnectOptions, ConnectOptions, Connection, PgConnection};
use tracing::{debug, info, instrument, warn};

use super::Catalog;

/// Representation of a sound button in the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Sound {
    /// Unique identifier for the sound; the primary key for the table.
    pub id: i32,
    /// The label shown on the button.
    pub name: String,
    pub emoji: String,
    /// Where the client fetches the audio from.
    pub audio_url: String,
    /// Number of times the sound has been played.
    pub plays: i32,
    /// The time when the sound was added to the database.
    pub created_at: NaiveDateTime,
}

/// A validated sound that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSound {
    pub name: String,
    pub emoji: String,
    pub audio_url: String,
}

/// List all sounds in the database, ordered by id. No pagination is performed.
#[instrument(skip_all)]
pub async fn sounds_list(connection: &mut PgConnection) -> Result<Vec<Sound>, crate::Error> {
    sqlx::query_as::<_, Sound>(
        "
        SELECT id, name, emoji, audio_url, plays, created_at
        FROM sounds
        ORDER BY id;
        ",
    )
    .fetch_all(&mut *connection)
    .await
    .map_err(crate::Error::Database)
}

/// Insert a new sound with a play count of zero.
///
/// # Returns
///
/// The row as stored, including the id and creation time the database assigned.
#[instrument(skip(connection))]
pub async fn add_sound(
    connection: &mut PgConnection,
    sound: &NewSound,
) -> Result<Sound, crate::Error> {
    let sound = sqlx::query_as::<_, Sound>(
        "
        INSERT INTO sounds (name, emoji, audio_url, plays)
        VALUES ($1, $2, $3, 0)
        RETURNING id, name, emoji, audio_url, plays, created_at;
        ",
    )
    .bind(&sound.name)
    .bind(&sound.emoji)
    .bind(&sound.audio_url)
    .fetch_one(&mut *connection)
    .await?;
    info!(id = sound.id, "Added sound '{}'", &sound.name);
    Ok(sound)
}

/// Mark a sound as played by incrementing its play counter.
///
/// The increment happens inside the single UPDATE statement, so concurrent plays of the
/// same sound can't lose counts.
///
/// # Returns
///
/// The new play count, or `None` if there's no sound with the given id.
#[instrument(skip(connection))]
pub async fn mark_played(
    connection: &mut PgConnection,
    id: i32,
) -> Result<Option<i32>, crate::Error> {
    sqlx::query_scalar::<_, i32>(
        "
        UPDATE sounds
        SET plays = plays + 1
        WHERE id = $1
        RETURNING plays;
        ",
    )
    .bind(id)
    .fetch_optional(&mut *connection)
    .await
    .map_err(crate::Error::Database)
}

/// A [`Catalog`] backed by PostgreSQL.
///
/// Only the connect options are kept; every call opens its own connection and closes it
/// before returning. If a call fails part way, dropping the connection (and any open
/// transaction) releases it without committing.
#[derive(Clone, Debug)]
pub struct PgCatalog {
    options: PgConnectOptions,
}

impl PgCatalog {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }

    /// Build a catalog from a URL in the format "postgres://<user>:<pass>@host/database_name".
    pub fn from_url(url: &str) -> Result<Self, crate::Error> {
        PgConnectOptions::from_str(url)
            .map(Self::new)
            .map_err(|err| crate::Error::ConfigValueError(format!("invalid database_url: {err}")))
    }

    async fn connect(&self) -> Result<PgConnection, crate::Error> {
        debug!("Opening database connection");
        Ok(self.options.connect().await?)
    }
}

/// Close a connection, logging rather than failing if the goodbye doesn't go through.
async fn release(connection: PgConnection) {
    if let Err(err) = connection.close().await {
        warn!(err = ?err, "Failed to close the database connection cleanly");
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    #[instrument(skip_all)]
    async fn list(&self) -> Result<Vec<Sound>, crate::Error> {
        let mut conn = self.connect().await?;
        let sounds = sounds_list(&mut conn).await?;
        release(conn).await;
        Ok(sounds)
    }

    #[instrument(skip(self))]
    async fn create(&self, sound: NewSound) -> Result<Sound, crate::Error> {
        let mut conn = self.connect().await?;
        let mut transaction = conn.begin().await?;
        let sound = add_sound(&mut transaction, &sound).await?;
        transaction.commit().await?;
        release(conn).await;
        Ok(sound)
    }

    #[instrument(skip(self))]
    async fn play(&self, id: i32) -> Result<Option<i32>, crate::Error> {
        let mut conn = self.connect().await?;
        let mut transaction = conn.begin().await?;
        let plays = mark_played(&mut transaction, id).await?;
        transaction.commit().await?;
        release(conn).await;
        Ok(plays)
    }

    #[instrument(skip_all)]
    async fn server_version(&self) -> Result<Option<u32>, crate::Error> {
        let conn = self.connect().await?;
        let version = conn.server_version_num();
        release(conn).await;
        Ok(version)
    }
}
