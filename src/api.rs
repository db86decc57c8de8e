// SPDX-License-Identifier: GPL-2.0-or-later
/// Defines public-facing structures used in the API
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{db, timestamp_serializer};

/// The emoji a sound gets when the client doesn't pick one.
pub const DEFAULT_EMOJI: &str = "🔊";

/// A sound button.
#[derive(Clone, Debug, Serialize)]
pub struct Sound {
    /// The unique identifier for the sound and primary key for the table.
    pub id: i32,
    /// The label shown on the button.
    pub name: String,
    pub emoji: String,
    /// Where the client fetches the audio from.
    pub audio_url: String,
    /// Number of times the sound has been played.
    pub plays: i32,
    /// The time when the sound was added to the database.
    #[serde(serialize_with = "timestamp_serializer")]
    pub created_at: NaiveDateTime,
}

impl From<db::Sound> for Sound {
    fn from(sound: db::Sound) -> Self {
        Self {
            id: sound.id,
            name: sound.name,
            emoji: sound.emoji,
            audio_url: sound.audio_url,
            plays: sound.plays,
            created_at: sound.created_at,
        }
    }
}

/// Body of a request to add a sound.
///
/// Every field is optional at this layer so that a missing field can be reported as a
/// validation failure rather than a deserialization error.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateSound {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub audio_url: Option<String>,
}

/// Body of a request acknowledging that a sound was played.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PlaySound {
    pub id: Option<i32>,
}

/// The play count of a sound after it was incremented.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Plays {
    pub plays: i32,
}

/// Body of every non-2xx response the handler produces.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorMessage {
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Status {
    pub db_version: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_field_order_and_timestamp() {
        let created_at = NaiveDateTime::parse_from_str("2024-05-01 13:37:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let sound = Sound {
            id: 1,
            name: "Laugh".into(),
            emoji: DEFAULT_EMOJI.into(),
            audio_url: "https://x/a.mp3".into(),
            plays: 0,
            created_at,
        };

        assert_eq!(
            serde_json::to_string(&sound).unwrap(),
            r#"{"id":1,"name":"Laugh","emoji":"🔊","audio_url":"https://x/a.mp3","plays":0,"created_at":"2024-05-01 13:37:00"}"#
        );
    }

    #[test]
    fn test_timestamp_keeps_fraction() {
        let created_at =
            NaiveDateTime::parse_from_str("2024-05-01 13:37:00.123456", "%Y-%m-%d %H:%M:%S%.f")
                .unwrap();
        let value = serde_json::to_value(Sound {
            id: 2,
            name: "Bruh".into(),
            emoji: "😑".into(),
            audio_url: "https://x/b.mp3".into(),
            plays: 3,
            created_at,
        })
        .unwrap();

        assert_eq!(value["created_at"], "2024-05-01 13:37:00.123456");
    }

    #[test]
    fn test_timestamp_fraction_has_six_digits() {
        for (stored, rendered) in [
            ("2024-05-01 13:37:00.120000", "2024-05-01 13:37:00.120000"),
            ("2024-05-01 13:37:00.5", "2024-05-01 13:37:00.500000"),
            ("2024-05-01 13:37:00.000001", "2024-05-01 13:37:00.000001"),
        ] {
            let created_at =
                NaiveDateTime::parse_from_str(stored, "%Y-%m-%d %H:%M:%S%.f").unwrap();
            let value = serde_json::to_value(Sound {
                id: 3,
                name: "Wow".into(),
                emoji: DEFAULT_EMOJI.into(),
                audio_url: "https://x/c.mp3".into(),
                plays: 0,
                created_at,
            })
            .unwrap();

            assert_eq!(value["created_at"], rendered);
        }
    }
}
