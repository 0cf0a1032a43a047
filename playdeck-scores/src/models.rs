use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Games that record scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Snake,
    Laser,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Laser => "laser",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snake" => Ok(GameKind::Snake),
            "laser" => Ok(GameKind::Laser),
            other => Err(format!("unknown game type: {other}")),
        }
    }
}

/// A recorded score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_type: GameKind,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a score submission.
#[derive(Debug, Clone)]
pub struct NewScore {
    pub user_id: Uuid,
    pub game_type: GameKind,
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_round_trip() {
        assert_eq!("snake".parse::<GameKind>().unwrap(), GameKind::Snake);
        assert_eq!("laser".parse::<GameKind>().unwrap(), GameKind::Laser);
        assert!("tetris".parse::<GameKind>().is_err());
    }

    #[test]
    fn test_game_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GameKind::Laser).unwrap(), "\"laser\"");
    }
}
