use serde::{Deserialize, Serialize};

/// Full player record as returned by the directory collaborator
///
/// Ranking and Elo columns exist in storage but are never exposed through
/// the cache projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub ioc: String,
    pub hand: Option<String>,
    pub rank: Option<i32>,
    pub elo: Option<i32>,
}

/// Public projection of a player: id, names, and country code only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDto {
    #[serde(rename = "playerId")]
    pub player_id: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub ioc: String,
}

impl From<&PlayerRecord> for PlayerDto {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            player_id: record.player_id,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            ioc: record.ioc.clone(),
        }
    }
}

/// Authenticated actor, as supplied by the identity collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_dto_drops_ranking_fields() {
        let record = PlayerRecord {
            player_id: 104745,
            first_name: "Novak".to_string(),
            last_name: "Djokovic".to_string(),
            ioc: "SRB".to_string(),
            hand: Some("R".to_string()),
            rank: Some(1),
            elo: Some(2200),
        };

        let dto = PlayerDto::from(&record);
        assert_eq!(dto.player_id, 104745);
        assert_eq!(dto.first_name, "Novak");
        assert_eq!(dto.last_name, "Djokovic");
        assert_eq!(dto.ioc, "SRB");

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("rank").is_none());
        assert!(json.get("elo").is_none());
    }
}
