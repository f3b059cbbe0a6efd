use std::fmt;
use std::str::FromStr;

use serde::de::{self, value::StrDeserializer, DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};

pub mod level;

/// Player row from the `player` table, also the API response shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    /// Epoch milliseconds
    pub birthday: i64,
    pub experience: i64,
    pub level: i64,
    pub until_next_level: i64,
    pub banned: bool,
}

/// Incoming player body for create and update.
///
/// Every field is independently present or absent. On create all required
/// fields must be present; on update only present fields overwrite the
/// stored record. Client-supplied `id`, `level` and `untilNextLevel` are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub birthday: Option<i64>,
    pub experience: Option<i64>,
    pub banned: Option<bool>,
}

impl PlayerPayload {
    /// Fill every absent field from the stored record
    pub fn merged_onto(self, stored: &Player) -> PlayerPayload {
        PlayerPayload {
            name: self.name.or_else(|| Some(stored.name.clone())),
            title: self.title.or_else(|| Some(stored.title.clone())),
            race: self.race.or(Some(stored.race)),
            profession: self.profession.or(Some(stored.profession)),
            birthday: self.birthday.or(Some(stored.birthday)),
            experience: self.experience.or(Some(stored.experience)),
            banned: self.banned.or(Some(stored.banned)),
        }
    }
}

/// A validated player ready to be written, derived fields included
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    pub birthday: i64,
    pub experience: i64,
    pub level: i64,
    pub until_next_level: i64,
    pub banned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Giant,
    Orc,
    Troll,
    Hobbit,
}

impl FromStr for Race {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbol("race", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Nazgul,
    Warlock,
    Druid,
}

impl FromStr for Profession {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbol("profession", s)
    }
}

/// Columns a player list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
    Level,
}

impl PlayerOrder {
    pub fn column(&self) -> &'static str {
        match self {
            PlayerOrder::Id => "id",
            PlayerOrder::Name => "name",
            PlayerOrder::Experience => "experience",
            PlayerOrder::Birthday => "birthday",
            PlayerOrder::Level => "level",
        }
    }
}

impl FromStr for PlayerOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_symbol("order", s)
    }
}

// Query strings carry the same symbolic names as JSON bodies, so both go through serde
fn parse_symbol<T: DeserializeOwned>(kind: &'static str, s: &str) -> Result<T, UnknownVariant> {
    let deserializer: StrDeserializer<'_, de::value::Error> = s.into_deserializer();
    T::deserialize(deserializer).map_err(|_| UnknownVariant::new(kind, s))
}

/// A symbolic name outside one of the closed sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Player {
        Player {
            id: 7,
            name: "Abc".to_string(),
            title: "Knight".to_string(),
            race: Race::Human,
            profession: Profession::Warrior,
            birthday: 946_684_800_000,
            experience: 100,
            level: 1,
            until_next_level: 200,
            banned: false,
        }
    }

    #[test]
    fn serializes_with_camel_case_and_symbolic_enums() {
        let json = serde_json::to_value(stored()).unwrap();
        assert_eq!(json["untilNextLevel"], 200);
        assert_eq!(json["race"], "HUMAN");
        assert_eq!(json["profession"], "WARRIOR");
        assert_eq!(json["birthday"], 946_684_800_000i64);
    }

    #[test]
    fn payload_rejects_unknown_enum_names() {
        let result: Result<PlayerPayload, _> = serde_json::from_str(r#"{"race":"WIZARD"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn payload_ignores_derived_fields() {
        let payload: PlayerPayload =
            serde_json::from_str(r#"{"id":3,"level":99,"untilNextLevel":1,"name":"Zed"}"#).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Zed"));
        assert!(payload.experience.is_none());
    }

    #[test]
    fn merge_keeps_stored_values_for_absent_fields() {
        let payload = PlayerPayload {
            title: Some("Lord".to_string()),
            banned: Some(true),
            ..Default::default()
        };
        let merged = payload.merged_onto(&stored());
        assert_eq!(merged.name.as_deref(), Some("Abc"));
        assert_eq!(merged.title.as_deref(), Some("Lord"));
        assert_eq!(merged.banned, Some(true));
        assert_eq!(merged.experience, Some(100));
    }

    #[test]
    fn parses_symbolic_names_case_sensitively() {
        assert_eq!("ELF".parse::<Race>(), Ok(Race::Elf));
        assert!("elf".parse::<Race>().is_err());
        assert_eq!("NAZGUL".parse::<Profession>(), Ok(Profession::Nazgul));
        assert_eq!("LEVEL".parse::<PlayerOrder>(), Ok(PlayerOrder::Level));
        let err = "TITLE".parse::<PlayerOrder>().unwrap_err();
        assert_eq!(err.to_string(), "unknown order 'TITLE'");
    }

    #[test]
    fn query_names_match_json_names() {
        for race in [Race::Dwarf, Race::Hobbit] {
            let name = serde_json::to_value(race).unwrap();
            assert_eq!(name.as_str().unwrap().parse::<Race>(), Ok(race));
        }
        assert_eq!(serde_json::to_value(Profession::Druid).unwrap(), "DRUID");
        assert_eq!("DRUID".parse::<Profession>(), Ok(Profession::Druid));
    }
}
