//! Translation of list/count query parameters into SQL predicates.
//!
//! Both the list and the count endpoint go through [`PlayerQuery::from_params`]
//! and [`push_where`], so the two always agree on which players match.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite};

use crate::error::ApiError;
use crate::models::{PlayerOrder, Profession, Race};

pub const DEFAULT_PAGE_SIZE: i64 = 3;
pub const DEFAULT_PAGE_NUMBER: i64 = 0;

/// Filterable columns. Column names never come from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Title,
    Birthday,
    Experience,
    Level,
}

impl Column {
    fn as_sql(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Title => "title",
            Column::Birthday => "birthday",
            Column::Experience => "experience",
            Column::Level => "level",
        }
    }
}

/// A single filter condition on the `player` table
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-sensitive substring match
    Contains(Column, String),
    AtLeast(Column, i64),
    AtMost(Column, i64),
    Banned(bool),
    Race(Race),
    Profession(Profession),
}

type BuildPredicate = fn(&str, &str) -> Result<Predicate, ApiError>;

// Optional filters, applied in this order when their key is present
const OPTIONAL_FILTERS: &[(&str, BuildPredicate)] = &[
    ("after", |k, v| Ok(Predicate::AtLeast(Column::Birthday, parse_int(k, v)?))),
    ("before", |k, v| Ok(Predicate::AtMost(Column::Birthday, parse_int(k, v)?))),
    ("banned", |k, v| Ok(Predicate::Banned(parse_bool(k, v)?))),
    ("minExperience", |k, v| Ok(Predicate::AtLeast(Column::Experience, parse_int(k, v)?))),
    ("maxExperience", |k, v| Ok(Predicate::AtMost(Column::Experience, parse_int(k, v)?))),
    ("minLevel", |k, v| Ok(Predicate::AtLeast(Column::Level, parse_int(k, v)?))),
    ("maxLevel", |k, v| Ok(Predicate::AtMost(Column::Level, parse_int(k, v)?))),
    ("race", |_, v| {
        v.parse::<Race>()
            .map(Predicate::Race)
            .map_err(|e| ApiError::bad_request(e.to_string()))
    }),
    ("profession", |_, v| {
        v.parse::<Profession>()
            .map(Predicate::Profession)
            .map_err(|e| ApiError::bad_request(e.to_string()))
    }),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: i64,
    pub number: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        self.size.saturating_mul(self.number)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            number: DEFAULT_PAGE_NUMBER,
        }
    }
}

/// Parsed list/count parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerQuery {
    pub predicates: Vec<Predicate>,
    pub order: PlayerOrder,
    pub page: Page,
}

impl PlayerQuery {
    /// Build from the raw query string map. Unknown keys are ignored; a recognised
    /// key with a malformed value is a bad request.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ApiError> {
        // name and title always apply; absent means the empty substring, which matches everything
        let mut predicates = vec![
            Predicate::Contains(Column::Name, params.get("name").cloned().unwrap_or_default()),
            Predicate::Contains(Column::Title, params.get("title").cloned().unwrap_or_default()),
        ];

        for &(key, build) in OPTIONAL_FILTERS {
            if let Some(value) = params.get(key) {
                predicates.push(build(key, value.as_str())?);
            }
        }

        let order = match params.get("order") {
            Some(value) => value
                .parse::<PlayerOrder>()
                .map_err(|e| ApiError::bad_request(e.to_string()))?,
            None => PlayerOrder::default(),
        };

        let page = Page {
            size: parse_page_value(params, "pageSize", DEFAULT_PAGE_SIZE)?,
            number: parse_page_value(params, "pageNumber", DEFAULT_PAGE_NUMBER)?,
        };
        if page.size.checked_mul(page.number).is_none() {
            return Err(ApiError::bad_request("pageSize * pageNumber is too large"));
        }

        Ok(Self {
            predicates,
            order,
            page,
        })
    }
}

/// Append ` WHERE p1 AND p2 ...` with every value bound as a parameter
pub fn push_where(builder: &mut QueryBuilder<'_, Sqlite>, predicates: &[Predicate]) {
    if predicates.is_empty() {
        return;
    }

    builder.push(" WHERE ");
    let mut first = true;
    for predicate in predicates {
        if !first {
            builder.push(" AND ");
        }
        first = false;

        match predicate {
            Predicate::Contains(column, needle) => {
                builder
                    .push("instr(")
                    .push(column.as_sql())
                    .push(", ")
                    .push_bind(needle.clone())
                    .push(") > 0");
            }
            Predicate::AtLeast(column, bound) => {
                builder.push(column.as_sql()).push(" >= ").push_bind(*bound);
            }
            Predicate::AtMost(column, bound) => {
                builder.push(column.as_sql()).push(" <= ").push_bind(*bound);
            }
            Predicate::Banned(banned) => {
                builder.push("banned = ").push_bind(*banned);
            }
            Predicate::Race(race) => {
                builder.push("race = ").push_bind(*race);
            }
            Predicate::Profession(profession) => {
                builder.push("profession = ").push_bind(*profession);
            }
        }
    }
}

fn parse_int(key: &str, value: &str) -> Result<i64, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("{} must be an integer, got '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ApiError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ApiError::bad_request(format!(
            "{} must be true or false, got '{}'",
            key, value
        )))
    }
}

fn parse_page_value(
    params: &HashMap<String, String>,
    key: &str,
    default: i64,
) -> Result<i64, ApiError> {
    let Some(value) = params.get(key) else {
        return Ok(default);
    };

    let parsed = parse_int(key, value)?;
    if parsed < 0 {
        return Err(ApiError::bad_request(format!("{} must not be negative", key)));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_no_params() {
        let query = PlayerQuery::from_params(&HashMap::new()).unwrap();
        assert_eq!(query.order, PlayerOrder::Id);
        assert_eq!(query.page, Page { size: 3, number: 0 });
        assert_eq!(
            query.predicates,
            vec![
                Predicate::Contains(Column::Name, String::new()),
                Predicate::Contains(Column::Title, String::new()),
            ]
        );
    }

    #[test]
    fn builds_predicates_in_fixed_order() {
        let query = PlayerQuery::from_params(&params(&[
            ("profession", "ROGUE"),
            ("minLevel", "2"),
            ("banned", "TRUE"),
            ("after", "946684800000"),
            ("name", "ab"),
        ]))
        .unwrap();

        assert_eq!(
            query.predicates,
            vec![
                Predicate::Contains(Column::Name, "ab".to_string()),
                Predicate::Contains(Column::Title, String::new()),
                Predicate::AtLeast(Column::Birthday, 946_684_800_000),
                Predicate::Banned(true),
                Predicate::AtLeast(Column::Level, 2),
                Predicate::Profession(Profession::Rogue),
            ]
        );
    }

    #[test]
    fn ignores_unknown_keys() {
        let query = PlayerQuery::from_params(&params(&[("colour", "red")])).unwrap();
        assert_eq!(query.predicates.len(), 2);
    }

    #[test]
    fn rejects_malformed_values() {
        for (key, value) in [
            ("order", "TITLE"),
            ("race", "WIZARD"),
            ("profession", "warrior"),
            ("minExperience", "lots"),
            ("before", "1.5"),
            ("banned", "yes"),
            ("pageSize", "-1"),
            ("pageNumber", "x"),
        ] {
            let result = PlayerQuery::from_params(&params(&[(key, value)]));
            assert!(matches!(result, Err(ApiError::BadRequest(_))), "{}={}", key, value);
        }
    }

    #[test]
    fn page_offset_is_size_times_number() {
        let query =
            PlayerQuery::from_params(&params(&[("pageSize", "5"), ("pageNumber", "2")])).unwrap();
        assert_eq!(query.page.offset(), 10);
    }

    #[test]
    fn rejects_page_offset_past_i64() {
        let result = PlayerQuery::from_params(&params(&[
            ("pageSize", "4000000000"),
            ("pageNumber", "4000000000"),
        ]));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let query = PlayerQuery::from_params(&params(&[
            ("pageSize", "4000000000"),
            ("pageNumber", "2"),
        ]))
        .unwrap();
        assert_eq!(query.page.offset(), 8_000_000_000);

        let page = Page { size: i64::MAX, number: 2 };
        assert_eq!(page.offset(), i64::MAX);
    }

    #[test]
    fn where_clause_binds_every_value() {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM player");
        push_where(
            &mut builder,
            &[
                Predicate::Contains(Column::Name, "x".to_string()),
                Predicate::AtMost(Column::Experience, 10),
                Predicate::Race(Race::Orc),
            ],
        );
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM player WHERE instr(name, ?) > 0 AND experience <= ? AND race = ?"
        );
    }
}
