use crate::error::ApiError;
use crate::models::{level, NewPlayer, PlayerPayload};

pub const MAX_NAME_LENGTH: usize = 12;
pub const MAX_TITLE_LENGTH: usize = 30;
pub const MAX_EXPERIENCE: i64 = 10_000_000;

/// 2000-01-01T00:00:00Z in epoch milliseconds, inclusive
pub const MIN_BIRTHDAY: i64 = 946_684_800_000;
/// 3000-01-01T00:00:00Z in epoch milliseconds, exclusive
pub const MAX_BIRTHDAY: i64 = 32_503_680_000_000;

/// Parse a path identifier. Anything that is not a positive integer is a bad request.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid player id '{}'", raw)))?;

    if id < 1 {
        return Err(ApiError::bad_request(format!("invalid player id '{}'", raw)));
    }

    Ok(id)
}

/// Check a complete payload and turn it into a writable player with derived fields set.
/// `banned` defaults to false when absent.
pub fn validate(payload: PlayerPayload) -> Result<NewPlayer, ApiError> {
    let PlayerPayload {
        name,
        title,
        race,
        profession,
        birthday,
        experience,
        banned,
    } = payload;

    let name = name.ok_or_else(|| missing("name"))?;
    let title = title.ok_or_else(|| missing("title"))?;
    let race = race.ok_or_else(|| missing("race"))?;
    let profession = profession.ok_or_else(|| missing("profession"))?;
    let birthday = birthday.ok_or_else(|| missing("birthday"))?;
    let experience = experience.ok_or_else(|| missing("experience"))?;

    let name_length = name.chars().count();
    if name_length == 0 || name_length > MAX_NAME_LENGTH {
        return Err(ApiError::bad_request(format!(
            "name must be 1 to {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ApiError::bad_request(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    if !(MIN_BIRTHDAY..MAX_BIRTHDAY).contains(&birthday) {
        return Err(ApiError::bad_request(
            "birthday must fall between the years 2000 and 3000",
        ));
    }
    if !(0..=MAX_EXPERIENCE).contains(&experience) {
        return Err(ApiError::bad_request(format!(
            "experience must be between 0 and {}",
            MAX_EXPERIENCE
        )));
    }

    let (level, until_next_level) = level::characteristics(experience);

    Ok(NewPlayer {
        name,
        title,
        race,
        profession,
        birthday,
        experience,
        level,
        until_next_level,
        banned: banned.unwrap_or(false),
    })
}

fn missing(field: &str) -> ApiError {
    ApiError::bad_request(format!("{} is required", field))
}
