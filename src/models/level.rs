//! Level progression derived from experience.
//!
//! Level `n` is reached at `50 * n * (n + 1)` experience, so
//! `level = floor((sqrt(2500 + 200 * experience) - 50) / 100)` and the
//! experience still needed for the next level is
//! `50 * (level + 1) * (level + 2) - experience`.

/// Level for a non-negative experience total
pub fn level_for(experience: i64) -> i64 {
    let experience = experience.max(0);
    ((2500 + 200 * experience).isqrt() - 50) / 100
}

/// Experience remaining until `level + 1`
pub fn until_next_level(level: i64, experience: i64) -> i64 {
    50 * (level + 1) * (level + 2) - experience
}

/// Both derived fields for an experience total
pub fn characteristics(experience: i64) -> (i64, i64) {
    let level = level_for(experience);
    (level, until_next_level(level, experience))
}
