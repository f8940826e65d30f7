//! Lenient parsing of hand-typed dates.
//!
//! Accepts ISO dates and date-times, numeric forms (`03/14/2024`, `14.03.24`,
//! `20240314`), and prose (`Thursday, March 14th 2024`, `applied on 3/14`).
//! Words that are not month names are skipped, as are clock times. Parsing is
//! total: anything that cannot be resolved to a calendar date yields `None`.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number { value: u32, digits: usize },
    Month(u32),
}

/// Parses `text` relative to today's local date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_date_with_reference(text, Local::now().date_naive())
}

/// Parses `text`, filling any component the text leaves out (year, month or
/// day) from `reference`.
pub fn parse_date_with_reference(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = parse_iso(trimmed) {
        return Some(date);
    }
    let tokens = tokenize(trimmed)?;
    resolve(&tokens, reference)
}

/// Renders a date in canonical `YYYY-MM-DD` form.
pub fn canonical_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_iso(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}

/// Splits free text into date-relevant tokens. Returns `None` when a token
/// makes the text unparseable (an over-long number).
fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    for chunk in text.split(|c: char| c.is_whitespace() || c == ',') {
        for part in date_parts(chunk)
            .into_iter()
            .flat_map(|piece| piece.split(['/', '-', '.']))
        {
            if part.is_empty() {
                continue;
            }
            let part = strip_ordinal(part);
            if part.chars().all(|c| c.is_ascii_digit()) {
                push_number(&mut tokens, part)?;
            } else if part.chars().all(char::is_alphabetic) {
                if let Some(month) = month_number(part) {
                    tokens.push(Token::Month(month));
                }
            }
        }
    }
    Some(tokens)
}

/// Splits a chunk on `:` and drops clock times, i.e. runs of two or three
/// numeric pieces (`10:30`, `10:30:00.5`). `applied:3/14` keeps `3/14`, and
/// `2024-03-14T10:30` keeps its date half.
fn date_parts(chunk: &str) -> Vec<&str> {
    let lower = chunk.to_ascii_lowercase();
    if chunk.is_empty() || matches!(lower.as_str(), "am" | "pm" | "a.m." | "p.m.") {
        return Vec::new();
    }
    if !chunk.contains(':') {
        return vec![chunk];
    }
    if let Some((date, _)) = chunk.split_once(['T', 't']) {
        if !date.is_empty() && date.chars().all(|c| c.is_ascii_digit() || "-/.".contains(c)) {
            return vec![date];
        }
    }

    let pieces: Vec<&str> = chunk.split(':').collect();
    let mut kept = Vec::new();
    let mut idx = 0;
    while idx < pieces.len() {
        let run = pieces[idx..]
            .iter()
            .take_while(|piece| is_clock_piece(piece))
            .count();
        if (2..=3).contains(&run) {
            idx += run;
        } else if run > 0 {
            kept.extend_from_slice(&pieces[idx..idx + run]);
            idx += run;
        } else {
            kept.push(pieces[idx]);
            idx += 1;
        }
    }
    kept
}

/// One or two digits, optionally followed by a fraction (seconds).
fn is_clock_piece(piece: &str) -> bool {
    let (whole, fraction) = piece.split_once('.').unwrap_or((piece, "0"));
    (1..=2).contains(&whole.len())
        && whole.chars().all(|c| c.is_ascii_digit())
        && !fraction.is_empty()
        && fraction.chars().all(|c| c.is_ascii_digit())
}

fn strip_ordinal(part: &str) -> &str {
    let lower = part.to_ascii_lowercase();
    for suffix in ["st", "nd", "rd", "th"] {
        if lower.ends_with(suffix) {
            let head = &part[..part.len() - suffix.len()];
            if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) {
                return head;
            }
        }
    }
    part
}

fn push_number(tokens: &mut Vec<Token>, digits: &str) -> Option<()> {
    match digits.len() {
        0 => {}
        1..=4 => tokens.push(Token::Number {
            value: digits.parse().ok()?,
            digits: digits.len(),
        }),
        // Compact YYYYMMDD.
        8 => {
            tokens.push(Token::Number {
                value: digits[..4].parse().ok()?,
                digits: 4,
            });
            tokens.push(Token::Number {
                value: digits[4..6].parse().ok()?,
                digits: 2,
            });
            tokens.push(Token::Number {
                value: digits[6..].parse().ok()?,
                digits: 2,
            });
        }
        _ => return None,
    }
    Some(())
}

/// Full month names, three-letter abbreviations, and `sept`.
fn month_number(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|name| *name == lower || (lower.len() == 3 && name.starts_with(lower.as_str())))
        .map(|idx| idx as u32 + 1)
}

#[derive(Debug, Default)]
struct Parts {
    year: Option<(u32, usize)>,
    month: Option<u32>,
    day: Option<u32>,
}

fn resolve(tokens: &[Token], reference: NaiveDate) -> Option<NaiveDate> {
    let mut months = tokens.iter().filter_map(|t| match t {
        Token::Month(m) => Some(*m),
        Token::Number { .. } => None,
    });
    let named_month = months.next();
    if months.next().is_some() {
        return None;
    }
    let numbers: Vec<(u32, usize)> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Number { value, digits } => Some((*value, *digits)),
            Token::Month(_) => None,
        })
        .collect();
    if named_month.is_none() && numbers.is_empty() {
        return None;
    }

    let parts = match named_month {
        Some(month) => assign_with_named_month(month, &numbers)?,
        None => assign_numeric(&numbers)?,
    };
    build_date(parts, reference)
}

fn looks_like_year((value, digits): (u32, usize)) -> bool {
    digits >= 3 || value > 31
}

fn assign_with_named_month(month: u32, numbers: &[(u32, usize)]) -> Option<Parts> {
    let mut parts = Parts {
        month: Some(month),
        ..Parts::default()
    };
    for &number in numbers {
        if looks_like_year(number) {
            if parts.year.is_some() {
                return None;
            }
            parts.year = Some(number);
        } else if parts.day.is_none() {
            parts.day = Some(number.0);
        } else if parts.year.is_none() {
            parts.year = Some(number);
        } else {
            return None;
        }
    }
    Some(parts)
}

/// Month-first ordering unless the numbers force otherwise.
fn assign_numeric(numbers: &[(u32, usize)]) -> Option<Parts> {
    let parts = match *numbers {
        [single] => {
            if looks_like_year(single) {
                Parts {
                    year: Some(single),
                    ..Parts::default()
                }
            } else {
                Parts {
                    day: Some(single.0),
                    ..Parts::default()
                }
            }
        }
        [first, second] => {
            if looks_like_year(first) {
                Parts {
                    year: Some(first),
                    month: Some(second.0),
                    ..Parts::default()
                }
            } else if looks_like_year(second) {
                Parts {
                    year: Some(second),
                    month: Some(first.0),
                    ..Parts::default()
                }
            } else if first.0 > 12 {
                Parts {
                    day: Some(first.0),
                    month: Some(second.0),
                    ..Parts::default()
                }
            } else {
                Parts {
                    month: Some(first.0),
                    day: Some(second.0),
                    ..Parts::default()
                }
            }
        }
        [first, second, third] => {
            if looks_like_year(first) {
                // Year-day-month only when the middle value cannot be a month.
                let (month, day) = if second.0 > 12 {
                    (third.0, second.0)
                } else {
                    (second.0, third.0)
                };
                Parts {
                    year: Some(first),
                    month: Some(month),
                    day: Some(day),
                }
            } else if first.0 > 12 {
                Parts {
                    day: Some(first.0),
                    month: Some(second.0),
                    year: Some(third),
                }
            } else {
                Parts {
                    month: Some(first.0),
                    day: Some(second.0),
                    year: Some(third),
                }
            }
        }
        _ => return None,
    };
    Some(parts)
}

fn build_date(parts: Parts, reference: NaiveDate) -> Option<NaiveDate> {
    let year = match parts.year {
        Some((value, digits)) if digits <= 2 => expand_two_digit_year(value, reference.year()),
        Some((value, _)) => i32::try_from(value).ok()?,
        None => reference.year(),
    };
    let month = parts.month.unwrap_or_else(|| reference.month());
    if !(1..=12).contains(&month) {
        return None;
    }
    match parts.day {
        Some(day) => NaiveDate::from_ymd_opt(year, month, day),
        None => {
            let day = reference.day().min(days_in_month(year, month)?);
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

/// Picks the century that puts the year within 50 years of `current`.
fn expand_two_digit_year(value: u32, current: i32) -> i32 {
    let value = value as i32;
    let mut year = current - current.rem_euclid(100) + value;
    if year >= current + 50 {
        year -= 100;
    } else if year < current - 50 {
        year += 100;
    }
    year
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn parse(text: &str) -> Option<String> {
        parse_date_with_reference(text, reference()).map(canonical_date)
    }

    #[test]
    fn parses_common_formats() {
        assert_eq!(parse("2024-03-14").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("03/14/2024").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("3/14/24").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("March 14 2024").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("Mar 14, 2024").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("14 March 2024").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("2024/03/14").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("20240314").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("14.03.2024").as_deref(), Some("2024-03-14"));
    }

    #[test]
    fn parses_datetimes_by_dropping_time() {
        assert_eq!(parse("2024-03-14T10:30:00").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("2024-03-14T23:30:00-05:00").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("2024-03-14 08:15").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("3/14/2024 10:30 am").as_deref(), Some("2024-03-14"));
    }

    #[test]
    fn fuzzy_text_skips_non_date_words() {
        assert_eq!(
            parse("Thursday, March 14th 2024").as_deref(),
            Some("2024-03-14")
        );
        assert_eq!(parse("applied on 3/14/2024 via site").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("sept 3rd 2023").as_deref(), Some("2023-09-03"));
        assert_eq!(parse("applied:3/14/2024").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("Date:03/14/2024").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("Date:03/14/2024 at 10:30:15").as_deref(), Some("2024-03-14"));
    }

    #[test]
    fn day_first_when_month_position_is_impossible() {
        assert_eq!(parse("14/03/2024").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("03/04/2024").as_deref(), Some("2024-03-04"));
    }

    #[test]
    fn missing_components_come_from_reference() {
        assert_eq!(parse("March 14").as_deref(), Some("2024-03-14"));
        assert_eq!(parse("3/14").as_deref(), Some("2024-03-14"));
        // Day 30 does not exist in February; clamp to the month's end.
        assert_eq!(parse("February 2023").as_deref(), Some("2023-02-28"));
    }

    #[test]
    fn two_digit_years_stay_near_reference() {
        assert_eq!(parse("1/2/99").as_deref(), Some("1999-01-02"));
        assert_eq!(parse("1/2/30").as_deref(), Some("2030-01-02"));
    }

    #[test]
    fn explicit_dates_ignore_the_clock() {
        assert_eq!(parse_date("2024-03-14"), NaiveDate::from_ymd_opt(2024, 3, 14));
        assert_eq!(parse_date("n/a"), None);
    }

    #[test]
    fn unparseable_input_is_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("soon"), None);
        assert_eq!(parse("13/13/2024"), None);
        assert_eq!(parse("2/30/2024"), None);
        assert_eq!(parse("1/2/3/4"), None);
        assert_eq!(parse("123456789"), None);
        assert_eq!(parse("March April 2024"), None);
        assert_eq!(parse("ask Marc"), None);
    }

    #[test]
    fn canonical_form_reparses_to_same_date() {
        for text in [
            "03/14/2024",
            "March 14 2024",
            "2024-03-14",
            "Jan 5",
            "1/2/99",
            "20231231",
        ] {
            let first = parse_date_with_reference(text, reference()).unwrap();
            let again = parse_date_with_reference(&canonical_date(first), reference()).unwrap();
            assert_eq!(first, again, "{text}");
        }
    }
}
