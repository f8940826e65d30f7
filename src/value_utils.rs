/// Cell spellings that spreadsheet exports use for "no value".
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

/// Trims a cell and maps every missing marker to `None`.
pub fn clean_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if is_missing_marker(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cases a letter that follows a non-letter and lower-cases the rest,
/// so `"in PROGRESS"` becomes `"In Progress"`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_is_letter = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_maps_markers_to_none() {
        assert_eq!(clean_text(None), None);
        assert_eq!(clean_text(Some("   ")), None);
        assert_eq!(clean_text(Some(" nan ")), None);
        assert_eq!(clean_text(Some("None")), None);
        assert_eq!(clean_text(Some("N/A")), None);
        assert_eq!(clean_text(Some("  Acme ")), Some("Acme".to_string()));
        // Markers are matched exactly, not as substrings.
        assert_eq!(clean_text(Some("Nancy")), Some("Nancy".to_string()));
    }

    #[test]
    fn collapse_whitespace_handles_tabs_and_newlines() {
        assert_eq!(collapse_whitespace("  Senior \t Rust\n\nEngineer "), "Senior Rust Engineer");
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("applied"), "Applied");
        assert_eq!(title_case("INTERVIEWING"), "Interviewing");
        assert_eq!(title_case("in PROGRESS"), "In Progress");
        assert_eq!(title_case("on-site"), "On-Site");
        assert_eq!(title_case("2nd round"), "2Nd Round");
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some(" ")));
        assert!(!is_blank(Some("x")));
    }
}
