use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateFormat {
    /// AB12CDE
    Current,
    /// A123BCD
    Prefix,
    /// ABC123D
    Suffix,
    /// AB12, the region and age part of a split current plate
    PartialRegionAge,
    /// CDE, the random letters of a split current plate
    PartialLetters,
    /// ABC1234
    Dateless,
}

impl PlateFormat {
    /// Partial shapes only validate OCR fragments and are never reported as a plate.
    pub fn is_complete(&self) -> bool {
        !matches!(
            self,
            PlateFormat::PartialRegionAge | PlateFormat::PartialLetters
        )
    }
}

impl Display for PlateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlateFormat::Current => write!(f, "current"),
            PlateFormat::Prefix => write!(f, "prefix"),
            PlateFormat::Suffix => write!(f, "suffix"),
            PlateFormat::PartialRegionAge => write!(f, "partial-region-age"),
            PlateFormat::PartialLetters => write!(f, "partial-letters"),
            PlateFormat::Dateless => write!(f, "dateless"),
        }
    }
}

// Table order matters for `classify`: partial shapes come before dateless so
// that "AB12" is read as a fragment of a current plate.
const PLATE_PATTERNS: [(PlateFormat, &str); 6] = [
    (PlateFormat::Current, r"^[A-Z]{2}[0-9]{2}[A-Z]{3}$"),
    (PlateFormat::Prefix, r"^[A-Z][0-9]{1,3}[A-Z]{3}$"),
    (PlateFormat::Suffix, r"^[A-Z]{3}[0-9]{1,3}[A-Z]$"),
    (PlateFormat::PartialRegionAge, r"^[A-Z]{2}[0-9]{2}$"),
    (PlateFormat::PartialLetters, r"^[A-Z]{3}$"),
    (PlateFormat::Dateless, r"^[A-Z]{1,3}[0-9]{1,4}$"),
];

static PLATE_PATTERN_TABLE: LazyLock<Vec<(PlateFormat, Regex)>> = LazyLock::new(|| {
    PLATE_PATTERNS
        .iter()
        .map(|(format, pattern)| (*format, Regex::new(pattern).unwrap()))
        .collect()
});

/// Expects `candidate` to be uppercased with whitespace removed.
pub fn classify(candidate: &str) -> Option<PlateFormat> {
    PLATE_PATTERN_TABLE
        .iter()
        .find(|(_, regex)| regex.is_match(candidate))
        .map(|(format, _)| *format)
}

#[allow(dead_code)]
pub fn is_valid_plate(candidate: &str) -> bool {
    classify(candidate).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_table_compiles() {
        assert_eq!(PLATE_PATTERN_TABLE.len(), PLATE_PATTERNS.len());
    }

    #[test]
    fn accepts_current_format() {
        for plate in ["AB12CDE", "YF65CVK", "LN70ZZZ", "BD51SMR"] {
            assert!(is_valid_plate(plate), "{plate} should be valid");
            assert_eq!(classify(plate), Some(PlateFormat::Current));
        }
    }

    #[test]
    fn classifies_historic_formats() {
        assert_eq!(classify("A123BCD"), Some(PlateFormat::Prefix));
        assert_eq!(classify("P7ABC"), Some(PlateFormat::Prefix));
        assert_eq!(classify("ABC123D"), Some(PlateFormat::Suffix));
        assert_eq!(classify("XYZ9A"), Some(PlateFormat::Suffix));
        assert_eq!(classify("ABC1234"), Some(PlateFormat::Dateless));
        assert_eq!(classify("A1"), Some(PlateFormat::Dateless));
        assert_eq!(classify("XY1234"), Some(PlateFormat::Dateless));
    }

    #[test]
    fn partial_shapes_are_valid_but_not_complete() {
        for (fragment, format) in [
            ("YF65", PlateFormat::PartialRegionAge),
            ("CVK", PlateFormat::PartialLetters),
        ] {
            assert!(is_valid_plate(fragment));
            assert_eq!(classify(fragment), Some(format));
            assert!(!format.is_complete());
        }
    }

    #[test]
    fn rejects_short_and_digit_only_strings() {
        for candidate in ["", "A", "7", "12", "1234", "1234567", "65"] {
            assert!(!is_valid_plate(candidate), "{candidate} should be invalid");
        }
    }

    #[test]
    fn rejects_noise() {
        for candidate in [
            "AB12CDEF", "ab12cde", "AB12 CDE", "12.05.24", "14:32:10", "ABCD", "AB1CDE9",
        ] {
            assert!(!is_valid_plate(candidate), "{candidate} should be invalid");
        }
    }
}
