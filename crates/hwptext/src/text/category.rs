//! Character classes defined by Unicode general category.
//!
//! `char::is_alphabetic` follows the derived `Alphabetic` property, which also
//! admits marks and enclosed symbols. The scorer and normalizer count letters
//! and numbers by category instead.

use unicode_general_category::{GeneralCategory, get_general_category};

/// Category `L*`.
pub fn is_letter(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Category `N*`.
pub fn is_number(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::DecimalNumber | GeneralCategory::LetterNumber | GeneralCategory::OtherNumber
    )
}

/// Category `L*` or `N*`.
pub fn is_letter_or_number(ch: char) -> bool {
    is_letter(ch) || is_number(ch)
}

/// Whether `ch` renders as visible text.
///
/// Separators (`Z*`) and the `C*` categories are not printable, apart from
/// the ASCII space.
pub fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    !matches!(
        get_general_category(ch),
        GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
            | GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}
