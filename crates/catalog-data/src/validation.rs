//! Field rules mirroring the backend catalog constraints.

/// Maximum characters in an ingredient name.
pub const INGREDIENT_NAME_MAX: usize = 200;

/// Maximum characters in a measurement unit.
pub const MEASUREMENT_UNIT_MAX: usize = 20;

/// Maximum characters in a tag name.
pub const TAG_NAME_MAX: usize = 30;

/// Maximum characters in a tag slug.
pub const TAG_SLUG_MAX: usize = 30;

/// Returns `true` for `#RGB` or `#RRGGBB` colour strings.
///
/// # Examples
///
/// ```
/// use catalog_data::is_valid_hex_color;
///
/// assert!(is_valid_hex_color("#a0db8e"));
/// assert!(is_valid_hex_color("#FFF"));
/// assert!(!is_valid_hex_color("a0db8e"));
/// assert!(!is_valid_hex_color("#a0db8g"));
/// ```
#[must_use]
pub fn is_valid_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Returns `true` for non-empty slugs made of ASCII letters, digits, `-`, `_`.
///
/// # Examples
///
/// ```
/// use catalog_data::is_valid_slug;
///
/// assert!(is_valid_slug("soup"));
/// assert!(is_valid_slug("main_course-2"));
/// assert!(!is_valid_slug("суп"));
/// assert!(!is_valid_slug(""));
/// ```
#[must_use]
pub fn is_valid_slug(value: &str) -> bool {
    let length = value.chars().count();
    (1..=TAG_SLUG_MAX).contains(&length)
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
