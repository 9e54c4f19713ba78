//! Shopping list aggregation and plain-text rendering.
//!
//! A user's cart is flattened to composition lines, grouped by
//! `(ingredient name, measurement unit)` and summed. Groups are emitted in
//! ascending code-point order of the name, then the unit.

use std::collections::BTreeMap;

/// Header line of every rendered shopping list.
pub const SHOPPING_LIST_HEADER: &str = "Список продуктов:\n";

/// File name offered to clients downloading the list.
pub const SHOPPING_LIST_FILENAME: &str = "listbuy.txt";

/// One composition line of a recipe in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: f64,
}

/// A summed `(name, unit)` group.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingListEntry {
    pub name: String,
    pub measurement_unit: String,
    pub total: f64,
}

/// How entries are laid out after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShoppingListLayout {
    /// Entries follow each other with no separator, as legacy clients expect.
    #[default]
    Concatenated,
    /// Each entry ends with a newline.
    LinePerEntry,
}

impl ShoppingListLayout {
    /// Layout selected by the `line breaks` setting.
    pub const fn from_line_breaks(enabled: bool) -> Self {
        if enabled {
            Self::LinePerEntry
        } else {
            Self::Concatenated
        }
    }
}

/// Aggregated shopping list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShoppingList {
    entries: Vec<ShoppingListEntry>,
}

impl ShoppingList {
    /// Group and sum `lines`.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{CartLine, ShoppingList};
    ///
    /// let line = |name: &str, unit: &str, amount| CartLine {
    ///     name: name.into(),
    ///     measurement_unit: unit.into(),
    ///     amount,
    /// };
    /// let list = ShoppingList::aggregate(vec![
    ///     line("Flour", "g", 200.0),
    ///     line("Egg", "pcs", 2.0),
    ///     line("Flour", "g", 100.0),
    /// ]);
    /// let names: Vec<_> = list.entries().iter().map(|e| (e.name.as_str(), e.total)).collect();
    /// assert_eq!(names, vec![("Egg", 2.0), ("Flour", 300.0)]);
    /// ```
    pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut groups: BTreeMap<(String, String), f64> = BTreeMap::new();
        for line in lines {
            *groups
                .entry((line.name, line.measurement_unit))
                .or_insert(0.0) += line.amount;
        }
        let entries = groups
            .into_iter()
            .map(|((name, measurement_unit), total)| ShoppingListEntry {
                name,
                measurement_unit,
                total,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ShoppingListEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the list as UTF-8 text.
    ///
    /// Each entry reads `"{name} {total} {unit}"`.
    pub fn render(&self, layout: ShoppingListLayout) -> String {
        let mut out = String::from(SHOPPING_LIST_HEADER);
        for entry in &self.entries {
            out.push_str(&entry.name);
            out.push(' ');
            out.push_str(&format_amount(entry.total));
            out.push(' ');
            out.push_str(&entry.measurement_unit);
            if layout == ShoppingListLayout::LinePerEntry {
                out.push('\n');
            }
        }
        out
    }
}

/// Significant digits kept when printing a total; enough to absorb the noise
/// of summing binary fractions without hiding real quantities.
const AMOUNT_SIGNIFICANT_DIGITS: i64 = 12;

/// Format a summed amount without trailing fractional zeros.
///
/// Totals keep twelve significant digits, so a positive total never prints
/// as `0` however small it is.
///
/// # Examples
/// ```
/// use foodgram::domain::format_amount;
///
/// assert_eq!(format_amount(300.0), "300");
/// assert_eq!(format_amount(0.1 + 0.2), "0.3");
/// assert_eq!(format_amount(0.0004), "0.0004");
/// ```
pub fn format_amount(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs().log10().floor() as i64;
    let decimals = (AMOUNT_SIGNIFICANT_DIGITS - 1 - magnitude).clamp(0, 340) as usize;
    let fixed = format!("{value:.decimals$}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        fixed
    }
}

/// Rendered list ready to be served as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListDocument {
    pub filename: String,
    pub body: String,
}

impl ShoppingListDocument {
    pub fn new(body: String) -> Self {
        Self {
            filename: SHOPPING_LIST_FILENAME.to_owned(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn line(name: &str, unit: &str, amount: f64) -> CartLine {
        CartLine {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    #[fixture]
    fn two_recipes() -> Vec<CartLine> {
        vec![
            line("Flour", "g", 200.0),
            line("Egg", "pcs", 2.0),
            line("Flour", "g", 100.0),
            line("Sugar", "g", 50.0),
        ]
    }

    #[rstest]
    fn concatenated_layout_matches_legacy_output(two_recipes: Vec<CartLine>) {
        let list = ShoppingList::aggregate(two_recipes);
        assert_eq!(
            list.render(ShoppingListLayout::Concatenated),
            "Список продуктов:\nEgg 2 pcsFlour 300 gSugar 50 g"
        );
    }

    #[rstest]
    fn line_per_entry_layout_terminates_each_entry(two_recipes: Vec<CartLine>) {
        let list = ShoppingList::aggregate(two_recipes);
        assert_eq!(
            list.render(ShoppingListLayout::LinePerEntry),
            "Список продуктов:\nEgg 2 pcs\nFlour 300 g\nSugar 50 g\n"
        );
    }

    #[rstest]
    fn lines_sharing_name_and_unit_merge_whatever_their_source() {
        let list = ShoppingList::aggregate(vec![
            line("мука", "г", 200.0),
            line("мука", "г", 0.5),
            line("мука", "кг", 1.0),
        ]);
        let totals: Vec<(&str, f64)> = list
            .entries()
            .iter()
            .map(|entry| (entry.measurement_unit.as_str(), entry.total))
            .collect();
        assert_eq!(totals, vec![("г", 200.5), ("кг", 1.0)]);
    }

    #[rstest]
    fn same_name_with_different_units_stays_separate() {
        let list = ShoppingList::aggregate(vec![line("Milk", "ml", 200.0), line("Milk", "l", 1.0)]);
        let units: Vec<&str> = list
            .entries()
            .iter()
            .map(|entry| entry.measurement_unit.as_str())
            .collect();
        assert_eq!(units, vec!["l", "ml"]);
    }

    #[rstest]
    fn ordering_is_by_code_point() {
        let list = ShoppingList::aggregate(vec![
            line("яйцо", "шт", 1.0),
            line("Яблоко", "шт", 1.0),
            line("апельсин", "шт", 1.0),
            line("Zucchini", "шт", 1.0),
        ]);
        let names: Vec<&str> = list.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zucchini", "Яблоко", "апельсин", "яйцо"]);
    }

    #[rstest]
    fn empty_cart_renders_header_only() {
        let list = ShoppingList::aggregate(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.render(ShoppingListLayout::default()), SHOPPING_LIST_HEADER);
    }

    #[rstest]
    #[case(2.0, "2")]
    #[case(2.5, "2.5")]
    #[case(0.125, "0.125")]
    #[case(0.1 + 0.2, "0.3")]
    #[case(1000.0, "1000")]
    #[case(1.0 / 3.0, "0.333333333333")]
    #[case(0.0004, "0.0004")]
    #[case(0.000_000_25, "0.00000025")]
    #[case(150_000.0, "150000")]
    fn amounts_drop_trailing_zeros(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_amount(value), expected);
    }

    #[rstest]
    fn tiny_totals_stay_visible_in_the_export() {
        let list = ShoppingList::aggregate(vec![line("Salt", "kg", 0.0004)]);
        assert_eq!(
            list.render(ShoppingListLayout::LinePerEntry),
            "Список продуктов:\nSalt 0.0004 kg\n"
        );
    }

    #[rstest]
    fn documents_use_the_download_filename() {
        let document = ShoppingListDocument::new("body".to_owned());
        assert_eq!(document.filename, "listbuy.txt");
    }

    #[rstest]
    #[case(false, ShoppingListLayout::Concatenated)]
    #[case(true, ShoppingListLayout::LinePerEntry)]
    fn layout_follows_line_break_setting(#[case] enabled: bool, #[case] expected: ShoppingListLayout) {
        assert_eq!(ShoppingListLayout::from_line_breaks(enabled), expected);
    }
}
