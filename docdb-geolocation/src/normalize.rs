//! ASCII folding of geocoded place names.

use unicode_normalization::UnicodeNormalization;

/// Make a place name safe for ASCII-only display.
///
/// Decomposes the text (NFD) so accented letters split into a base letter
/// plus combining marks, then drops every non-ASCII char and every `"`.
/// The stroked `ł`/`Ł` have no decomposition and are folded to `l`/`L`
/// first; other letters without one are dropped.
pub fn normalize_place_name(name: &str) -> String {
    name.nfd()
        .map(fold_stroked_l)
        .filter(|c| c.is_ascii() && *c != '"')
        .collect()
}

fn fold_stroked_l(c: char) -> char {
    match c {
        'ł' => 'l',
        'Ł' => 'L',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize_place_name("Kraków, Polska"), "Krakow, Polska");
        assert_eq!(normalize_place_name("Zürich"), "Zurich");
    }

    #[test]
    fn test_folds_stroked_l() {
        assert_eq!(normalize_place_name("Łódź"), "Lodz");
        assert_eq!(normalize_place_name("Białystok"), "Bialystok");
    }

    #[test]
    fn test_drops_undecomposable_letters() {
        assert_eq!(normalize_place_name("Ørsted"), "rsted");
    }

    #[test]
    fn test_strips_quotes() {
        assert_eq!(
            normalize_place_name("\"Rynek Główny 1, Kraków\""),
            "Rynek Glowny 1, Krakow"
        );
    }

    #[test]
    fn test_output_is_ascii() {
        let normalized = normalize_place_name("Ærøskøbing, Danmark — 東京");
        assert!(normalized.is_ascii());
    }
}
