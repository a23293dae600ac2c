//! Afleiden van geldige node-namen uit display- en regio-identifiers.

/// Naam die gebruikt wordt wanneer een identifier volledig leeg is.
const FALLBACK_IDENTIFIER: &str = "Default";

/// Maakt van een willekeurige identifier een geldige node-naam.
///
/// Lege invoer levert [`FALLBACK_IDENTIFIER`] op. Een enkel ongeldig teken
/// (meestal een genummerde buffer of regio zoals `"3"`) krijgt alleen een
/// `_`-prefix, zodat het cijfer zelf behouden blijft. Alle overige invoer
/// gaat door de generieke transformatie van [`make_valid_identifier`].
#[must_use]
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return FALLBACK_IDENTIFIER.to_owned();
    }

    if raw.chars().count() == 1 && !is_valid_identifier(raw) {
        return sanitize(&format!("_{raw}"));
    }

    make_valid_identifier(raw)
}

/// Geeft terug of `name` al een geldige node-naam is: een ASCII-letter of
/// `_` gevolgd door ASCII-letters, cijfers of `_`.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Generieke transformatie naar een geldige identifier: elk ongeldig teken
/// wordt `_`, en een resultaat dat met een cijfer begint krijgt een
/// `_`-prefix.
#[must_use]
pub fn make_valid_identifier(name: &str) -> String {
    if name.is_empty() {
        return "_".to_owned();
    }

    let mut result: String = name
        .chars()
        .map(|c| {
            if c == '_' || c.is_ascii_alphanumeric() {
                c
            } else {
                '_'
            }
        })
        .collect();

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{is_valid_identifier, make_valid_identifier, sanitize};

    #[test]
    fn empty_input_maps_to_fallback() {
        assert_eq!(sanitize(""), "Default");
    }

    #[test]
    fn single_digit_keeps_its_value() {
        assert_eq!(sanitize("3"), "_3");
        assert_eq!(sanitize("0"), "_0");
    }

    #[test]
    fn single_letter_passes_through() {
        assert_eq!(sanitize("a"), "a");
        assert_eq!(sanitize("_"), "_");
    }

    #[test]
    fn invalid_characters_become_underscores() {
        assert_eq!(sanitize("Region-1"), "Region_1");
        assert_eq!(sanitize("links boven"), "links_boven");
        assert_eq!(sanitize("12ab"), "_12ab");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["", "3", "é", "Region-1", "12ab", "a b c", "Default"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "niet idempotent voor {raw:?}");
        }
    }

    #[test]
    fn validity_check_matches_transform() {
        for raw in ["Buffer", "_3", "a1_b2", "links_boven"] {
            assert!(is_valid_identifier(raw));
            assert_eq!(make_valid_identifier(raw), raw);
        }
        for raw in ["", "3", "a-b", " a"] {
            assert!(!is_valid_identifier(raw));
        }
    }
}
