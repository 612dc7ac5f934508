//! Text normalization for catalog comparisons.
//!
//! Every similarity and containment check in the engine runs over normalized
//! text: lowercased, with a fixed set of Spanish accented vowels folded to
//! their base form, and surrounding whitespace trimmed. Internal whitespace
//! runs are left alone. Normalizing twice gives the same string.

/// Normalize text for comparison.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        for lower in c.to_lowercase() {
            out.push(fold_accent(lower));
        }
    }
    out
}

/// Fold the accented vowels that appear in the catalog data. This is a fixed
/// map, not general Unicode decomposition: the comparison contract only
/// covers these characters.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize("  Mejorador PRO  "), "mejorador pro");
    }

    #[test]
    fn test_folds_accented_vowels() {
        assert_eq!(normalize("Maíz"), "maiz");
        assert_eq!(normalize("tortillería"), "tortilleria");
        assert_eq!(normalize("áàäâ éèëê íìïî óòöô úùüû"), "aaaa eeee iiii oooo uuuu");
    }

    #[test]
    fn test_folds_enye() {
        assert_eq!(normalize("Señor Ñoño"), "senor nono");
    }

    #[test]
    fn test_folds_uppercase_accents() {
        // Uppercase accents lowercase first, then fold.
        assert_eq!(normalize("MAÍZ ÁGIL"), "maiz agil");
    }

    #[test]
    fn test_preserves_internal_whitespace_runs() {
        assert_eq!(normalize("a  b\t c"), "a  b\t c");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Mejorador Maíz Pro",
            "  CONSERVADOR de larga vida  ",
            "ñandú über",
            "",
            "sin acentos",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
