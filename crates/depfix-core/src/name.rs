//! Package name normalisation.

use std::str::FromStr;

use pep508_rs::PackageName;

/// Normalise a distribution name so that differently spelled references to
/// the same package compare equal.
///
/// `Zope.Interface`, `zope_interface` and `zope-interface` all map to
/// `zope-interface`. Text that is not a valid distribution name gets the
/// same lowercase-and-collapse treatment so it still compares consistently.
pub fn normalize(name: &str) -> String {
    let name = name.trim();
    match PackageName::from_str(name) {
        Ok(normalized) => normalized.to_string(),
        Err(_) => collapse(name),
    }
}

fn collapse(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            in_separator = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases() {
        assert_eq!(normalize("Django"), "django");
    }

    #[test]
    fn collapses_separators() {
        assert_eq!(normalize("Zope.Interface"), "zope-interface");
        assert_eq!(normalize("zope__interface"), "zope-interface");
        assert_eq!(normalize("a-_.b"), "a-b");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize("  requests "), "requests");
    }

    #[test]
    fn invalid_names_still_collapse() {
        assert_eq!(normalize("-Odd_Name-"), "-odd-name-");
        assert_eq!(normalize(""), "");
    }
}
