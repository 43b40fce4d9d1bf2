//! Resource-name utilities.
//!
//! Registry keys and response payload keys are derived from resource names,
//! so the singular/plural transforms live here where their edge cases can be
//! tested in isolation. The rules cover regular English inflection plus the
//! irregulars that show up in real schemas; anything unrecognized passes
//! through unchanged.

/// Irregular singular/plural pairs checked before the rule-based transforms
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
];

/// Reduce a resource name to its singular canonical form.
///
/// Already-singular names pass through unchanged.
pub fn singularize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();

    for (singular, plural) in IRREGULARS {
        if lower == *plural {
            return (*singular).to_string();
        }
        if lower == *singular {
            return lower;
        }
    }

    if let Some(stem) = lower.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }

    for suffix in ["ches", "shes", "ses", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return lower[..lower.len() - 2].to_string();
        }
    }

    if lower.ends_with('s') && !lower.ends_with("ss") {
        return lower[..lower.len() - 1].to_string();
    }

    lower
}

/// Produce the plural form of a singular resource name.
pub fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();

    for (singular, plural) in IRREGULARS {
        if lower == *singular {
            return (*plural).to_string();
        }
        if lower == *plural {
            return lower;
        }
    }

    if let Some(stem) = lower.strip_suffix('y') {
        let penultimate = stem.chars().last();
        if penultimate.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }

    for suffix in ["us", "ss", "x", "z", "ch", "sh"] {
        if lower.ends_with(suffix) {
            return format!("{lower}es");
        }
    }

    // A trailing lone `s` means the name is already plural
    if lower.ends_with('s') {
        return lower;
    }

    format!("{lower}s")
}

/// Convert a CamelCase type name to snake_case.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether a string is a plain identifier (letters, digits, underscores,
/// not starting with a digit). Field names outside this set are rejected
/// at registration time.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
