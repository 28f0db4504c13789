//! Slugs for human-readable location identifiers.

use regex::Regex;
use std::sync::OnceLock;

fn non_alnum() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"))
}

/// "Main Library – 2nd Floor" → "main-library-2nd-floor"
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let slug = non_alnum().replace_all(&lower, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "location".to_string()
    } else {
        slug.to_string()
    }
}

/// First slug derived from `name` for which `taken` answers false,
/// suffixing `-2`, `-3`, ... on collisions.
pub fn unique_slug<F>(name: &str, mut taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let base = slugify(name);
    if !taken(&base) {
        return base;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Main Library – 2nd Floor"), "main-library-2nd-floor");
        assert_eq!(slugify("  ***  "), "location");
    }

    #[test]
    fn unique_slug_appends_counter() {
        let existing = ["lab", "lab-2"];
        assert_eq!(unique_slug("Lab", |s| existing.contains(&s)), "lab-3");
        assert_eq!(unique_slug("Annex", |s| existing.contains(&s)), "annex");
    }
}
