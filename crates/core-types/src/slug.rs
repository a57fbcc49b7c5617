/// Stable template-field key derived from a human label.
///
/// Lower-cases the input and collapses every run of non-alphanumeric characters into a single
/// underscore. Labels without any alphanumeric character fall back to `"field"`.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_sep = false;
    for ch in label.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(ch);
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        "field".to_string()
    } else {
        slug
    }
}

/// Canonical form of a hand-written key: trimmed, lower-cased and comma-free, so it can always
/// sit in the alias list unchanged.
pub fn canonical_key(key: &str) -> String {
    key.trim().to_lowercase().replace(',', "")
}

/// Normalises raw alias input into lower-cased, non-empty, comma-free tokens.
///
/// Entries containing commas are split, so `["email, e-mail"]` yields two aliases. Order of first
/// appearance is preserved and duplicates are dropped. `key` is appended when missing.
pub fn normalize_aliases<I, S>(raw: I, key: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aliases: Vec<String> = Vec::new();
    for entry in raw {
        for token in entry.as_ref().split(',') {
            let token = token.trim().to_lowercase();
            if token.is_empty() || aliases.contains(&token) {
                continue;
            }
            aliases.push(token);
        }
    }
    let key = canonical_key(key);
    if !key.is_empty() && !aliases.contains(&key) {
        aliases.push(key);
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Email Address"), "email_address");
        assert_eq!(slugify("  First-Name (legal) "), "first_name_legal");
        assert_eq!(slugify("ZIP/Postal"), "zip_postal");
    }

    #[test]
    fn slugify_falls_back_for_symbol_only_labels() {
        assert_eq!(slugify(""), "field");
        assert_eq!(slugify("--*--"), "field");
    }

    #[test]
    fn canonical_key_drops_case_and_commas() {
        assert_eq!(canonical_key(" Email "), "email");
        assert_eq!(canonical_key("city,state"), "citystate");
    }

    #[test]
    fn aliases_split_dedup_and_include_key() {
        let aliases = normalize_aliases(["Email, E-Mail", "email", " ", "mail,"], "email");
        assert_eq!(aliases, vec!["email", "e-mail", "mail"]);

        let aliases = normalize_aliases(["phone"], "telephone");
        assert_eq!(aliases, vec!["phone", "telephone"]);
    }
}
