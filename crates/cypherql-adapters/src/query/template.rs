//! `$placeholder` substitution in query text.

/// Replaces each `$name` in `text` for which `lookup` yields a value.
///
/// A placeholder extends over every identifier character after the `$`, so
/// `$name` never matches inside `$nameSuffix`. Substitution is textual and
/// also applies inside string literals, which lets a fragment write
/// `'$name'` to quote a raw value.
pub fn substitute_placeholders(text: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(at) = rest.find('$') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let len = after
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(after.len(), |(i, _)| i);
        let name = &after[..len];

        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "name" => Some("Ada".to_string()),
            "nameSuffix" => Some("Lovelace".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_substitute_whole_names_only() {
        assert_eq!(
            substitute_placeholders("MATCH (n {first: '$name', last: '$nameSuffix'})", lookup),
            "MATCH (n {first: 'Ada', last: 'Lovelace'})"
        );
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        assert_eq!(
            substitute_placeholders("WHERE n.x = $other AND $ < 1", lookup),
            "WHERE n.x = $other AND $ < 1"
        );
    }
}
