//! String utilities for error messages and generated identifiers.

/// Levenshtein edit distance between two strings, compared case-insensitively.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Finds the known name closest to `query`, if any is close enough.
///
/// Up to one edit is tolerated for names of three characters or fewer, two
/// for names up to five characters, and three beyond that.
///
/// # Examples
///
/// ```
/// use cypherql_common::utils::strings::find_similar;
///
/// let fields = ["name", "friends", "_id"];
/// assert_eq!(find_similar("nmae", &fields), Some("name"));
/// assert_eq!(find_similar("airports", &fields), None);
/// ```
pub fn find_similar<'a, S: AsRef<str>>(query: &str, candidates: &'a [S]) -> Option<&'a str> {
    let max_distance = match query.chars().count() {
        0..=3 => 1,
        4..=5 => 2,
        _ => 3,
    };

    candidates
        .iter()
        .map(|c| (c.as_ref(), edit_distance(query, c.as_ref())))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Formats a suggestion hint for error messages.
///
/// # Examples
///
/// ```
/// use cypherql_common::utils::strings::format_suggestion;
///
/// assert_eq!(format_suggestion("Person"), "Did you mean 'Person'?");
/// ```
pub fn format_suggestion(suggestion: &str) -> String {
    format!("Did you mean '{suggestion}'?")
}

/// Returns true if `s` is usable as a bare openCypher identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("Person", "person"), 0);
    }

    #[test]
    fn test_find_similar_picks_closest() {
        let names = ["getPerson", "getPersons", "getAirport"];
        assert_eq!(find_similar("getPersn", &names), Some("getPerson"));
        assert_eq!(find_similar("somethingElse", &names), None);

        let empty: Vec<String> = Vec::new();
        assert_eq!(find_similar("x", &empty), None);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("getPerson_Person"));
        assert!(is_identifier("_id"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
