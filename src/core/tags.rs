/// Lowercase every tag so comparisons are case-insensitive
///
/// Tags are otherwise left untouched: no trimming, stemming or tokenisation.
#[inline]
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_lowercase()).collect()
}

/// Count the `wanted` tags that overlap any `offered` tag in either direction
///
/// A wanted tag overlaps when an offered tag contains it, or when it contains
/// an offered tag. Used for interests against expertise.
#[inline]
pub fn count_bidirectional_matches(wanted: &[String], offered: &[String]) -> usize {
    let offered = normalize_tags(offered);

    normalize_tags(wanted)
        .iter()
        .filter(|tag| {
            offered
                .iter()
                .any(|candidate| candidate.contains(tag.as_str()) || tag.contains(candidate.as_str()))
        })
        .count()
}

/// Count the `wanted` tags contained in at least one `offered` tag
///
/// Containment only runs one way: "react" is covered by "reactjs", but
/// "reactjs" is not covered by "react". Used for skills.
#[inline]
pub fn count_contained_matches(wanted: &[String], offered: &[String]) -> usize {
    let offered = normalize_tags(offered);

    normalize_tags(wanted)
        .iter()
        .filter(|tag| offered.iter().any(|candidate| candidate.contains(tag.as_str())))
        .count()
}

/// Fraction of `matched` out of `total`, or 0.0 when there is nothing to match
#[inline]
pub fn match_ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    matched as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_normalize_lowercases_only() {
        assert_eq!(normalize_tags(&tags(&["AI", " Rust "])), tags(&["ai", " rust "]));
    }

    #[test]
    fn test_bidirectional_matches_both_ways() {
        // interest inside expertise
        assert_eq!(count_bidirectional_matches(&tags(&["react"]), &tags(&["reactjs"])), 1);
        // expertise inside interest
        assert_eq!(count_bidirectional_matches(&tags(&["reactjs"]), &tags(&["react"])), 1);
        assert_eq!(count_bidirectional_matches(&tags(&["rust"]), &tags(&["go"])), 0);
    }

    #[test]
    fn test_bidirectional_is_case_insensitive() {
        let matched = count_bidirectional_matches(
            &tags(&["AI"]),
            &tags(&["Artificial Intelligence, AI"]),
        );
        assert_eq!(matched, 1);
    }

    #[test]
    fn test_contained_matches_one_way() {
        assert_eq!(count_contained_matches(&tags(&["react"]), &tags(&["ReactJS"])), 1);
        assert_eq!(count_contained_matches(&tags(&["reactjs"]), &tags(&["react"])), 0);
    }

    #[test]
    fn test_each_wanted_tag_counted_once() {
        let matched = count_contained_matches(
            &tags(&["py"]),
            &tags(&["python", "pytorch", "numpy"]),
        );
        assert_eq!(matched, 1);
    }

    #[test]
    fn test_substring_false_positive_is_kept() {
        // lexical matching: "js" hides inside unrelated words
        assert_eq!(count_contained_matches(&tags(&["js"]), &tags(&["nodejs"])), 1);
        assert_eq!(count_bidirectional_matches(&tags(&["java"]), &tags(&["javascript"])), 1);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(count_bidirectional_matches(&[], &tags(&["ai"])), 0);
        assert_eq!(count_bidirectional_matches(&tags(&["ai"]), &[]), 0);
        assert_eq!(count_contained_matches(&[], &[]), 0);
        assert_eq!(match_ratio(0, 0), 0.0);
        assert_eq!(match_ratio(1, 4), 0.25);
    }
}
