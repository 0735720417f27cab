//! # Error Suggestions
//!
//! Helper functions for generating error messages with hints. Errors
//! should tell users what went wrong AND how to fix it.

/// Generate an error for an artifact slug that is not in the catalog.
///
/// Suggests a close match when one exists, and reminds the user about
/// the slug format when the input has no type prefix.
pub fn artifact_not_found(slug: &str, known_slugs: &[String]) -> anyhow::Error {
    let candidates: Vec<&str> = known_slugs.iter().map(String::as_str).collect();
    let did_you_mean = find_similar(slug, &candidates)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    let format_hint = if slug.contains('/') {
        ""
    } else {
        "\nhint: Slugs are qualified by type, e.g. 'templates/saas-starter' or 'packages/ui'"
    };

    anyhow::anyhow!(
        "Artifact not found: {slug}{did_you_mean}{format_hint}\n\n\
         hint: Run 'codekit list all' to see every available artifact"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_not_found_suggests_similar() {
        let known = vec![
            "packages/ui".to_string(),
            "packages/utils".to_string(),
            "templates/saas-starter".to_string(),
        ];
        let error = artifact_not_found("packages/uii", &known);
        let message = error.to_string();

        assert!(message.contains("Artifact not found: packages/uii"));
        assert!(message.contains("Did you mean 'packages/ui'?"));
        assert!(message.contains("codekit list all"));
    }

    #[test]
    fn test_artifact_not_found_hints_slug_format() {
        let known = vec!["packages/ui".to_string()];
        let error = artifact_not_found("saas-starter", &known);
        let message = error.to_string();

        assert!(message.contains("qualified by type"));
    }

    #[test]
    fn test_artifact_not_found_no_suggestion_for_very_different() {
        let known = vec!["packages/ui".to_string()];
        let error = artifact_not_found("templates/payment-flow", &known);
        let message = error.to_string();

        assert!(!message.contains("Did you mean"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("packages/ui", "packages/ui"), 0);
        assert_eq!(edit_distance("packages/uii", "packages/ui"), 1);
        assert_eq!(edit_distance("pckages/ui", "packages/ui"), 1);
        assert_eq!(edit_distance("foobar", "packages/ui"), 10);
    }

    #[test]
    fn test_find_similar() {
        let candidates = ["packages/ui", "packages/utils", "templates/blog"];

        assert_eq!(find_similar("packages/uti", &candidates), Some("packages/utils"));
        assert_eq!(find_similar("something-else", &candidates), None);
    }
}
