//! Title and author guesses from a file name.

/// Title: the file name without its final extension.
///
/// Falls back to the whole name when stripping would leave nothing
/// (e.g. `.pdf`).
pub fn title_from_file_name(file_name: &str) -> String {
    let stem = stem(file_name);
    if stem.trim().is_empty() {
        file_name.to_string()
    } else {
        stem.to_string()
    }
}

/// Author guessed from common naming patterns, first match wins:
///
/// - `Author - Title`
/// - `Title by Author`
/// - `Author_Title`
pub fn author_from_file_name(file_name: &str) -> Option<String> {
    let stem = stem(file_name);

    let candidate = if let Some((author, _)) = stem.split_once(" - ") {
        author
    } else if let Some((_, author)) = stem.split_once(" by ") {
        author
    } else if let Some((author, _)) = stem.split_once('_') {
        author
    } else {
        return None;
    };

    let candidate = candidate.trim();
    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}

fn stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_strips_last_extension() {
        assert_eq!(title_from_file_name("Dune.epub"), "Dune");
        assert_eq!(title_from_file_name("The.Hobbit.txt"), "The.Hobbit");
        assert_eq!(title_from_file_name("README"), "README");
        assert_eq!(title_from_file_name(".pdf"), ".pdf");
    }

    #[test]
    fn test_author_dash_pattern() {
        assert_eq!(
            author_from_file_name("Frank Herbert - Dune.epub").as_deref(),
            Some("Frank Herbert")
        );
    }

    #[test]
    fn test_author_by_pattern() {
        assert_eq!(
            author_from_file_name("Dune by Frank Herbert.pdf").as_deref(),
            Some("Frank Herbert")
        );
    }

    #[test]
    fn test_author_underscore_pattern() {
        assert_eq!(
            author_from_file_name("Herbert_Dune.txt").as_deref(),
            Some("Herbert")
        );
    }

    #[test]
    fn test_dash_wins_over_by() {
        assert_eq!(
            author_from_file_name("Ann Leckie - Written by Machines.epub").as_deref(),
            Some("Ann Leckie")
        );
    }

    #[test]
    fn test_no_pattern_or_empty_author() {
        assert_eq!(author_from_file_name("Dune.epub"), None);
        assert_eq!(author_from_file_name("_Dune.epub"), None);
        assert_eq!(author_from_file_name("Dune by .epub"), None);
    }
}
