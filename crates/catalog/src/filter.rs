//! Title matching for search results.

/// Characters ignored when comparing titles.
const DECORATIONS: [char; 4] = [' ', '©', '®', '™'];

/// Lowercases `text` and drops spaces and trademark decorations.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !DECORATIONS.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `title` matches the user's `query`.
pub fn title_matches(title: &str, query: &str) -> bool {
    normalize(title).contains(&normalize(query))
}
