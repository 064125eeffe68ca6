//! Entity name to collection path conversion

/// Turn an entity name into the collection segment the backend routes on
///
/// Names already ending in a plural form used by the backend ("orders",
/// "settings") are returned unchanged.
pub fn collection_path(entity: &str) -> String {
    let trimmed = entity.trim().trim_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }

    let lower = trimmed.to_lowercase();
    if is_already_plural(&lower) {
        return trimmed.to_string();
    }

    if ["s", "sh", "ch", "x", "z"].iter().any(|end| lower.ends_with(end)) {
        return format!("{}es", trimmed);
    }

    // consonant + y -> ies
    let mut tail = lower.chars().rev();
    if let (Some('y'), Some(before)) = (tail.next(), tail.next()) {
        if !"aeiou".contains(before) {
            return format!("{}ies", &trimmed[..trimmed.len() - 1]);
        }
    }

    format!("{}s", trimmed)
}

fn is_already_plural(lower: &str) -> bool {
    lower.ends_with("ies")
        || (lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us"))
}
