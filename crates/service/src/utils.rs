/// Escape LIKE wildcards (% and _) in a search string
pub fn escape_like_wildcards(s: &str) -> String {
    s.replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards_plain() {
        assert_eq!(escape_like_wildcards("alpha"), "alpha");
    }

    #[test]
    fn test_escape_like_wildcards_percent() {
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
    }

    #[test]
    fn test_escape_like_wildcards_underscore() {
        assert_eq!(escape_like_wildcards("night_owls"), "night\\_owls");
    }
}
