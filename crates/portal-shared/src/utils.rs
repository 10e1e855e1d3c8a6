//! Utility functions

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible: String = local.chars().take(if local.chars().count() <= 2 { 1 } else { 2 }).collect();
        format!("{}***{}", visible, domain)
    } else {
        "***".to_string()
    }
}

/// Case-insensitive substring test used by every text filter.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("student@example.com"), "st***@example.com");
        assert_eq!(mask_email("a@b.c"), "a***@b.c");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Hackathon Nasional", "hack"));
        assert!(contains_ignore_case("React Native", "NATIVE"));
        assert!(!contains_ignore_case("Python", "rust"));
    }
}
