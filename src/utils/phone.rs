/// Canonical digits-only form of a phone number. Uniqueness of an
/// applicant is compared on this value, never on the raw string.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_punctuation() {
        assert_eq!(normalize_phone("(301) 555-0100"), "3015550100");
        assert_eq!(normalize_phone("+1 301.555.0100"), "13015550100");
        assert_eq!(normalize_phone("301 555 0100"), "3015550100");
    }

    #[test]
    fn formatting_variants_collapse_to_one_value() {
        let variants = ["3015550100", "(301)555-0100", "301-555-0100", "301.555.0100"];
        let normalized: Vec<String> = variants.iter().map(|v| normalize_phone(v)).collect();
        assert!(normalized.iter().all(|n| n == "3015550100"));
    }

    #[test]
    fn idempotent() {
        let once = normalize_phone("(301) 555-0100");
        assert_eq!(normalize_phone(&once), once);
    }

    #[test]
    fn empty_and_letters_only_yield_empty() {
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("call me"), "");
    }
}
