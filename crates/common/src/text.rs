/// Shortens a label to at most `max_chars` characters for display,
/// replacing the tail with `...` when it does not fit. Counts are never
/// derived from the shortened form.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut shortened: String = label.chars().take(keep).collect();
    shortened.push_str("...");
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_pass_through() {
        assert_eq!(truncate_label("network", 20), "network");
    }

    #[test]
    fn long_labels_get_ellipsis() {
        let label = "a very long category name indeed";
        let shortened = truncate_label(label, 20);
        assert_eq!(shortened, "a very long categ...");
        assert_eq!(shortened.chars().count(), 20);
    }

    #[test]
    fn multibyte_labels_truncate_on_chars() {
        let label = "категория очень длинная";
        let shortened = truncate_label(label, 10);
        assert!(shortened.ends_with("..."));
        assert_eq!(shortened.chars().count(), 10);
    }
}
