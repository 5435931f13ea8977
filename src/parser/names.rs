use super::text::tidy;

/// Split a raw member name into (clean name, matched honorific).
///
/// `honorifics` must be ordered longest-first: some Thai honorifics are
/// compounds of shorter ones, and trying the shorter form first would
/// leave a residual fragment on the name. At most one honorific is
/// stripped; the first (longest) literal prefix match wins. No match is
/// the normal case for many names, not an error.
pub fn split_honorific(raw_name: &str, honorifics: &[String]) -> (String, Option<String>) {
    let name = tidy(raw_name);
    for hon in honorifics {
        if let Some(rest) = name.strip_prefix(hon.as_str()) {
            return (tidy(rest), Some(hon.clone()));
        }
    }
    (name, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hons(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_known_prefix() {
        let (name, hon) = split_honorific("นายสมชาย ใจดี", &hons(&["นาย"]));
        assert_eq!(name, "สมชาย ใจดี");
        assert_eq!(hon.as_deref(), Some("นาย"));
    }

    #[test]
    fn longer_honorific_wins_over_its_own_prefix() {
        // "ด" is a prefix of "ดร." — the compound form must match, not the fragment.
        let (name, hon) = split_honorific("ดร.สมชาย", &hons(&["ดร.", "ด"]));
        assert_eq!(name, "สมชาย");
        assert_eq!(hon.as_deref(), Some("ดร."));
    }

    #[test]
    fn no_match_returns_name_unchanged() {
        let (name, hon) = split_honorific("สมหญิง รักเรียน", &hons(&["นาย", "นาง"]));
        assert_eq!(name, "สมหญิง รักเรียน");
        assert!(hon.is_none());
    }

    #[test]
    fn strips_at_most_one_honorific() {
        // Both honorifics present in the raw text; only the leading one goes.
        let (name, hon) = split_honorific("พลเอกนายทดสอบ", &hons(&["พลเอก", "นาย"]));
        assert_eq!(name, "นายทดสอบ");
        assert_eq!(hon.as_deref(), Some("พลเอก"));
    }

    #[test]
    fn tidies_whitespace_around_the_split() {
        let (name, hon) = split_honorific("  นาย  สมชาย ", &hons(&["นาย"]));
        assert_eq!(name, "สมชาย");
        assert_eq!(hon.as_deref(), Some("นาย"));
    }
}
