/// Collapse scraped text into a canonical form: non-breaking spaces and
/// other Unicode whitespace become ASCII spaces, runs collapse to one,
/// leading/trailing whitespace is trimmed. Whitespace-only input yields "".
pub fn tidy(s: &str) -> String {
    s.split(char::is_whitespace)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(tidy("  a \t b\n c  "), "a b c");
    }

    #[test]
    fn replaces_non_breaking_spaces() {
        assert_eq!(tidy("นาย\u{a0}สมชาย"), "นาย สมชาย");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(tidy("   \u{a0}\t\n"), "");
        assert_eq!(tidy(""), "");
    }
}
