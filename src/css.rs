use once_cell::sync::Lazy;
use regex::Regex;

/// The closing tag the fragment is inserted in front of.
pub const STYLE_CLOSE: &str = "</style>";

/// Mobile layout rules injected into every page that has none.
pub const FRAGMENT: &str = r#"
        /* Mobile responsive layout */
        @media (max-width: 768px) {
            body { padding: 8px !important; font-size: 14px; }
            .container { padding: 12px !important; margin: 0 !important; }
            .header h1 { font-size: 24px !important; }
            .section { margin-bottom: 20px !important; }
            table, .table-container { overflow-x: auto; display: block; }
            .grid, .content-grid { grid-template-columns: 1fr !important; gap: 10px !important; }
        }
        @media (max-width: 480px) {
            body { padding: 4px !important; font-size: 13px; }
            .header h1 { font-size: 20px !important; }
            .header p { font-size: 12px !important; }
        }
    "#;

// `.` stops at newlines, so the media query and the condition must share a line.
static RESPONSIVE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@media.*max-width").expect("marker pattern is valid"));

/// True when the text already carries a max-width media query.
///
/// This is a plain text search: a match inside a CSS comment or a script
/// string counts the same as live CSS.
pub fn is_responsive(text: &str) -> bool {
    RESPONSIVE_MARKER.is_match(text)
}

/// Returns `text` with [`FRAGMENT`] inserted right before the first
/// `</style>`, or `None` if the document has no closing style tag.
pub fn inject(text: &str) -> Option<String> {
    let at = text.find(STYLE_CLOSE)?;
    let mut patched = String::with_capacity(text.len() + FRAGMENT.len());
    patched.push_str(&text[..at]);
    patched.push_str(FRAGMENT);
    patched.push_str(&text[at..]);
    Some(patched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_satisfies_its_own_marker() {
        assert!(is_responsive(FRAGMENT));
        assert!(FRAGMENT.contains("max-width: 768px"));
        assert!(FRAGMENT.contains("max-width: 480px"));
    }

    #[test]
    fn marker_is_case_sensitive() {
        assert!(is_responsive("@media (max-width: 600px){}"));
        assert!(!is_responsive("@MEDIA (MAX-WIDTH: 600px){}"));
        assert!(!is_responsive("@media (min-width: 600px){}"));
    }

    #[test]
    fn marker_does_not_span_lines() {
        assert!(!is_responsive("@media screen\n(max-width: 600px)"));
    }

    #[test]
    fn marker_inside_comment_still_counts() {
        assert!(is_responsive("<style>/* @media (max-width: 1px) */</style>"));
    }

    #[test]
    fn inject_before_closing_tag() {
        let patched = inject("<style>body{color:red}</style>").unwrap();
        assert_eq!(
            patched,
            format!("<style>body{{color:red}}{FRAGMENT}</style>")
        );
    }

    #[test]
    fn inject_only_touches_first_style_block() {
        let src = "<style>a{}</style><p>x</p><style>b{}</style>";
        let patched = inject(src).unwrap();
        assert_eq!(patched.matches(FRAGMENT).count(), 1);
        assert!(patched.ends_with("<style>b{}</style>"));
        assert!(patched.starts_with(&format!("<style>a{{}}{FRAGMENT}</style>")));
    }

    #[test]
    fn inject_without_style_tag() {
        assert_eq!(inject("<html><body></body></html>"), None);
    }
}
