use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Path suffix of the tool's own full-page view.
pub const TOOL_SUFFIX: &str = "/linkrepo";

/// Marker element present only on user profile pages.
pub const PROFILE_MARKER: &str = ".js-profile-editable-area";

static PROFILE_MARKER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(PROFILE_MARKER).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// A profile page: add the navigation link.
    Profile,
    /// The tool's own page: build the view and render the graph.
    ToolView,
    /// Anything else: leave it alone.
    None,
}

/// Decide what to do with a page from its path and, when available, its
/// parsed document.
pub fn detect(path: &str, document: Option<&Html>) -> PageMode {
    if path.trim_end_matches('/').ends_with(TOOL_SUFFIX) {
        return PageMode::ToolView;
    }

    let has_marker = document.is_some_and(|doc| doc.select(&PROFILE_MARKER_SEL).next().is_some());

    if has_marker {
        PageMode::Profile
    } else {
        PageMode::None
    }
}

/// First path segment, which on github.com is the account name.
pub fn username_from_path(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split(['/', '?', '#'])
        .next()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_suffix_wins() {
        let doc = Html::parse_document(r#"<div class="js-profile-editable-area"></div>"#);
        assert_eq!(detect("/alice/linkrepo", Some(&doc)), PageMode::ToolView);
        assert_eq!(detect("/alice/linkrepo/", None), PageMode::ToolView);
    }

    #[test]
    fn test_profile_marker() {
        let doc = Html::parse_document(r#"<div class="h-card js-profile-editable-area"></div>"#);
        assert_eq!(detect("/alice", Some(&doc)), PageMode::Profile);
    }

    #[test]
    fn test_no_marker_is_not_an_error() {
        let doc = Html::parse_document("<main>repository page</main>");
        assert_eq!(detect("/alice/project", Some(&doc)), PageMode::None);
        assert_eq!(detect("/alice", None), PageMode::None);
    }

    #[test]
    fn test_username_from_path() {
        assert_eq!(username_from_path("/alice/linkrepo"), Some("alice"));
        assert_eq!(username_from_path("/alice?tab=repositories"), Some("alice"));
        assert_eq!(username_from_path("/"), None);
    }
}
