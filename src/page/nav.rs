//! Adds the "Contribution Graph" tab to a profile page's navigation.
//!
//! The document is inspected with scraper, but the change is spliced into
//! the original markup so the rest of the page is served byte-for-byte.

use super::view::ToolView;
use regex::Regex;
use scraper::{Html, Selector};
use std::ops::Range;
use std::sync::LazyLock;

pub const NAV_ITEM_ID: &str = "linkrepo-nav-item";
pub const NAV_LABEL: &str = "Contribution Graph";

const CONTAINERS: [&str; 2] = ["UnderlineNav-body", "UnderlineNav-list"];
const MORE_ATTR: &str = r#"data-tab-item="more""#;
const ITEM_CLASS: &str = "UnderlineNav-item";

static NAV_ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#linkrepo-nav-item").unwrap());
static CONTAINER_SELS: LazyLock<[Selector; 2]> = LazyLock::new(|| {
    [
        Selector::parse(".UnderlineNav-body").unwrap(),
        Selector::parse(".UnderlineNav-list").unwrap(),
    ]
});

// Any start or end tag, capturing the slash and the tag name.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)\b[^>]*>").unwrap());
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bclass\s*=\s*"([^"]*)""#).unwrap());

pub fn nav_item_html(username: &str) -> String {
    format!(
        concat!(
            r#"<li class="d-flex">"#,
            r#"<a id="{id}" href="{href}" "#,
            r#"class="js-selected-navigation-item UnderlineNav-item hx_underlinenav-item no-underline js-responsive-underlinenav-item">"#,
            r#"<span class="UnderlineNav-item-label truncate">{label}</span></a></li>"#
        ),
        id = NAV_ITEM_ID,
        href = ToolView::path_for(username),
        label = NAV_LABEL,
    )
}

/// Insert the navigation link, returning the rewritten page.
///
/// Returns `None` when there is nothing to do: the link is already there,
/// or the page has no navigation list to put it in.
pub fn inject_nav_item(html: &str, username: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if document.select(&NAV_ITEM_SEL).next().is_some() {
        tracing::debug!("nav item already present");
        return None;
    }

    let Some(container) = CONTAINERS
        .iter()
        .zip(CONTAINER_SELS.iter())
        .find(|(_, sel)| document.select(sel).next().is_some())
        .map(|(class, _)| *class)
    else {
        tracing::debug!("no navigation container on page");
        return None;
    };

    let body = container_body(html, container)?;
    let at = more_item_in(html, body.clone()).unwrap_or(body.end);

    let item = nav_item_html(username);
    let mut out = String::with_capacity(html.len() + item.len());
    out.push_str(&html[..at]);
    out.push_str(&item);
    out.push_str(&html[at..]);
    Some(out)
}

fn has_class(tag: &str, class: &str) -> bool {
    CLASS_RE
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .is_some_and(|m| m.as_str().split_whitespace().any(|c| c == class))
}

/// Offset of the `<` opening the "more" tab, looking only inside `body`.
fn more_item_in(html: &str, body: Range<usize>) -> Option<usize> {
    let start = body.start;
    TAG_RE
        .captures_iter(&html[body])
        .filter_map(|caps| caps.get(0))
        .find(|tag| {
            let text = tag.as_str();
            !text.starts_with("</") && text.contains(MORE_ATTR) && has_class(text, ITEM_CLASS)
        })
        .map(|tag| start + tag.start())
}

/// Byte range between the open and close tags of the first element
/// carrying `class`.
fn container_body(html: &str, class: &str) -> Option<Range<usize>> {
    let mut tags = TAG_RE.captures_iter(html);

    let (tag, body_start) = tags.by_ref().find_map(|caps| {
        let whole = caps.get(0)?;
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing || !has_class(whole.as_str(), class) {
            return None;
        }
        Some((caps.get(2)?.as_str().to_ascii_lowercase(), whole.end()))
    })?;

    let mut depth = 1usize;
    for caps in tags {
        let whole = caps.get(0)?;
        if !caps.get(2)?.as_str().eq_ignore_ascii_case(&tag) {
            continue;
        }
        if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            depth -= 1;
            if depth == 0 {
                return Some(body_start..whole.start());
            }
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }

    None
}
