use super::text_of;
use crate::model::RepositoryRecord;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static ENTRY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[itemprop="owns"]"#).unwrap());
static NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[itemprop="name codeRepository"]"#).unwrap());
static FORK_ICON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".octicon-repo-forked").unwrap());
static ORG_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[data-hovercard-type="organization"]"#).unwrap());
static NEXT_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#".paginate-container a[aria-label="Next"]"#).unwrap()
});

/// One page of a profile's repository tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub repos: Vec<RepositoryRecord>,
    /// Whether the pager offers an enabled "Next" link.
    pub more_pages: bool,
}

/// Read one page of the repositories tab. Entries without a name are
/// skipped; a page with no entries is just an empty page.
pub fn parse_listing_page(html: &str, username: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let mut repos = Vec::new();
    for item in document.select(&ENTRY) {
        let Some(name) = item
            .select(&NAME)
            .next()
            .map(text_of)
            .filter(|n| !n.is_empty())
        else {
            continue;
        };

        let is_fork = item.select(&FORK_ICON).next().is_some();
        let owner = item
            .select(&ORG_LINK)
            .next()
            .map(text_of)
            .unwrap_or_else(|| username.to_string());

        repos.push(RepositoryRecord::new(owner, name, username).with_fork(is_fork));
    }

    let more_pages = document
        .select(&NEXT_LINK)
        .next()
        .is_some_and(|next| !next.value().classes().any(|c| c == "disabled"));

    ListingPage { repos, more_pages }
}
