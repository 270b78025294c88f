use super::{ExtractError, text_of};
use crate::model::{Metric, RepositoryRecord};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static TIMELINE_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".TimelineItem").unwrap());
static TIMELINE_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".TimelineItem-body").unwrap());
static REPO_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.list-style-none.mt-1").unwrap());
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static REPO_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[data-hovercard-type="repository"]"#).unwrap());
static PROGRESS_BAR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".Progress").unwrap());
static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)%").unwrap());

/// Text identifying the "Created N commits in M repositories" timeline entry.
pub const COMMITS_MARKER: &str = "commits in";

/// Read the commit-share list out of a profile's activity overview.
///
/// A page without the commits entry, or an entry without its repository
/// list, is an error rather than an empty result: there is nothing else on
/// the page to fall back to.
pub fn parse_activity_page(
    html: &str,
    username: &str,
) -> Result<Vec<RepositoryRecord>, ExtractError> {
    let document = Html::parse_document(html);

    let timeline_item = document
        .select(&TIMELINE_ITEM)
        .find(|item| {
            item.select(&TIMELINE_BODY)
                .next()
                .is_some_and(|body| text_of(body).contains(COMMITS_MARKER))
        })
        .ok_or(ExtractError::TimelineNotFound)?;

    let list = timeline_item
        .select(&REPO_LIST)
        .next()
        .ok_or(ExtractError::RepoListNotFound)?;

    let mut repos = Vec::new();
    for li in list.select(&LIST_ITEM) {
        let Some(link) = li.select(&REPO_LINK).next() else {
            continue;
        };
        let full_name = text_of(link);
        let Some((owner, name)) = full_name.split_once('/') else {
            tracing::debug!(%full_name, "skipping activity entry without owner");
            continue;
        };

        let share = li
            .select(&PROGRESS_BAR)
            .next()
            .and_then(|bar| bar.value().attr("aria-label"))
            .and_then(|label| PERCENT_RE.captures(label))
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .unwrap_or(0);

        repos.push(
            RepositoryRecord::new(owner, name, username).with_metric(Metric::CommitShare(share)),
        );
    }

    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(list: &str) -> String {
        format!(
            r#"<html><body>
<div class="TimelineItem">
  <div class="TimelineItem-body">Opened 2 pull requests</div>
</div>
<div class="TimelineItem">
  <div class="TimelineItem-body">
    <h4>Created 57 commits in 3 repositories</h4>
    {list}
  </div>
</div>
</body></html>"#
        )
    }

    #[test]
    fn test_reads_repositories_and_percentages() {
        let html = page(
            r#"<ul class="list-style-none mt-1">
  <li><a data-hovercard-type="repository" href="/alice/r1">alice/r1</a>
      <span class="Progress" aria-label="70% of commits in this period"></span></li>
  <li><a data-hovercard-type="repository" href="/org1/r2"> org1/r2 </a>
      <span class="Progress" aria-label="25%"></span></li>
  <li><a data-hovercard-type="repository" href="/org1/r3">org1/r3</a></li>
  <li><span>no link</span></li>
</ul>"#,
        );

        let repos = parse_activity_page(&html, "alice").unwrap();

        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0].full_name(), "alice/r1");
        assert!(repos[0].is_personal);
        assert_eq!(repos[0].metric, Metric::CommitShare(70));
        assert_eq!(repos[1].owner, "org1");
        assert_eq!(repos[1].metric, Metric::CommitShare(25));
        assert_eq!(repos[2].metric, Metric::CommitShare(0));
    }

    #[test]
    fn test_missing_timeline_entry_is_an_error() {
        let html = r#"<div class="TimelineItem"><div class="TimelineItem-body">Joined GitHub</div></div>"#;
        assert!(matches!(
            parse_activity_page(html, "alice"),
            Err(ExtractError::TimelineNotFound)
        ));
    }

    #[test]
    fn test_missing_repo_list_is_an_error() {
        let html = page(r#"<ul class="list-style-none"><li>wrong list</li></ul>"#);
        let err = parse_activity_page(&html, "alice").unwrap_err();
        assert_eq!(err.to_string(), "Repository list not found");
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        let html = page(r#"<ul class="list-style-none mt-1"></ul>"#);
        assert!(parse_activity_page(&html, "alice").unwrap().is_empty());
    }
}
