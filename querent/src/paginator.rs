//! Page window arithmetic and HTML page-link rendering

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Default page size used when options do not set one
pub const DEFAULT_PER_PAGE: u64 = 5;

/// CSS hooks and accessible labels for the rendered link list.
///
/// Every field has a default, so a partial configuration deserializes fine.
/// `page_aria_label` substitutes `{page}` with the page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
    pub list_class: String,
    pub item_class: String,
    pub item_active_class: String,
    pub item_disabled_class: String,
    pub link_class: String,
    pub first_aria_label: String,
    pub first_label: String,
    pub previous_aria_label: String,
    pub previous_label: String,
    pub page_aria_label: String,
    pub next_aria_label: String,
    pub next_label: String,
    pub last_aria_label: String,
    pub last_label: String,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            list_class: "pagination".to_string(),
            item_class: "page-item".to_string(),
            item_active_class: "active".to_string(),
            item_disabled_class: "disabled".to_string(),
            link_class: "page-link".to_string(),
            first_aria_label: "Go to first page".to_string(),
            first_label: "First".to_string(),
            previous_aria_label: "Go to previous page".to_string(),
            previous_label: "Previous".to_string(),
            page_aria_label: "Go to page {page}".to_string(),
            next_aria_label: "Go to next page".to_string(),
            next_label: "Next".to_string(),
            last_aria_label: "Go to last page".to_string(),
            last_label: "Last".to_string(),
        }
    }
}

/// Options accepted by `QueryBuilder::paginate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    /// Base URL of the generated links
    pub path: String,
    /// Page size, also the half width of the rendered page window
    pub per_page: u64,
    /// 1-based page; falls back to the `page` parameter of `query_string`
    pub current_page: Option<u64>,
    /// Incoming request query string, with or without the leading `?`
    pub query_string: Option<String>,
    pub style: LinkStyle,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            path: String::new(),
            per_page: DEFAULT_PER_PAGE,
            current_page: None,
            query_string: None,
            style: LinkStyle::default(),
        }
    }
}

impl PaginationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn current_page(mut self, page: u64) -> Self {
        self.current_page = Some(page);
        self
    }

    pub fn query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = Some(query.into());
        self
    }

    pub fn style(mut self, style: LinkStyle) -> Self {
        self.style = style;
        self
    }

    /// The page to show: explicit option, then `page=` in the query string, then 1.
    /// Never less than 1.
    pub fn resolved_current_page(&self) -> u64 {
        self.current_page
            .or_else(|| self.query_string.as_deref().and_then(page_parameter))
            .unwrap_or(1)
            .max(1)
    }
}

/// Result of a paginated select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of pages
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
    pub path: String,
    pub first_page_url: Option<String>,
    pub previous_page_url: Option<String>,
    pub next_page_url: Option<String>,
    pub last_page_url: Option<String>,
    /// Rendered `<ul>` link list
    pub links: String,
}

/// Rows of one page together with their pagination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    /// `None` when the page is empty
    pub rows: Option<Vec<T>>,
    pub pagination: Pagination,
}

/// Renders the link list for one page of results
#[derive(Debug, Clone)]
pub struct Paginator {
    total_pages: u64,
    per_page: u64,
    current_page: u64,
    path: String,
    query_string: Option<String>,
    style: LinkStyle,
}

impl Paginator {
    pub fn new(total_pages: u64, per_page: u64, current_page: u64, path: impl Into<String>) -> Self {
        Self {
            total_pages,
            per_page,
            current_page,
            path: path.into(),
            query_string: None,
            style: LinkStyle::default(),
        }
    }

    /// Carry the incoming request query string over to every link
    pub fn query_string(mut self, query: Option<impl Into<String>>) -> Self {
        self.query_string = query.map(Into::into);
        self
    }

    pub fn style(mut self, style: LinkStyle) -> Self {
        self.style = style;
        self
    }

    /// Pages rendered individually around the current one.
    ///
    /// Empty when there are no pages at all.
    pub fn window(&self) -> RangeInclusive<u64> {
        let start = if self.current_page > self.per_page {
            self.current_page - self.per_page
        } else {
            1
        };

        let end = self
            .current_page
            .saturating_add(self.per_page)
            .min(self.total_pages);

        start..=end
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Build the pagination result including the rendered markup
    pub fn handle(&self) -> Pagination {
        let base = self.base_url();
        let page_url = |page: u64| format!("{}page={}", base, page);

        let first_page_url = self.has_previous().then(|| page_url(1));
        let previous_page_url = self.has_previous().then(|| page_url(self.current_page - 1));
        let next_page_url = self.has_next().then(|| page_url(self.current_page + 1));
        let last_page_url = self.has_next().then(|| page_url(self.total_pages));

        let style = &self.style;
        let mut links = format!("<ul class=\"{}\">", escape(&style.list_class));

        links.push_str(&self.boundary_item(
            first_page_url.as_deref(),
            &style.first_aria_label,
            &style.first_label,
        ));
        links.push_str(&self.boundary_item(
            previous_page_url.as_deref(),
            &style.previous_aria_label,
            &style.previous_label,
        ));

        for page in self.window() {
            if page == self.current_page {
                links.push_str(&format!(
                    "<li class=\"{}\" aria-current=\"page\"><span class=\"{}\">{}</span></li>",
                    escape(&classes(&style.item_class, &style.item_active_class)),
                    escape(&style.link_class),
                    page
                ));
            } else {
                let aria_label = style.page_aria_label.replace("{page}", &page.to_string());
                links.push_str(&link_item(
                    &style.item_class,
                    &style.link_class,
                    &page_url(page),
                    &aria_label,
                    &page.to_string(),
                ));
            }
        }

        links.push_str(&self.boundary_item(
            next_page_url.as_deref(),
            &style.next_aria_label,
            &style.next_label,
        ));
        links.push_str(&self.boundary_item(
            last_page_url.as_deref(),
            &style.last_aria_label,
            &style.last_label,
        ));
        links.push_str("</ul>");

        Pagination {
            total: self.total_pages,
            per_page: self.per_page,
            current_page: self.current_page,
            last_page: self.total_pages,
            path: self.path.clone(),
            first_page_url,
            previous_page_url,
            next_page_url,
            last_page_url,
            links,
        }
    }

    fn base_url(&self) -> String {
        let query = self
            .query_string
            .as_deref()
            .map(strip_page_parameter)
            .unwrap_or_default();
        format!("{}?{}", self.path, query)
    }

    // First/previous/next/last: a disabled item keeps its label but points nowhere
    fn boundary_item(&self, url: Option<&str>, aria_label: &str, label: &str) -> String {
        let style = &self.style;
        match url {
            Some(url) => link_item(&style.item_class, &style.link_class, url, aria_label, label),
            None => link_item(
                &classes(&style.item_class, &style.item_disabled_class),
                &style.link_class,
                "#",
                aria_label,
                label,
            ),
        }
    }
}

fn link_item(item_class: &str, link_class: &str, href: &str, aria_label: &str, label: &str) -> String {
    format!(
        "<li class=\"{}\"><a class=\"{}\" href=\"{}\" aria-label=\"{}\">{}</a></li>",
        escape(item_class.trim()),
        escape(link_class),
        escape(href),
        escape(aria_label),
        label
    )
}

fn classes(base: &str, extra: &str) -> String {
    format!("{} {}", base, extra).trim().to_string()
}

fn escape(attribute: &str) -> String {
    attribute
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn is_page_pair(pair: &str) -> bool {
    match pair.split_once('=') {
        Some((key, value)) => {
            key.eq_ignore_ascii_case("page")
                && !value.is_empty()
                && value.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

fn page_parameter(query: &str) -> Option<u64> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| is_page_pair(pair))
        .find_map(|pair| pair.split_once('=').and_then(|(_, value)| value.parse().ok()))
}

/// Drop every `page=<digits>` pair; the rest keeps its `&` separators and
/// gets a trailing `&` so `page=N` can be appended directly.
fn strip_page_parameter(query: &str) -> String {
    let kept: Vec<&str> = query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty() && !is_page_pair(pair))
        .collect();

    if kept.is_empty() {
        String::new()
    } else {
        format!("{}&", kept.join("&"))
    }
}
