use serde::Deserialize;

use super::shared::split_list;

/// Query parameters for listing movies.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieListQuery {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// Exact category. `*` matches any.
    pub category: Option<String>,
    /// Comma-separated tags. A movie matches when it carries any of them.
    pub tags: Option<String>,
}

impl MovieListQuery {
    /// Trimmed search term, if any is left after trimming.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Category filter, with `*` and blank treated as "any".
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "*")
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(split_list).unwrap_or_default()
    }
}

/// `true` when `wanted` is empty or `tags` shares at least one entry with it.
pub fn has_any_tag(tags: &[String], wanted: &[String]) -> bool {
    wanted.is_empty() || wanted.iter().any(|w| tags.contains(w))
}
