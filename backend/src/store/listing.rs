use common::requests::ListQuery;

/// Paging, sorting and search options for the admin listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub ascending: bool,
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
            search: None,
            sort_by: None,
            ascending: false,
        }
    }
}

impl ListParams {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn from_query(query: &ListQuery) -> Self {
        ListParams {
            page: query.page.filter(|p| *p > 0).unwrap_or(1),
            limit: query
                .limit
                .filter(|l| *l > 0)
                .unwrap_or(Self::DEFAULT_LIMIT)
                .min(Self::MAX_LIMIT),
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            sort_by: query.sort_by.clone(),
            ascending: query.sort_order.as_deref() == Some("asc"),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// What a table exposes to listing: searchable columns and the mapping from
/// API field names to SQL columns.
pub(super) struct Collection {
    pub search_columns: &'static [&'static str],
    pub sort_fields: &'static [(&'static str, &'static str)],
    pub default_sort: &'static str,
}

impl Collection {
    fn sort_column(&self, sort_by: Option<&str>) -> &'static str {
        sort_by
            .and_then(|field| {
                self.sort_fields
                    .iter()
                    .find(|(api, _)| *api == field)
                    .map(|(_, column)| *column)
            })
            .unwrap_or(self.default_sort)
    }

    /// Builds the `WHERE` clause (possibly empty) and its bound parameters.
    pub fn filter(&self, params: &ListParams) -> (String, Vec<String>) {
        match &params.search {
            Some(search) => {
                let clause = self
                    .search_columns
                    .iter()
                    .map(|column| format!("{} LIKE ?1 ESCAPE '\\'", column))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                (format!("WHERE {}", clause), vec![like_pattern(search)])
            }
            None => (String::new(), Vec::new()),
        }
    }

    /// `ORDER BY ... LIMIT ... OFFSET ...` for one page.
    pub fn page_clause(&self, params: &ListParams) -> String {
        let direction = if params.ascending { "ASC" } else { "DESC" };
        format!(
            "ORDER BY {} {} LIMIT {} OFFSET {}",
            self.sort_column(params.sort_by.as_deref()),
            direction,
            params.limit,
            params.offset()
        )
    }
}

/// Substring pattern for `LIKE`, with the wildcard characters escaped.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
