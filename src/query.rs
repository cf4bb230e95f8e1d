//! Query specification and search query construction
//!
//! A [`QuerySpec`] is what the caller asks for. A [`SearchQuery`] is the
//! ordered list of URL parameters the board understands, minus the page number.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use tracing::warn;

/// Named sort modes supported by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Best match first
    #[default]
    Relevance,
    /// Required experience
    Experience,
    /// Required education
    Education,
    /// Number of applicants
    Applicants,
    /// Salary
    Salary,
    /// Posting date
    Date,
}

impl SortMode {
    /// Every sort mode, in display order
    pub const ALL: [SortMode; 6] = [
        SortMode::Relevance,
        SortMode::Experience,
        SortMode::Education,
        SortMode::Applicants,
        SortMode::Salary,
        SortMode::Date,
    ];

    /// Value of the `order` URL parameter
    pub fn code(&self) -> &'static str {
        match self {
            SortMode::Relevance => "14",
            SortMode::Experience => "3",
            SortMode::Education => "4",
            SortMode::Applicants => "7",
            SortMode::Salary => "13",
            SortMode::Date => "16",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortMode::Relevance => "relevance",
            SortMode::Experience => "experience",
            SortMode::Education => "education",
            SortMode::Applicants => "applicants",
            SortMode::Salary => "salary",
            SortMode::Date => "date",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "experience" => Ok(SortMode::Experience),
            "education" => Ok(SortMode::Education),
            "applicants" => Ok(SortMode::Applicants),
            "salary" => Ok(SortMode::Salary),
            "date" => Ok(SortMode::Date),
            _ => Err(format!(
                "Invalid sort mode: {s}. Valid options: relevance, experience, education, applicants, salary, date"
            )),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    #[default]
    Descending,
}

impl SortDirection {
    /// Value of the `asc` URL parameter
    pub fn code(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "1",
            SortDirection::Descending => "0",
        }
    }
}

/// What the caller wants to search for
///
/// Immutable once built; the pipeline takes it by value.
///
/// # Examples
///
/// ```
/// use job_listing_downloader::query::{QuerySpec, SortDirection, SortMode};
/// use std::num::NonZeroU32;
///
/// let spec = QuerySpec::new("engineer", NonZeroU32::new(25).unwrap())
///     .with_filter("area", "6001001000,6001016000")
///     .with_sort(SortMode::Salary, SortDirection::Ascending);
///
/// assert_eq!(spec.max_results(), 25);
/// assert_eq!(spec.filters().get("area").map(String::as_str), Some("6001001000,6001016000"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    keyword: String,
    max_results: NonZeroU32,
    filters: BTreeMap<String, String>,
    sort_mode: SortMode,
    sort_direction: SortDirection,
}

impl QuerySpec {
    /// Create a spec sorted by relevance, descending, without filters
    pub fn new(keyword: impl Into<String>, max_results: NonZeroU32) -> Self {
        Self {
            keyword: keyword.into(),
            max_results,
            filters: BTreeMap::new(),
            sort_mode: SortMode::default(),
            sort_direction: SortDirection::default(),
        }
    }

    /// Add a filter; multi-valued filters must already be comma-joined
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Set sort mode and direction
    pub fn with_sort(mut self, mode: SortMode, direction: SortDirection) -> Self {
        self.sort_mode = mode;
        self.sort_direction = direction;
        self
    }

    /// Search keyword, possibly empty
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Maximum number of listings to return
    pub fn max_results(&self) -> u32 {
        self.max_results.get()
    }

    /// Filter parameters
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Sort mode
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Sort direction
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Build the URL parameters for this spec
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::from_spec(self)
    }
}

/// Ordered search parameters shared by every page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    params: Vec<(String, String)>,
}

const EXPANSION_TYPE: &str = "area,spec,com,job,wf,wktm";

/// Query key carrying the sort code
pub const SORT_PARAM: &str = "order";

/// Query key carrying the sort direction
pub const DIRECTION_PARAM: &str = "asc";

/// Query key carrying the page number
pub const PAGE_PARAM: &str = "page";

impl SearchQuery {
    /// Build parameters from a spec
    ///
    /// Filters come after the fixed parameters in key order, followed by the
    /// sort code and direction. A filter that names a fixed parameter or a
    /// sort parameter (for example `kwop` or `order`) replaces its value in
    /// place. A `page` filter is dropped; the page number belongs to each
    /// page request.
    pub fn from_spec(spec: &QuerySpec) -> Self {
        let mut params: Vec<(String, String)> = vec![
            ("kwop".to_string(), "7".to_string()),
            ("keyword".to_string(), spec.keyword().to_string()),
            ("expansionType".to_string(), EXPANSION_TYPE.to_string()),
            ("mode".to_string(), "s".to_string()),
            ("jobsource".to_string(), "index_s".to_string()),
        ];
        let mut sort = vec![
            (SORT_PARAM.to_string(), spec.sort_mode().code().to_string()),
            (
                DIRECTION_PARAM.to_string(),
                spec.sort_direction().code().to_string(),
            ),
        ];
        let mut extra = Vec::new();

        for (key, value) in spec.filters() {
            if key == PAGE_PARAM {
                warn!(value = %value, "Ignoring page filter, pages are requested one by one");
                continue;
            }
            match params
                .iter_mut()
                .chain(sort.iter_mut())
                .find(|(existing, _)| existing == key)
            {
                Some(slot) => slot.1 = value.clone(),
                None => extra.push((key.clone(), value.clone())),
            }
        }

        params.extend(extra);
        params.extend(sort);
        Self { params }
    }

    /// Parameters without the page number
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Parameters for one page request (1-indexed)
    pub fn page_params(&self, page: u32) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        params.push((PAGE_PARAM.to_string(), page.to_string()));
        params
    }

    /// URL-encoded query string without the page number
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(&self.params).unwrap_or_default()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}
