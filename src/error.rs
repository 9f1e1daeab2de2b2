// Error kinds raised while fetching and extracting records.
// Extraction never recovers locally: any of these aborts the run.

#[derive(Debug)]
pub enum ScrapeError {
    /// A code-bearing link is missing its `href` or the `?key=<value>` tail is not an integer.
    MalformedLink(String),
    /// A cell's text matches none of the expected literal or numeric forms.
    Decode { field: &'static str, text: String },
    /// Moveset partitioning did not yield exactly three sections.
    UnexpectedSectionCount(usize),
    /// The move attribute tables did not flatten to the expected number of cells.
    UnexpectedCellCount { expected: usize, found: usize },
    /// A type or ability region carried an unsupported number of links.
    UnexpectedLinkCount { what: &'static str, count: usize },
    /// A required DOM anchor is absent from the page.
    MissingElement(&'static str),
    NetworkError(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
}

impl std::fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeError::MalformedLink(href) => write!(f, "Malformed link: {}", href),
            ScrapeError::Decode { field, text } => {
                write!(f, "Cannot decode {} from cell text {:?}", field, text)
            }
            ScrapeError::UnexpectedSectionCount(count) => {
                write!(f, "Expected 3 moveset sections, found {}", count)
            }
            ScrapeError::UnexpectedCellCount { expected, found } => write!(
                f,
                "Expected {} move attribute cells, found {}",
                expected, found
            ),
            ScrapeError::UnexpectedLinkCount { what, count } => {
                write!(f, "Unexpected number of {} links: {}", what, count)
            }
            ScrapeError::MissingElement(what) => write!(f, "Missing page element: {}", what),
            ScrapeError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ScrapeError::Io(err) => write!(f, "I/O error: {}", err),
            ScrapeError::Json(err) => write!(f, "JSON error: {}", err),
            ScrapeError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScrapeError::Io(err) => Some(err),
            ScrapeError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::NetworkError(err.to_string())
    }
}

impl From<std::io::Error> for ScrapeError {
    fn from(err: std::io::Error) -> Self {
        ScrapeError::Io(err)
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Json(err)
    }
}

impl From<toml::de::Error> for ScrapeError {
    fn from(err: toml::de::Error) -> Self {
        ScrapeError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
