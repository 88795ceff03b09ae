#[derive(Debug)]
pub enum Error {
    MissingConfig(String),
    KeywordsIo(std::io::Error),
    KeywordsFormat(serde_json::Error),
    InvalidUrl(url::ParseError),
    HttpError(reqwest::Error),
    StoreError(store_jw::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConfig(name) => write!(f, "Missing required configuration: {}", name),
            Self::KeywordsIo(e) => write!(f, "Cannot read keywords file: {}", e),
            Self::KeywordsFormat(e) => write!(f, "Keywords file is not valid JSON: {}", e),
            Self::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            Self::HttpError(e) => write!(f, "HTTP error: {}", e),
            Self::StoreError(e) => write!(f, "Job store error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::KeywordsIo(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::KeywordsFormat(error)
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidUrl(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::HttpError(error)
    }
}

impl From<store_jw::Error> for Error {
    fn from(error: store_jw::Error) -> Self {
        Self::StoreError(error)
    }
}
