use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    InvalidSelector(String),
    #[error("Xml Error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Expected element <{0}> is missing from the document.")]
    MissingElement(&'static str),
    #[error("Element <{element}> doesn't contain a number: {value:?}")]
    BadNumber { element: &'static str, value: String },
    #[error("Couldn't find a display name on the profile page of {0}")]
    NameNotFound(String),

    #[error("Config Error: {0}")]
    Config(String),
    #[error("Category {0} is listed more than once.")]
    DuplicateCategory(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
