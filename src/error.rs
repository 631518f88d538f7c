use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

/// Failures talking to the stats provider.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode image from {url}: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },
}
