use std::fmt::Formatter;

#[derive(Debug, PartialEq, Eq)]
pub enum ImgrabError {
    /// Parameter is the rejected input url
    InvalidUrl(String),
    ErrorCreatingDestinationDirectory(String),
    /// Transport level failure while fetching a page or an image
    NetworkError {
        url: String,
        message: String,
    },
    ErrorStatusCode {
        status_code: String,
        url: String,
    },
    /// parameters are file path, additional error message
    FileOperationError {
        file_name: String,
        message: String,
    },
}

impl std::fmt::Display for ImgrabError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ImgrabError::InvalidUrl(url) => format!("Invalid url received : {url}"),
            ImgrabError::ErrorCreatingDestinationDirectory(err) => {
                format!("error creating destination directory. {err}")
            }
            ImgrabError::NetworkError { url, message } => {
                format!("error downloading from {url}. {message}")
            }
            ImgrabError::ErrorStatusCode { status_code, url } => {
                format!("server returned an error response. {url} => {status_code}")
            }
            ImgrabError::FileOperationError { file_name, message } => {
                format!("{message} : {file_name}")
            }
        };
        write!(f, "{str}")
    }
}

impl std::error::Error for ImgrabError {}
