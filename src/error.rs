use std::error::Error;
use std::fmt::{Display, Formatter};

/// Possible errors that arise due to malformed distance input or invalid
/// clustering queries.
#[derive(Debug, Clone)]
pub enum HclustError {
    InsufficientData(String),
    InvalidLinkageMethod(String),
    InvalidArgument(String),
    MalformedMatrix(String),
}

impl Error for HclustError {}

impl Display for HclustError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            HclustError::InsufficientData(msg) =>
                format!("Not enough observations to cluster: {msg}"),
            HclustError::InvalidLinkageMethod(msg) =>
                format!("Invalid linkage criterion specified: {msg}"),
            HclustError::InvalidArgument(msg) =>
                format!("Invalid argument: {msg}"),
            HclustError::MalformedMatrix(msg) =>
                format!("Malformed distance matrix: {msg}"),
        };
        write!(f, "{message}")
    }
}
