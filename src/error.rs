use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no {role} team selected")]
    SelectionRequired { role: &'static str },

    #[error("no profile for team {team:?}; run the analysis or pick a team from the dataset")]
    MissingProfile { team: String },

    #[error("dataset has no matches")]
    EmptyDataset,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
