use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("The series contains no usable measurements")]
    NoData,
}
