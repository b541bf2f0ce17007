use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Row {row}: cannot derive a timestamp from open_time: {source}")]
    Parse {
        row: usize,
        #[source]
        source: CoreError,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
