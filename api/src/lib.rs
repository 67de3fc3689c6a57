//! Client side of the Paddock analysis service: the response payload model and
//! the HTTP transport used by the dashboard.

pub mod client;
pub mod error;
pub mod model;

pub use client::{AnalysisBackend, HttpBackend, UploadFile};
pub use error::{ApiError, GENERIC_FAILURE};
pub use model::{rows_empty, AnalysisResult, ChartData, Dataset, PairedSide, Row, NO_DATA_LABEL};
