pub mod api;
pub mod database_sqlx;
pub mod error;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod sinks;
pub mod utils;

pub use error::{PipelineError, Result};
