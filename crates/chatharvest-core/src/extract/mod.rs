//! Message extraction: time-window and criteria filtering, output
//! serialization, and the end-to-end extract flow.

pub mod output;
pub mod pipeline;
pub mod run;

pub use pipeline::{FETCH_LIMIT, WINDOW_SECS, select_records};
pub use run::run_extract;
