/// Console and rotating file logging built on `fern`.
pub mod loggerlocal;

pub use loggerlocal::{parse_level, rotate_logs, setup_logging, LogOptions};
