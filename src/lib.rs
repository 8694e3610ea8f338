//! SweetKit library
//!
//! Validation rules, date parsing and formatting, grapheme-aware string
//! helpers, color conversion and a small log book.
//! Modules are exposed for integration testing.

pub mod config;
pub mod error;
pub mod logbook;
pub mod stores;
pub mod traits;
pub mod utils;

// Re-export commonly used types for testing
pub use config::KitConfig;
pub use error::{KitError, KitResult};
pub use logbook::{LogBook, LogLevel};
pub use stores::{FixedClock, StdFileStore, SystemClock};
pub use traits::{Clock, FileStore};
pub use utils::color::Rgba;
pub use utils::dates::{CalendarMoment, DateKit};
pub use utils::validation::{matches, Carrier, ValidationRule};
