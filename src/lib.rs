pub(crate) mod parser;

pub mod filter;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod types;

pub use pipeline::{FilterConfig, FilterPipeline, FilterStats};
pub use reader::VcfRecords;
pub use record::VcfRecord;
