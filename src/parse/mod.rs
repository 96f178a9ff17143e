pub mod span;
pub mod task_parser;
pub mod task_serializer;

pub use task_parser::{parse_document, parse_indexed, parse_line, scan_head};
pub use task_serializer::serialize_document;
