pub mod categorize;
pub mod document_ops;
pub mod filter;
pub mod sort;
pub mod task_ops;
