pub mod annotation;
pub mod fasta;

pub use annotation::{SourceTool, TermRecord, TermType};
