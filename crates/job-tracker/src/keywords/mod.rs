//! Resume keyword comparison built on exact, normalized token matching.

mod scoring;
mod tokenizer;

pub use scoring::{compare_keywords, KeywordComparison};
pub use tokenizer::{tokenize, KeywordSet};
