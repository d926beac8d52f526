mod classifier;
mod model;

pub use classifier::{classify_comments, ModelScorer, SentenceScorer};
