pub mod hike_url;
pub mod types;

pub use hike_url::HikeUrl;
pub use types::{AspectPair, Label, Report, ReviewPage, SentimentBuckets};
