mod fetcher;
mod policy;

pub use fetcher::ReviewFetcher;
pub use policy::ExtractionPolicy;
