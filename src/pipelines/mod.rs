mod extraction;
mod recommendation;

pub use extraction::ExtractionPipeline;
pub use recommendation::RecommendationPipeline;
