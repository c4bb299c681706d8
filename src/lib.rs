//! Turns a photographed list of purchased items into a structured, categorized
//! inventory, and an inventory into recipe suggestions.
//!
//! Both flows share one shape: gather input, build a constrained prompt, call
//! the completion service, parse and validate the free-text reply into a typed
//! value. The OCR engine and the completion service are consumed behind narrow
//! contracts; everything in between is deterministic and request-scoped.

pub mod completion;
pub mod config;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod pipelines;
pub mod prompt;
pub mod server;
pub mod upload;

pub use completion::CompletionClient;
pub use config::AppConfig;
pub use error::{PipelineError, PipelineResult};
pub use model::{Category, ExtractedItem, IngredientRef, Quantity, Recipe};
pub use ocr::{Detection, GoogleVisionReader, TextReader};
pub use pipelines::{ExtractionPipeline, RecommendationPipeline};
pub use upload::TempImage;
