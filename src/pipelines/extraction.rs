use crate::completion::CompletionClient;
use crate::error::{PipelineError, PipelineResult};
use crate::model::ExtractedItem;
use crate::ocr::{self, TextReader};
use crate::parser;
use crate::prompt::{self, TIMESTAMP_FORMAT};
use crate::upload::TempImage;
use chrono::Local;
use log::{debug, info};
use std::sync::Arc;

/// Image → OCR → normalized text → prompt → completion → validated items.
///
/// Stateless across requests; every value it produces is request-scoped.
pub struct ExtractionPipeline {
    reader: Arc<dyn TextReader>,
    completion: CompletionClient,
    locale: String,
}

impl ExtractionPipeline {
    pub fn new(
        reader: Arc<dyn TextReader>,
        completion: CompletionClient,
        locale: impl Into<String>,
    ) -> Self {
        ExtractionPipeline {
            reader,
            completion,
            locale: locale.into(),
        }
    }

    /// Runs one extraction request.
    ///
    /// The pipeline takes ownership of the temp-image guard, so the staged
    /// file is removed on every exit path, including collaborator faults.
    pub async fn run(&self, image: Option<TempImage>) -> PipelineResult<Vec<ExtractedItem>> {
        let image = image.ok_or(PipelineError::InputMissing("No image file provided"))?;

        let detections = self.reader.read_text(image.path(), &self.locale).await?;
        let text = ocr::join_detections(&detections);
        debug!("normalized OCR text ({} fragments): {text}", detections.len());

        // One stamp per request; every row of this response carries it.
        let observed_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let prompt = prompt::extraction_prompt(&text, &observed_at);

        let reply = self.completion.complete(&prompt).await?;
        let items = parser::parse_extraction(&reply)?;

        info!("extracted {} inventory item(s)", items.len());
        Ok(items)
    }
}
