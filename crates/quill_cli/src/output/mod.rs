//! Output formatting module

mod json;
mod text;

use miette::Result;
use quill_model::Document;
use quill_walker::WalkerValue;

use crate::config::OutputFormat;

pub fn output_events(doc: &Document, events: &[WalkerValue], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(doc, events),
        OutputFormat::Text => text::output_text(doc, events),
    }
}
