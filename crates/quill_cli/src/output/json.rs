//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use quill_model::Document;
use quill_walker::{WalkerItem, WalkerValue};
use serde_json::{Map, Value, json};

pub fn output_json(doc: &Document, events: &[WalkerValue]) -> Result<()> {
    let output = events
        .iter()
        .map(|event| event_to_json(doc, event))
        .collect::<Result<Vec<_>>>()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}

pub(crate) fn event_to_json(doc: &Document, event: &WalkerValue) -> Result<Value> {
    let mut object = Map::new();
    object.insert("type".to_string(), json!(event.event_type));

    match &event.item {
        WalkerItem::Element(id) => {
            object.insert("name".to_string(), json!(doc.name(*id)));
        }
        WalkerItem::Text(fragment) => {
            object.insert(
                "text".to_string(),
                json!(fragment.text(doc).into_diagnostic()?),
            );
            object.insert(
                "attributes".to_string(),
                serde_json::to_value(fragment.attributes(doc).into_diagnostic()?)
                    .into_diagnostic()?,
            );
        }
    }

    if let Some(length) = event.length {
        object.insert("length".to_string(), json!(length));
    }
    object.insert(
        "previousPosition".to_string(),
        json!(event.previous_position.path()),
    );
    object.insert(
        "nextPosition".to_string(),
        json!(event.next_position.path()),
    );

    Ok(Value::Object(object))
}
