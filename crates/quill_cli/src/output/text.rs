//! Text output formatter

use miette::{IntoDiagnostic, Result};
use quill_model::Document;
use quill_walker::{WalkerItem, WalkerValue};

pub fn output_text(doc: &Document, events: &[WalkerValue]) -> Result<()> {
    for event in events {
        println!("{}", render_event(doc, event)?);
    }
    Ok(())
}

/// One line per event, e.g. `TEXT "ba" {"bold":true} [1,0] -> [1,2]`.
pub(crate) fn render_event(doc: &Document, event: &WalkerValue) -> Result<String> {
    let subject = match &event.item {
        WalkerItem::Element(id) => doc.name(*id).unwrap_or("?").to_string(),
        WalkerItem::Text(fragment) => format!(
            "{:?} {}",
            fragment.text(doc).into_diagnostic()?,
            fragment.attributes(doc).into_diagnostic()?
        ),
    };

    Ok(format!(
        "{} {} {} -> {}",
        event.event_type, subject, event.previous_position, event.next_position
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_walker::Range;

    #[test]
    fn test_render_events() {
        let doc = Document::from_json(
            r#"{"roots":[{"name":"root","children":[
                {"name":"p","children":[
                    {"text":"ba","attributes":{"bold":true}},
                    {"text":"r"}
                ]}
            ]}]}"#,
        )
        .unwrap();
        let root = doc.root("root").unwrap();
        let range = Range::in_element(&doc, root).unwrap();
        let lines: Vec<_> = range
            .walker(&doc, true)
            .unwrap()
            .map(|event| render_event(&doc, &event.unwrap()).unwrap())
            .collect();

        insta::assert_snapshot!(lines.join("\n"), @r#"
        ELEMENT_START p [0] -> [0,0]
        TEXT "ba" {"bold":true} [0,0] -> [0,2]
        TEXT "r" {} [0,2] -> [0,3]
        ELEMENT_END p [0,3] -> [1]
        "#);
    }
}
