//! Walk command implementation

use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use miette::{IntoDiagnostic, Result};
use quill_model::{Document, DocumentSpec, NodeId};
use quill_walker::{Direction, Position, Range, TreeWalker, TreeWalkerOptions, WalkerValue};
use tracing::debug;

use crate::cli::OffsetPath;
use crate::config::{OutputFormat, WalkConfig, WalkDirection};
use crate::output::output_events;

/// Arguments of `quill walk`, before config defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct WalkArgs {
    pub file: PathBuf,
    pub root: Option<String>,
    pub start: Option<OffsetPath>,
    pub end: Option<OffsetPath>,
    pub position: Option<OffsetPath>,
    pub merge: bool,
    pub backward: bool,
    pub format: Option<OutputFormat>,
}

pub fn run_walk(args: &WalkArgs, config: &WalkConfig) -> Result<()> {
    let doc = load_document(&args.file)?;
    let root = select_root(&doc, args.root.as_deref().or(config.root.as_deref()))?;
    let options = walker_options(&doc, root, args, config)?;

    let direction = if args.backward || config.direction == WalkDirection::Backward {
        Direction::Backward
    } else {
        Direction::Forward
    };
    let events = collect_events(&doc, options, direction)?;

    output_events(&doc, &events, args.format.unwrap_or(config.format))
}

/// Reads a JSON or JSONC document description.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;

    let value = jsonc_parser::parse_to_serde_value(&content, &ParseOptions::default())
        .map_err(|e| miette::miette!("Failed to parse {}: {}", path.display(), e))?
        .ok_or_else(|| miette::miette!("{} is empty", path.display()))?;

    let spec: DocumentSpec = serde_json::from_value(value)
        .map_err(|e| miette::miette!("Invalid document {}: {}", path.display(), e))?;

    Document::from_spec(&spec).into_diagnostic()
}

fn select_root(doc: &Document, name: Option<&str>) -> Result<NodeId> {
    match name {
        Some(name) => doc
            .root(name)
            .ok_or_else(|| miette::miette!("Document has no root named '{}'", name)),
        None => doc
            .roots()
            .first()
            .copied()
            .ok_or_else(|| miette::miette!("Document has no roots")),
    }
}

fn walker_options(
    doc: &Document,
    root: NodeId,
    args: &WalkArgs,
    config: &WalkConfig,
) -> Result<TreeWalkerOptions> {
    let whole = Range::in_element(doc, root).into_diagnostic()?;
    let at = |path: &OffsetPath| Position::new(root, path.0.clone()).into_diagnostic();

    let start = match &args.start {
        Some(path) => at(path)?,
        None => whole.start().clone(),
    };
    let end = match &args.end {
        Some(path) => at(path)?,
        None => whole.end().clone(),
    };
    if start.is_after(&end) {
        return Err(miette::miette!(
            "Start boundary {} is after end boundary {}",
            start,
            end
        ));
    }

    let mut options = TreeWalkerOptions::new()
        .with_boundaries(Range::new(start, end))
        .merge_characters(args.merge || config.merge_characters);
    if let Some(path) = &args.position {
        options = options.with_position(at(path)?);
    }
    Ok(options)
}

fn collect_events(
    doc: &Document,
    options: TreeWalkerOptions,
    direction: Direction,
) -> Result<Vec<WalkerValue>> {
    let mut walker = TreeWalker::new(doc, options).into_diagnostic()?;
    let events = match direction {
        Direction::Forward => walker.by_ref().collect::<Result<Vec<_>, _>>(),
        Direction::Backward => walker.backward().collect::<Result<Vec<_>, _>>(),
    }
    .into_diagnostic()?;

    debug!("Walked {} events ({:?})", events.len(), direction);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::from_json(
            r#"{"roots":[
                {"name":"main","children":[{"text":"ab"}]},
                {"name":"title","children":[{"text":"t"}]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_select_root() {
        let doc = sample();
        assert_eq!(select_root(&doc, None).unwrap(), doc.root("main").unwrap());
        assert_eq!(
            select_root(&doc, Some("title")).unwrap(),
            doc.root("title").unwrap()
        );
        assert!(select_root(&doc, Some("footer")).is_err());
        assert!(select_root(&Document::new(), None).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let doc = sample();
        let root = doc.root("main").unwrap();
        let args = WalkArgs {
            start: Some(OffsetPath(vec![1])),
            merge: true,
            ..WalkArgs::default()
        };

        let options = walker_options(&doc, root, &args, &WalkConfig::default()).unwrap();
        assert!(options.merge_characters);
        let boundaries = options.boundaries.unwrap();
        assert_eq!(boundaries.start().path(), &[1]);
        assert_eq!(boundaries.end().path(), &[2]);
        assert_eq!(options.position, None);
    }

    #[test]
    fn test_rejects_reversed_boundaries() {
        let doc = sample();
        let root = doc.root("main").unwrap();
        let args = WalkArgs {
            start: Some(OffsetPath(vec![2])),
            end: Some(OffsetPath(vec![1])),
            ..WalkArgs::default()
        };

        let err = walker_options(&doc, root, &args, &WalkConfig::default()).unwrap_err();
        assert!(err.to_string().contains("after end boundary"));
    }

    #[test]
    fn test_collect_backward() {
        let doc = sample();
        let root = doc.root("main").unwrap();
        let options = walker_options(&doc, root, &WalkArgs::default(), &WalkConfig::default())
            .unwrap();

        let events = collect_events(&doc, options, Direction::Backward).unwrap();
        let offsets: Vec<_> = events
            .iter()
            .map(|e| e.previous_position.offset())
            .collect();
        assert_eq!(offsets, vec![1, 0]);
    }
}
