// src/extract/pipeline.rs
//! Fold a target's step list over a parsed page into one string.

use super::step::{Cursor, Step, apply_step};
use crate::config::StepConfig;
use crate::core::{DomTree, HtmlDocument};
use crate::error::ExtractError;

/// Validate every step up front, so an invalid method aborts before any work.
pub fn compile_steps(steps: &[StepConfig]) -> Result<Vec<Step>, ExtractError> {
    steps
        .iter()
        .enumerate()
        .map(|(index, cfg)| Step::try_from(cfg).map_err(|kind| ExtractError { index, kind }))
        .collect()
}

/// Run compiled steps from the document root.
pub fn run_steps<D: DomTree>(doc: &D, steps: &[Step]) -> Result<Cursor<D::Node>, ExtractError> {
    steps
        .iter()
        .enumerate()
        .try_fold(Cursor::Node(Some(doc.root())), |cursor, (index, step)| {
            apply_step(doc, cursor, step).map_err(|kind| ExtractError { index, kind })
        })
}

/// Final cursor as a string. Absent results render empty.
pub fn render<D: DomTree>(doc: &D, cursor: Cursor<D::Node>) -> String {
    match cursor {
        Cursor::Node(Some(n)) => doc.render(n),
        Cursor::Value(Some(v)) => v,
        Cursor::Node(None) | Cursor::Value(None) => s!(),
    }
}

pub fn extract<D: DomTree>(doc: &D, steps: &[StepConfig]) -> Result<String, ExtractError> {
    let steps = compile_steps(steps)?;
    let cursor = run_steps(doc, &steps)?;
    Ok(render(doc, cursor))
}

/// Parse `body` and extract from it. The parsed tree does not outlive the call.
pub fn extract_html(body: &str, steps: &[StepConfig]) -> Result<String, ExtractError> {
    let doc = HtmlDocument::parse(body);
    extract(&doc, steps)
}
