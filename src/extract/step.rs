// src/extract/step.rs
//! Step interpreter: one declarative instruction applied to the running cursor.

use crate::config::StepConfig;
use crate::core::DomTree;
use crate::error::StepError;

/// A validated step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Re-search the whole document for a text node equal to `text`.
    FindText { text: String },
    Parent,
    NextSibling,
    Attribute { name: String },
}

impl Step {
    pub fn method(&self) -> &'static str {
        match self {
            Step::FindText { .. } => "find_text",
            Step::Parent => "parent",
            Step::NextSibling => "find_next_sibling",
            Step::Attribute { .. } => "get_attribute",
        }
    }
}

impl TryFrom<&StepConfig> for Step {
    type Error = StepError;

    fn try_from(cfg: &StepConfig) -> Result<Self, StepError> {
        let p = &cfg.params;
        match cfg.method.as_str() {
            "find_text" => Ok(Step::FindText { text: p.text.clone().unwrap_or_default() }),
            "parent" => Ok(Step::Parent),
            "find_next_sibling" => Ok(Step::NextSibling),
            "get_attribute" => Ok(Step::Attribute { name: p.name.clone().unwrap_or_default() }),
            other => Err(StepError::InvalidStepMethod(s!(other))),
        }
    }
}

/// Value carried from one step to the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cursor<N> {
    Node(Option<N>),
    Value(Option<String>),
}

/// Apply one step. Absent input is an error for every step; absent output is not.
pub fn apply_step<D: DomTree>(
    doc: &D,
    cursor: Cursor<D::Node>,
    step: &Step,
) -> Result<Cursor<D::Node>, StepError> {
    let node = match cursor {
        Cursor::Node(Some(n)) => n,
        Cursor::Node(None) | Cursor::Value(None) => {
            return Err(StepError::NullNodeTraversal(step.method()));
        }
        Cursor::Value(Some(_)) => return Err(StepError::NotANode(step.method())),
    };

    Ok(match step {
        Step::FindText { text } => Cursor::Node(doc.find_text(text)),
        Step::Parent => Cursor::Node(doc.parent(node)),
        Step::NextSibling => Cursor::Node(doc.next_sibling(node)),
        Step::Attribute { name } => Cursor::Value(doc.attribute(node, name)),
    })
}
