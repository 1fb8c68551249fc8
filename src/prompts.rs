//! Prompt template registry and instantiation.
//!
//! Templates live as markdown files under `prompts/` and are compiled in with
//! `include_str!`. Each stage is a variant of the closed [`Stage`] enum and
//! declares the placeholder names its template references; instantiation
//! substitutes from a supplied map and fails loudly when a value is missing,
//! because a partially rendered prompt silently degrades generation quality.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

// Pipeline-shape templates: each later stage is conditioned on the literal
// text of earlier ones.
const DESCRIPTION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/description.md"
));
const INTUITION: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/intuition.md"));
const ALGORITHM: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/algorithm.md"));
const STEP_BY_STEP: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/step_by_step.md"
));
const PYTHON_CODE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/python_code.md"
));

// Fan-out-shape templates: four independent sections plus the finishing
// conversion prompt.
const EXPLANATION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/explanation.md"
));
const PSEUDOCODE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/pseudocode.md"
));
const WORKED_EXAMPLE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/worked_example.md"
));
const CODE_LISTING: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/code_listing.md"
));
const LATEX_MERGE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/latex_merge.md"
));

/// Worked exemplar inserted into every prompt as a formatting reference.
pub const ONE_SHOT_EXAMPLE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/one_shot_example.tex"
));

/// One named unit of model-generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    // Independent fan-out sections.
    Explanation,
    Pseudocode,
    WorkedExample,
    CodeListing,
    /// Finishing stage: reformats explanation + pseudocode into LaTeX.
    LatexMerge,
    // Strict pipeline sections.
    Description,
    Intuition,
    Algorithm,
    StepByStep,
    PythonCode,
}

impl Stage {
    pub const ALL: [Stage; 10] = [
        Stage::Explanation,
        Stage::Pseudocode,
        Stage::WorkedExample,
        Stage::CodeListing,
        Stage::LatexMerge,
        Stage::Description,
        Stage::Intuition,
        Stage::Algorithm,
        Stage::StepByStep,
        Stage::PythonCode,
    ];

    /// Stable name, doubling as the placeholder key later prompts use to
    /// reference this stage's output.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Explanation => "explanation",
            Stage::Pseudocode => "pseudocode",
            Stage::WorkedExample => "worked_example",
            Stage::CodeListing => "code_listing",
            Stage::LatexMerge => "latex_merge",
            Stage::Description => "description",
            Stage::Intuition => "intuition",
            Stage::Algorithm => "algorithm",
            Stage::StepByStep => "step_by_step",
            Stage::PythonCode => "python_code",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Stage::Explanation => EXPLANATION,
            Stage::Pseudocode => PSEUDOCODE,
            Stage::WorkedExample => WORKED_EXAMPLE,
            Stage::CodeListing => CODE_LISTING,
            Stage::LatexMerge => LATEX_MERGE,
            Stage::Description => DESCRIPTION,
            Stage::Intuition => INTUITION,
            Stage::Algorithm => ALGORITHM,
            Stage::StepByStep => STEP_BY_STEP,
            Stage::PythonCode => PYTHON_CODE,
        }
    }

    /// Placeholders the stage's template requires. Every entry must resolve
    /// to a task input, the exemplar, or an already-produced stage output.
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            Stage::Explanation
            | Stage::Pseudocode
            | Stage::WorkedExample
            | Stage::CodeListing
            | Stage::Description => &["language", "course", "method", "one_shot_example"],
            Stage::LatexMerge => &[
                "language",
                "course",
                "method",
                "markdown_content",
                "one_shot_example",
            ],
            Stage::Intuition => &[
                "language",
                "course",
                "method",
                "description",
                "one_shot_example",
            ],
            Stage::Algorithm => &[
                "language",
                "course",
                "method",
                "description",
                "intuition",
                "one_shot_example",
            ],
            Stage::StepByStep => &[
                "language",
                "course",
                "method",
                "algorithm",
                "one_shot_example",
            ],
            Stage::PythonCode => &[
                "language",
                "course",
                "method",
                "algorithm",
                "step_by_step",
                "one_shot_example",
            ],
        }
    }
}

/// Instruction phrase for a two-letter language code.
pub fn language_instruction(code: &str) -> Result<&'static str> {
    match code {
        "en" => Ok("Please provide the response in English."),
        "es" => Ok("Por favor, proporcione la respuesta en español."),
        other => Err(anyhow!(
            "unsupported language code {other:?} (expected \"en\" or \"es\")"
        )),
    }
}

fn placeholder_pattern() -> Regex {
    Regex::new(r"\{([a-z][a-z0-9_]*)\}").unwrap()
}

/// Collect the `{placeholder}` tokens a template references.
pub fn scan_placeholders(template: &str) -> BTreeSet<String> {
    placeholder_pattern()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Substitute every placeholder token in `template` from `vars`.
///
/// A token with no matching entry aborts the render; the error names all
/// missing keys so a broken template surfaces immediately.
pub fn render(template: &str, vars: &BTreeMap<&str, String>) -> Result<String> {
    let mut missing = BTreeSet::new();
    let rendered = placeholder_pattern().replace_all(template, |caps: &regex::Captures| {
        let key = &caps[1];
        match vars.get(key) {
            Some(value) => value.clone(),
            None => {
                missing.insert(key.to_string());
                String::new()
            }
        }
    });
    if !missing.is_empty() {
        return Err(anyhow!(
            "prompt is missing placeholder values: {}",
            missing.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }
    Ok(rendered.into_owned())
}
