//! Orchestration of generation stages.
//!
//! One driver renders a stage's prompt from the immutable task inputs plus
//! the outputs accumulated so far, invokes the generator, and stores the
//! response. The two document shapes are stage plans consumed by that
//! driver, not separate code paths.

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::thread;

use crate::lm::TextGenerator;
use crate::prompts::{self, Stage};

/// Orchestration shape for one run.
///
/// Fan-out trades an extra formatting call for latency: the four sections
/// are independent and run concurrently. Pipeline trades latency for
/// coherence: each section is conditioned on the literal text of earlier
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Shape {
    FanOut,
    Pipeline,
}

/// Separator between explanation and pseudocode fed to the finishing stage.
pub const SECTION_SEPARATOR: &str = "\n\n";

const FAN_OUT_SECTIONS: [Stage; 4] = [
    Stage::Explanation,
    Stage::Pseudocode,
    Stage::WorkedExample,
    Stage::CodeListing,
];

const PIPELINE_STAGES: [Stage; 5] = [
    Stage::Description,
    Stage::Intuition,
    Stage::Algorithm,
    Stage::StepByStep,
    Stage::PythonCode,
];

/// Immutable inputs shared by every prompt in a run.
#[derive(Debug, Clone)]
pub struct TaskInputs {
    pub course: String,
    pub method: String,
    pub language_instruction: String,
}

/// Accumulated stage outputs: one field per stage that can produce text.
///
/// Typed fields (rather than an open map) pin down which stages exist; a
/// prompt can only see an output once its field is populated.
#[derive(Debug, Default)]
pub struct StageOutputs {
    pub explanation: Option<String>,
    pub pseudocode: Option<String>,
    pub worked_example: Option<String>,
    pub code_listing: Option<String>,
    pub latex_merge: Option<String>,
    pub description: Option<String>,
    pub intuition: Option<String>,
    pub algorithm: Option<String>,
    pub step_by_step: Option<String>,
    pub python_code: Option<String>,
}

impl StageOutputs {
    fn store(&mut self, stage: Stage, text: String) {
        let slot = match stage {
            Stage::Explanation => &mut self.explanation,
            Stage::Pseudocode => &mut self.pseudocode,
            Stage::WorkedExample => &mut self.worked_example,
            Stage::CodeListing => &mut self.code_listing,
            Stage::LatexMerge => &mut self.latex_merge,
            Stage::Description => &mut self.description,
            Stage::Intuition => &mut self.intuition,
            Stage::Algorithm => &mut self.algorithm,
            Stage::StepByStep => &mut self.step_by_step,
            Stage::PythonCode => &mut self.python_code,
        };
        *slot = Some(text);
    }

    pub fn get(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Explanation => self.explanation.as_deref(),
            Stage::Pseudocode => self.pseudocode.as_deref(),
            Stage::WorkedExample => self.worked_example.as_deref(),
            Stage::CodeListing => self.code_listing.as_deref(),
            Stage::LatexMerge => self.latex_merge.as_deref(),
            Stage::Description => self.description.as_deref(),
            Stage::Intuition => self.intuition.as_deref(),
            Stage::Algorithm => self.algorithm.as_deref(),
            Stage::StepByStep => self.step_by_step.as_deref(),
            Stage::PythonCode => self.python_code.as_deref(),
        }
    }
}

/// Result of a run: the document body plus every raw stage output.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub body: String,
    pub outputs: StageOutputs,
}

pub fn run(shape: Shape, inputs: &TaskInputs, lm: &dyn TextGenerator) -> Result<GeneratedDocument> {
    match shape {
        Shape::FanOut => run_fan_out(inputs, lm),
        Shape::Pipeline => run_pipeline(inputs, lm),
    }
}

/// Five stages, one at a time, each conditioned on all earlier outputs. The
/// body is the outputs concatenated in stage order; no formatting call.
fn run_pipeline(inputs: &TaskInputs, lm: &dyn TextGenerator) -> Result<GeneratedDocument> {
    let mut outputs = StageOutputs::default();
    for stage in PIPELINE_STAGES {
        let text = invoke_stage(stage, inputs, &outputs, lm)?;
        outputs.store(stage, text);
    }
    let body = PIPELINE_STAGES
        .iter()
        .filter_map(|stage| outputs.get(*stage))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR);
    Ok(GeneratedDocument { body, outputs })
}

/// Four independent sections concurrently, then one finishing call that
/// reformats explanation + pseudocode into the final LaTeX body.
fn run_fan_out(inputs: &TaskInputs, lm: &dyn TextGenerator) -> Result<GeneratedDocument> {
    let mut outputs = StageOutputs::default();

    // The section prompts read only immutable inputs, so they can all be
    // rendered before the fork.
    let section_prompts = FAN_OUT_SECTIONS
        .iter()
        .map(|stage| Ok((*stage, stage_prompt(*stage, inputs, &outputs)?)))
        .collect::<Result<Vec<_>>>()?;

    let responses = thread::scope(|scope| {
        let handles: Vec<_> = section_prompts
            .iter()
            .map(|(stage, prompt)| {
                tracing::debug!(stage = stage.name(), "spawning section generation");
                (*stage, scope.spawn(move || lm.generate(prompt)))
            })
            .collect();
        handles
            .into_iter()
            .map(|(stage, handle)| {
                let joined = handle
                    .join()
                    .map_err(|_| anyhow!("generation thread for {} panicked", stage.name()))?;
                let text =
                    joined.with_context(|| format!("generate {} section", stage.name()))?;
                Ok((stage, text))
            })
            .collect::<Result<Vec<_>>>()
    })?;
    for (stage, text) in responses {
        outputs.store(stage, text);
    }

    let formatted = invoke_stage(Stage::LatexMerge, inputs, &outputs, lm)?;
    let body = formatted.clone();
    outputs.store(Stage::LatexMerge, formatted);
    Ok(GeneratedDocument { body, outputs })
}

fn invoke_stage(
    stage: Stage,
    inputs: &TaskInputs,
    outputs: &StageOutputs,
    lm: &dyn TextGenerator,
) -> Result<String> {
    let prompt = stage_prompt(stage, inputs, outputs)?;
    tracing::debug!(
        stage = stage.name(),
        prompt_bytes = prompt.len(),
        "invoking stage"
    );
    lm.generate(&prompt)
        .with_context(|| format!("generate {} stage", stage.name()))
}

fn stage_prompt(stage: Stage, inputs: &TaskInputs, outputs: &StageOutputs) -> Result<String> {
    let vars = available_vars(inputs, outputs);
    prompts::render(stage.template(), &vars)
        .with_context(|| format!("render {} prompt", stage.name()))
}

/// Everything a prompt may legitimately reference at this point in the run:
/// task inputs, the exemplar, every produced stage output, and the derived
/// `markdown_content` once both of its constituents exist.
fn available_vars(inputs: &TaskInputs, outputs: &StageOutputs) -> BTreeMap<&'static str, String> {
    let mut vars = BTreeMap::new();
    vars.insert("language", inputs.language_instruction.clone());
    vars.insert("course", inputs.course.clone());
    vars.insert("method", inputs.method.clone());
    vars.insert("one_shot_example", prompts::ONE_SHOT_EXAMPLE.to_string());
    for stage in Stage::ALL {
        if let Some(text) = outputs.get(stage) {
            vars.insert(stage.name(), text.to_string());
        }
    }
    if let (Some(explanation), Some(pseudocode)) = (&outputs.explanation, &outputs.pseudocode) {
        vars.insert(
            "markdown_content",
            format!("{explanation}{SECTION_SEPARATOR}{pseudocode}"),
        );
    }
    vars
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
