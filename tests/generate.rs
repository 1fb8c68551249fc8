//! End-to-end generation runs against a canned text generator.
//!
//! Exercises the full path the binary takes short of the network call:
//! orchestrate stages, wrap the body, write the timestamped file.

use anyhow::Result;
use methodoc::document;
use methodoc::lm::TextGenerator;
use methodoc::output;
use methodoc::pipeline::{self, Shape, TaskInputs};
use methodoc::prompts;
use std::fs;

/// Answers `STAGE:<name>`, keyed off each template's distinct closing
/// instruction.
struct StubLm;

fn stage_marker(prompt: &str) -> &'static str {
    let markers = [
        ("Genere solo la subsección de Descripción", "description"),
        ("Genere solo la subsección de Intuición", "intuition"),
        ("Genere solo la subsección del Algoritmo", "algorithm"),
        (
            "Genere solo la subsección de Ejemplo paso a paso",
            "step_by_step",
        ),
        (
            "Genere solo la subsección de Código en Python",
            "python_code",
        ),
        ("Genere solo la explicación del método", "explanation"),
        ("Genere solo el pseudocódigo", "pseudocode"),
        ("Genere solo el ejemplo paso a paso", "worked_example"),
        ("Genere solo el código en Python", "code_listing"),
        ("Genere solo el contenido LaTeX convertido", "latex_merge"),
    ];
    for (needle, name) in markers {
        if prompt.contains(needle) {
            return name;
        }
    }
    panic!("prompt matches no known stage");
}

impl TextGenerator for StubLm {
    fn generate(&self, prompt: &str) -> Result<String> {
        Ok(format!("STAGE:{}", stage_marker(prompt)))
    }
}

fn inputs() -> TaskInputs {
    TaskInputs {
        course: "Optimización".to_string(),
        method: "Descenso de Gradiente".to_string(),
        language_instruction: prompts::language_instruction("es").unwrap().to_string(),
    }
}

#[test]
fn pipeline_run_writes_a_complete_document() {
    let dir = tempfile::tempdir().unwrap();
    let generated = pipeline::run(Shape::Pipeline, &inputs(), &StubLm).unwrap();
    let latex = document::wrap_document(&generated.body);
    let path = output::write_document(
        dir.path(),
        "Optimización",
        "Descenso de Gradiente",
        &latex,
    )
    .unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("\\documentclass{article}"));
    assert!(written.ends_with("\\end{document}"));

    // All five markers, in pipeline stage order.
    let order = [
        "STAGE:description",
        "STAGE:intuition",
        "STAGE:algorithm",
        "STAGE:step_by_step",
        "STAGE:python_code",
    ];
    let mut last = 0;
    for marker in order {
        let at = written[last..]
            .find(marker)
            .unwrap_or_else(|| panic!("{marker} missing or out of order"));
        last += at + marker.len();
    }

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("optimización_descenso_de_gradiente_"));
    assert!(name.ends_with(".tex"));
    assert!(!name.contains(' '));
}

#[test]
fn fan_out_run_writes_the_formatted_body() {
    let dir = tempfile::tempdir().unwrap();
    let generated = pipeline::run(Shape::FanOut, &inputs(), &StubLm).unwrap();
    let latex = document::wrap_document(&generated.body);
    let path = output::write_document(
        dir.path(),
        "Optimización",
        "Descenso de Gradiente",
        &latex,
    )
    .unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("\\documentclass{article}"));
    assert!(written.ends_with("\\end{document}"));
    assert!(written.contains("STAGE:latex_merge"));
    // Raw sections only reach the file through the finishing call.
    assert!(!written.contains("STAGE:explanation"));
}

#[test]
fn document_wrapper_is_pure() {
    let generated = pipeline::run(Shape::Pipeline, &inputs(), &StubLm).unwrap();
    assert_eq!(
        document::wrap_document(&generated.body),
        document::wrap_document(&generated.body)
    );
}
