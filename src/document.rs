//! LaTeX document assembly.
//!
//! Pure text operation: the assembled body goes between a fixed preamble
//! (math, algorithm, and code-listing packages) and the terminator. No
//! timestamps or other nondeterminism belong in here.

const PREAMBLE: &str = "\\documentclass{article}\n\\usepackage{amsmath}\n\\usepackage{algorithm}\n\\usepackage{algpseudocode}\n\\begin{document}\n\n";
const TERMINATOR: &str = "\\end{document}";

/// Wrap an assembled body in the document boilerplate.
pub fn wrap_document(body: &str) -> String {
    let mut out = String::with_capacity(PREAMBLE.len() + body.len() + TERMINATOR.len() + 1);
    out.push_str(PREAMBLE);
    out.push_str(body);
    out.push('\n');
    out.push_str(TERMINATOR);
    out
}
