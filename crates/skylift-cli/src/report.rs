//! Stderr reporting: outcome metadata, diffs, and failure details.

use similar::{ChangeTag, TextDiff};

use skylift_types::{Outcome, TransformError};

/// Print warnings, added imports, and requirements to stderr.
pub(crate) fn print_outcome(outcome: &Outcome) {
    if !outcome.warnings.is_empty() {
        eprintln!("\nWarnings:");
        for warning in &outcome.warnings {
            eprintln!("  - {}", warning.message);
        }
    }

    if !outcome.imports.is_empty() {
        eprintln!("\nImports added:");
        for import in &outcome.imports {
            eprintln!("  - {import}");
        }
    }

    if !outcome.requirements.is_empty() {
        eprintln!("\nDependencies required:");
        for requirement in &outcome.requirements {
            eprintln!("  - {} {}", requirement.package, requirement.version);
        }
    }
}

/// Print a unified diff between the original and rewritten source.
pub(crate) fn print_diff(original: &str, rewritten: &str) {
    let diff = TextDiff::from_lines(original, rewritten);
    eprintln!("\nDiff:");
    for (index, group) in diff.grouped_ops(3).iter().enumerate() {
        if index > 0 {
            eprintln!("...");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                eprint!("{sign}{}", change.value());
                if change.missing_newline() {
                    eprintln!();
                }
            }
        }
    }
}

/// Print a transformation failure: kind, position when available, and the
/// offending source snippet.
pub(crate) fn print_failure(error: &TransformError) {
    eprintln!("error[{}]: {error}", error.kind());
    if let Some(line) = error.line() {
        eprintln!("  --> line {line}");
    }
    if let Some(snippet) = error.snippet() {
        for snippet_line in snippet.lines().take(8) {
            eprintln!("  | {snippet_line}");
        }
    }
}
