//! Text surgery: splicing rendered fragments back into the source.
//!
//! The splice is line-based. Replacements and agnostic-import removals
//! run in one pass, strictly in descending line order, so a fragment
//! growing or shrinking the file never invalidates the line numbers of
//! edits still to come. Everything outside agnostic import lines and
//! replaced call lines is preserved byte-for-byte.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use skylift_rules::RuleRegistry;
use skylift_types::{
    Outcome, ProgramModel, Provider, RenderedCall, Requirement, TransformResult, Warning,
};

use crate::detect::Detector;
use crate::render::Renderer;

const DOC_DELIMS: [&str; 2] = ["\"\"\"", "'''"];

/// One edit against an original source line.
enum LineOp<'a> {
    /// Replace the line with the fragments of the calls it hosted.
    Replace(Vec<&'a RenderedCall>),
    /// Remove the line (an agnostic import).
    Remove,
}

/// Splices rendered calls into the original source and assembles the
/// final transformation outcome.
pub struct Rewriter<'a> {
    provider: Provider,
    detector: &'a Detector,
    registry: &'a RuleRegistry,
}

impl<'a> Rewriter<'a> {
    /// Rewriter for one provider, sharing the detector's namespace and
    /// the registry the calls were rendered from.
    #[must_use]
    pub fn new(provider: Provider, detector: &'a Detector, registry: &'a RuleRegistry) -> Self {
        Self {
            provider,
            detector,
            registry,
        }
    }

    /// Produce the rewritten source plus metadata.
    ///
    /// With zero rendered calls the input text is returned unchanged,
    /// carrying a single informational warning.
    ///
    /// # Errors
    ///
    /// `TransformError::RuleNotFound` if a rendered call's rule has
    /// vanished from the registry between rendering and rewriting.
    pub fn rewrite(
        &self,
        model: &ProgramModel,
        rendered: &[RenderedCall],
    ) -> TransformResult<Outcome> {
        if rendered.is_empty() {
            let mut outcome = Outcome::unchanged(self.provider, model.source.clone());
            outcome
                .warnings
                .push(Warning::info("no agnostic calls found - returning original code"));
            return Ok(outcome);
        }

        // Gather what the applied rules contribute.
        let renderer = Renderer::new(self.registry);
        let mut import_set = BTreeSet::new();
        let mut setups: Vec<String> = Vec::new();
        let mut requirements: Vec<Requirement> = Vec::new();
        let mut seen_requirements = HashSet::new();

        for item in rendered {
            let rule = renderer.lookup_rule(&item.call)?;
            import_set.extend(rule.imports.iter().cloned());
            if let Some(setup) = &rule.setup_code
                && !setups.iter().any(|existing| existing == setup)
            {
                setups.push(setup.clone());
            }
            for requirement in rule.requirements {
                if seen_requirements.insert(requirement.clone()) {
                    requirements.push(requirement);
                }
            }
        }

        let mut lines = apply_line_ops(model, rendered, self.detector);
        insert_imports(&mut lines, &import_set);
        insert_setup(&mut lines, &setups, &import_set);

        tracing::debug!(
            provider = %self.provider,
            calls = rendered.len(),
            imports = import_set.len(),
            setups = setups.len(),
            "rewrote source"
        );

        let mut metadata = serde_json::Map::new();
        metadata.insert("rewritten_calls".to_string(), rendered.len().into());

        Ok(Outcome {
            provider: self.provider,
            code: lines.join("\n"),
            imports: import_set.into_iter().collect(),
            requirements,
            warnings: Vec::new(),
            metadata,
        })
    }
}

/// Apply call replacements and agnostic-import removals bottom-up.
///
/// Both edit kinds key on original line numbers, so they share one
/// descending pass. Fragments sharing a source line are emitted in
/// column order as consecutive lines; each fragment line inherits the
/// original line's leading whitespace. A line hosting both an import and
/// a call keeps the call's replacement.
fn apply_line_ops(
    model: &ProgramModel,
    rendered: &[RenderedCall],
    detector: &Detector,
) -> Vec<String> {
    let mut groups: BTreeMap<usize, Vec<&RenderedCall>> = BTreeMap::new();
    for item in rendered {
        groups.entry(item.line).or_default().push(item);
    }

    let mut ops: BTreeMap<usize, LineOp<'_>> = groups
        .into_iter()
        .map(|(line, group)| (line, LineOp::Replace(group)))
        .collect();
    for decl in &model.imports {
        if detector.in_namespace(&decl.module) {
            ops.entry(decl.line).or_insert(LineOp::Remove);
        }
    }

    let mut lines: Vec<String> = model.source.split('\n').map(ToString::to_string).collect();

    for (line, op) in ops.into_iter().rev() {
        let Some(index) = line.checked_sub(1) else {
            continue;
        };
        if index >= lines.len() {
            continue;
        }

        match op {
            LineOp::Remove => {
                lines.remove(index);
            }
            LineOp::Replace(mut group) => {
                let original = &lines[index];
                let indent_len = original.len() - original.trim_start().len();
                let indent = original[..indent_len].to_string();

                group.sort_by_key(|item| item.call.column());
                let replacement: Vec<String> = group
                    .iter()
                    .flat_map(|item| item.code.split('\n'))
                    .map(|fragment_line| {
                        if fragment_line.is_empty() {
                            String::new()
                        } else {
                            format!("{indent}{fragment_line}")
                        }
                    })
                    .collect();

                lines.splice(index..=index, replacement);
            }
        }
    }

    lines
}

/// Insert the sorted rule imports at the conventional first-statement
/// position: after leading blank lines, `#` comments, and a leading
/// docstring.
fn insert_imports(lines: &mut Vec<String>, imports: &BTreeSet<String>) {
    if imports.is_empty() {
        return;
    }
    let at = header_end(lines);
    let mut block: Vec<String> = imports.iter().cloned().collect();
    block.push(String::new());
    lines.splice(at..at, block);
}

/// Insert the deduplicated setup blocks as one contiguous block
/// immediately after the last import-like line, padded with blank lines.
///
/// "Import-like" covers the source's own `import`/`from` statements and
/// any line of the just-inserted rule import block, whatever the target
/// language spells imports with.
fn insert_setup(lines: &mut Vec<String>, setups: &[String], inserted_imports: &BTreeSet<String>) {
    if setups.is_empty() {
        return;
    }

    let mut at = header_end(lines);
    let mut cursor = at;
    while cursor < lines.len() {
        let trimmed = lines[cursor].trim();
        let import_like = trimmed.starts_with("import ")
            || trimmed.starts_with("from ")
            || inserted_imports.contains(&lines[cursor]);
        if import_like {
            cursor += 1;
            at = cursor;
        } else if trimmed.is_empty() {
            cursor += 1;
        } else {
            break;
        }
    }

    let mut block = vec![String::new()];
    for setup in setups {
        block.extend(setup.split('\n').map(ToString::to_string));
    }
    block.push(String::new());
    lines.splice(at..at, block);
}

/// Index of the first line after the leading header block (blank lines,
/// `#` comments, and a module docstring, including multi-line forms).
fn header_end(lines: &[String]) -> usize {
    let mut end = 0;
    let mut open_delim: Option<&str> = None;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some(delim) = open_delim {
            end = index + 1;
            if trimmed.contains(delim) {
                open_delim = None;
            }
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with('#') {
            end = index + 1;
            continue;
        }

        if let Some(delim) = DOC_DELIMS.into_iter().find(|delim| trimmed.starts_with(delim)) {
            end = index + 1;
            if !trimmed[delim.len()..].contains(delim) {
                open_delim = Some(delim);
            }
            continue;
        }

        break;
    }

    end
}
