//! Batch rendering of all records.

use crate::error::{GenError, Result};
use crate::models::{sanitize_store_id, Diagnostic, Record};
use crate::render::Renderer;
use serde::Serialize;
use std::collections::HashMap;

/// One finished configuration.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    pub key: String,
    /// Source table line of the record that produced it.
    pub line: usize,
    pub text: String,
}

/// Configurations in first-seen key order plus everything worth reporting.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutput {
    pub configs: Vec<RenderedConfig>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchOutput {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.configs
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.text.as_str())
    }
}

/// Render every record in table order.
///
/// Every record must carry exactly one store column, otherwise nothing is
/// rendered. Records with a blank store value are skipped with a
/// [`Diagnostic::BlankStoreId`]. A record whose key was already produced
/// replaces the earlier output and leaves a [`Diagnostic::DuplicateKey`].
pub fn generate_batch(renderer: &Renderer, records: &[Record]) -> Result<BatchOutput> {
    log::info!("#Start generate_batch() records={}", records.len());

    if let Some(bad) = records.iter().find(|r| r.store_id().is_none()) {
        let found: Vec<String> = bad.store_columns().iter().map(|c| c.to_string()).collect();
        log::error!("line {}: store column check failed, found {:?}", bad.line, found);
        return Err(GenError::MissingStoreColumn { found });
    }

    let mut output = BatchOutput::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for record in records {
        if record.store_id().map(sanitize_store_id).unwrap_or_default().is_empty() {
            let diagnostic = Diagnostic::BlankStoreId { line: record.line };
            log::warn!("{diagnostic}");
            output.diagnostics.push(diagnostic);
            continue;
        }
        let rendered = renderer.render(record)?;
        output.diagnostics.extend(rendered.diagnostics);

        let config = RenderedConfig {
            key: rendered.key,
            line: record.line,
            text: rendered.text,
        };
        match seen.get(&config.key).copied() {
            Some(index) => {
                let diagnostic = Diagnostic::DuplicateKey {
                    key: config.key.clone(),
                    first_line: output.configs[index].line,
                    line: config.line,
                };
                log::warn!("{diagnostic}");
                output.diagnostics.push(diagnostic);
                output.configs[index] = config;
            }
            None => {
                log::info!("Generated config for {} (line {})", config.key, config.line);
                seen.insert(config.key.clone(), output.configs.len());
                output.configs.push(config);
            }
        }
    }

    log::info!(
        "# generate_batch() configs={} diagnostics={}",
        output.configs.len(),
        output.diagnostics.len()
    );
    Ok(output)
}
