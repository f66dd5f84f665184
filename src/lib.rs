//! Teldat branch router config generator.
//!
//! Turns one router configuration template plus a table of per-site values
//! into one finished configuration per site:
//!
//! 1. [`ingest`] the site table (comma, tab or space aligned)
//! 2. [`generate`] a [`render::Renderer`] for the template, classifying it
//!    as Flat or Inter on the way
//! 3. render every record with [`processing::generate_batch`]
//!
//! [`run`] chains the three steps. Nothing here touches the filesystem;
//! writing the results is left to [`output`].

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod render;

pub use config::Settings;
pub use error::{GenError, Result};
pub use processing::{ingest, Detection, SplitStrategy, TopologyHint, TopologyKind};

use models::Diagnostic;
use processing::{detect, generate_batch, BatchOutput};
use render::{RenderSettings, Renderer, Template};
use serde::Serialize;

/// Everything one run produced.
#[derive(Serialize, Debug, Clone)]
pub struct Generation {
    pub detection: Detection,
    pub strategy: SplitStrategy,
    pub output: BatchOutput,
    /// Ingestion, topology and rendering diagnostics, in that order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Classify `template_text` and build a renderer with default settings.
pub fn generate(template_text: &str, type_hint: &TopologyHint) -> Result<Renderer> {
    generate_with(template_text, type_hint, &Settings::default())
}

/// Classify `template_text` and build a renderer for `settings`.
pub fn generate_with(
    template_text: &str,
    type_hint: &TopologyHint,
    settings: &Settings,
) -> Result<Renderer> {
    let detection = detect(type_hint, template_text)?;
    let template = Template {
        text: template_text.to_string(),
        detection,
    };
    Renderer::new(template, RenderSettings::from(settings))
}

/// Ingest `table_bytes` and render every site into `template_text`.
///
/// When `hint` carries no table columns, the ingested header is used.
pub fn run(
    template_text: &str,
    table_bytes: &[u8],
    mut hint: TopologyHint,
    settings: &Settings,
) -> Result<Generation> {
    log::info!("#Start run()");
    let ingested = ingest(table_bytes)?;
    if hint.table_columns.is_empty() {
        hint.table_columns = ingested.columns.clone();
    }

    let renderer = generate_with(template_text, &hint, settings)?;
    let output = generate_batch(&renderer, &ingested.records)?;

    let detection = renderer.template().detection.clone();
    let mut diagnostics = ingested.diagnostics;
    diagnostics.extend(detection.diagnostics.iter().cloned());
    diagnostics.extend(output.diagnostics.iter().cloned());

    Ok(Generation {
        detection,
        strategy: ingested.strategy,
        output,
        diagnostics,
    })
}
