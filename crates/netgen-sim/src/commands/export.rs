use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::provenance::GenerationProvenance;
use netgen_graph::{write_interchange, Graph, GraphDocument, Layout};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Interchange text read by the visualizer.
    Text,
    /// JSON document with graph and layout.
    Json,
}

#[derive(Debug, Serialize)]
pub struct NetworkExport {
    pub graph: GraphDocument,
    pub layout: Vec<PositionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<GenerationProvenance>,
}

#[derive(Debug, Serialize)]
pub struct PositionRecord {
    pub node: u64,
    pub x: f64,
    pub y: f64,
}

impl NetworkExport {
    pub fn new(graph: &Graph, layout: &Layout) -> Self {
        Self {
            graph: GraphDocument::from_graph(graph),
            layout: layout
                .iter()
                .map(|(node, &(x, y))| PositionRecord {
                    node: node.as_raw(),
                    x,
                    y,
                })
                .collect(),
            colors: None,
            provenance: None,
        }
    }

    pub fn to_json(&self) -> Result<String, NetgenError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| NetgenError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
    }
}

/// Appends `suffix` to the full output name (`net` -> `net.txt`).
pub fn sibling_path(output: &Path, suffix: &str) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Writes `<output>.txt` (interchange text) and `<output>.json`.
pub fn write_network(
    output: &Path,
    graph: &Graph,
    layout: &Layout,
    export: &NetworkExport,
) -> Result<(PathBuf, PathBuf), NetgenError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let text_path = sibling_path(output, ".txt");
    let mut writer = BufWriter::new(File::create(&text_path)?);
    write_interchange(graph, Some(layout), &mut writer)?;
    writer.flush()?;

    let json_path = sibling_path(output, ".json");
    fs::write(&json_path, export.to_json()?)?;
    Ok((text_path, json_path))
}
