//! The seam to code generation backends.
//!
//! A transpiler renders a finished graph into text artifacts: a style sheet,
//! a companion source module exposing recipe class names, type declarations.
//! Gesso only defines the contract; backends live elsewhere.

use std::path::PathBuf;

use gesso_canvas::Root;
use serde::{Deserialize, Serialize};

/// Options handed to a transpiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    pub minify: bool,
    pub type_declarations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Css,
    Source,
    Declaration,
}

/// A named text file produced by a transpiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub content: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, kind: ArtifactKind, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            content: content.into(),
        }
    }
}

pub trait Transpiler {
    type Error: std::error::Error;

    fn transpile(&self, root: &Root, options: &BuildOptions) -> Result<Vec<Artifact>, Self::Error>;
}

/// Run a transpiler over a finished graph.
pub fn build<T: Transpiler>(root: &Root, transpiler: &T, options: &BuildOptions) -> Result<Vec<Artifact>, T::Error> {
    let artifacts = transpiler.transpile(root, options).inspect_err(|e| {
        tracing::warn!("transpile failed: {e}");
    })?;
    for artifact in &artifacts {
        tracing::debug!(name = %artifact.name, kind = ?artifact.kind, bytes = artifact.content.len(), "artifact");
    }
    tracing::info!(artifacts = artifacts.len(), "build finished");
    Ok(artifacts)
}
