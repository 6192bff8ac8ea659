//! Subcommand implementations.

use crate::cli::{Cli, Command};
use snapcanvas_core::config::{ConfigError, EditorConfig};
use snapcanvas_core::document::{DocumentError, DocumentPayload};
use snapcanvas_core::storage::{FileStorage, Storage, StorageError};
use snapcanvas_render::{EditError, Editor, ExportError, render_composite};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("cannot derive a document id from {0}")]
    NoId(PathBuf),
}

pub type AppResult<T> = Result<T, AppError>;

pub fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    match cli.command {
        Command::Render { document, out, composite } => {
            for path in render(&document, &out, composite, config)? {
                println!("{}", path.display());
            }
        }
        Command::Info { document, json } => {
            let summary = Summary::of(&read_document(&document)?);
            if json {
                println!("{}", summary.to_json());
            } else {
                print!("{summary}");
            }
        }
        Command::Import { document, id, store } => {
            let id = match id {
                Some(id) => id,
                None => document
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| AppError::NoId(document.clone()))?,
            };
            let storage = open_store(store)?;
            if pollster::block_on(storage.exists(&id))? {
                log::info!("replacing stored document {id}");
            }
            pollster::block_on(storage.save(&id, &read_document(&document)?))?;
            log::info!("imported {} as {id}", document.display());
            println!("{id}");
        }
        Command::Remove { id, store } => {
            pollster::block_on(open_store(store)?.delete(&id))?;
            log::info!("removed {id}");
        }
        Command::List { store } => {
            let storage = open_store(store)?;
            for doc in pollster::block_on(storage.list())? {
                println!("{}\t{:?}\t{} shapes\t{} strokes", doc.id, doc.split_mode, doc.shapes, doc.strokes);
            }
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> AppResult<DocumentPayload> {
    let json = fs::read_to_string(path)?;
    Ok(DocumentPayload::from_json(&json)?)
}

fn open_store(dir: Option<PathBuf>) -> AppResult<FileStorage> {
    Ok(match dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    })
}

/// Render each panel of `document` into `out` as `<panel>.png`. Returns the
/// written paths.
pub fn render(document: &Path, out: &Path, composite: bool, config: EditorConfig) -> AppResult<Vec<PathBuf>> {
    let mut editor = Editor::new(config)?;
    editor.load(read_document(document)?)?;
    fs::create_dir_all(out)?;

    let mut written = Vec::new();
    for panel in editor.scene().panels() {
        let path = out.join(format!("{panel}.png"));
        fs::write(&path, editor.export_png(&panel)?)?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    if composite {
        let image = render_composite(editor.compositor(), editor.scene(), editor.config().surface_size())?;
        let path = out.join("composite.png");
        fs::write(&path, image.encode_png().map_err(ExportError::from)?)?;
        written.push(path);
    }
    log::info!("rendered {} image(s) from {}", written.len(), document.display());
    Ok(written)
}

/// Counts describing a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub split_mode: String,
    pub panels: Vec<String>,
    pub shapes_by_kind: BTreeMap<String, usize>,
    pub rasterized: usize,
    pub strokes: usize,
    pub fill_patches: usize,
}

impl Summary {
    pub fn of(document: &DocumentPayload) -> Self {
        let mut shapes_by_kind = BTreeMap::new();
        for shape in &document.shapes {
            *shapes_by_kind.entry(shape.kind.to_string()).or_insert(0) += 1;
        }
        Self {
            split_mode: format!("{:?}", document.split_mode),
            panels: document.split_mode.panel_ids().iter().map(ToString::to_string).collect(),
            shapes_by_kind,
            rasterized: document.shapes.iter().filter(|s| s.rasterized).count(),
            strokes: document.drawings.values().map(Vec::len).sum(),
            fill_patches: document.filled_images.len(),
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes_by_kind.values().sum()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "splitMode": self.split_mode,
            "panels": self.panels,
            "shapes": self.shapes_by_kind,
            "rasterized": self.rasterized,
            "strokes": self.strokes,
            "fillPatches": self.fill_patches,
        })
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "split mode:  {}", self.split_mode)?;
        writeln!(f, "panels:      {}", self.panels.join(", "))?;
        writeln!(f, "shapes:      {} ({} rasterized)", self.shape_count(), self.rasterized)?;
        for (kind, count) in &self.shapes_by_kind {
            writeln!(f, "  {kind}: {count}")?;
        }
        writeln!(f, "strokes:     {}", self.strokes)?;
        writeln!(f, "fill patches: {}", self.fill_patches)
    }
}
