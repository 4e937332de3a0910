use std::path::PathBuf;

use crate::events::ModelNotifier;
use crate::notify::Notifier;

use super::model::DataFile;

/// Names at least this long are shortened to `first15...last15`.
const MAX_NAME_CHARS: usize = 34;
const NAME_KEEP: usize = 15;

/// Ordered list of loaded files.  Append-only, plus removal of contiguous
/// ranges; never reordered.
#[derive(Debug, Default)]
pub struct FileCollectionModel {
    files: Vec<DataFile>,
    events: ModelNotifier,
}

impl FileCollectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&mut self) -> &mut ModelNotifier {
        &mut self.events
    }

    pub fn row_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, row: usize) -> Option<&DataFile> {
        self.files.get(row)
    }

    pub fn file_mut(&mut self, row: usize) -> Option<&mut DataFile> {
        self.files.get_mut(row)
    }

    /// Parse `path` and append it if it holds valid data.
    ///
    /// Parsing runs synchronously on the calling thread.
    pub fn append_file(&mut self, path: impl Into<PathBuf>, notifier: &mut dyn Notifier) -> bool {
        self.append(DataFile::open(path, notifier))
    }

    /// Append an already parsed file; invalid files are dropped.
    pub fn append(&mut self, file: DataFile) -> bool {
        if !file.is_valid() {
            return false;
        }
        let row = self.files.len();
        let _insert = self.events.insert_rows(row, row);
        self.files.push(file);
        true
    }

    /// Remove `count` files starting at `start`.  Returns `false` (and does
    /// nothing) if the range does not fit.
    pub fn remove_range(&mut self, start: usize, count: usize) -> bool {
        if count == 0 || start + count > self.files.len() {
            return false;
        }
        let _remove = self.events.remove_rows(start, start + count - 1);
        self.files.drain(start..start + count);
        true
    }

    /// `row: name: wavelengths x times`, with long names shortened.
    pub fn summary_text(&self, row: usize) -> Option<String> {
        let file = self.files.get(row)?;
        let grid = file.grid();
        Some(format!(
            "{row}: {}: {} x {}",
            short_name(&file.file_name()),
            grid.wavelengths.len(),
            grid.times.len()
        ))
    }

    /// Full path, axis sizes and first/last value of each axis.
    pub fn detail_tooltip(&self, row: usize) -> Option<String> {
        let file = self.files.get(row)?;
        let grid = file.grid();
        let w = &grid.wavelengths;
        let t = &grid.times;
        Some(format!(
            "File: {}\n{} Wavelengths: {} ... {}\n{} Timepoints: {} ... {}",
            file.path().display(),
            w.len(),
            w.first()?,
            w.last()?,
            t.len(),
            t.first()?,
            t.last()?
        ))
    }
}

fn short_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() < MAX_NAME_CHARS {
        return name.to_string();
    }
    let head: String = chars[..NAME_KEEP].iter().collect();
    let tail: String = chars[chars.len() - NAME_KEEP..].iter().collect();
    format!("{head}...{tail}")
}
