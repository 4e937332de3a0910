use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::StringRecord;

use crate::error::ParseError;
use crate::notify::Notifier;

use super::model::{Grid, Layout};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Supported raw data formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    /// `.csv`: a `Time,Wavelength` or `Wavelength,Time` marker line, then a
    /// guarded axis line (`,a1,a2,...,an,`), then comma-separated rows.
    Comma,
    /// `.txt`: a `Time w1 w2 ... wn` header, then whitespace-separated rows.
    Whitespace,
}

impl RawFormat {
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Ok(RawFormat::Comma),
            "txt" => Ok(RawFormat::Whitespace),
            other => Err(ParseError::UnsupportedExtension(other.to_string())),
        }
    }
}

/// Load a raw file, reporting any failure through `notifier`.
///
/// Never fails: an unreadable or malformed file yields an empty [`Grid`]
/// (which `DataFile::is_valid` rejects) after one warning.
pub fn load_grid(path: &Path, notifier: &mut dyn Notifier) -> (Grid, Layout) {
    match parse_file(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("Skipping {}: {e}", path.display());
            notifier.warn(
                "Invalid Raw Data File",
                &format!(
                    "File {} contains no valid data. Skipped.\n({e})",
                    path.display()
                ),
            );
            (Grid::default(), Layout::TimeMajor)
        }
    }
}

/// Parse a raw file into a time-major grid.
///
/// The body scan is lenient: a non-numeric field marks the file invalid but
/// scanning continues until a blank line or a line with the wrong number of
/// fields, so trailing footers are ignored.  The first problem seen is
/// returned once the scan is finished.
pub fn parse_file(path: &Path) -> Result<(Grid, Layout), ParseError> {
    let format = RawFormat::from_path(path)?;
    let mut scan = Scan::default();
    let table = match format {
        RawFormat::Comma => read_comma(path, &mut scan)?,
        RawFormat::Whitespace => read_whitespace(path, &mut scan)?,
    };
    let Some(table) = table else {
        return Err(scan.first_error.unwrap_or(ParseError::MissingHeader));
    };

    let layout = table.layout;
    let width = table.axis.len();
    let grid = match layout {
        Layout::TimeMajor => Grid {
            z: table.rows,
            wavelengths: table.axis,
            times: table.first_column,
            wavelength_labels: table.labels,
        },
        Layout::WavelengthMajor => Grid {
            z: transpose(&table.rows, width),
            wavelengths: table.first_column,
            times: table.axis,
            wavelength_labels: None,
        },
    };

    log::info!(
        "{}: {} = {} * {}",
        path.display(),
        grid.cell_count(),
        grid.wavelengths.len(),
        grid.times.len()
    );

    if let Some(e) = scan.first_error {
        return Err(e);
    }
    if grid.wavelengths.is_empty() || grid.times.is_empty() {
        return Err(ParseError::EmptyAxis {
            wavelengths: grid.wavelengths.len(),
            times: grid.times.len(),
        });
    }
    Ok((grid, layout))
}

// ---------------------------------------------------------------------------
// Scanner state
// ---------------------------------------------------------------------------

/// Header axis and body rows of one file, before orientation is applied.
struct Table {
    layout: Layout,
    axis: Vec<f64>,
    /// Header text, kept when some of the header does not parse.
    labels: Option<Vec<String>>,
    first_column: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl Table {
    fn new(layout: Layout, axis: Vec<f64>, labels: Option<Vec<String>>) -> Self {
        Self {
            layout,
            axis,
            labels,
            first_column: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Split a parsed body line into its label and its values.
    fn push_row(&mut self, mut numbers: Vec<f64>) {
        let rest = numbers.split_off(1);
        self.first_column.push(numbers[0]);
        self.rows.push(rest);
    }
}

#[derive(Default)]
struct Scan {
    first_error: Option<ParseError>,
}

impl Scan {
    fn invalid(&mut self, e: ParseError) {
        if self.first_error.is_none() {
            self.first_error = Some(e);
        }
    }

    /// Parse every field; bad fields become NaN and mark the file invalid.
    fn numbers<'a>(&mut self, fields: impl IntoIterator<Item = &'a str>, line_no: usize) -> Vec<f64> {
        fields
            .into_iter()
            .map(|f| match f.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    self.invalid(ParseError::NonNumeric {
                        line: line_no,
                        field: f.trim().to_string(),
                    });
                    f64::NAN
                }
            })
            .collect()
    }

    /// All-or-nothing parse of an axis: any bad entry leaves the axis empty.
    fn axis(&mut self, fields: &[&str], line_no: usize) -> Vec<f64> {
        let mut values = Vec::with_capacity(fields.len());
        for f in fields {
            match f.trim().parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    self.invalid(ParseError::NonNumeric {
                        line: line_no,
                        field: f.trim().to_string(),
                    });
                    return Vec::new();
                }
            }
        }
        values
    }
}

// ---------------------------------------------------------------------------
// Comma separated (.csv)
// ---------------------------------------------------------------------------

/// Scan records for the orientation marker; the record after it holds the
/// first axis between two guard fields, then body rows follow.
fn read_comma(path: &Path, scan: &mut Scan) -> Result<Option<Table>, ParseError> {
    let csv_error = |source: csv::Error| ParseError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let mut record = StringRecord::new();

    let layout = loop {
        if !reader.read_record(&mut record).map_err(csv_error)? {
            return Ok(None);
        }
        let line = record.iter().collect::<Vec<_>>().join(",");
        if line.contains("Time,Wavelength") {
            break Layout::TimeMajor;
        } else if line.contains("Wavelength,Time") {
            break Layout::WavelengthMajor;
        }
    };

    if !reader.read_record(&mut record).map_err(csv_error)? {
        return Ok(Some(Table::new(layout, Vec::new(), None)));
    }
    let fields: Vec<&str> = record.iter().collect();
    let axis = if fields.len() < 2 {
        Vec::new()
    } else {
        scan.axis(&fields[1..fields.len() - 1], line_of(&record))
    };

    let mut table = Table::new(layout, axis, None);
    let width = table.axis.len();
    if width == 0 {
        return Ok(Some(table));
    }
    // Empty lines are skipped by the reader, so the reader's line count
    // jumping by more than one between records means a blank line.
    let mut last_line = reader.position().line();
    while reader.read_record(&mut record).map_err(csv_error)? {
        let line = reader.position().line();
        if line > last_line + 1 || record.len() != width + 1 {
            break;
        }
        last_line = line;
        table.push_row(scan.numbers(record.iter(), line_of(&record)));
    }
    Ok(Some(table))
}

/// 1-based line on which `record` starts.
fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}

// ---------------------------------------------------------------------------
// Whitespace separated (.txt)
// ---------------------------------------------------------------------------

/// Line reader that tracks 1-based line numbers and maps I/O errors.
struct Lines<'p, R> {
    inner: std::io::Lines<R>,
    line_no: usize,
    path: &'p Path,
}

impl<'p, R: BufRead> Lines<'p, R> {
    fn new(reader: R, path: &'p Path) -> Self {
        Self {
            inner: reader.lines(),
            line_no: 0,
            path,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        match self.inner.next() {
            None => Ok(None),
            Some(Ok(line)) => {
                self.line_no += 1;
                Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
            }
            Some(Err(source)) => Err(ParseError::Io {
                path: self.path.to_path_buf(),
                source,
            }),
        }
    }
}

/// A single `Time w1 w2 ... wn` line, then rows until a blank line or a
/// field-count mismatch.
///
/// Header tokens name the columns and need not be numbers: when any of them
/// does not parse, all of them are kept as labels and the unparsed entries of
/// the numeric axis are NaN.
fn read_whitespace(path: &Path, scan: &mut Scan) -> Result<Option<Table>, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut lines = Lines::new(BufReader::new(file), path);

    let Some(header) = lines.next_line()? else {
        return Ok(None);
    };
    let tokens: Vec<&str> = header.split_whitespace().collect();
    let rest = match tokens.split_first() {
        Some((&"Time", rest)) if !rest.is_empty() => rest,
        _ => return Ok(None),
    };
    let parsed: Vec<Option<f64>> = rest.iter().map(|t| t.parse().ok()).collect();
    let labels = parsed
        .iter()
        .any(Option::is_none)
        .then(|| rest.iter().map(|t| t.to_string()).collect());
    let axis = parsed.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();

    let mut table = Table::new(Layout::TimeMajor, axis, labels);
    let width = table.axis.len();
    while let Some(line) = lines.next_line()? {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() || fields.len() != width + 1 {
            break;
        }
        table.push_row(scan.numbers(fields, lines.line_no));
    }
    Ok(Some(table))
}

/// `rows[j][i]` → `out[i][j]`; every row has `width` entries.
fn transpose(rows: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    (0..width)
        .map(|i| rows.iter().map(|r| r[i]).collect())
        .collect()
}
