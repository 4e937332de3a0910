use std::path::Path;

use anyhow::{Context, Result};

use super::loader::RawFormat;
use super::model::{Grid, Layout};

/// Write `grid` in the raw format chosen by the extension of `path`.
///
/// `.txt` is always written time-major (`Time w1 ... wn`, tab separated),
/// with the header labels when the grid has them.  `.csv` honours `layout`: a marker line, a guarded axis line, then one
/// line per time point (or per wavelength).
pub fn write_grid(path: &Path, grid: &Grid, layout: Layout) -> Result<()> {
    let format = RawFormat::from_path(path)?;
    let delimiter = match format {
        RawFormat::Comma => b',',
        RawFormat::Whitespace => b'\t',
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let num = |v: &f64| v.to_string();

    match (format, layout) {
        (RawFormat::Whitespace, _) => {
            let columns: Vec<String> = match &grid.wavelength_labels {
                Some(labels) => labels.clone(),
                None => grid.wavelengths.iter().map(num).collect(),
            };
            let header = std::iter::once("Time".to_string()).chain(columns);
            writer.write_record(header)?;
            write_rows(&mut writer, &grid.times, grid.z.iter().cloned())?;
        }
        (RawFormat::Comma, Layout::TimeMajor) => {
            writer.write_record(["Time", "Wavelength"])?;
            writer.write_record(guarded(&grid.wavelengths))?;
            write_rows(&mut writer, &grid.times, grid.z.iter().cloned())?;
        }
        (RawFormat::Comma, Layout::WavelengthMajor) => {
            writer.write_record(["Wavelength", "Time"])?;
            writer.write_record(guarded(&grid.times))?;
            let traces = (0..grid.wavelengths.len()).filter_map(|j| grid.trace(j));
            write_rows(&mut writer, &grid.wavelengths, traces)?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Exported {} x {} grid to {}",
        grid.wavelengths.len(),
        grid.times.len(),
        path.display()
    );
    Ok(())
}

/// `,a1,a2,...,an,`
fn guarded(axis: &[f64]) -> Vec<String> {
    let mut fields = Vec::with_capacity(axis.len() + 2);
    fields.push(String::new());
    fields.extend(axis.iter().map(f64::to_string));
    fields.push(String::new());
    fields
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    labels: &[f64],
    rows: impl Iterator<Item = Vec<f64>>,
) -> Result<()> {
    for (label, row) in labels.iter().zip(rows) {
        let record = std::iter::once(label.to_string()).chain(row.iter().map(f64::to_string));
        writer.write_record(record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_file;

    fn grid() -> Grid {
        Grid {
            z: vec![vec![0.125, -2.0, 3.5], vec![4.0, 1e-9, 6.25]],
            wavelengths: vec![400.5, 410.0, 420.0],
            times: vec![-0.5, 12.0],
            ..Default::default()
        }
    }

    fn shapes() -> Vec<(&'static str, Grid)> {
        let grid_of = |z: Vec<Vec<f64>>, wavelengths: Vec<f64>, times: Vec<f64>| Grid {
            z,
            wavelengths,
            times,
            ..Default::default()
        };
        vec![
            ("mixed", grid()),
            ("single", grid_of(vec![vec![7.0]], vec![500.0], vec![0.0])),
            (
                "one_time",
                grid_of(vec![vec![1.0, 2.0, 3.0, 4.0]], vec![400.0, 401.0, 402.0, 403.0], vec![5.0]),
            ),
            (
                "one_wavelength",
                grid_of(vec![vec![1.0], vec![2.0], vec![3.0]], vec![650.0], vec![-1.0, 0.0, 1.0]),
            ),
            (
                "signs_and_exponents",
                grid_of(
                    vec![vec![-1e-12, 6.02e23], vec![-0.0, -3.75e-5]],
                    vec![-2.5e2, 1.5e3],
                    vec![-1e-3, 2.5e10],
                ),
            ),
        ]
    }

    #[test]
    fn txt_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        write_grid(&path, &grid(), Layout::TimeMajor).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Time\t400.5\t410\t420\n"));

        for (name, grid) in shapes() {
            let path = dir.path().join(format!("{name}.txt"));
            write_grid(&path, &grid, Layout::TimeMajor).unwrap();
            let (parsed, layout) = parse_file(&path).unwrap();
            assert_eq!(layout, Layout::TimeMajor, "{name}");
            assert_eq!(parsed, grid, "{name}");
        }
    }

    #[test]
    fn csv_round_trip_both_layouts() {
        let dir = tempfile::tempdir().unwrap();
        for (name, grid) in shapes() {
            for layout in [Layout::TimeMajor, Layout::WavelengthMajor] {
                let path = dir.path().join(format!("{name}_{layout:?}.csv"));
                write_grid(&path, &grid, layout).unwrap();
                let (parsed, read_layout) = parse_file(&path).unwrap();
                assert_eq!(read_layout, layout, "{name}");
                assert_eq!(parsed, grid, "{name} {layout:?}");
            }
        }
    }

    #[test]
    fn txt_keeps_header_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        let grid = Grid {
            z: vec![vec![1.0, 2.0]],
            wavelengths: vec![f64::NAN, 410.0],
            times: vec![0.0],
            wavelength_labels: Some(vec!["pump".into(), "410".into()]),
        };
        write_grid(&path, &grid, Layout::TimeMajor).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Time\tpump\t410\n"));
        let (parsed, _) = parse_file(&path).unwrap();
        assert_eq!(parsed.wavelength_labels, grid.wavelength_labels);
        assert_eq!(parsed.z, grid.z);
    }

    #[test]
    fn guarded_axis_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.csv");
        write_grid(&path, &grid(), Layout::TimeMajor).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().nth(1), Some(",400.5,410,420,"));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_grid(&dir.path().join("g.xlsx"), &grid(), Layout::TimeMajor).is_err());
    }
}
