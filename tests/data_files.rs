use std::io::Write;
use std::path::PathBuf;

use rusty_spectra::config::PlotStyle;
use rusty_spectra::color::PaletteCursor;
use rusty_spectra::data::files::FileCollectionModel;
use rusty_spectra::data::loader::parse_file;
use rusty_spectra::data::model::{AxisEntry, DataFile, Layout};
use rusty_spectra::events::{EventLog, ModelEvent};
use rusty_spectra::notify::{Notifier, UserChoice};
use rusty_spectra::plot::egui_surface::EguiSurface;
use rusty_spectra::plot::series_table::PlotSeriesTableModel;
use rusty_spectra::plot::PlotSurface;
use rusty_spectra::state::AppState;
use tempfile::TempDir;

/// Records warnings; never expects a question.
#[derive(Default)]
struct Warnings(Vec<(String, String)>);

impl Notifier for Warnings {
    fn warn(&mut self, title: &str, message: &str) {
        self.0.push((title.to_string(), message.to_string()));
    }
    fn ask(&mut self, title: &str, _: &str, _: &[UserChoice], _: UserChoice) -> UserChoice {
        panic!("unexpected question: {title}");
    }
}

/// Answers every question with `answer` and counts them.
struct Answer {
    answer: UserChoice,
    asked: usize,
}

impl Notifier for Answer {
    fn warn(&mut self, title: &str, _: &str) {
        panic!("unexpected warning: {title}");
    }
    fn ask(&mut self, _: &str, _: &str, options: &[UserChoice], _: UserChoice) -> UserChoice {
        assert!(options.contains(&self.answer));
        self.asked += 1;
        self.answer
    }
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

const WAVELENGTH_MAJOR: &str = "\
Instrument: pump-probe
Wavelength,Time
x,0,1,2,x
400,1,2,3
500,4,5,6

footer,ignored
";

const TIME_MAJOR_TXT: &str = "\
Time 400 450 500
0 0.1 0.2 0.3
10 1.1 1.2 1.3
";

#[test]
fn wavelength_major_csv_is_normalised() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "scan.csv", WAVELENGTH_MAJOR);
    let (grid, layout) = parse_file(&path).unwrap();
    assert_eq!(layout, Layout::WavelengthMajor);
    assert_eq!(grid.wavelengths, vec![400.0, 500.0]);
    assert_eq!(grid.times, vec![0.0, 1.0, 2.0]);
    assert_eq!(grid.z, vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
}

#[test]
fn collection_skips_invalid_files_with_one_warning() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.txt", TIME_MAJOR_TXT);
    let bad = write(&dir, "bad.txt", "Time 400 500\n0 1 abc\n");
    let other = write(&dir, "notes.dat", TIME_MAJOR_TXT);

    let mut files = FileCollectionModel::new();
    let log = EventLog::default();
    log.attach(files.events());
    let mut warnings = Warnings::default();

    assert!(files.append_file(&good, &mut warnings));
    assert!(!files.append_file(&bad, &mut warnings));
    assert!(!files.append_file(&other, &mut warnings));

    assert_eq!(files.row_count(), 1);
    assert_eq!(warnings.0.len(), 2);
    assert!(warnings.0.iter().all(|(title, _)| title == "Invalid Raw Data File"));
    assert!(warnings.0[0].1.contains("bad.txt"));
    assert_eq!(
        log.take(),
        vec![
            ModelEvent::RowsAboutToBeInserted { first: 0, last: 0 },
            ModelEvent::RowsInserted { first: 0, last: 0 },
        ]
    );
    assert_eq!(files.summary_text(0).as_deref(), Some("0: good.txt: 3 x 2"));
}

#[test]
fn file_to_plot_pipeline() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "run.txt", TIME_MAJOR_TXT);
    let mut file = DataFile::open(&path, &mut Warnings::default());

    let traces = file.gen_model(true);
    assert_eq!(traces.row_count(), 3);
    assert_eq!(traces.tooltip_summary(1).as_deref(), Some("Min: 0.2 Max: 1.2"));
    let payload = traces.auxiliary_payload(1).unwrap();
    assert_eq!(payload.x, vec![AxisEntry::Number(0.0), AxisEntry::Number(10.0)]);
    assert_eq!(payload.y, vec![0.2, 1.2]);

    let mut table = PlotSeriesTableModel::with_palette(
        EguiSurface::default(),
        PlotStyle::default(),
        PaletteCursor::new(),
    );
    table.set_legend(true);
    let added = table.append_row(
        &["run 450"],
        &[payload.x],
        &[payload.y],
        &mut Warnings::default(),
    );
    assert_eq!(added, 1);
    assert!(table.surface().has_legend());
    assert_eq!(table.surface().lines()[0].spec.label, "run 450");

    let spectra = file.gen_model(false);
    assert_eq!(spectra.row_count(), 2);
    assert_eq!(
        spectra.tooltip_summary(1).as_deref(),
        Some("Lowest: 1.1 Highest: 1.3")
    );
}

const LABELLED_TXT: &str = "\
Time sampleA sampleB
0 1 2
1 3 4
";

#[test]
fn labelled_columns_plot_against_a_synthetic_axis() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "labels.txt", LABELLED_TXT);

    let mut state = AppState::with_style(PlotStyle::default());
    assert_eq!(state.open_files(vec![path], &mut Warnings::default()), 1);
    assert_eq!(
        state.axis_model().and_then(|m| m.primary_text(0)).as_deref(),
        Some("sampleA")
    );

    state.set_orientation(false);
    state.selected_rows.extend([0, 1]);
    let mut yes_to_all = Answer {
        answer: UserChoice::YesToAll,
        asked: 0,
    };
    assert_eq!(state.plot_selected(&mut yes_to_all), 2);
    assert_eq!(yes_to_all.asked, 1);
    assert_eq!(state.series.name(0), Some("labels.txt 0"));
    assert_eq!(
        state.series.series_data(1),
        Some((&[-20.0, -10.0][..], &[3.0, 4.0][..]))
    );
    assert_eq!(
        state.series.annotation(0),
        Some(&["sampleA".to_string(), "sampleB".to_string()][..])
    );

    let mut no = Answer {
        answer: UserChoice::No,
        asked: 0,
    };
    assert_eq!(state.plot_selected(&mut no), 0);
    assert_eq!(no.asked, 2);
    assert_eq!(state.series.row_count(), 2);
}
