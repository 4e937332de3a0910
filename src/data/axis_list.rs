use crate::error::EditError;
use crate::events::ModelNotifier;

use super::model::{AxisEntry, Grid};
use super::substitute::{Scope, Substitution};

/// The series behind one row, ready to hand to the plot: `(x, y)`.
///
/// `x` carries text entries when a spectrum runs over a labelled
/// wavelength header.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPayload {
    pub x: Vec<AxisEntry>,
    pub y: Vec<f64>,
}

/// List view over one file's grid.
///
/// With `by_wavelength` set, rows are wavelengths and each row's payload is
/// that wavelength's time trace.  Otherwise rows are time points and each
/// payload is the spectrum at that time.  The model owns copies of the
/// grid's arrays: edits here never reach the [`DataFile`](super::model::DataFile).
#[derive(Debug)]
pub struct AxisListModel {
    z: Vec<Vec<f64>>,
    wavelengths: Vec<f64>,
    times: Vec<f64>,
    wavelength_labels: Option<Vec<String>>,
    by_wavelength: bool,
    events: ModelNotifier,
}

impl AxisListModel {
    pub fn new(grid: &Grid, by_wavelength: bool) -> Self {
        Self {
            z: grid.z.clone(),
            wavelengths: grid.wavelengths.clone(),
            times: grid.times.clone(),
            wavelength_labels: grid.wavelength_labels.clone(),
            by_wavelength,
            events: ModelNotifier::default(),
        }
    }

    pub fn events(&mut self) -> &mut ModelNotifier {
        &mut self.events
    }

    pub fn by_wavelength(&self) -> bool {
        self.by_wavelength
    }

    /// Switch between wavelength rows and time rows.  Always a full layout
    /// change, even when the orientation is unchanged.
    pub fn set_type(&mut self, by_wavelength: bool) {
        let _layout = self.events.reset_layout();
        self.by_wavelength = by_wavelength;
    }

    pub fn row_count(&self) -> usize {
        self.primary().len()
    }

    pub fn primary_value(&self, row: usize) -> Option<f64> {
        self.primary().get(row).copied()
    }

    /// What the list shows for `row`: the header text on a labelled
    /// wavelength axis, the number otherwise.
    pub fn primary_text(&self, row: usize) -> Option<String> {
        match self.labels() {
            Some(labels) => labels.get(row).cloned(),
            None => self.primary_value(row).map(|v| v.to_string()),
        }
    }

    /// Text offered to an editor for `row`.
    pub fn edit_text(&self, row: usize) -> Option<String> {
        self.primary_text(row)
    }

    /// `(opposite axis, slice of z)` for `row`.
    pub fn auxiliary_payload(&self, row: usize) -> Option<SeriesPayload> {
        let y = self.slice(row)?;
        let x = if self.by_wavelength {
            self.times.iter().copied().map(AxisEntry::Number).collect()
        } else {
            match &self.wavelength_labels {
                Some(labels) => labels.iter().map(|l| AxisEntry::parse(l)).collect(),
                None => self.wavelengths.iter().copied().map(AxisEntry::Number).collect(),
            }
        };
        Some(SeriesPayload { x, y })
    }

    pub fn tooltip_summary(&self, row: usize) -> Option<String> {
        let slice = self.slice(row)?;
        let lo = slice.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(if self.by_wavelength {
            format!("Min: {lo} Max: {hi}")
        } else {
            format!("Lowest: {lo} Highest: {hi}")
        })
    }

    /// Edit the primary value of `row`; see [`try_set_primary_value`](Self::try_set_primary_value).
    pub fn set_primary_value(&mut self, row: usize, value: &str) -> bool {
        match self.try_set_primary_value(row, value) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("Rejected axis edit at row {row}: {e}");
                false
            }
        }
    }

    /// Accepts a number, or `:s/FIND/REPLACE/` (this row) and
    /// `:s/FIND/REPLACE/g` (every row).  Substitutions whose result is not a
    /// number, or equals the old value, leave that entry alone and do not
    /// count.  On a labelled wavelength axis substitutions work on the label
    /// text and any result is kept.  Returns how many entries changed.
    pub fn try_set_primary_value(&mut self, row: usize, value: &str) -> Result<usize, EditError> {
        if row >= self.row_count() {
            return Err(EditError::OutOfRange { row, col: 0 });
        }

        if let Ok(num) = value.trim().parse::<f64>() {
            self.primary_mut()[row] = num;
            if let Some(labels) = self.labels_mut() {
                labels[row] = num.to_string();
            }
            self.events.data_changed(row, row);
            return Ok(1);
        }

        let Some(sub) = Substitution::parse(value)? else {
            return Err(EditError::NotANumber(value.to_string()));
        };

        let rows = match sub.scope {
            Scope::All => 0..self.row_count(),
            Scope::Row => row..row + 1,
        };
        let mut changed: Option<(usize, usize)> = None;
        let mut count = 0;
        for j in rows {
            if !self.substitute_at(j, &sub) {
                continue;
            }
            count += 1;
            changed = Some(match changed {
                Some((first, _)) => (first, j),
                None => (j, j),
            });
        }

        match changed {
            Some((first, last)) => {
                self.events.data_changed(first, last);
                Ok(count)
            }
            None => Err(EditError::NoMatch),
        }
    }

    /// Apply `sub` to entry `j`; true when the entry changed.
    fn substitute_at(&mut self, j: usize, sub: &Substitution) -> bool {
        if self.by_wavelength {
            if let Some(labels) = self.wavelength_labels.as_mut() {
                let text = sub.apply(&labels[j]);
                if text == labels[j] {
                    return false;
                }
                self.wavelengths[j] = text.trim().parse().unwrap_or(f64::NAN);
                labels[j] = text;
                return true;
            }
        }
        let axis = self.primary_mut();
        match sub.apply_numeric(axis[j]) {
            Some(num) if num != axis[j] => {
                axis[j] = num;
                true
            }
            _ => false,
        }
    }

    /// Header labels, when rows are wavelengths and the file had some.
    fn labels(&self) -> Option<&[String]> {
        self.wavelength_labels
            .as_deref()
            .filter(|_| self.by_wavelength)
    }

    fn labels_mut(&mut self) -> Option<&mut Vec<String>> {
        if self.by_wavelength {
            self.wavelength_labels.as_mut()
        } else {
            None
        }
    }

    fn primary(&self) -> &[f64] {
        if self.by_wavelength {
            &self.wavelengths
        } else {
            &self.times
        }
    }

    fn primary_mut(&mut self) -> &mut Vec<f64> {
        if self.by_wavelength {
            &mut self.wavelengths
        } else {
            &mut self.times
        }
    }

    fn slice(&self, row: usize) -> Option<Vec<f64>> {
        if row >= self.row_count() {
            return None;
        }
        if self.by_wavelength {
            self.z.iter().map(|r| r.get(row).copied()).collect()
        } else {
            self.z.get(row).cloned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventLog, ModelEvent};

    fn grid() -> Grid {
        Grid {
            z: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            wavelengths: vec![5.0, 15.0, 25.0],
            times: vec![0.0, 1.0],
            ..Default::default()
        }
    }

    fn numbers(values: &[f64]) -> Vec<AxisEntry> {
        values.iter().copied().map(AxisEntry::Number).collect()
    }

    fn labelled() -> Grid {
        Grid {
            z: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            wavelengths: vec![f64::NAN, f64::NAN],
            times: vec![0.0, 1.0],
            wavelength_labels: Some(vec!["sampleA".into(), "sampleB".into()]),
        }
    }

    #[test]
    fn orientation_selects_rows() {
        let mut model = AxisListModel::new(&grid(), true);
        assert_eq!(model.row_count(), 3);
        assert_eq!(model.primary_value(1), Some(15.0));
        assert_eq!(
            model.auxiliary_payload(2),
            Some(SeriesPayload {
                x: numbers(&[0.0, 1.0]),
                y: vec![3.0, 6.0]
            })
        );
        assert_eq!(model.tooltip_summary(0).as_deref(), Some("Min: 1 Max: 4"));

        model.set_type(false);
        assert_eq!(model.row_count(), 2);
        assert_eq!(
            model.auxiliary_payload(1),
            Some(SeriesPayload {
                x: numbers(&[5.0, 15.0, 25.0]),
                y: vec![4.0, 5.0, 6.0]
            })
        );
        assert_eq!(
            model.tooltip_summary(0).as_deref(),
            Some("Lowest: 1 Highest: 3")
        );

        model.set_type(true);
        assert_eq!(model.row_count(), 3);
    }

    #[test]
    fn out_of_range_reads_are_none() {
        let model = AxisListModel::new(&grid(), false);
        assert_eq!(model.primary_value(2), None);
        assert_eq!(model.auxiliary_payload(2), None);
        assert_eq!(model.tooltip_summary(99), None);
        assert_eq!(model.edit_text(5), None);
    }

    #[test]
    fn set_type_emits_layout_change() {
        let mut model = AxisListModel::new(&grid(), true);
        let log = EventLog::default();
        log.attach(model.events());
        model.set_type(false);
        assert_eq!(
            log.take(),
            vec![ModelEvent::LayoutAboutToBeChanged, ModelEvent::LayoutChanged]
        );
    }

    #[test]
    fn global_substitution() {
        let mut model = AxisListModel::new(&grid(), true);
        assert!(model.set_primary_value(0, ":s/5/9/g"));
        assert_eq!(model.edit_text(0).as_deref(), Some("9"));
        assert_eq!(model.primary_value(1), Some(19.0));
        assert_eq!(model.primary_value(2), Some(29.0));
    }

    #[test]
    fn partial_substitution_still_succeeds() {
        let mut model = AxisListModel::new(&grid(), true);
        // "15" -> "x5" does not parse and the other entries are untouched
        assert_eq!(model.try_set_primary_value(0, ":s/1/x/g"), Err(EditError::NoMatch));
        // only "25" contains a 2
        assert_eq!(model.try_set_primary_value(0, ":s/2/3/g"), Ok(1));
        assert_eq!(model.primary_value(2), Some(35.0));
        assert_eq!(model.primary_value(0), Some(5.0));
    }

    #[test]
    fn row_substitution_and_literals() {
        let mut model = AxisListModel::new(&grid(), false);
        assert!(model.set_primary_value(1, ":s/1/2/"));
        assert_eq!(model.primary_value(1), Some(2.0));
        assert!(model.set_primary_value(0, " 0.25 "));
        assert_eq!(model.primary_value(0), Some(0.25));
        assert!(!model.set_primary_value(0, "abc"));
        assert!(!model.set_primary_value(0, ":s/a/b/q"));
        assert!(!model.set_primary_value(7, "1"));
        assert_eq!(model.primary_value(0), Some(0.25));
    }

    #[test]
    fn edits_emit_data_changed() {
        let mut model = AxisListModel::new(&grid(), true);
        let log = EventLog::default();
        log.attach(model.events());
        model.set_primary_value(0, ":s/5/6/g");
        assert_eq!(log.take(), vec![ModelEvent::DataChanged { first: 0, last: 2 }]);
    }

    #[test]
    fn labelled_wavelengths_flow_into_spectra() {
        let mut model = AxisListModel::new(&labelled(), true);
        assert_eq!(model.primary_text(1).as_deref(), Some("sampleB"));
        assert_eq!(model.edit_text(0).as_deref(), Some("sampleA"));

        model.set_type(false);
        assert_eq!(model.primary_text(1).as_deref(), Some("1"));
        assert_eq!(
            model.auxiliary_payload(0),
            Some(SeriesPayload {
                x: vec![
                    AxisEntry::Text("sampleA".into()),
                    AxisEntry::Text("sampleB".into())
                ],
                y: vec![1.0, 2.0]
            })
        );
    }

    #[test]
    fn labelled_wavelengths_edit_as_text() {
        let mut model = AxisListModel::new(&labelled(), true);
        assert_eq!(model.try_set_primary_value(0, ":s/sample/run/g"), Ok(2));
        assert_eq!(model.primary_text(1).as_deref(), Some("runB"));
        assert!(!model.set_primary_value(0, ":s/zzz/y/"));
        assert!(model.set_primary_value(1, "480"));
        assert_eq!(model.primary_text(1).as_deref(), Some("480"));
        assert_eq!(model.primary_value(1), Some(480.0));

        model.set_type(false);
        assert_eq!(
            model.auxiliary_payload(0).map(|p| p.x),
            Some(vec![AxisEntry::Text("runA".into()), AxisEntry::Number(480.0)])
        );
    }
}
