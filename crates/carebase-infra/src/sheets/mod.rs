//! Spreadsheet record source backed by calamine.
//!
//! Reads the four clinical workbooks (patients, doctors, appointments,
//! prescriptions) from xlsx files. Columns are matched by exact header
//! name on the first row; a missing column or an uninterpretable cell
//! fails the whole load with a row-and-column diagnostic.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, DataType, Range, Reader, Xlsx};
use chrono::NaiveDate;

use carebase_core::load::RecordSource;
use carebase_types::doctor::Doctor;
use carebase_types::error::LoadError;
use carebase_types::patient::Patient;
use carebase_types::visit::{Appointment, Prescription};

/// Record source reading the first worksheet of each of four xlsx files.
pub struct XlsxRecordSource {
    patients_path: PathBuf,
    doctors_path: PathBuf,
    appointments_path: PathBuf,
    prescriptions_path: PathBuf,
}

impl XlsxRecordSource {
    pub fn new(
        patients_path: PathBuf,
        doctors_path: PathBuf,
        appointments_path: PathBuf,
        prescriptions_path: PathBuf,
    ) -> Self {
        Self {
            patients_path,
            doctors_path,
            appointments_path,
            prescriptions_path,
        }
    }
}

/// First worksheet of the workbook at `path`.
fn open_sheet(path: &Path) -> Result<Range<Data>, LoadError> {
    let open_err = |detail: String| LoadError::Open {
        path: path.display().to_string(),
        detail,
    };

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| open_err(e.to_string()))?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| open_err("workbook has no worksheets".to_string()))?
        .map_err(|e| open_err(e.to_string()))
}

/// Column positions from the header row, matched by exact name.
struct Columns<'a> {
    source_name: &'a str,
    by_name: HashMap<String, usize>,
}

impl<'a> Columns<'a> {
    fn from_range(source_name: &'a str, range: &Range<Data>) -> Result<Self, LoadError> {
        let header = range.rows().next().ok_or_else(|| LoadError::Open {
            path: source_name.to_string(),
            detail: "worksheet is empty".to_string(),
        })?;

        let by_name = header
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_string().map(|name| (name.trim().to_string(), i)))
            .collect();

        Ok(Self {
            source_name,
            by_name,
        })
    }

    fn index(&self, column: &str) -> Result<usize, LoadError> {
        self.by_name
            .get(column)
            .copied()
            .ok_or_else(|| LoadError::MissingColumn {
                source_name: self.source_name.to_string(),
                column: column.to_string(),
            })
    }

    fn invalid(&self, column: &str, row: usize) -> LoadError {
        LoadError::InvalidCell {
            source_name: self.source_name.to_string(),
            column: column.to_string(),
            row,
        }
    }

    fn i64(&self, cells: &[Data], column: &str, row: usize) -> Result<i64, LoadError> {
        let cell = cells.get(self.index(column)?);
        cell.and_then(|c| c.as_i64())
            .ok_or_else(|| self.invalid(column, row))
    }

    fn f64(&self, cells: &[Data], column: &str, row: usize) -> Result<f64, LoadError> {
        let cell = cells.get(self.index(column)?);
        cell.and_then(|c| c.as_f64())
            .ok_or_else(|| self.invalid(column, row))
    }

    fn string(&self, cells: &[Data], column: &str, row: usize) -> Result<String, LoadError> {
        let cell = cells.get(self.index(column)?);
        cell.and_then(|c| c.as_string())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.invalid(column, row))
    }

    /// Like `string`, but an empty or missing cell is `None`.
    fn opt_string(&self, cells: &[Data], column: &str) -> Result<Option<String>, LoadError> {
        let cell = cells.get(self.index(column)?);
        Ok(cell
            .and_then(|c| c.as_string())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    /// Date cells are either native xlsx dates or `%Y-%m-%d` text.
    fn date(&self, cells: &[Data], column: &str, row: usize) -> Result<NaiveDate, LoadError> {
        let cell = cells
            .get(self.index(column)?)
            .ok_or_else(|| self.invalid(column, row))?;

        if let Some(date) = cell.as_date() {
            return Ok(date);
        }
        cell.as_string()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .ok_or_else(|| self.invalid(column, row))
    }
}

/// Data rows, skipping the header and fully empty rows.
fn data_rows(range: &Range<Data>) -> impl Iterator<Item = (usize, &[Data])> {
    range
        .rows()
        .enumerate()
        .skip(1)
        .filter(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
}

impl RecordSource for XlsxRecordSource {
    fn patients(&self) -> Result<Vec<Patient>, LoadError> {
        let range = open_sheet(&self.patients_path)?;
        let cols = Columns::from_range("patients", &range)?;

        data_rows(&range)
            .map(|(row, cells)| {
                Ok(Patient {
                    id: cols.i64(cells, "ID", row)?,
                    name: cols.string(cells, "Name", row)?,
                    gender: cols.string(cells, "Gender", row)?,
                    height_cm: cols.f64(cells, "Height (cm)", row)?,
                    weight_kg: cols.f64(cells, "Weight (kg)", row)?,
                    bmi: cols.f64(cells, "BMI", row)?,
                    medical_history: cols.opt_string(cells, "Medical History")?,
                })
            })
            .collect()
    }

    fn doctors(&self) -> Result<Vec<Doctor>, LoadError> {
        let range = open_sheet(&self.doctors_path)?;
        let cols = Columns::from_range("doctors", &range)?;

        data_rows(&range)
            .map(|(row, cells)| {
                Ok(Doctor {
                    doctor_id: cols.i64(cells, "Doctor ID", row)?,
                    doctor_name: cols.string(cells, "Doctor Name", row)?,
                    specialty: cols.string(cells, "Specialty", row)?,
                })
            })
            .collect()
    }

    fn appointments(&self) -> Result<Vec<Appointment>, LoadError> {
        let range = open_sheet(&self.appointments_path)?;
        let cols = Columns::from_range("appointments", &range)?;

        data_rows(&range)
            .map(|(row, cells)| {
                Ok(Appointment {
                    patient_id: cols.i64(cells, "Patient ID", row)?,
                    doctor_id: cols.i64(cells, "Doctor ID", row)?,
                    appointment_date: cols.date(cells, "Appointment Date", row)?,
                })
            })
            .collect()
    }

    fn prescriptions(&self) -> Result<Vec<Prescription>, LoadError> {
        let range = open_sheet(&self.prescriptions_path)?;
        let cols = Columns::from_range("prescriptions", &range)?;

        data_rows(&range)
            .map(|(row, cells)| {
                Ok(Prescription {
                    patient_id: cols.i64(cells, "Patient ID", row)?,
                    doctor_id: cols.i64(cells, "Doctor ID", row)?,
                    date: cols.date(cells, "Date", row)?,
                    diagnosis: cols.opt_string(cells, "Diagnosis")?,
                    medicine_prescribed: cols.opt_string(cells, "Medicine Prescribed")?,
                })
            })
            .collect()
    }
}
