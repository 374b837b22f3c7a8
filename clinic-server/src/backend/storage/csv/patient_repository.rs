use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use csv::{Reader, Writer};
use serde::{Deserialize, Deserializer, Serialize};
use shared::PatientRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use tracing::{debug, info};

use super::connection::CsvConnection;
use crate::backend::storage::PatientStorage;

/// One line of patients.csv. Empty cells read back as None.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PatientCsvRow {
    id: i64,
    name: String,
    sex: Option<String>,
    date_of_birth: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_false")]
    is_family_head: bool,
    family_id: Option<i64>,
    created_at: Option<String>,
    next_appointment_date: Option<String>,
    hmo: Option<String>,
}

/// A hand-edited file may leave the head flag empty
fn blank_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl From<PatientCsvRow> for PatientRecord {
    fn from(row: PatientCsvRow) -> Self {
        PatientRecord {
            id: row.id,
            name: row.name,
            sex: row.sex,
            date_of_birth: row.date_of_birth,
            phone_number: row.phone_number,
            email: row.email,
            is_family_head: row.is_family_head,
            family_id: row.family_id,
            created_at: row.created_at,
            next_appointment_date: row.next_appointment_date,
            hmo: row.hmo,
        }
    }
}

impl From<&PatientRecord> for PatientCsvRow {
    fn from(record: &PatientRecord) -> Self {
        PatientCsvRow {
            id: record.id,
            name: record.name.clone(),
            sex: record.sex.clone(),
            date_of_birth: record.date_of_birth.clone(),
            phone_number: record.phone_number.clone(),
            email: record.email.clone(),
            is_family_head: record.is_family_head,
            family_id: record.family_id,
            created_at: record.created_at.clone(),
            next_appointment_date: record.next_appointment_date.clone(),
            hmo: record.hmo.clone(),
        }
    }
}

/// CSV-based patient repository backed by a single patients.csv file
#[derive(Clone)]
pub struct PatientRepository {
    connection: CsvConnection,
}

impl PatientRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read every patient from the CSV file; a missing file means no patients
    fn read_patients(&self) -> Result<Vec<PatientRecord>> {
        let file_path = self.connection.patients_file_path();
        if !file_path.exists() {
            debug!("Patients file {} doesn't exist yet", file_path.display());
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut patients = Vec::new();
        for (index, result) in csv_reader.deserialize::<PatientCsvRow>().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let row = result.with_context(|| {
                format!("Malformed patient record on line {} of {}", index + 2, file_path.display())
            })?;
            patients.push(PatientRecord::from(row));
        }

        Ok(patients)
    }

    /// Write all patients, replacing the file atomically
    fn write_patients(&self, patients: &[PatientRecord]) -> Result<()> {
        let file_path = self.connection.patients_file_path();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            for patient in patients {
                csv_writer.serialize(PatientCsvRow::from(patient))?;
            }
            csv_writer.flush()?;
        }

        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn append_patient(&self, patient: &PatientRecord) -> Result<()> {
        let _guard = self
            .connection
            .write_lock()
            .lock()
            .map_err(|_| anyhow!("Patient store lock was poisoned"))?;

        let mut patients = self.read_patients()?;
        if patients.iter().any(|existing| existing.id == patient.id) {
            return Err(anyhow!("Patient with id {} already exists", patient.id));
        }

        patients.push(patient.clone());
        self.write_patients(&patients)
    }

    /// Append under the next free id. Reading the current maximum and writing
    /// happen under one lock so concurrent inserts never share an id.
    fn insert_with_next_id(&self, mut patient: PatientRecord) -> Result<PatientRecord> {
        let _guard = self
            .connection
            .write_lock()
            .lock()
            .map_err(|_| anyhow!("Patient store lock was poisoned"))?;

        let mut patients = self.read_patients()?;
        patient.id = patients.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        patients.push(patient.clone());
        self.write_patients(&patients)?;
        Ok(patient)
    }
}

#[async_trait]
impl PatientStorage for PatientRepository {
    async fn store_patient(&self, patient: &PatientRecord) -> Result<()> {
        self.append_patient(patient)?;
        info!("Stored patient {} ({})", patient.id, patient.name);
        Ok(())
    }

    async fn create_patient(&self, patient: PatientRecord) -> Result<PatientRecord> {
        let patient = self.insert_with_next_id(patient)?;
        info!("Created patient {} ({})", patient.id, patient.name);
        Ok(patient)
    }

    async fn get_patient(&self, patient_id: i64) -> Result<Option<PatientRecord>> {
        let patients = self.read_patients()?;
        Ok(patients.into_iter().find(|p| p.id == patient_id))
    }

    async fn list_patients(&self) -> Result<Vec<PatientRecord>> {
        let patients = self.read_patients()?;
        debug!("Loaded {} patients", patients.len());
        Ok(patients)
    }
}
