use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DashboardError, UploadError};
use crate::models::StudentRecord;

pub const DEFAULT_ACCEPTED_FORMATS: [&str; 2] = [".csv", ".json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum UploadKind {
    Attendance,
    Assessments,
    Fees,
    Roster,
}

impl UploadKind {
    pub fn title(&self) -> &'static str {
        match self {
            UploadKind::Attendance => "Attendance Data",
            UploadKind::Assessments => "Assessment Scores",
            UploadKind::Fees => "Fee Records",
            UploadKind::Roster => "Student Roster",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UploadKind::Attendance => "Upload student attendance spreadsheet",
            UploadKind::Assessments => "Upload test scores and grades",
            UploadKind::Fees => "Upload fee payment status",
            UploadKind::Roster => "Upload the full student risk roster",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub completed_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Idle,
    Uploading { file_name: String },
    Success(UploadedFile),
    Error(String),
}

impl UploadStatus {
    pub fn message(&self) -> String {
        match self {
            UploadStatus::Idle => "Drag and drop your file here, or click to browse".to_string(),
            UploadStatus::Uploading { .. } => "Processing file...".to_string(),
            UploadStatus::Success(file) => format!("Successfully uploaded: {}", file.name),
            UploadStatus::Error(_) => "Upload failed. Please try again.".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub file: UploadedFile,
    pub records: Vec<StudentRecord>,
}

/// Row shape shared by CSV and JSON uploads. Enumerated fields stay raw
/// strings so that bad values surface as typed record errors.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(alias = "class_name")]
    class: String,
    #[serde(alias = "mentor_name")]
    mentor: String,
    risk_level: String,
    risk_score: i32,
    #[serde(alias = "attendance_pct")]
    attendance: f64,
    #[serde(alias = "last_test_score_pct")]
    last_test_score: f64,
    fees_status: String,
}

impl TryFrom<RawRecord> for StudentRecord {
    type Error = DashboardError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let id = match raw.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        Ok(StudentRecord {
            id,
            name: raw.name,
            class_name: raw.class,
            mentor_name: raw.mentor,
            risk_level: raw.risk_level.trim().parse()?,
            risk_score: raw.risk_score,
            attendance_pct: raw.attendance,
            last_test_score_pct: raw.last_test_score,
            fees_status: raw.fees_status.trim().parse()?,
        })
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<StudentRecord>, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<RawRecord>().enumerate() {
        let row = index + 1;
        let raw = result.map_err(|source| UploadError::Csv { row, source })?;
        let record =
            StudentRecord::try_from(raw).map_err(|source| UploadError::Record { row, source })?;
        records.push(record);
    }

    ensure_unique_ids(&records)?;
    Ok(records)
}

pub fn parse_json<R: Read>(reader: R) -> Result<Vec<StudentRecord>, UploadError> {
    let rows: Vec<RawRecord> = serde_json::from_reader(reader)?;
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            StudentRecord::try_from(raw).map_err(|source| UploadError::Record {
                row: index + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    ensure_unique_ids(&records)?;
    Ok(records)
}

// Ids must stay unique within a session; the first repeat fails the upload.
fn ensure_unique_ids(records: &[StudentRecord]) -> Result<(), UploadError> {
    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        if !seen.insert(record.id.as_str()) {
            return Err(UploadError::Record {
                row: index + 1,
                source: DashboardError::DuplicateId(record.id.clone()),
            });
        }
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Reads and parses one file. Blocking; `Uploader` runs it off the runtime.
pub fn load_records(
    path: &Path,
    accepted_formats: &[String],
) -> Result<UploadOutcome, UploadError> {
    let extension = extension_of(path);
    let unsupported = || UploadError::UnsupportedFormat {
        extension: extension.clone(),
        accepted: accepted_formats.join(", "),
    };

    if !accepted_formats
        .iter()
        .any(|format| format.eq_ignore_ascii_case(&extension))
    {
        return Err(unsupported());
    }

    let io_error = |source: std::io::Error| UploadError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let size_bytes = file.metadata().map_err(io_error)?.len();

    let records = match extension.as_str() {
        ".csv" => parse_csv(file)?,
        ".json" => parse_json(file)?,
        _ => return Err(unsupported()),
    };

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadOutcome {
        file: UploadedFile {
            name,
            size_bytes,
            completed_at: Utc::now(),
        },
        records,
    })
}

/// One upload panel: a single file per invocation, status published on a
/// watch channel (idle, uploading, success, error).
pub struct Uploader {
    kind: UploadKind,
    accepted_formats: Arc<Vec<String>>,
    status: Arc<watch::Sender<UploadStatus>>,
}

impl Uploader {
    pub fn new(kind: UploadKind, accepted_formats: Vec<String>) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Self {
            kind,
            accepted_formats: Arc::new(accepted_formats),
            status: Arc::new(status),
        }
    }

    pub fn kind(&self) -> UploadKind {
        self.kind
    }

    pub fn accepted_formats(&self) -> &[String] {
        &self.accepted_formats
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    pub fn start(&self, path: PathBuf) -> JoinHandle<Result<UploadOutcome, UploadError>> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(kind = ?self.kind, file = %file_name, "upload started");
        self.status
            .send_replace(UploadStatus::Uploading { file_name });

        let status = Arc::clone(&self.status);
        let accepted = Arc::clone(&self.accepted_formats);
        let kind = self.kind;

        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || load_records(&path, &accepted))
                .await
                .map_err(|err| UploadError::Aborted(err.to_string()))
                .and_then(|result| result);

            match &result {
                Ok(outcome) => {
                    info!(
                        ?kind,
                        file = %outcome.file.name,
                        records = outcome.records.len(),
                        "upload succeeded"
                    );
                    status.send_replace(UploadStatus::Success(outcome.file.clone()));
                }
                Err(err) => {
                    warn!(?kind, error = %err, "upload failed");
                    status.send_replace(UploadStatus::Error(err.to_string()));
                }
            }
            result
        })
    }

    /// Starts an upload and waits for it to resolve.
    pub async fn run(&self, path: PathBuf) -> Result<UploadOutcome, UploadError> {
        let handle = self.start(path);
        let result = handle
            .await
            .map_err(|err| UploadError::Aborted(err.to_string()))?;
        debug!(status = ?self.status(), "upload resolved");
        result
    }
}
