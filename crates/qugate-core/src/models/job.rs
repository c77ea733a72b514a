//! Job lifecycle types: the status state machine and the uniform status
//! envelope shared by success and error responses.

use serde::{Deserialize, Serialize};

/// Job states as driven by the storage provider. The gateway never owns a
/// transition; it only reads and echoes these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "INITIALIZING")]
    Initializing,
    #[serde(rename = "QUEUED")]
    Queued,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "DONE")]
    Done,
    #[serde(rename = "ERROR")]
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Initializing => "INITIALIZING",
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Done => "DONE",
            JobStatus::Error => "ERROR",
        }
    }

    /// DONE and ERROR are terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// The uniform `{job_id, status, detail, error_message}` envelope. All four
/// fields are strings; `status` is `"None"` or a [`JobStatus`] name outside
/// of success, and errors always carry `"ERROR"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMsg {
    pub job_id: String,
    pub status: String,
    pub detail: String,
    pub error_message: String,
}

impl StatusMsg {
    /// The blank draft used before any field is known.
    pub fn none() -> Self {
        StatusMsg {
            job_id: "None".to_string(),
            status: "None".to_string(),
            detail: "None".to_string(),
            error_message: "None".to_string(),
        }
    }

    /// Initial status written right after a job upload succeeds.
    pub fn initializing(job_id: impl Into<String>) -> Self {
        StatusMsg {
            job_id: job_id.into(),
            status: JobStatus::Initializing.as_str().to_string(),
            detail: "Got your json.".to_string(),
            error_message: "None".to_string(),
        }
    }

    /// Error envelope with identical detail and error_message.
    pub fn error(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        StatusMsg {
            job_id: "None".to_string(),
            status: JobStatus::Error.as_str().to_string(),
            detail: detail.clone(),
            error_message: detail,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == JobStatus::Error.as_str()
    }

    pub fn is_done(&self) -> bool {
        self.status == JobStatus::Done.as_str()
    }
}

/// Result document returned once a job has reached DONE. The gateway treats
/// the experiment data as opaque JSON; only the addressing fields matter
/// here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDoc {
    pub backend_name: String,
    pub display_name: String,
    pub backend_version: String,
    pub job_id: String,
    pub qobj_id: Option<String>,
    pub success: bool,
    pub status: String,
    pub header: serde_json::Value,
    pub results: Vec<serde_json::Value>,
}
