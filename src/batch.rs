//! Record-batch envelope.
//!
//! Callers send a batch of records, each processed independently:
//!
//! ```text
//! {"values": [{"recordId": "a1", "data": {"text": "... Machine Learning ..."}}]}
//!   -> {"values": [{"recordId": "a1", "data": {"skills": ["machine-learning"]},
//!                   "warnings": null, "errors": null}]}
//! ```
//!
//! Records run in parallel on the rayon pool. A failure in one record is
//! reported on that record only. The response keeps request order.

use crate::api::SkillProperty;
use crate::engine::Extractor;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDataRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub record_id: String,
    pub data: RecordDataRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsRequest {
    pub values: Vec<RecordRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordDataResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub message: String,
}

impl ResponseMessage {
    fn single(message: impl Into<String>) -> Vec<Self> {
        vec![ResponseMessage { message: message.into() }]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub record_id: String,
    pub data: RecordDataResponse,
    pub errors: Option<Vec<ResponseMessage>>,
    pub warnings: Option<Vec<ResponseMessage>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub values: Vec<RecordResponse>,
}

/// Extract skills from one record and project them to `property`.
pub fn extract_from_record(extractor: &Extractor<'_>, record: &RecordRequest, property: SkillProperty) -> RecordResponse {
    let mut response = RecordResponse {
        record_id: record.record_id.clone(),
        data: RecordDataResponse::default(),
        errors: None,
        warnings: None,
    };

    if record.data.text.is_empty() {
        tracing::warn!(record = %record.record_id, "record text is empty");
        response.warnings = Some(ResponseMessage::single("Record text is empty."));
        return response;
    }

    match extractor.run(&record.data.text) {
        Ok(results) => {
            let skills = property.project_all(&results);
            if skills.is_empty() {
                response.warnings = Some(ResponseMessage::single("No skills found."));
            } else {
                response.data.skills = skills;
            }
        }
        Err(err) => {
            tracing::error!(record = %record.record_id, error = %err, "failed to extract skills");
            let message = format!("There was an error parsing this record. Error: {err}");
            response.errors = Some(ResponseMessage::single(message));
        }
    }

    response
}

/// Extract skills from every record in parallel; output order matches input.
pub fn extract_from_records(
    extractor: &Extractor<'_>,
    records: &[RecordRequest],
    property: SkillProperty,
) -> RecordsResponse {
    tracing::info!(records = records.len(), "extracting skills from records");
    let values = records.par_iter().map(|record| extract_from_record(extractor, record, property)).collect();
    RecordsResponse { values }
}
