use super::error::UploadError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Academic department a paper belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Branch {
    Cse,
    It,
    Ece,
    Eee,
    Me,
    Biotech,
}

impl Branch {
    pub const ALL: [Branch; 6] = [
        Branch::Cse,
        Branch::It,
        Branch::Ece,
        Branch::Eee,
        Branch::Me,
        Branch::Biotech,
    ];

    pub const NAMES: [&'static str; 6] = ["CSE", "IT", "ECE", "EEE", "ME", "BIOTECH"];

    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Cse => "CSE",
            Branch::It => "IT",
            Branch::Ece => "ECE",
            Branch::Eee => "EEE",
            Branch::Me => "ME",
            Branch::Biotech => "BIOTECH",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Branch::ALL
            .into_iter()
            .find(|b| b.as_str() == wanted)
            .ok_or_else(|| UploadError::UnknownBranch(s.trim().to_string()))
    }
}

/// Mid-semester or end-semester examination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamType {
    Midsem,
    Endsem,
}

impl ExamType {
    pub const ALL: [ExamType; 2] = [ExamType::Midsem, ExamType::Endsem];

    pub const NAMES: [&'static str; 2] = ["MIDSEM", "ENDSEM"];

    pub fn as_str(self) -> &'static str {
        match self {
            ExamType::Midsem => "MIDSEM",
            ExamType::Endsem => "ENDSEM",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ExamType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UploadError::UnknownExamType(s.trim().to_string()))
    }
}

/// Search filters as entered by the user. An empty field means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub branch: String,
    pub subject: String,
    pub year: String,
    pub semester: String,
    pub exam_type: String,
}

impl FilterCriteria {
    /// Wire names paired with values, in canonical query order.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("branch", &self.branch),
            ("subject", &self.subject),
            ("year", &self.year),
            ("semester", &self.semester),
            ("examType", &self.exam_type),
        ]
    }
}

/// Validated metadata sent as the `meta` part of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMetadata {
    pub title: String,
    pub branch: Branch,
    pub subject: String,
    pub year: u32,
    pub semester: u32,
    #[serde(serialize_with = "exam_type_or_empty")]
    pub exam_type: Option<ExamType>,
}

// The backend expects the key to be present; an absent exam type goes out as "".
fn exam_type_or_empty<S: Serializer>(value: &Option<ExamType>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.map(ExamType::as_str).unwrap_or(""))
}

/// Raw text of the upload form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataForm {
    pub title: String,
    pub branch: String,
    pub subject: String,
    pub year: String,
    pub semester: String,
    pub exam_type: String,
}

impl MetadataForm {
    /// Validate the form into wire metadata.
    ///
    /// Title, branch, subject, year and semester are required. Year and
    /// semester must be whole numbers; an empty entry is rejected rather
    /// than sent as zero.
    pub fn parse(&self) -> Result<PaperMetadata, UploadError> {
        let title = required("title", &self.title)?;
        let branch: Branch = required("branch", &self.branch)?.parse()?;
        let subject = required("subject", &self.subject)?;
        let year = number("year", &self.year)?;
        let semester = number("semester", &self.semester)?;
        let exam_type = match self.exam_type.trim() {
            "" => None,
            other => Some(other.parse()?),
        };

        Ok(PaperMetadata {
            title: title.to_string(),
            branch,
            subject: subject.to_string(),
            year,
            semester,
            exam_type,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, UploadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UploadError::MissingField { field });
    }
    Ok(trimmed)
}

fn number(field: &'static str, value: &str) -> Result<u32, UploadError> {
    let raw = required(field, value)?;
    raw.parse().map_err(|_| UploadError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// A stored paper as returned by the repository. Server-owned; read-only here.
///
/// Decoding never fails on field contents: nulls become empty text and
/// numbers or other values are kept in their JSON text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub branch: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub semester: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub exam_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub file_url: String,
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
