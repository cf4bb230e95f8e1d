//! Raw JSON to record normalization
//!
//! Stateless mapping functions with no I/O. The two directions
//! differ in strictness:
//! - list items are trusted to be complete, so a missing field is a
//!   [`TransformError`] and aborts the run
//! - detail documents vary by listing, so every missing section or field
//!   falls back to an empty value and [`RecordTransformer::to_detail_record`]
//!   never fails

use serde_json::Value;

use crate::fetcher::RawDetailDoc;
use crate::{DetailRecord, ListRecord};

/// Path segment that precedes the identifier in a job link
pub const JOB_LINK_MARKER: &str = "/job/";

/// Separator for list-valued fields flattened into text
pub const LIST_SEPARATOR: &str = ", ";

/// Shape errors in list items
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// Required field absent or null
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Field present but of an unusable type or format
    #[error("invalid value for {field}: {value}")]
    InvalidField {
        /// Dotted field path
        field: &'static str,
        /// Offending raw value
        value: String,
    },

    /// Job link yields an empty identifier
    #[error("empty job identifier in link: {0}")]
    EmptyIdentifier(String),
}

/// Result type for list transforms
pub type TransformResult<T> = Result<T, TransformError>;

/// Stateless record transformer
pub struct RecordTransformer;

impl RecordTransformer {
    /// Convert one raw search result item into a [`ListRecord`]
    ///
    /// # Errors
    /// Returns [`TransformError`] if any required field is missing, a numeric
    /// field does not parse, or the job link has no identifier
    pub fn to_list_record(item: &Value) -> TransformResult<ListRecord> {
        let job_link = required_text(item, "link.job")?;

        Ok(ListRecord {
            job_id: Self::extract_job_id(&job_link)?,
            job_type: required_text(item, "jobType")?,
            job_name: required_text(item, "jobName")?,
            posting_date: required_text(item, "appearDate")?,
            application_count: required_int(item, "applyCnt")?,
            application_description: required_text(item, "applyDesc")?,
            company_name: required_text(item, "custName")?,
            company_address: format!(
                "{} {}",
                required_text(item, "jobAddrNoDesc")?,
                required_text(item, "jobAddress")?
            ),
            job_url: absolute_url(&job_link),
            job_analysis_url: absolute_url(&required_text(item, "link.applyAnalyze")?),
            company_url: absolute_url(&required_text(item, "link.cust")?),
            longitude: required_text(item, "lon")?,
            latitude: required_text(item, "lat")?,
            required_education: required_text(item, "optionEdu")?,
            experience_required: required_text(item, "periodDesc")?,
            salary_description: required_text(item, "salaryDesc")?,
            salary_high: required_int(item, "salaryHigh")?,
            salary_low: required_int(item, "salaryLow")?,
            tags: tags_text(required(item, "tags")?),
        })
    }

    /// Extract the listing identifier from a job link
    ///
    /// Takes the text after the last `/job/` and drops any query string.
    ///
    /// ```
    /// use job_listing_downloader::transform::RecordTransformer;
    ///
    /// let id = RecordTransformer::extract_job_id("//www.example.com/job/abc123?source=x").unwrap();
    /// assert_eq!(id, "abc123");
    /// ```
    ///
    /// # Errors
    /// Returns [`TransformError`] if the link has no `/job/` segment or the
    /// identifier is empty
    pub fn extract_job_id(job_link: &str) -> TransformResult<String> {
        let (_, tail) =
            job_link
                .rsplit_once(JOB_LINK_MARKER)
                .ok_or_else(|| TransformError::InvalidField {
                    field: "link.job",
                    value: job_link.to_string(),
                })?;

        let id = tail.split(['?', '#']).next().unwrap_or_default();
        if id.is_empty() {
            return Err(TransformError::EmptyIdentifier(job_link.to_string()));
        }
        Ok(id.to_string())
    }

    /// Convert a raw detail document into a [`DetailRecord`]
    ///
    /// Total over any input: absent sections act as empty objects, absent
    /// fields become empty text, `false` or an empty list.
    pub fn to_detail_record(doc: &RawDetailDoc) -> DetailRecord {
        let root = doc.as_value();
        let header = section(root, "header");
        let condition = section(root, "condition");
        let welfare = section(root, "welfare");
        let job_detail = section(root, "jobDetail");
        let contact = section(root, "contact");

        let analysis_url = text(header, "analysisUrl");
        let job_id = analysis_url.rsplit('/').next().unwrap_or_default().to_string();

        DetailRecord {
            job_id,
            job_name: text(header, "jobName"),
            company_name: text(header, "custName"),
            posting_date: text(header, "appearDate"),
            job_category: joined(job_detail, "jobCategory", Some("description")),
            work_location: join_non_empty(
                &[
                    text(job_detail, "addressRegion"),
                    text(job_detail, "addressDetail"),
                ],
                " ",
            ),
            salary: text(job_detail, "salary"),
            job_type: employment_type(job_detail.get("jobType")).to_string(),
            work_period: text(job_detail, "workPeriod"),
            work_exp: text(condition, "workExp"),
            education: text(condition, "edu"),
            required_skills: joined(condition, "skill", Some("description")),
            required_certificates: joined(condition, "certificate", Some("name")),
            welfare_tags: joined(welfare, "tag", None),
            legal_tags: joined(welfare, "legalTag", None),
            job_description: text(job_detail, "jobDescription"),
            hr_name: text(contact, "hrName"),
            contact_email: text(contact, "email"),
            contact_phone: joined(contact, "phone", None),
            industry: text(root, "industry"),
            company_size: text(root, "employees"),
            needed_employees: text(job_detail, "needEmp"),
            manage_responsibility: text(job_detail, "manageResp"),
            business_trip: text(job_detail, "businessTrip"),
            postal_code: text(root, "postalCode"),
            close_date: text(root, "closeDate"),
            cust_no: text(root, "custNo"),
            industry_no: text(root, "industryNo"),
            china_corp: truthy(root.get("chinaCorp")),
        }
    }
}

static EMPTY_SECTION: Value = Value::Null;

/// Render a scalar as text; `None` for null, arrays and objects
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn required<'a>(item: &'a Value, path: &'static str) -> TransformResult<&'a Value> {
    let mut current = item;
    for key in path.split('.') {
        current = current
            .get(key)
            .filter(|v| !v.is_null())
            .ok_or(TransformError::MissingField(path))?;
    }
    Ok(current)
}

fn required_text(item: &Value, path: &'static str) -> TransformResult<String> {
    let value = required(item, path)?;
    scalar_text(value).ok_or_else(|| TransformError::InvalidField {
        field: path,
        value: value.to_string(),
    })
}

fn required_int(item: &Value, path: &'static str) -> TransformResult<i64> {
    let value = required(item, path)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| TransformError::InvalidField {
        field: path,
        value: value.to_string(),
    })
}

fn tags_text(tags: &Value) -> String {
    match tags {
        Value::Array(items) => items
            .iter()
            .map(|tag| scalar_text(tag).unwrap_or_else(|| tag.to_string()))
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        other => scalar_text(other).unwrap_or_else(|| other.to_string()),
    }
}

/// Protocol-relative links get an https scheme
fn absolute_url(link: &str) -> String {
    if link.starts_with("//") {
        format!("https:{link}")
    } else {
        link.to_string()
    }
}

fn section<'a>(root: &'a Value, key: &str) -> &'a Value {
    match root.get(key) {
        Some(value) if value.is_object() => value,
        _ => &EMPTY_SECTION,
    }
}

fn text(section: &Value, key: &str) -> String {
    section.get(key).and_then(scalar_text).unwrap_or_default()
}

/// Join a list field; `inner` picks a key out of object elements
fn joined(section: &Value, key: &str, inner: Option<&str>) -> String {
    let Some(items) = section.get(key).and_then(Value::as_array) else {
        return String::new();
    };
    let parts: Vec<String> = items
        .iter()
        .filter_map(|item| match inner {
            Some(inner_key) => item.get(inner_key).and_then(scalar_text),
            None => scalar_text(item),
        })
        .filter(|part| !part.is_empty())
        .collect();
    parts.join(LIST_SEPARATOR)
}

fn join_non_empty(parts: &[String], separator: &str) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

fn employment_type(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "",
        Some(v) if v.as_i64() == Some(1) || v.as_str() == Some("1") => "full-time",
        Some(_) => "part-time",
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}
