//! Deadline record, list entries and validated request input
//!
//! Dates come in as ISO `YYYY-MM-DD` strings and go out as `DD/MM/YYYY`.
//! Both formats are part of the public HTTP contract.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use sqlx::FromRow;

use super::ValidationError;

/// Format accepted for `deadline` (add) and `date` (update).
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for `date` in every list entry.
pub const OUTPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Deadline row from the `deadlines` table.
///
/// Columns are decoded by name so the table's column order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Deadline {
    pub id: i32,
    #[sqlx(rename = "userid")]
    pub user_id: String,
    pub task: String,
    #[sqlx(rename = "deadline")]
    pub deadline_date: NaiveDate,
    pub completed: bool,
}

impl Deadline {
    /// Overdue or already completed.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.deadline_date < today || self.completed
    }

    /// Due today or later and not completed.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.deadline_date >= today && !self.completed
    }
}

/// One element of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineEntry {
    pub id: i32,
    pub task: String,
    pub date: String,
    pub completed: bool,
}

impl From<&Deadline> for DeadlineEntry {
    fn from(d: &Deadline) -> Self {
        Self {
            id: d.id,
            task: d.task.clone(),
            date: d.deadline_date.format(OUTPUT_DATE_FORMAT).to_string(),
            completed: d.completed,
        }
    }
}

/// Body of every list endpoint: `{"entries": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineList {
    pub entries: Vec<DeadlineEntry>,
}

impl DeadlineList {
    pub fn from_rows(rows: &[Deadline]) -> Self {
        Self {
            entries: rows.iter().map(DeadlineEntry::from).collect(),
        }
    }
}

/// Identifier of an existing deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeadlineId(i32);

impl DeadlineId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Read an id from a JSON body field.
    ///
    /// Integers, whole floats (`3.0`) and numeric strings are accepted.
    /// Absent, `null`, `false`, `""` and `0` all count as missing.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Err(ValidationError::MissingId),
            Some(Value::Number(n)) => match whole_number(n) {
                Some(0) => Err(ValidationError::MissingId),
                Some(id) => i32::try_from(id).map(Self).map_err(|_| {
                    ValidationError::InvalidId {
                        value: n.to_string(),
                    }
                }),
                None => Err(ValidationError::InvalidId {
                    value: n.to_string(),
                }),
            },
            Some(Value::String(s)) if s.is_empty() => Err(ValidationError::MissingId),
            Some(Value::String(s)) => {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidId { value: s.clone() })
            }
            Some(other) => Err(ValidationError::InvalidId {
                value: other.to_string(),
            }),
        }
    }
}

fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

impl fmt::Display for DeadlineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated input for the add operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeadline {
    pub user_id: String,
    pub task: String,
    pub deadline_date: NaiveDate,
}

impl NewDeadline {
    /// All three fields are required. An empty string counts as absent.
    pub fn new(
        username: Option<String>,
        task: Option<String>,
        deadline: Option<String>,
    ) -> Result<Self, ValidationError> {
        let (Some(user_id), Some(task), Some(deadline)) =
            (non_empty(username), non_empty(task), non_empty(deadline))
        else {
            return Err(ValidationError::MissingData);
        };

        Ok(Self {
            user_id,
            task,
            deadline_date: parse_input_date("deadline", &deadline)?,
        })
    }
}

/// Field changes for the update operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlineUpdate {
    pub task: Option<String>,
    pub deadline_date: Option<NaiveDate>,
}

impl DeadlineUpdate {
    /// Both fields are optional. An empty string leaves the field unchanged.
    pub fn new(task: Option<String>, date: Option<String>) -> Result<Self, ValidationError> {
        let deadline_date = non_empty(date)
            .map(|d| parse_input_date("date", &d))
            .transpose()?;

        Ok(Self {
            task: non_empty(task),
            deadline_date,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.deadline_date.is_none()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_input_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.to_owned(),
        }
    })
}
