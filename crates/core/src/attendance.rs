//! Attendance rolls: input validation plus CSV export and import.
//!
//! The CSV dialect is comma separated, `"`-quoted fields
//! with doubled quotes, one record per line.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::non_blank;

/// Header row of an exported roll.
pub const CSV_HEADER: &str = "Nome,Função,Escola,Presente";

/// Lower-cased values of the `present` column that count as present.
const TRUTHY: &[&str] = &["true", "1", "sim", "yes", "presente", "s", "x"];

/// One attendee of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AttendanceInput {
    #[validate(custom(function = "validate_person_name"))]
    pub person_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default = "default_present")]
    pub present: bool,
}

fn default_present() -> bool {
    true
}

fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 3 {
        let mut err = ValidationError::new("length");
        err.message = Some("person_name must have at least 3 characters".into());
        return Err(err);
    }
    Ok(())
}

impl AttendanceInput {
    pub fn new(person_name: impl Into<String>, present: bool) -> Self {
        Self {
            person_name: person_name.into(),
            person_role: None,
            school: None,
            present,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            person_name: self.person_name.trim().to_string(),
            person_role: non_blank(self.person_role),
            school: non_blank(self.school),
            present: self.present,
        }
    }

    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        Ok(())
    }
}

/// Read access to the columns of an attendance row, so both stored rows and
/// client-side records can be exported.
pub trait Attendee {
    fn person_name(&self) -> &str;
    fn person_role(&self) -> Option<&str>;
    fn school(&self) -> Option<&str>;
    fn present(&self) -> bool;
}

impl Attendee for AttendanceInput {
    fn person_name(&self) -> &str {
        &self.person_name
    }
    fn person_role(&self) -> Option<&str> {
        self.person_role.as_deref()
    }
    fn school(&self) -> Option<&str> {
        self.school.as_deref()
    }
    fn present(&self) -> bool {
        self.present
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Quote a value if it contains a separator, a quote or a line break.
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a roll as CSV. Rows keep the order given; lines are joined by
/// `\n` without a trailing newline.
pub fn export_csv<A: Attendee>(rows: &[A]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for row in rows {
        let cells = [
            csv_escape(row.person_name()),
            csv_escape(row.person_role().unwrap_or("")),
            csv_escape(row.school().unwrap_or("")),
            if row.present() { "Sim" } else { "Não" }.to_string(),
        ];
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// `frequencia_<first 30 chars of the title>.csv`, with characters that
/// would break a `Content-Disposition` header replaced.
pub fn export_filename(event_title: &str) -> String {
    let stem: String = event_title
        .chars()
        .take(30)
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("frequencia_{stem}.csv")
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Split one CSV line, honouring quotes and doubled quotes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            result.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    result.push(current);
    result
}

/// Column positions resolved from the header row.
struct Columns {
    name: usize,
    role: usize,
    school: usize,
    present: usize,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, CoreError> {
        let find = |name: &str| {
            let name = name.to_lowercase();
            headers.iter().position(|h| h.trim().to_lowercase() == name)
        };
        let english = (
            find("person_name"),
            find("person_role"),
            find("school"),
            find("present"),
        );
        let portuguese = (find("Nome"), find("Função"), find("Escola"), find("Presente"));
        match (english, portuguese) {
            ((Some(name), Some(role), Some(school), Some(present)), _)
            | (_, (Some(name), Some(role), Some(school), Some(present))) => Ok(Self {
                name,
                role,
                school,
                present,
            }),
            _ => Err(CoreError::Validation(
                "CSV must have columns: person_name, person_role, school, present \
                 (or Nome, Função, Escola, Presente)"
                    .into(),
            )),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY.contains(&value.as_str())
}

/// Parse an uploaded roll into validated, normalised attendance inputs.
///
/// Blank lines are skipped. A row that fails validation aborts the import
/// with its 1-based line number in the message.
pub fn parse_csv(data: &[u8]) -> Result<Vec<AttendanceInput>, CoreError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| CoreError::Validation(format!("CSV is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.lines().enumerate();
    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(CoreError::Validation("CSV is empty".into())),
        }
    };
    let columns = Columns::resolve(&parse_csv_line(header))?;

    let mut records = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let values = parse_csv_line(line);
        let cell = |i: usize| values.get(i).map(String::as_str).unwrap_or("");

        let name = cell(columns.name).trim();
        if name.is_empty() {
            return Err(CoreError::Validation(format!(
                "Line {line_no}: person_name is required"
            )));
        }
        let record = AttendanceInput {
            person_name: name.to_string(),
            person_role: Some(cell(columns.role).to_string()),
            school: Some(cell(columns.school).to_string()),
            present: is_truthy(cell(columns.present)),
        }
        .normalized();
        record
            .check()
            .map_err(|e| CoreError::Validation(format!("Line {line_no}: {e}")))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ana() -> AttendanceInput {
        AttendanceInput {
            person_name: "Ana".into(),
            person_role: Some("Diretora".into()),
            school: Some("Escola A".into()),
            present: true,
        }
    }

    #[test]
    fn export_single_attendee_exactly() {
        assert_eq!(
            export_csv(&[ana()]),
            "Nome,Função,Escola,Presente\nAna,Diretora,Escola A,Sim"
        );
    }

    #[test]
    fn export_empty_roll_is_header_only() {
        assert_eq!(export_csv::<AttendanceInput>(&[]), CSV_HEADER);
    }

    #[test]
    fn export_quotes_and_blank_optionals() {
        let row = AttendanceInput {
            person_name: "Silva, \"Beto\"".into(),
            person_role: None,
            school: None,
            present: false,
        };
        assert_eq!(
            export_csv(&[row]),
            "Nome,Função,Escola,Presente\n\"Silva, \"\"Beto\"\"\",,,Não"
        );
    }

    #[test]
    fn export_filename_truncates_title() {
        let title = "Formação continuada de professores da rede municipal";
        let name = export_filename(title);
        assert_eq!(name, "frequencia_Formação continuada de profess.csv");
    }

    #[test]
    fn import_reads_english_headers_with_bom() {
        let data = "\u{feff}person_name,person_role,school,present\n\
                    Ana Souza,Diretora,Escola A,sim\n\
                    \n\
                    Bruno Lima,,,no\n";
        let records = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].person_name, "Ana Souza");
        assert!(records[0].present);
        assert_eq!(records[1].person_role, None);
        assert!(!records[1].present);
    }

    #[test]
    fn import_accepts_exported_file() {
        let exported = export_csv(&[AttendanceInput {
            person_name: "Carla Dias".into(),
            person_role: Some("Professora".into()),
            school: Some("Escola, B".into()),
            present: true,
        }]);
        let records = parse_csv(exported.as_bytes()).unwrap();
        assert_eq!(records[0].school.as_deref(), Some("Escola, B"));
        assert!(records[0].present);
    }

    #[test]
    fn truthy_values_are_case_insensitive() {
        for value in ["TRUE", "1", "Sim", "yes", "Presente", "S", "x"] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["", "não", "0", "false"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    #[test]
    fn import_rejects_missing_columns() {
        let result = parse_csv(b"name,present\nAna,1");
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("columns"));
    }

    #[test]
    fn import_reports_line_of_empty_name() {
        let data = b"person_name,person_role,school,present\nAna Souza,,,1\n ,,,1\n";
        assert_matches!(
            parse_csv(data),
            Err(CoreError::Validation(msg)) if msg.starts_with("Line 3")
        );
    }

    #[test]
    fn short_name_fails_validation() {
        assert_matches!(
            AttendanceInput::new(" Al ", true).check(),
            Err(CoreError::Validation(_))
        );
        assert!(AttendanceInput::new("Ana", true).check().is_ok());
    }
}
