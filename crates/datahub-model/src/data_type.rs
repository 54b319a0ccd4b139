//! Field data types and the validity patterns derived from them.
//!
//! Metadata tables describe each field with a loosely typed tag
//! (`EMAIL`, `VARCHAR1`, `VARCHAROPTNS`, ...). Tags are parsed into the closed
//! [`DataType`] enum once, and every variant maps to exactly one
//! [`FieldPattern`]. Unknown tags are an error rather than "no pattern".

use std::fmt;

use regex::Regex;

use crate::error::{ModelError, Result};

/// Abstract data type of a partner file field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// `EMAIL`: an email address, nulls rejected.
    Email,
    /// `EMAIL2`: an email address or null.
    EmailOptional,
    /// `DATE`: `yyyy-mm-dd`.
    Date,
    /// `VARCHAR1`: any non-null text.
    VarcharNoNulls,
    /// `VARCHAR` / `VARCHAR3`: any text, nulls allowed.
    VarcharWithNulls,
    /// `VARCHAR2`: starts with exactly `n` ASCII letters.
    VarcharFixedLength(usize),
    /// `INT`: unsigned digits only.
    Int,
    /// `TIMESTAMP`: `yyyy-mm-dd hh:mm:ss[.fff]`, nulls allowed.
    Timestamp,
    /// `VARCHAROPTNS`: one of an enumerated list of allowed values.
    EnumeratedOptions(Vec<String>),
}

impl DataType {
    /// Parse a metadata tag triplet.
    ///
    /// Returns `Ok(None)` when no tag is declared (empty or the `nan`
    /// placeholder left by spreadsheet exports).
    pub fn parse(
        tag: &str,
        length: Option<&str>,
        mandatory_values: Option<&str>,
    ) -> Result<Option<Self>> {
        let tag = tag.trim();
        if is_blank(tag) {
            return Ok(None);
        }
        let data_type = match tag.to_uppercase().as_str() {
            "EMAIL" => DataType::Email,
            "EMAIL2" => DataType::EmailOptional,
            "DATE" => DataType::Date,
            "VARCHAR" | "VARCHAR3" => DataType::VarcharWithNulls,
            "VARCHAR1" => DataType::VarcharNoNulls,
            "VARCHAR2" => DataType::VarcharFixedLength(parse_length(tag, length)?),
            "INT" => DataType::Int,
            "TIMESTAMP" => DataType::Timestamp,
            "VARCHAROPTNS" => DataType::EnumeratedOptions(parse_options(mandatory_values)?),
            _ => {
                return Err(ModelError::UnknownDataType {
                    tag: tag.to_string(),
                });
            }
        };
        Ok(Some(data_type))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            DataType::Email => "EMAIL",
            DataType::EmailOptional => "EMAIL2",
            DataType::Date => "DATE",
            DataType::VarcharNoNulls => "VARCHAR1",
            DataType::VarcharWithNulls => "VARCHAR",
            DataType::VarcharFixedLength(_) => "VARCHAR2",
            DataType::Int => "INT",
            DataType::Timestamp => "TIMESTAMP",
            DataType::EnumeratedOptions(_) => "VARCHAROPTNS",
        }
    }

    fn pattern(&self) -> String {
        match self {
            DataType::Email | DataType::EmailOptional => {
                r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]".to_string()
            }
            DataType::Date => r"^\d{4}-\d{2}-\d{2}$".to_string(),
            DataType::VarcharNoNulls => r"(?s)^.+$".to_string(),
            DataType::VarcharWithNulls => r"(?s)^.*$".to_string(),
            DataType::VarcharFixedLength(length) => format!("^[a-zA-Z]{{{length}}}"),
            DataType::Int => r"^\d+$".to_string(),
            DataType::Timestamp => r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(\.\d+)?$".to_string(),
            DataType::EnumeratedOptions(values) => {
                let alternatives: Vec<String> =
                    values.iter().map(|value| regex::escape(value)).collect();
                format!("^(?:{})$", alternatives.join("|"))
            }
        }
    }

    fn allows_missing(&self) -> bool {
        matches!(
            self,
            DataType::EmailOptional | DataType::VarcharWithNulls | DataType::Timestamp
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::VarcharFixedLength(length) => write!(f, "VARCHAR2({length})"),
            DataType::EnumeratedOptions(values) => {
                write!(f, "VARCHAROPTNS({})", values.join(","))
            }
            other => f.write_str(other.tag()),
        }
    }
}

/// A compiled validity test for one field.
///
/// A value is valid when it matches the pattern, or when it is missing and the
/// data type allows nulls.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    data_type: DataType,
    regex: Regex,
}

impl FieldPattern {
    pub fn for_type(data_type: DataType) -> Result<Self> {
        let regex = Regex::new(&data_type.pattern()).map_err(|source| ModelError::Pattern {
            data_type: data_type.to_string(),
            source,
        })?;
        Ok(Self { data_type, regex })
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_valid(&self, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.regex.is_match(value),
            None => self.data_type.allows_missing(),
        }
    }
}

/// True for empty cells and the `nan` placeholder.
pub fn is_blank(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

fn parse_length(tag: &str, length: Option<&str>) -> Result<usize> {
    let raw = length.unwrap_or("").trim();
    // Lengths exported from spreadsheets arrive as floats ("3.0").
    let digits = raw.strip_suffix(".0").unwrap_or(raw);
    digits.parse::<usize>().map_err(|_| ModelError::InvalidLength {
        tag: tag.to_string(),
        value: raw.to_string(),
    })
}

fn parse_options(mandatory_values: Option<&str>) -> Result<Vec<String>> {
    let raw = mandatory_values.unwrap_or("");
    let invalid = || ModelError::InvalidOptions {
        value: raw.to_string(),
    };
    if is_blank(raw) {
        return Err(invalid());
    }
    let cleaned = raw.replace('\\', "");
    let cleaned = cleaned
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    let mut values = Vec::new();
    for item in cleaned.split(',') {
        let value = item.trim().trim_matches(&['\'', '"'][..]).trim();
        if value.is_empty() {
            return Err(invalid());
        }
        values.push(value.to_string());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(tag: &str, length: Option<&str>, values: Option<&str>) -> FieldPattern {
        let data_type = DataType::parse(tag, length, values)
            .unwrap()
            .expect("declared type");
        FieldPattern::for_type(data_type).unwrap()
    }

    #[test]
    fn blank_tags_declare_nothing() {
        assert!(DataType::parse("", None, None).unwrap().is_none());
        assert!(DataType::parse("nan", None, None).unwrap().is_none());
    }

    #[test]
    fn unknown_tag_fails_loudly() {
        let err = DataType::parse("FLOAT", None, None).unwrap_err();
        assert!(matches!(err, ModelError::UnknownDataType { .. }));
    }

    #[test]
    fn tags_are_case_insensitive() {
        assert_eq!(
            DataType::parse("int", None, None).unwrap(),
            Some(DataType::Int)
        );
    }

    #[test]
    fn email_patterns() {
        let strict = pattern("EMAIL", None, None);
        assert!(strict.is_valid(Some("jane.doe@example.org")));
        assert!(!strict.is_valid(Some("not-an-email")));
        assert!(!strict.is_valid(None));

        let optional = pattern("EMAIL2", None, None);
        assert!(optional.is_valid(None));
        assert!(!optional.is_valid(Some("@example.org")));
    }

    #[test]
    fn date_and_timestamp_patterns() {
        let date = pattern("DATE", None, None);
        assert!(date.is_valid(Some("2020-01-28")));
        assert!(!date.is_valid(Some("01/28/2020")));
        assert!(!date.is_valid(None));

        let timestamp = pattern("TIMESTAMP", None, None);
        assert!(timestamp.is_valid(Some("2020-01-28 10:11:12")));
        assert!(timestamp.is_valid(Some("2020-01-28 10:11:12.123")));
        assert!(timestamp.is_valid(None));
        assert!(!timestamp.is_valid(Some("2020-01-28")));
    }

    #[test]
    fn varchar_patterns() {
        let no_nulls = pattern("VARCHAR1", None, None);
        assert!(no_nulls.is_valid(Some("nancy")));
        assert!(!no_nulls.is_valid(None));

        let with_nulls = pattern("VARCHAR3", None, None);
        assert!(with_nulls.is_valid(None));
        assert!(with_nulls.is_valid(Some("anything at all")));

        let fixed = pattern("VARCHAR2", Some("2.0"), None);
        assert_eq!(fixed.data_type(), &DataType::VarcharFixedLength(2));
        assert!(fixed.is_valid(Some("US")));
        assert!(!fixed.is_valid(Some("U1")));
    }

    #[test]
    fn fixed_length_requires_a_length() {
        let err = DataType::parse("VARCHAR2", Some("two"), None).unwrap_err();
        assert!(matches!(err, ModelError::InvalidLength { .. }));
    }

    #[test]
    fn int_pattern() {
        let int = pattern("INT", None, None);
        assert!(int.is_valid(Some("2020")));
        assert!(!int.is_valid(Some("20.5")));
        assert!(!int.is_valid(Some("-1")));
    }

    #[test]
    fn enumerated_options() {
        let options = pattern("VARCHAROPTNS", None, Some("Fall, Spring,Summer"));
        assert_eq!(
            options.data_type(),
            &DataType::EnumeratedOptions(vec![
                "Fall".to_string(),
                "Spring".to_string(),
                "Summer".to_string()
            ])
        );
        assert!(options.is_valid(Some("Spring")));
        assert!(!options.is_valid(Some("Winter")));
        assert!(!options.is_valid(Some("Spring2")));
        assert!(!options.is_valid(None));
    }

    #[test]
    fn enumerated_options_escape_metacharacters() {
        let options = pattern("VARCHAROPTNS", None, Some("a.b,c"));
        assert!(options.is_valid(Some("a.b")));
        assert!(!options.is_valid(Some("axb")));
    }

    #[test]
    fn malformed_options_fail_loudly() {
        for raw in [None, Some(""), Some("nan"), Some("a,,b")] {
            let err = DataType::parse("VARCHAROPTNS", None, raw).unwrap_err();
            assert!(matches!(err, ModelError::InvalidOptions { .. }), "{raw:?}");
        }
    }
}
