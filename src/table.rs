//! Tagged-table parsing: an optional `---`-delimited metadata block followed
//! by a comma-delimited body with a header row. Every body cell is coerced to
//! the narrowest scalar that fits.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::FormatError;

const METADATA_SENTINEL: &str = "---";

/// Formats accepted for the metadata `timestamp` value.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single table cell or metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Absent,
}

impl Value {
    /// Coerce a raw cell to the narrowest applicable scalar: integer, then
    /// float, then boolean, else trimmed string. Empty cells become `Absent`.
    pub fn parse(raw: &str) -> Value {
        let raw = raw.trim();
        if raw.is_empty() {
            return Value::Absent;
        }
        if let Ok(v) = raw.parse::<i64>() {
            return Value::Int(v);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return Value::Float(v);
        }
        match raw.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Str(raw.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }
}

/// One body row, keyed by header column name.
pub type Row = BTreeMap<String, Value>;

/// Metadata block contents with typed accessors for the keys the pipeline
/// requires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMeta {
    values: BTreeMap<String, Value>,
}

impl TableMeta {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn require(&self, key: &str) -> Result<&Value, FormatError> {
        self.values.get(key).ok_or_else(|| FormatError::MissingMetadata {
            key: key.to_string(),
        })
    }

    pub fn require_str(&self, key: &str) -> Result<&str, FormatError> {
        self.require(key)?.as_str().ok_or(FormatError::MetadataType {
            key: key.to_string(),
            expected: "string",
        })
    }

    pub fn require_int(&self, key: &str) -> Result<i64, FormatError> {
        self.require(key)?.as_int().ok_or(FormatError::MetadataType {
            key: key.to_string(),
            expected: "integer",
        })
    }

    pub fn require_timestamp(&self, key: &str) -> Result<NaiveDateTime, FormatError> {
        let raw = self.require_str(key)?;
        for fmt in TIMESTAMP_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Ok(ts);
            }
        }
        Err(FormatError::MetadataType {
            key: key.to_string(),
            expected: "timestamp",
        })
    }
}

/// Parse a tagged table: `(metadata, rows)`. A missing metadata block yields
/// empty metadata and the whole input is read as the table body.
pub fn parse_str(input: &str) -> Result<(TableMeta, Vec<Row>), FormatError> {
    let (meta, body) = split_metadata(input)?;
    let rows = parse_body(body)?;
    Ok((meta, rows))
}

fn take_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    match s.find('\n') {
        Some(i) => Some((&s[..i], &s[i + 1..])),
        None => Some((s, "")),
    }
}

fn split_metadata(input: &str) -> Result<(TableMeta, &str), FormatError> {
    let Some((first, mut rest)) = take_line(input) else {
        return Ok((TableMeta::default(), ""));
    };
    if first.trim() != METADATA_SENTINEL {
        return Ok((TableMeta::default(), input));
    }

    let mut block = String::new();
    loop {
        let Some((line, next)) = take_line(rest) else {
            return Err(FormatError::UnterminatedMetadata);
        };
        rest = next;
        if line.trim() == METADATA_SENTINEL {
            break;
        }
        block.push_str(line);
        block.push('\n');
    }
    Ok((parse_metadata_block(&block)?, rest))
}

fn parse_metadata_block(block: &str) -> Result<TableMeta, FormatError> {
    if block.trim().is_empty() {
        return Ok(TableMeta::default());
    }
    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(block).map_err(FormatError::Metadata)?;

    let mut values = BTreeMap::new();
    for (key, value) in mapping {
        let key = key.as_str().ok_or(FormatError::MetadataKey)?.to_string();
        let value = match value {
            serde_yaml::Value::Null => Value::Absent,
            serde_yaml::Value::Bool(v) => Value::Bool(v),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(v) => Value::Int(v),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(v) => Value::Str(v),
            _ => return Err(FormatError::MetadataScalar { key }),
        };
        values.insert(key, value);
    }
    Ok(TableMeta { values })
}

fn parse_body(body: &str) -> Result<Vec<Row>, FormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .cloned()
            .zip(record.iter().map(Value::parse))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_to_narrowest_scalar() {
        assert_eq!(Value::parse("42"), Value::Int(42));
        assert_eq!(Value::parse("-7"), Value::Int(-7));
        assert_eq!(Value::parse("3.14"), Value::Float(3.14));
        assert_eq!(Value::parse("true"), Value::Bool(true));
        assert_eq!(Value::parse("False"), Value::Bool(false));
        assert_eq!(Value::parse(""), Value::Absent);
        assert_eq!(Value::parse("   "), Value::Absent);
        assert_eq!(Value::parse(" abc "), Value::Str("abc".to_string()));
    }

    #[test]
    fn integer_wins_over_float() {
        // "42" must stay an integer even though it also parses as f64.
        assert_eq!(Value::parse("42"), Value::Int(42));
        assert_eq!(Value::parse("42.0"), Value::Float(42.0));
    }

    #[test]
    fn body_without_metadata_parses_whole_input() {
        let (meta, rows) = parse_str("a,b\n1,x\n").expect("parses");
        assert!(meta.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["a"], Value::Int(1));
        assert_eq!(rows[0]["b"], Value::Str("x".to_string()));
    }

    #[test]
    fn unterminated_metadata_is_an_error() {
        let err = parse_str("---\ncompetition: ucl\n").unwrap_err();
        assert!(matches!(err, FormatError::UnterminatedMetadata));
    }

    #[test]
    fn ragged_row_is_an_error() {
        let err = parse_str("a,b\n1\n").unwrap_err();
        assert!(matches!(err, FormatError::Body(_)));
    }

    #[test]
    fn timestamp_accepts_t_and_space_separators() {
        let mut values = BTreeMap::new();
        values.insert(
            "timestamp".to_string(),
            Value::Str("2025-08-28T14:05:03".to_string()),
        );
        let meta = TableMeta { values };
        let ts = meta.require_timestamp("timestamp").expect("parses");
        assert_eq!(ts.format("%Y%m%d_%H%M%S").to_string(), "20250828_140503");

        let mut values = BTreeMap::new();
        values.insert(
            "timestamp".to_string(),
            Value::Str("2025-08-28 14:05:03".to_string()),
        );
        let meta = TableMeta { values };
        assert!(meta.require_timestamp("timestamp").is_ok());
    }

    #[test]
    fn missing_metadata_key_is_reported() {
        let meta = TableMeta::default();
        let err = meta.require_int("year").unwrap_err();
        assert!(matches!(err, FormatError::MissingMetadata { .. }));
    }
}
