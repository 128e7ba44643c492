use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{fs::File, io, io::Read, path::Path};
use tracing::debug;

pub type JsonRecord = Map<String, Value>;

/// Reads a JSON array of objects from `path` (`-` is stdin).
pub fn read_records(path: &Path) -> Result<Vec<JsonRecord>> {
    let mut text = String::new();
    if path == Path::new("-") {
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read records from stdin")?;
    } else {
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut text))
            .with_context(|| format!("Failed to read records from {}", path.display()))?;
    }
    serde_json::from_str(&text).context("Records must be a JSON array of objects")
}

/// Scalars become the strings the matcher compares against. `null`, arrays and
/// objects are left out, so rules naming them fail.
pub fn stringify(record: &JsonRecord) -> Vec<(&str, String)> {
    record
        .iter()
        .filter_map(|(field, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    debug!(field, "skipping non-scalar field");
                    return None;
                }
            };
            Some((field.as_str(), text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn record(value: Value) -> JsonRecord {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        map
    }

    #[test]
    fn scalars_are_stringified() {
        let record = record(json!({"id": 7, "sticky": true, "title": "Hi", "meta": null, "tags": ["a"]}));
        let mut fields = stringify(&record);
        fields.sort();
        assert_eq!(
            fields,
            vec![
                ("id", "7".to_string()),
                ("sticky", "true".to_string()),
                ("title", "Hi".to_string()),
            ]
        );
    }

    #[test]
    fn reads_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"post_status": "draft"}}, {{"post_status": "publish"}}]"#).unwrap();
        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["post_status"], "publish");
    }

    #[test]
    fn rejects_non_array_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"post_status": "draft"}}"#).unwrap();
        assert!(read_records(file.path()).is_err());
    }
}
