use serde_json::Value;

use kubetables_types::{MSG_FIELD, Record, TIMESTAMP_FIELD};

/// Log parser for extracting structure from raw log lines
pub struct LogParser;

impl LogParser {
    /// Parse one raw log line (terminator already stripped) into a record.
    ///
    /// Lines look like `<timestamp> <payload>`. A payload holding a JSON
    /// object becomes the record; anything else is kept whole under `msg`.
    /// The `timestamp` field is always overwritten with the prefix token.
    pub fn parse(line: &[u8]) -> Record {
        let (timestamp, payload) = Self::split_timestamp(line);

        let mut record = Self::try_parse_json(payload).unwrap_or_else(|| {
            let mut record = Record::new();
            record.insert(MSG_FIELD.to_string(), Self::text(payload));
            record
        });

        record.insert(TIMESTAMP_FIELD.to_string(), Self::text(timestamp));
        record
    }

    /// Split at the first space; without one the whole line is payload
    fn split_timestamp(line: &[u8]) -> (&[u8], &[u8]) {
        match line.iter().position(|&b| b == b' ') {
            Some(pos) => (&line[..pos], &line[pos + 1..]),
            None => (&[][..], line),
        }
    }

    fn try_parse_json(payload: &[u8]) -> Option<Record> {
        match serde_json::from_slice::<Value>(payload).ok()? {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    fn text(bytes: &[u8]) -> Value {
        Value::String(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_json_log() {
        let line = br#"2024-01-01T00:00:00Z {"source":"app","level":"info","msg":"hi"}"#;
        let parsed = LogParser::parse(line);
        assert_eq!(
            parsed,
            record(json!({
                "source": "app",
                "level": "info",
                "msg": "hi",
                "timestamp": "2024-01-01T00:00:00Z",
            }))
        );
    }

    #[test]
    fn test_parse_plain_text() {
        let parsed = LogParser::parse(b"2024-01-01T00:00:01Z plain text line");
        assert_eq!(
            parsed,
            record(json!({
                "msg": "plain text line",
                "timestamp": "2024-01-01T00:00:01Z",
            }))
        );
    }

    #[test]
    fn test_non_object_json_falls_back_to_msg() {
        for payload in ["42", "\"quoted\"", "[1,2]", "null", "true"] {
            let line = format!("ts {}", payload);
            let parsed = LogParser::parse(line.as_bytes());
            assert_eq!(parsed, record(json!({"msg": payload, "timestamp": "ts"})));
        }
    }

    #[test]
    fn test_malformed_json_falls_back_to_msg() {
        let parsed = LogParser::parse(br#"ts {"level":"info""#);
        assert_eq!(
            parsed,
            record(json!({"msg": r#"{"level":"info""#, "timestamp": "ts"}))
        );
    }

    #[test]
    fn test_timestamp_field_is_overwritten() {
        let parsed = LogParser::parse(br#"real {"timestamp":"fake","n":1}"#);
        assert_eq!(parsed.get("timestamp"), Some(&json!("real")));
        assert_eq!(parsed.get("n"), Some(&json!(1)));
    }

    #[test]
    fn test_line_without_space() {
        let parsed = LogParser::parse(b"lonely");
        assert_eq!(parsed, record(json!({"msg": "lonely", "timestamp": ""})));
    }

    #[test]
    fn test_only_first_space_splits() {
        let parsed = LogParser::parse(b"ts  two spaces");
        assert_eq!(parsed.get("msg"), Some(&json!(" two spaces")));
    }

    #[test]
    fn test_empty_line() {
        let parsed = LogParser::parse(b"");
        assert_eq!(parsed, record(json!({"msg": "", "timestamp": ""})));
    }

    #[test]
    fn test_invalid_utf8_no_panic() {
        let parsed = LogParser::parse(b"ts \xff\xfe broken");
        assert_eq!(parsed.get("msg"), Some(&json!("\u{fffd}\u{fffd} broken")));
    }
}
