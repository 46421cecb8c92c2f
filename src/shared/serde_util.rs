//! Custom serde helpers for upstream wire formats.

/// Deserializes a value the API sends either as a JSON string or a JSON number
/// into a `String`.
///
/// Trending payloads are inconsistent here: `coins_count` and the formatted
/// price fields arrive as strings on some days and as numbers on others.
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s,
            Raw::Int(i) => i.to_string(),
            Raw::Float(f) => f.to_string(),
        })
    }
}

/// Deserializes an `[epoch_ms, value]` pair whose timestamp may be encoded as a
/// float (e.g. `1700000000000.0`).
pub mod timestamp_pair {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(i64, f64)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<(f64, Option<f64>)>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(t, v)| v.map(|v| (t as i64, v)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Count {
        #[serde(with = "super::string_or_number")]
        value: String,
    }

    #[derive(Deserialize)]
    struct Series {
        #[serde(with = "super::timestamp_pair")]
        points: Vec<(i64, f64)>,
    }

    #[test]
    fn test_string_or_number_accepts_both() {
        let a: Count = serde_json::from_str(r#"{"value": "42"}"#).unwrap();
        let b: Count = serde_json::from_str(r#"{"value": 42}"#).unwrap();
        let c: Count = serde_json::from_str(r#"{"value": 4.5}"#).unwrap();
        assert_eq!(a.value, "42");
        assert_eq!(b.value, "42");
        assert_eq!(c.value, "4.5");
    }

    #[test]
    fn test_timestamp_pair_skips_null_values() {
        let s: Series = serde_json::from_str(
            r#"{"points": [[1700000000000, 1.5], [1700000060000.0, null], [1700000120000, 2.0]]}"#,
        )
        .unwrap();
        assert_eq!(s.points, vec![(1_700_000_000_000, 1.5), (1_700_000_120_000, 2.0)]);
    }
}
