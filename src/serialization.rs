//! Pluggable dataset export formats

use crate::error::SerializationError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for pluggable dataset serialization
pub trait DatasetSerializer: Send + Sync {
    /// Serialize an ordered sequence of records to bytes
    fn serialize<T: Serialize>(&self, records: &[T]) -> Result<Vec<u8>, SerializationError>;

    /// Deserialize records, preserving order
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>, SerializationError>;

    fn name(&self) -> &str;

    fn content_type(&self) -> &str;
}

/// A single JSON array
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// JSON serializer with indented output
    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }
}

impl DatasetSerializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, records: &[T]) -> Result<Vec<u8>, SerializationError> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        };

        result.map_err(|e| SerializationError::SerializationFailed {
            reason: format!("JSON serialization failed: {}", e),
        })
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>, SerializationError> {
        serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializationFailed {
            reason: format!("JSON deserialization failed: {}", e),
        })
    }

    fn name(&self) -> &str {
        "json"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

/// One JSON object per line, newline terminated
#[derive(Debug, Clone, Default)]
pub struct NdjsonSerializer;

impl NdjsonSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetSerializer for NdjsonSerializer {
    fn serialize<T: Serialize>(&self, records: &[T]) -> Result<Vec<u8>, SerializationError> {
        let mut out = Vec::new();
        for record in records {
            serde_json::to_writer(&mut out, record).map_err(|e| {
                SerializationError::SerializationFailed {
                    reason: format!("NDJSON serialization failed: {}", e),
                }
            })?;
            out.push(b'\n');
        }
        Ok(out)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Vec<T>, SerializationError> {
        let text = std::str::from_utf8(bytes).map_err(|e| SerializationError::DeserializationFailed {
            reason: format!("NDJSON input is not UTF-8: {}", e),
        })?;

        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line).map_err(|e| SerializationError::DeserializationFailed {
                    reason: format!("NDJSON line {}: {}", number + 1, e),
                })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "ndjson"
    }

    fn content_type(&self) -> &str {
        "application/x-ndjson"
    }
}

/// Records which format a dataset was exported with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationContext {
    serializer_name: String,
    content_type: String,
}

impl SerializationContext {
    /// Record which serializer produced an export
    pub fn from_serializer<S: DatasetSerializer>(serializer: &S) -> Self {
        Self {
            serializer_name: serializer.name().to_string(),
            content_type: serializer.content_type().to_string(),
        }
    }

    pub fn serializer_name(&self) -> &str {
        &self.serializer_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn matches<S: DatasetSerializer>(&self, serializer: &S) -> bool {
        self.serializer_name == serializer.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Listing, ListingType, VerifiedType};
    use chrono::NaiveDate;

    fn listings() -> Vec<Listing> {
        vec![
            Listing {
                id: 1,
                title: "Leak Repair - Plumbing (Rent)".to_string(),
                category: "Plumbing".to_string(),
                listing_type: ListingType::Rent,
                location: "Delhi, India".to_string(),
                price: 812,
                unit: Some("per day".to_string()),
                cover: "/images/services/plumbing-1.jpg".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                views: 1200,
                rating: 5,
                verified: true,
                verified_type: Some(VerifiedType::Kyc),
            },
            Listing {
                id: 2,
                title: "Tap Installation - Plumbing (Sell)".to_string(),
                category: "Plumbing".to_string(),
                listing_type: ListingType::Sell,
                location: "Pune, India".to_string(),
                price: 450,
                unit: None,
                cover: "/images/services/plumbing-2.jpg".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                views: 77,
                rating: 3,
                verified: false,
                verified_type: None,
            },
        ]
    }

    #[test]
    fn test_json_serializer() {
        let serializer = JsonSerializer::new();
        let bytes = serializer.serialize(&listings()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.starts_with('['));
        assert!(text.contains(r#""verifiedType":"KYC""#));
        assert!(text.contains(r#""date":"2024-02-29""#));
        assert!(!text.contains('\n'));

        let back: Vec<Listing> = serializer.deserialize(&bytes).unwrap();
        assert_eq!(back, listings());
    }

    #[test]
    fn test_json_pretty_serializer() {
        let bytes = JsonSerializer::new_pretty().serialize(&listings()).unwrap();
        assert!(String::from_utf8(bytes).unwrap().contains('\n'));
    }

    #[test]
    fn test_ndjson_one_record_per_line() {
        let serializer = NdjsonSerializer::new();
        let bytes = serializer.serialize(&listings()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["id"], 1);
        assert_eq!(first["type"], "Rent");

        let back: Vec<Listing> = serializer.deserialize(&bytes).unwrap();
        assert_eq!(back, listings());
    }

    #[test]
    fn test_ndjson_empty_and_bad_line() {
        let serializer = NdjsonSerializer::new();
        assert!(serializer.serialize::<Listing>(&[]).unwrap().is_empty());

        let err = serializer
            .deserialize::<Listing>(b"{\"id\":1}\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("line 1"));
    }

    #[test]
    fn test_serialization_context() {
        let json = JsonSerializer::new();
        let ndjson = NdjsonSerializer::new();
        let ctx = SerializationContext::from_serializer(&ndjson);

        assert_eq!(ctx.serializer_name(), "ndjson");
        assert_eq!(ctx.content_type(), "application/x-ndjson");
        assert!(ctx.matches(&ndjson));
        assert!(!ctx.matches(&json));
    }
}
