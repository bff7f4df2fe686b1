//! Serialized layout of the history file.

use ch_core::{ClipboardEntry, EntryId, FormatBlob, FormatId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const HISTORY_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HistoryFile {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryRecord {
    pub id: String,
    pub primary_text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(
        rename = "imageBytesBase64",
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_opt"
    )]
    pub image_bytes: Option<Vec<u8>>,
    #[serde(
        rename = "richTextBytesBase64",
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_opt"
    )]
    pub rich_text_bytes: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_bundle: Option<Vec<FormatBlobRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FormatBlobRecord {
    pub format_id: String,
    #[serde(rename = "bytesBase64", with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl From<&ClipboardEntry> for EntryRecord {
    fn from(entry: &ClipboardEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            primary_text: entry.primary_text.clone(),
            timestamp: entry.timestamp,
            pinned: entry.pinned,
            image_bytes: entry.image_bytes.clone(),
            rich_text_bytes: entry.rich_text_bytes.clone(),
            format_bundle: entry.format_bundle.as_ref().map(|bundle| {
                bundle
                    .iter()
                    .map(|blob| FormatBlobRecord {
                        format_id: blob.format_id.to_string(),
                        bytes: blob.bytes.clone(),
                    })
                    .collect()
            }),
        }
    }
}

impl From<EntryRecord> for ClipboardEntry {
    fn from(record: EntryRecord) -> Self {
        Self {
            id: EntryId::from_string(record.id),
            primary_text: record.primary_text,
            timestamp: record.timestamp,
            pinned: record.pinned,
            image_bytes: record.image_bytes,
            rich_text_bytes: record.rich_text_bytes,
            format_bundle: record.format_bundle.map(|bundle| {
                bundle
                    .into_iter()
                    .map(|blob| FormatBlob {
                        format_id: FormatId::from_string(blob.format_id),
                        bytes: blob.bytes,
                    })
                    .collect()
            }),
        }
    }
}

/// Bytes as a standard base64 string.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e: base64::DecodeError| serde::de::Error::custom(e.to_string()))
    }
}

mod base64_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => super::base64_bytes::serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::base64_bytes")] Vec<u8>);

        Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(bytes)| bytes))
    }
}
