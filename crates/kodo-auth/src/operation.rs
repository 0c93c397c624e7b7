//! Batch and persistent-processing operation encoding
//!
//! Each [`Operation`] renders to the path grammar of the `rs` management
//! API, e.g. `/move/<EncodedEntrySrc>/<EncodedEntryDest>/force/true`.
//! Several operations are joined with `;` for a single batch request.
//!
//! Descriptors arriving from outside the type system (JSON, CLI input) go
//! through [`OperationSpec`], which is the only place an unknown operation
//! tag can appear.

use crate::codec;
use crate::entry::encode_entry;
use crate::error::{AuthError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage class of an object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StorageType {
    #[default]
    Standard = 0,
    InfrequentAccess = 1,
    Archive = 2,
    DeepArchive = 3,
}

impl TryFrom<u8> for StorageType {
    type Error = AuthError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Standard),
            1 => Ok(Self::InfrequentAccess),
            2 => Ok(Self::Archive),
            3 => Ok(Self::DeepArchive),
            other => Err(AuthError::invalid_argument(format!(
                "unknown storage type: {other}"
            ))),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// A custom `x-qn-meta-*` metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

impl MetaEntry {
    /// Create a metadata entry
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Change MIME type and custom metadata of an object (`chgm`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMeta {
    pub bucket: String,
    pub key: String,
    pub mime_type: Option<String>,
    /// Emitted in insertion order
    pub metas: Vec<MetaEntry>,
    pub cond: Option<String>,
}

impl ChangeMeta {
    /// Create a `chgm` operation with no MIME type, metadata or condition
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            mime_type: None,
            metas: Vec::new(),
            cond: None,
        }
    }

    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Append an `x-qn-meta-<key>` entry
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metas.push(MetaEntry::new(key, value));
        self
    }

    /// Only apply when the object matches `cond`, e.g. `hash=Fx..&fsize=12`
    #[must_use]
    pub fn cond(mut self, cond: impl Into<String>) -> Self {
        self.cond = Some(cond.into());
        self
    }
}

impl From<ChangeMeta> for Operation {
    fn from(change: ChangeMeta) -> Self {
        Self::ChangeMeta(change)
    }
}

/// A management operation on one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Delete {
        bucket: String,
        key: String,
    },
    Move {
        bucket: String,
        key: String,
        dest_key: String,
        force: bool,
    },
    Copy {
        bucket: String,
        key: String,
        dest_key: String,
        force: bool,
    },
    ChangeStatus {
        bucket: String,
        key: String,
        /// 0 enables the object, 1 disables it
        status: u8,
    },
    DeleteAfterDays {
        bucket: String,
        key: String,
        days: u32,
    },
    ChangeType {
        bucket: String,
        key: String,
        storage_type: StorageType,
    },
    Stat {
        bucket: String,
        key: String,
    },
    Prefetch {
        bucket: String,
        key: String,
    },
    ChangeMeta(ChangeMeta),
}

impl Operation {
    /// Delete an object
    pub fn delete(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Delete {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Rename an object within its bucket
    pub fn move_to(
        bucket: impl Into<String>,
        key: impl Into<String>,
        dest_key: impl Into<String>,
        force: bool,
    ) -> Self {
        Self::Move {
            bucket: bucket.into(),
            key: key.into(),
            dest_key: dest_key.into(),
            force,
        }
    }

    /// Copy an object within its bucket
    pub fn copy_to(
        bucket: impl Into<String>,
        key: impl Into<String>,
        dest_key: impl Into<String>,
        force: bool,
    ) -> Self {
        Self::Copy {
            bucket: bucket.into(),
            key: key.into(),
            dest_key: dest_key.into(),
            force,
        }
    }

    /// Enable (`0`) or disable (`1`) an object
    pub fn change_status(bucket: impl Into<String>, key: impl Into<String>, status: u8) -> Self {
        Self::ChangeStatus {
            bucket: bucket.into(),
            key: key.into(),
            status,
        }
    }

    /// Schedule deletion after `days` days
    pub fn delete_after_days(bucket: impl Into<String>, key: impl Into<String>, days: u32) -> Self {
        Self::DeleteAfterDays {
            bucket: bucket.into(),
            key: key.into(),
            days,
        }
    }

    /// Change the storage class of an object
    pub fn change_type(
        bucket: impl Into<String>,
        key: impl Into<String>,
        storage_type: StorageType,
    ) -> Self {
        Self::ChangeType {
            bucket: bucket.into(),
            key: key.into(),
            storage_type,
        }
    }

    /// Fetch object metadata
    pub fn stat(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Stat {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Refresh an object from the mirror source
    pub fn prefetch(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Prefetch {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Wire name of the operation
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Delete { .. } => "delete",
            Self::Move { .. } => "move",
            Self::Copy { .. } => "copy",
            Self::ChangeStatus { .. } => "chstatus",
            Self::DeleteAfterDays { .. } => "deleteAfterDays",
            Self::ChangeType { .. } => "chtype",
            Self::Stat { .. } => "stat",
            Self::Prefetch { .. } => "prefetch",
            Self::ChangeMeta(_) => "chgm",
        }
    }

    /// Render the operation path
    pub fn encode(&self) -> Result<String> {
        let tag = self.tag();
        match self {
            Self::Delete { bucket, key }
            | Self::Stat { bucket, key }
            | Self::Prefetch { bucket, key } => {
                Ok(format!("/{tag}/{}", encode_entry(bucket, Some(key.as_str()))?))
            }
            Self::Move {
                bucket,
                key,
                dest_key,
                force,
            }
            | Self::Copy {
                bucket,
                key,
                dest_key,
                force,
            } => Ok(format!(
                "/{tag}/{}/{}/force/{force}",
                encode_entry(bucket, Some(key.as_str()))?,
                encode_entry(bucket, Some(dest_key.as_str()))?
            )),
            Self::ChangeStatus {
                bucket,
                key,
                status,
            } => Ok(format!(
                "/{tag}/{}/status/{status}",
                encode_entry(bucket, Some(key.as_str()))?
            )),
            Self::DeleteAfterDays { bucket, key, days } => Ok(format!(
                "/{tag}/{}/{days}",
                encode_entry(bucket, Some(key.as_str()))?
            )),
            Self::ChangeType {
                bucket,
                key,
                storage_type,
            } => Ok(format!(
                "/{tag}/{}/type/{storage_type}",
                encode_entry(bucket, Some(key.as_str()))?
            )),
            Self::ChangeMeta(change) => encode_change_meta(change),
        }
    }
}

fn encode_change_meta(change: &ChangeMeta) -> Result<String> {
    let entry = encode_entry(&change.bucket, Some(change.key.as_str()))?;
    let mut path = format!("/chgm/{entry}");

    // empty values would leave a dangling `/mime/` or `/cond/` segment
    if let Some(mime_type) = change.mime_type.as_deref().filter(|m| !m.is_empty()) {
        path.push_str("/mime/");
        path.push_str(&codec::encode(mime_type));
    }

    for meta in &change.metas {
        // the key is a raw path segment
        if meta.key.is_empty() || meta.key.contains('/') {
            return Err(AuthError::invalid_argument(format!(
                "invalid metadata key: {:?}",
                meta.key
            )));
        }
        path.push_str("/x-qn-meta-");
        path.push_str(&meta.key);
        path.push('/');
        path.push_str(&codec::encode(&meta.value));
    }

    if let Some(cond) = change.cond.as_deref().filter(|c| !c.is_empty()) {
        path.push_str("/cond/");
        path.push_str(&codec::encode(cond));
    }

    Ok(path)
}

/// Encode a single operation path.
pub fn encode_operation(operation: &Operation) -> Result<String> {
    operation.encode()
}

/// Encode operations and join them with `;`.
///
/// An empty list is rejected: the service has no meaning for an empty batch.
pub fn encode_operations(operations: &[Operation]) -> Result<String> {
    if operations.is_empty() {
        return Err(AuthError::invalid_argument("operation list must not be empty"));
    }

    let encoded = operations
        .iter()
        .map(Operation::encode)
        .collect::<Result<Vec<_>>>()?;
    Ok(encoded.join(";"))
}

/// Loosely typed operation descriptor, as supplied by external callers.
///
/// ```json
/// {"_type": "move", "bucket": "b", "fileName": "k1", "dest": "k2", "force": true}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSpec {
    #[serde(rename = "_type", alias = "tag")]
    pub kind: String,
    #[serde(default, alias = "container")]
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
    #[serde(default)]
    pub force: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_after_days: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metas: Vec<MetaEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cond: Option<String>,
}

impl OperationSpec {
    fn required<T: Clone>(&self, field: &'static str, value: Option<&T>) -> Result<T> {
        value.cloned().ok_or_else(|| {
            AuthError::invalid_argument(format!("`{field}` is required for {}", self.kind))
        })
    }
}

impl TryFrom<OperationSpec> for Operation {
    type Error = AuthError;

    fn try_from(spec: OperationSpec) -> Result<Self> {
        let bucket = spec.bucket.clone();
        let key = || spec.required("fileName", spec.file_name.as_ref());

        let operation = match spec.kind.as_str() {
            "delete" => Self::delete(bucket, key()?),
            "stat" => Self::stat(bucket, key()?),
            "prefetch" => Self::prefetch(bucket, key()?),
            "move" => Self::move_to(
                bucket,
                key()?,
                spec.required("dest", spec.dest.as_ref())?,
                spec.force,
            ),
            "copy" => Self::copy_to(
                bucket,
                key()?,
                spec.required("dest", spec.dest.as_ref())?,
                spec.force,
            ),
            "chstatus" => Self::change_status(
                bucket,
                key()?,
                spec.required("status", spec.status.as_ref())?,
            ),
            "deleteAfterDays" => Self::delete_after_days(
                bucket,
                key()?,
                spec.required("deleteAfterDays", spec.delete_after_days.as_ref())?,
            ),
            "chtype" => Self::change_type(
                bucket,
                key()?,
                StorageType::try_from(spec.required("type", spec.storage_type.as_ref())?)?,
            ),
            "chgm" => Self::ChangeMeta(ChangeMeta {
                bucket,
                key: key()?,
                mime_type: spec.mimetype.clone(),
                metas: spec.metas.clone(),
                cond: spec.cond.clone(),
            }),
            other => {
                tracing::warn!(tag = other, "rejecting unknown operation");
                return Err(AuthError::invalid_operation(other));
            }
        };
        Ok(operation)
    }
}

impl FromStr for Operation {
    type Err = AuthError;

    /// Parse a JSON [`OperationSpec`]
    fn from_str(s: &str) -> Result<Self> {
        let spec: OperationSpec = serde_json::from_str(s)?;
        Self::try_from(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> String {
        encode_entry("b", Some(key)).unwrap()
    }

    #[test]
    fn test_delete_stat_prefetch() {
        assert_eq!(Operation::delete("b", "k1").encode().unwrap(), "/delete/YjprMQ");
        assert_eq!(Operation::stat("b", "k1").encode().unwrap(), "/stat/YjprMQ");
        assert_eq!(Operation::prefetch("b", "k1").encode().unwrap(), "/prefetch/YjprMQ");
    }

    #[test]
    fn test_move_and_copy() {
        assert_eq!(
            Operation::move_to("b", "k1", "k2", true).encode().unwrap(),
            format!("/move/{}/{}/force/true", entry("k1"), entry("k2"))
        );
        assert_eq!(
            Operation::copy_to("b", "k1", "k2", false).encode().unwrap(),
            "/copy/YjprMQ/YjprMg/force/false"
        );
    }

    #[test]
    fn test_status_lifecycle_type() {
        assert_eq!(
            Operation::change_status("b", "k1", 1).encode().unwrap(),
            "/chstatus/YjprMQ/status/1"
        );
        assert_eq!(
            Operation::delete_after_days("b", "k1", 30).encode().unwrap(),
            "/deleteAfterDays/YjprMQ/30"
        );
        assert_eq!(
            Operation::change_type("b", "k1", StorageType::Archive)
                .encode()
                .unwrap(),
            "/chtype/YjprMQ/type/2"
        );
    }

    #[test]
    fn test_chgm_full() {
        let op: Operation = ChangeMeta::new("b", "k1")
            .mime_type("image/png")
            .meta("x", "v1")
            .meta("y", "v2")
            .cond("fsize>=1")
            .into();
        assert_eq!(
            op.encode().unwrap(),
            "/chgm/YjprMQ/mime/aW1hZ2UvcG5n/x-qn-meta-x/djE/x-qn-meta-y/djI/cond/ZnNpemU-PTE"
        );
    }

    #[test]
    fn test_chgm_preserves_meta_order() {
        let op: Operation = ChangeMeta::new("b", "k1").meta("y", "v2").meta("x", "v1").into();
        let encoded = op.encode().unwrap();
        assert_eq!(encoded, "/chgm/YjprMQ/x-qn-meta-y/djI/x-qn-meta-x/djE");
        assert!(encoded.find("x-qn-meta-y").unwrap() < encoded.find("x-qn-meta-x").unwrap());
    }

    #[test]
    fn test_chgm_bare() {
        let op: Operation = ChangeMeta::new("b", "k1").into();
        assert_eq!(op.encode().unwrap(), "/chgm/YjprMQ");
    }

    #[test]
    fn test_chgm_empty_mime_and_cond_omitted() {
        let op: Operation = ChangeMeta::new("b", "k1").mime_type("").cond("").into();
        assert_eq!(op.encode().unwrap(), "/chgm/YjprMQ");

        let op: Operation = ChangeMeta::new("b", "k1")
            .mime_type("")
            .meta("x", "v1")
            .cond("")
            .into();
        assert_eq!(op.encode().unwrap(), "/chgm/YjprMQ/x-qn-meta-x/djE");
    }

    #[test]
    fn test_chgm_rejects_bad_meta_key() {
        let op: Operation = ChangeMeta::new("b", "k1").meta("a/b", "v").into();
        assert!(matches!(op.encode(), Err(AuthError::InvalidArgument(_))));
        let op: Operation = ChangeMeta::new("b", "k1").meta("", "v").into();
        assert!(op.encode().is_err());
    }

    #[test]
    fn test_empty_bucket_rejected() {
        assert!(matches!(
            Operation::delete("", "k").encode(),
            Err(AuthError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_operations_joins() {
        let d1 = Operation::delete("b", "k1");
        let d2 = Operation::move_to("b", "k1", "k2", true);
        assert_eq!(
            encode_operations(&[d1.clone(), d2.clone()]).unwrap(),
            format!("{};{}", encode_operation(&d1).unwrap(), encode_operation(&d2).unwrap())
        );
        assert_eq!(encode_operations(&[d1]).unwrap(), "/delete/YjprMQ");
    }

    #[test]
    fn test_encode_operations_empty() {
        assert!(matches!(
            encode_operations(&[]),
            Err(AuthError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_operations_fails_on_any_bad_entry() {
        let ops = [Operation::stat("b", "k1"), Operation::stat("", "k2")];
        assert!(encode_operations(&ops).is_err());
    }

    #[test]
    fn test_descriptor_move() {
        let op: Operation =
            r#"{"_type":"move","bucket":"b","fileName":"k1","dest":"k2","force":true}"#
                .parse()
                .unwrap();
        assert_eq!(op, Operation::move_to("b", "k1", "k2", true));
    }

    #[test]
    fn test_descriptor_aliases() {
        let op: Operation = r#"{"tag":"stat","container":"b","fileName":"k1"}"#.parse().unwrap();
        assert_eq!(op, Operation::stat("b", "k1"));
    }

    #[test]
    fn test_descriptor_unknown_tag() {
        let err = r#"{"tag":"unknown"}"#.parse::<Operation>().unwrap_err();
        match err {
            AuthError::InvalidOperation(tag) => assert_eq!(tag, "unknown"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_descriptor_missing_field() {
        let err = r#"{"_type":"move","bucket":"b","fileName":"k1"}"#
            .parse::<Operation>()
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument(_)));
        assert!(err.to_string().contains("dest"));
    }

    #[test]
    fn test_descriptor_chtype_out_of_range() {
        let err = r#"{"_type":"chtype","bucket":"b","fileName":"k1","type":9}"#
            .parse::<Operation>()
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument(_)));
    }

    #[test]
    fn test_descriptor_chgm() {
        let op: Operation = r#"{
            "_type": "chgm",
            "bucket": "b",
            "fileName": "k1",
            "mimetype": "image/png",
            "metas": [{"key": "y", "value": "v2"}, {"key": "x", "value": "v1"}]
        }"#
        .parse()
        .unwrap();
        assert_eq!(
            op.encode().unwrap(),
            "/chgm/YjprMQ/mime/aW1hZ2UvcG5n/x-qn-meta-y/djI/x-qn-meta-x/djE"
        );
    }

    #[test]
    fn test_descriptor_chgm_empty_mime_and_cond() {
        let op: Operation = r#"{"_type":"chgm","bucket":"b","fileName":"k1","mimetype":"","cond":""}"#
            .parse()
            .unwrap();
        assert_eq!(op.encode().unwrap(), "/chgm/YjprMQ");
    }

    #[test]
    fn test_tags_round_trip_through_descriptor() {
        let ops = [
            Operation::delete("b", "k"),
            Operation::stat("b", "k"),
            Operation::prefetch("b", "k"),
            Operation::change_status("b", "k", 0),
            Operation::delete_after_days("b", "k", 1),
            Operation::change_type("b", "k", StorageType::DeepArchive),
        ];
        for op in ops {
            let spec = OperationSpec {
                kind: op.tag().to_string(),
                bucket: "b".to_string(),
                file_name: Some("k".to_string()),
                status: Some(0),
                delete_after_days: Some(1),
                storage_type: Some(3),
                ..OperationSpec::default()
            };
            assert_eq!(Operation::try_from(spec).unwrap(), op);
        }
    }
}
