//! Registry ⇄ document conversion.
//!
//! Loading is per entry: an entry that fails to decode, or that the registry
//! refuses, is logged and skipped and the rest still load. One corrupt claim
//! must not leave the whole world unprotected.
//!
//! Entries are restored, not inserted: the overlap policy judges new claims,
//! so a save loads whole whatever policy the world runs under.

use parcel_registry::{ProtectionRegistry, WorldProtection, ZoneRegistry};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::codec::{ClaimDoc, ZoneDoc};
use crate::error::CodecError;

/// Root key of the claim section.
pub const PROTECTION_KEY: &str = "protectionRegistry";
/// Root key of the zone section.
pub const ZONES_KEY: &str = "pvpRegistry";
/// Root key of the transaction ledger, carried through untouched.
pub const TRANSACTIONS_KEY: &str = "transactionRegistry";

/// Outcome of a load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Entries now in the registry.
    pub loaded: usize,
    /// Entries whose id repeated an earlier entry; the later one won.
    pub duplicates: usize,
    /// Entries that were skipped, with the reason.
    pub skipped: Vec<CodecError>,
}

impl LoadReport {
    /// True when nothing was skipped or replaced.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.duplicates == 0
    }

    /// Fold another section's report into this one.
    pub fn merge(&mut self, other: Self) {
        self.loaded += other.loaded;
        self.duplicates += other.duplicates;
        self.skipped.extend(other.skipped);
    }

    fn skip(&mut self, error: CodecError) {
        tracing::warn!("Skipping entry: {error}");
        self.skipped.push(error);
    }
}

/// Save to and load from a document section.
///
/// `load_document` replaces the current contents.
pub trait DocumentExt {
    /// Encode as a document section.
    fn save_document(&self) -> Value;

    /// Replace the contents with the entries of `section`.
    fn load_document(&mut self, section: &Value) -> LoadReport;
}

/// The list stored under `key` in `section`, or an empty list if the section
/// or the key is missing or malformed.
fn entries<'a>(
    section: &'a Value,
    path: &'static str,
    key: &str,
    report: &mut LoadReport,
) -> &'a [Value] {
    match section {
        Value::Null => &[],
        Value::Object(map) => match map.get(key) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(list)) => list.as_slice(),
            Some(other) => {
                report.skip(CodecError::Structure {
                    path,
                    reason: format!("`{key}` is {}, expected a list", kind(other)),
                });
                &[]
            }
        },
        other => {
            report.skip(CodecError::Structure {
                path,
                reason: format!("section is {}, expected an object", kind(other)),
            });
            &[]
        }
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl DocumentExt for ProtectionRegistry {
    fn save_document(&self) -> Value {
        let claims: Vec<_> = self
            .store()
            .sorted()
            .into_iter()
            .map(ClaimDoc::from_claim)
            .collect();
        json!({ "claims": claims })
    }

    fn load_document(&mut self, section: &Value) -> LoadReport {
        const SECTION: &str = "claims";

        self.clear();
        let mut report = LoadReport::default();
        for (index, entry) in entries(section, PROTECTION_KEY, SECTION, &mut report)
            .iter()
            .enumerate()
        {
            let claim = match ClaimDoc::deserialize(entry) {
                Ok(doc) => doc.into_claim(),
                Err(e) => {
                    report.skip(CodecError::Malformed {
                        section: SECTION,
                        index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let id = claim.id();
            match self.restore(claim) {
                Ok(Some(_)) => {
                    tracing::warn!(
                        "Duplicate claim {id} at {SECTION}[{index}], keeping the later entry"
                    );
                    report.duplicates += 1;
                }
                Ok(None) => {}
                Err(source) => report.skip(CodecError::Rejected {
                    section: SECTION,
                    index,
                    source,
                }),
            }
        }
        report.loaded = self.len();
        report
    }
}

impl DocumentExt for ZoneRegistry {
    fn save_document(&self) -> Value {
        let zones: Vec<_> = self
            .store()
            .sorted()
            .into_iter()
            .map(ZoneDoc::from_zone)
            .collect();
        json!({ "zones": zones })
    }

    fn load_document(&mut self, section: &Value) -> LoadReport {
        const SECTION: &str = "zones";

        self.clear();
        let mut report = LoadReport::default();
        for (index, entry) in entries(section, ZONES_KEY, SECTION, &mut report)
            .iter()
            .enumerate()
        {
            let zone = match ZoneDoc::deserialize(entry) {
                Ok(doc) => doc.into_zone(),
                Err(e) => {
                    report.skip(CodecError::Malformed {
                        section: SECTION,
                        index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let id = zone.id();
            match self.restore(zone) {
                Ok(Some(_)) => {
                    tracing::warn!(
                        "Duplicate zone {id} at {SECTION}[{index}], keeping the later entry"
                    );
                    report.duplicates += 1;
                }
                Ok(None) => {}
                Err(source) => report.skip(CodecError::Rejected {
                    section: SECTION,
                    index,
                    source,
                }),
            }
        }
        report.loaded = self.len();
        report
    }
}

impl DocumentExt for WorldProtection {
    /// The root document without a transaction ledger.
    fn save_document(&self) -> Value {
        let mut root = Map::new();
        root.insert(PROTECTION_KEY.to_owned(), self.claims.save_document());
        root.insert(ZONES_KEY.to_owned(), self.zones.save_document());
        Value::Object(root)
    }

    fn load_document(&mut self, root: &Value) -> LoadReport {
        let mut report = LoadReport::default();
        let (claims, zones) = match root {
            Value::Object(map) => (
                map.get(PROTECTION_KEY).unwrap_or(&Value::Null),
                map.get(ZONES_KEY).unwrap_or(&Value::Null),
            ),
            other => {
                report.skip(CodecError::Structure {
                    path: "root",
                    reason: format!("document is {}, expected an object", kind(other)),
                });
                (&Value::Null, &Value::Null)
            }
        };

        report.merge(self.claims.load_document(claims));
        report.merge(self.zones.load_document(zones));
        tracing::info!(
            "Loaded {} claims and {} zones ({} skipped)",
            self.claims.len(),
            self.zones.len(),
            report.skipped.len()
        );
        report
    }
}
