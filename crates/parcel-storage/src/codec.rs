//! Document shapes for claims and zones.
//!
//! # Claim entry
//!
//! ```text
//! {
//!   "uuid":        "6f1c…" | [i32; 4] | [u8; 16]   (missing: fresh id)
//!   "name":        string                           (missing: "")
//!   "owner":       { "uuid": string, "name": string } (missing: nobody)
//!   "coords":      { "x", "y", "z" }                (missing: box min)
//!   "box":         { "min": {x,y,z}, "max": {x,y,z} }  required
//!   "whitelist":   [ { "uuid", "name" }, … ]        (missing: [])
//!   "permissions": integer bitfield                 (missing: 0)
//!   "hotel":       bool                             (missing: false)
//!   "room":        bool                             (missing: false)
//! }
//! ```
//!
//! Zone entries share `uuid`, `name`, `coords`, `box` and `permissions` and
//! add `createTime` (unix millis). Unknown keys are ignored.

use parcel_core::{
    BlockBox, BlockPos, Claim, ClaimFlags, ClaimPermission, PermissionSet, PlayerRef, Uuid,
    Whitelist, Zone, ZonePermission, now_millis,
};
use serde::{Deserialize, Serialize};

/// Every way an id may be written.
///
/// The int-array form is the packed layout used by NBT: four big-endian
/// words, most significant first.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdForm {
    Text(String),
    Words([i32; 4]),
    Bytes(Vec<u8>),
}

impl IdForm {
    fn into_uuid(self) -> Result<Uuid, String> {
        match self {
            Self::Text(text) => Uuid::parse_str(&text).map_err(|e| e.to_string()),
            Self::Words(words) => Ok(Uuid::from_u128(words.iter().fold(0u128, |acc, w| {
                (acc << 32) | u128::from(u32::from_be_bytes(w.to_be_bytes()))
            }))),
            Self::Bytes(bytes) => Uuid::from_slice(&bytes).map_err(|e| e.to_string()),
        }
    }
}

mod id_form {
    use parcel_core::Uuid;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::IdForm;

    pub fn serialize<S: Serializer>(id: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(&id.hyphenated()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Uuid>, D::Error> {
        Option::<IdForm>::deserialize(deserializer)?
            .map(IdForm::into_uuid)
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct ClaimDoc {
    #[serde(default, with = "id_form")]
    uuid: Option<Uuid>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    owner: Option<PlayerRef>,
    #[serde(default)]
    coords: Option<BlockPos>,
    #[serde(rename = "box")]
    bounds: BlockBox,
    #[serde(default)]
    whitelist: Whitelist,
    #[serde(default)]
    permissions: PermissionSet<ClaimPermission>,
    #[serde(default)]
    hotel: bool,
    #[serde(default)]
    room: bool,
}

impl ClaimDoc {
    pub(crate) fn from_claim(claim: &Claim) -> Self {
        Self {
            uuid: Some(claim.id()),
            name: claim.name.clone(),
            owner: Some(claim.owner.clone()),
            coords: Some(claim.anchor),
            bounds: claim.bounds,
            whitelist: claim.whitelist.clone(),
            permissions: claim.permissions,
            hotel: claim.flags.hotel,
            room: claim.flags.room,
        }
    }

    /// Build the claim. A missing id gets a fresh one.
    pub(crate) fn into_claim(self) -> Claim {
        let id = self.uuid.unwrap_or_else(Uuid::new_v4);
        let mut claim = Claim::with_id(id, self.owner.unwrap_or_default(), self.bounds);
        claim.name = self.name;
        claim.whitelist = self.whitelist;
        claim.anchor = self.coords.unwrap_or(self.bounds.min());
        claim.permissions = self.permissions;
        claim.flags = ClaimFlags {
            hotel: self.hotel,
            room: self.room,
        };
        claim
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct ZoneDoc {
    #[serde(default, with = "id_form")]
    uuid: Option<Uuid>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    coords: Option<BlockPos>,
    #[serde(rename = "box")]
    bounds: BlockBox,
    #[serde(default)]
    permissions: PermissionSet<ZonePermission>,
    #[serde(default, rename = "createTime")]
    create_time: Option<u64>,
}

impl ZoneDoc {
    pub(crate) fn from_zone(zone: &Zone) -> Self {
        Self {
            uuid: Some(zone.id()),
            name: zone.name.clone(),
            coords: Some(zone.anchor),
            bounds: zone.bounds,
            permissions: zone.permissions,
            create_time: Some(zone.created_at),
        }
    }

    pub(crate) fn into_zone(self) -> Zone {
        let id = self.uuid.unwrap_or_else(Uuid::new_v4);
        let created_at = self.create_time.unwrap_or_else(now_millis);
        let mut zone = Zone::with_id(id, self.name, self.bounds, created_at);
        zone.anchor = self.coords.unwrap_or(self.bounds.min());
        zone.permissions = self.permissions;
        zone
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_minimal_claim_entry_defaults() {
        let doc: ClaimDoc = serde_json::from_value(json!({
            "box": { "min": { "x": 9, "y": 0, "z": 0 }, "max": { "x": 0, "y": 9, "z": 9 } }
        }))
        .unwrap();
        let claim = doc.into_claim();

        assert!(!claim.id().is_nil());
        assert!(claim.name.is_empty());
        assert!(!claim.is_owned());
        assert!(claim.permissions.is_empty());
        assert_eq!(claim.bounds.min(), BlockPos::new(0, 0, 0));
        assert_eq!(claim.anchor, BlockPos::new(0, 0, 0));
        assert_eq!(claim.flags, ClaimFlags::default());
    }

    #[test]
    fn test_id_forms_agree() {
        let id = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let boxed = json!({ "min": { "x": 0, "y": 0, "z": 0 }, "max": { "x": 1, "y": 1, "z": 1 } });
        let words = [0x0011_2233_i32, 0x4455_6677, 0x8899_aabb_u32 as i32, 0xccdd_eeff_u32 as i32];

        for form in [
            json!(id.to_string()),
            json!(words),
            json!(id.as_bytes().to_vec()),
        ] {
            let doc: ClaimDoc =
                serde_json::from_value(json!({ "uuid": form, "box": boxed })).unwrap();
            assert_eq!(doc.into_claim().id(), id);
        }
    }

    #[test]
    fn test_bad_id_is_an_error() {
        let result = serde_json::from_value::<ClaimDoc>(json!({
            "uuid": "not-a-uuid",
            "box": { "min": { "x": 0, "y": 0, "z": 0 }, "max": { "x": 1, "y": 1, "z": 1 } }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_zone_entry_keeps_create_time() {
        let doc: ZoneDoc = serde_json::from_value(json!({
            "uuid": "00112233-4455-6677-8899-aabbccddeeff",
            "name": "arena",
            "box": { "min": { "x": 0, "y": 0, "z": 0 }, "max": { "x": 5, "y": 5, "z": 5 } },
            "permissions": 4,
            "createTime": 1_700_000_000_000_u64,
            "color": "red"
        }))
        .unwrap();
        let zone = doc.into_zone();
        assert_eq!(zone.created_at, 1_700_000_000_000);
        assert!(zone.has_permission(ZonePermission::PlayerPvp));
        assert_eq!(zone.name, "arena");
    }
}
