//! Save/load round-trip tests

use parcel_core::prelude::*;
use parcel_registry::{OverlapPolicy, ProtectionRegistry, RegistryConfig, WorldProtection};
use parcel_storage::{DocumentExt, WorldSave};
use serde_json::json;

fn bx(a: (i32, i32, i32), b: (i32, i32, i32)) -> BlockBox {
    BlockBox::new(BlockPos::new(a.0, a.1, a.2), BlockPos::new(b.0, b.1, b.2))
}

fn sample_world() -> WorldProtection {
    let mut world = WorldProtection::default();
    let alice = PlayerRef::new(Uuid::new_v4(), "alice");
    let bob = PlayerRef::new(Uuid::new_v4(), "bob");

    let mut hotel = Claim::new(alice.clone(), bx((-40, 0, -40), (40, 64, 40)))
        .named("Grand Hotel")
        .anchored_at(BlockPos::new(0, 64, 0))
        .granting(ClaimPermission::DoorInteract);
    hotel.flags.hotel = true;

    let mut room = Claim::new(alice, bx((-5, 10, -5), (5, 14, 5))).named("Room 1");
    room.flags.room = true;
    room.whitelist.add(bob.clone());
    room.whitelist.add(PlayerRef::new(Uuid::new_v4(), "carol"));

    let public = Claim::new(bob, bx((100, -64, 100), (131, 320, 131)))
        .granting(ClaimPermission::Interact)
        .granting(ClaimPermission::InventoryInteract);
    let unowned = Claim::new(PlayerRef::NOBODY, bx((-500, 0, 0), (-400, 10, 10)));

    for claim in [hotel, room, public, unowned] {
        world.claims.insert(claim).unwrap();
    }

    world
        .zones
        .insert(
            Zone::new("arena", bx((200, 0, 200), (260, 80, 260)))
                .allowing(ZonePermission::PlayerPvp),
        )
        .unwrap();
    world
        .zones
        .insert(Zone::new("spawn", bx((-64, 0, -64), (64, 255, 64))))
        .unwrap();
    world
}

#[test]
fn test_world_round_trip_preserves_everything() {
    let world = sample_world();
    let doc = world.save_document();

    let mut restored = WorldProtection::default();
    let report = restored.load_document(&doc);
    assert!(report.is_clean());
    assert_eq!(report.loaded, 6);

    let before = world.claims.all_claims();
    let after = restored.claims.all_claims();
    assert_eq!(before, after);
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.flags, b.flags);
        assert_eq!(
            a.whitelist.iter().map(|p| &p.name).collect::<Vec<_>>(),
            b.whitelist.iter().map(|p| &p.name).collect::<Vec<_>>()
        );
        assert_eq!(a.owner.name, b.owner.name);
    }
    assert_eq!(world.zones.all_zones(), restored.zones.all_zones());

    // Saving the restored world yields the identical document
    assert_eq!(restored.save_document(), doc);
}

#[test]
fn test_round_trip_keeps_query_answers() {
    let world = sample_world();
    let mut restored = WorldProtection::default();
    restored.load_document(&world.save_document());

    for x in (-520..280).step_by(9) {
        for y in [-64, 0, 12, 70, 300] {
            let pos = BlockPos::new(x, y, x / 2);
            assert_eq!(world.claims.is_protected(pos), restored.claims.is_protected(pos));
            assert_eq!(
                world.claims.resolve_governing(pos).map(|c| c.id()),
                restored.claims.resolve_governing(pos).map(|c| c.id())
            );
            assert_eq!(
                world.zones.player_pvp_allowed(pos),
                restored.zones.player_pvp_allowed(pos)
            );
        }
    }
}

#[test]
fn test_unknown_fields_are_ignored() {
    let doc = json!({
        "formatVersion": 9,
        "protectionRegistry": {
            "claims": [{
                "uuid": "6a2f41a3-c54c-4b1a-9c1f-3b7cb1b2c001",
                "name": "farm",
                "owner": {
                    "uuid": "6a2f41a3-c54c-4b1a-9c1f-3b7cb1b2c0ff",
                    "name": "P1",
                    "skin": "x"
                },
                "coords": { "x": 3, "y": 64, "z": 3, "w": 1 },
                "box": { "min": { "x": 0, "y": 0, "z": 0 }, "max": { "x": 9, "y": 9, "z": 9 } },
                "whitelist": [],
                "permissions": 1,
                "hotel": false,
                "room": false,
                "rentPrice": 40
            }],
            "nextId": 2
        }
    });

    let mut registry = ProtectionRegistry::new(&RegistryConfig::default());
    let report = registry.load_document(&doc["protectionRegistry"]);
    assert!(report.is_clean());

    let claim = registry.all_claims().remove(0);
    assert_eq!(claim.name, "farm");
    assert_eq!(claim.anchor, BlockPos::new(3, 64, 3));
    assert!(claim.has_permission(ClaimPermission::BlockBreak));
    assert!(registry.check(BlockPos::new(1, 1, 1), Uuid::new_v4(), ClaimPermission::BlockBreak));
}

#[test]
fn test_ledger_passes_through() {
    let ledger = json!({
        "entries": [{ "claim": "6a2f41a3-c54c-4b1a-9c1f-3b7cb1b2c001", "paid": 12 }]
    });
    let world = sample_world();
    let mut root = world.save_document();
    root["transactionRegistry"] = ledger.clone();

    let (save, report) = WorldSave::from_document(&root, RegistryConfig::default());
    assert!(report.is_clean());
    assert_eq!(save.transactions, ledger);
    assert_eq!(save.to_document(), root);
}

#[test]
fn test_missing_ids_get_fresh_ones_once() {
    let doc = json!({
        "claims": [
            { "box": { "min": { "x": 0, "y": 0, "z": 0 }, "max": { "x": 1, "y": 1, "z": 1 } } },
            { "box": { "min": { "x": 5, "y": 0, "z": 0 }, "max": { "x": 6, "y": 1, "z": 1 } } }
        ]
    });
    let mut first = ProtectionRegistry::new(&RegistryConfig::default());
    first.load_document(&doc);
    assert_eq!(first.len(), 2);

    // Once saved, the generated ids are stable
    let saved = first.save_document();
    let mut second = ProtectionRegistry::new(&RegistryConfig::default());
    second.load_document(&saved);
    assert_eq!(first.all_claims(), second.all_claims());
}

fn reject_foreign() -> RegistryConfig {
    RegistryConfig {
        overlap_policy: OverlapPolicy::RejectForeign,
        ..RegistryConfig::default()
    }
}

#[test]
fn test_reject_foreign_world_survives_round_trip() {
    let mut world = WorldProtection::new(reject_foreign());
    let alice = PlayerRef::new(Uuid::new_v4(), "alice");
    let bob = PlayerRef::new(Uuid::new_v4(), "bob");
    let estate = Claim::new(alice.clone(), bx((0, 0, 0), (19, 19, 19)));
    let shed = Claim::new(alice, bx((5, 5, 5), (7, 7, 7)));
    let shed_id = shed.id();
    world.claims.insert(estate).unwrap();
    world.claims.insert(shed).unwrap();

    // Handing the shed to bob would create a foreign overlap
    assert!(world.claims.modify(shed_id, |c| c.owner = bob).is_err());

    let mut restored = WorldProtection::new(reject_foreign());
    let report = restored.load_document(&world.save_document());
    assert!(report.is_clean());
    assert_eq!(restored.claims.len(), 2);
    assert_eq!(restored.claims.all_claims(), world.claims.all_claims());
}

#[test]
fn test_nested_save_loads_whole_under_reject_foreign() {
    // A room owned by a guest inside someone else's hotel, written under AllowNested
    let mut world = sample_world();
    let guest = PlayerRef::new(Uuid::new_v4(), "guest");
    let mut rented = Claim::new(guest, bx((10, 10, 10), (14, 14, 14))).named("Room 2");
    rented.flags.room = true;
    world.claims.insert(rented).unwrap();
    let doc = world.save_document();

    let mut strict = WorldProtection::new(reject_foreign());
    let report = strict.load_document(&doc);
    assert!(report.is_clean());
    assert_eq!(strict.claims.all_claims(), world.claims.all_claims());
    assert_eq!(strict.save_document(), doc);

    // New placements still follow the policy
    let intruder = Claim::new(PlayerRef::new(Uuid::new_v4(), "eve"), bx((0, 0, 0), (3, 3, 3)));
    assert!(strict.claims.insert(intruder).is_err());
}

#[test]
fn test_unknown_permission_bits_survive_save() {
    let raw = (1 << 20) | 1;
    let doc = json!({
        "claims": [{
            "uuid": "6a2f41a3-c54c-4b1a-9c1f-3b7cb1b2c00b",
            "box": { "min": { "x": 0, "y": 0, "z": 0 }, "max": { "x": 9, "y": 9, "z": 9 } },
            "permissions": raw
        }]
    });

    let mut registry = ProtectionRegistry::new(&RegistryConfig::default());
    assert!(registry.load_document(&doc).is_clean());

    let claim = registry.all_claims().remove(0);
    assert_eq!(claim.permissions.bits(), raw);
    assert_eq!(
        claim.permissions.iter().collect::<Vec<_>>(),
        vec![ClaimPermission::BlockBreak]
    );

    let saved = registry.save_document();
    assert_eq!(saved["claims"][0]["permissions"], raw);

    let mut reloaded = ProtectionRegistry::new(&RegistryConfig::default());
    reloaded.load_document(&saved);
    assert_eq!(reloaded.all_claims()[0].permissions.bits(), raw);
}
