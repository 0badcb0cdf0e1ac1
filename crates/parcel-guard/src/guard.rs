//! Verdicts for world actions.

use hashbrown::HashSet;
use parcel_core::{BlockPos, ClaimPermission, Uuid, ZonePermission};
use parcel_registry::{SharedProtection, WorldProtection};
use parking_lot::RwLock;

use crate::action::{Rule, WorldAction};

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The claim governing a touched position refuses it.
    Claim(Uuid),
    /// The zone rule is off here. `None` means the world default refused it.
    Zone(Option<Uuid>),
    /// No claim governs and the world is closed to building.
    Unclaimed,
}

/// Answer to [`Guard::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(Denial),
}

impl Verdict {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Judges world actions against one world's protection state.
///
/// Cheap to clone the underlying handle; the host keeps one guard per world
/// and calls [`Guard::check`] from its event handlers.
#[derive(Debug, Default)]
pub struct Guard {
    protection: SharedProtection,
    bypass: RwLock<HashSet<Uuid>>,
}

impl Guard {
    /// Guard over an existing protection handle.
    #[must_use]
    pub fn new(protection: SharedProtection) -> Self {
        Self {
            protection,
            bypass: RwLock::new(HashSet::new()),
        }
    }

    #[must_use]
    pub const fn protection(&self) -> &SharedProtection {
        &self.protection
    }

    /// Let `player` ignore claim rules (operators). Zone rules still apply.
    pub fn grant_bypass(&self, player: Uuid) -> bool {
        self.bypass.write().insert(player)
    }

    /// Returns `false` if the player had no bypass.
    pub fn revoke_bypass(&self, player: Uuid) -> bool {
        self.bypass.write().remove(&player)
    }

    #[must_use]
    pub fn has_bypass(&self, player: Uuid) -> bool {
        self.bypass.read().contains(&player)
    }

    /// Decide whether `actor` may perform `action`.
    ///
    /// Environmental actions (pistons, explosions, mob spawns) pass
    /// [`Uuid::nil`] as the actor; the nil id is never trusted by a claim.
    pub fn check(&self, action: &WorldAction, actor: Uuid) -> Verdict {
        let verdict = match action.rule() {
            Rule::Claim(permission) => {
                if self.has_bypass(actor) {
                    return Verdict::Allow;
                }
                self.protection
                    .read(|world| claim_verdict(world, action.positions(), actor, permission))
            }
            Rule::Zone(permission) => self
                .protection
                .read(|world| zone_verdict(world, action.positions(), permission)),
            Rule::Piston => match action {
                WorldAction::PistonPush { from, to } => self.check_piston(*from, *to),
                _ => Verdict::Allow,
            },
            Rule::Explosion => self.protection.read(|world| {
                action
                    .positions()
                    .iter()
                    .find_map(|pos| world.claims.governing(*pos))
                    .map_or(Verdict::Allow, |claim| {
                        Verdict::Deny(Denial::Claim(claim.id()))
                    })
            }),
        };

        if let Verdict::Deny(denial) = verdict {
            tracing::debug!("Denied {action:?} by {actor}: {denial:?}");
        }
        verdict
    }

    /// A piston may move blocks inside one claim and out of claims, but never
    /// into a claim other than the one it stands in.
    pub fn check_piston(&self, from: BlockPos, to: BlockPos) -> Verdict {
        self.protection.read(|world| {
            let source = world.claims.governing(from).map(|c| c.id());
            match world.claims.governing(to).map(|c| c.id()) {
                Some(target) if source != Some(target) => Verdict::Deny(Denial::Claim(target)),
                _ => Verdict::Allow,
            }
        })
    }

    /// Blocks of an explosion that lie outside every claim. Order is kept.
    #[must_use]
    pub fn filter_explosion(&self, blocks: &[BlockPos]) -> Vec<BlockPos> {
        self.protection.read(|world| {
            blocks
                .iter()
                .copied()
                .filter(|pos| !world.claims.is_protected(*pos))
                .collect()
        })
    }
}

fn claim_verdict(
    world: &WorldProtection,
    positions: &[BlockPos],
    actor: Uuid,
    permission: ClaimPermission,
) -> Verdict {
    let open_world = world.claims.open_world();
    for pos in positions {
        match world.claims.governing(*pos) {
            Some(claim) if !claim.allows(&actor, permission) => {
                return Verdict::Deny(Denial::Claim(claim.id()));
            }
            Some(_) => {}
            None if !open_world => return Verdict::Deny(Denial::Unclaimed),
            None => {}
        }
    }
    Verdict::Allow
}

fn zone_verdict(
    world: &WorldProtection,
    positions: &[BlockPos],
    permission: ZonePermission,
) -> Verdict {
    for pos in positions {
        if !world.zones.allows(*pos, permission) {
            let zone = world.zones.store().governing(*pos).map(|z| z.id());
            return Verdict::Deny(Denial::Zone(zone));
        }
    }
    Verdict::Allow
}
