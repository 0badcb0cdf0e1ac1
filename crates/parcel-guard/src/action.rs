//! World actions the host reports before applying them.

use parcel_core::{BlockPos, ClaimPermission, ZonePermission};
use smallvec::SmallVec;

/// Positions touched by one multiblock placement (beds, doors, tall plants).
pub type Footprint = SmallVec<[BlockPos; 4]>;

/// Something a player or the world is about to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldAction {
    BreakBlock(BlockPos),
    PlaceBlock(BlockPos),
    PlaceMultiblock(Footprint),
    UseTool(BlockPos),
    Interact(BlockPos),
    OpenContainer(BlockPos),
    UseDoor(BlockPos),
    /// A piston at `from` moving a block to `to`.
    PistonPush { from: BlockPos, to: BlockPos },
    /// Blocks an explosion would destroy.
    Explosion { blocks: Vec<BlockPos> },
    /// Player hitting another player standing at the position.
    AttackPlayer(BlockPos),
    /// Player hitting a mob standing at the position.
    AttackMob(BlockPos),
    SpawnMob(BlockPos),
}

/// Which rule an action is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Claim(ClaimPermission),
    Zone(ZonePermission),
    Piston,
    Explosion,
}

impl WorldAction {
    /// The rule this action is judged by.
    #[must_use]
    pub const fn rule(&self) -> Rule {
        match self {
            Self::BreakBlock(_) => Rule::Claim(ClaimPermission::BlockBreak),
            Self::PlaceBlock(_) => Rule::Claim(ClaimPermission::BlockPlace),
            Self::PlaceMultiblock(_) => Rule::Claim(ClaimPermission::MultiblockPlace),
            Self::UseTool(_) => Rule::Claim(ClaimPermission::ToolInteract),
            Self::Interact(_) => Rule::Claim(ClaimPermission::Interact),
            Self::OpenContainer(_) => Rule::Claim(ClaimPermission::InventoryInteract),
            Self::UseDoor(_) => Rule::Claim(ClaimPermission::DoorInteract),
            Self::PistonPush { .. } => Rule::Piston,
            Self::Explosion { .. } => Rule::Explosion,
            Self::AttackPlayer(_) => Rule::Zone(ZonePermission::PlayerPvp),
            Self::AttackMob(_) => Rule::Zone(ZonePermission::MobPvp),
            Self::SpawnMob(_) => Rule::Zone(ZonePermission::MobSpawn),
        }
    }

    /// Every position the action touches.
    #[must_use]
    pub fn positions(&self) -> &[BlockPos] {
        match self {
            Self::BreakBlock(pos)
            | Self::PlaceBlock(pos)
            | Self::UseTool(pos)
            | Self::Interact(pos)
            | Self::OpenContainer(pos)
            | Self::UseDoor(pos)
            | Self::AttackPlayer(pos)
            | Self::AttackMob(pos)
            | Self::SpawnMob(pos) => core::slice::from_ref(pos),
            Self::PlaceMultiblock(footprint) => footprint.as_slice(),
            Self::PistonPush { to, .. } => core::slice::from_ref(to),
            Self::Explosion { blocks } => blocks.as_slice(),
        }
    }
}
