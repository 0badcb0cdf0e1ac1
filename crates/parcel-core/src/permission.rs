//! Permission bitmasks.
//!
//! A permission's bit position is its persisted identity. Bit positions are
//! append-only: new permissions take the next free bit and existing ones are
//! never reordered.
//!
//! ```text
//! claim scope                      zone scope
//! bit 0  BLOCK_BREAK               bit 0  MOB_PVP
//! bit 1  BLOCK_PLACE               bit 1  MOB_SPAWN
//! bit 2  MULTIBLOCK_PLACE          bit 2  PLAYER_PVP
//! bit 3  TOOL_INTERACT
//! bit 4  INTERACT
//! bit 5  INVENTORY_INTERACT
//! bit 6  DOOR_INTERACT
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width of the backing field in bits.
pub const PERMISSION_BITS: u8 = 32;

/// A vocabulary of named permissions, each owning one bit.
pub trait PermissionKind: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Every permission, indexed by bit position.
    const ALL: &'static [Self];

    /// Bit position of this permission.
    fn bit(self) -> u8;

    /// Stable upper-case name.
    fn name(self) -> &'static str;

    /// Reverse lookup by bit position.
    fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.get(bit as usize).copied()
    }

    /// Case-insensitive lookup by name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

macro_rules! permission_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $bit:literal => $label:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $bit, )*
        }

        impl PermissionKind for $name {
            const ALL: &'static [Self] = &[ $( Self::$variant, )* ];

            fn bit(self) -> u8 {
                self as u8
            }

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

permission_table! {
    /// Actions a claim can open to everyone.
    pub enum ClaimPermission {
        BlockBreak = 0 => "BLOCK_BREAK",
        BlockPlace = 1 => "BLOCK_PLACE",
        /// Placing structures that span several blocks (doors, beds).
        MultiblockPlace = 2 => "MULTIBLOCK_PLACE",
        ToolInteract = 3 => "TOOL_INTERACT",
        Interact = 4 => "INTERACT",
        InventoryInteract = 5 => "INVENTORY_INTERACT",
        DoorInteract = 6 => "DOOR_INTERACT",
    }
}

permission_table! {
    /// Dimension-wide rules a zone can enable.
    pub enum ZonePermission {
        MobPvp = 0 => "MOB_PVP",
        MobSpawn = 1 => "MOB_SPAWN",
        PlayerPvp = 2 => "PLAYER_PVP",
    }
}

/// A fixed-width bit field over the permissions of `P`.
///
/// All-zero by default: nothing is granted.
pub struct PermissionSet<P> {
    bits: u32,
    _kind: PhantomData<fn() -> P>,
}

impl<P: PermissionKind> PermissionSet<P> {
    /// The empty set.
    pub const NONE: Self = Self::from_bits(0);

    /// Wrap raw bits. Bits without a named permission are kept so that data
    /// written by a newer vocabulary survives a load/save cycle.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _kind: PhantomData,
        }
    }

    /// Every named permission of `P` granted.
    #[must_use]
    pub fn all() -> Self {
        P::ALL.iter().copied().collect()
    }

    /// Raw bit field, unknown bits included.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Read the bit at `position`.
    #[must_use]
    pub const fn get(&self, position: u8) -> bool {
        debug_assert!(position < PERMISSION_BITS, "permission bit out of range");
        (self.bits >> (position % PERMISSION_BITS)) & 1 == 1
    }

    /// Set or clear the bit at `position`, leaving every other bit untouched.
    pub const fn set(&mut self, position: u8, value: bool) {
        debug_assert!(position < PERMISSION_BITS, "permission bit out of range");
        let mask = 1u32 << (position % PERMISSION_BITS);
        if value {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
    }

    /// Whether `permission` is granted.
    #[must_use]
    pub fn has(&self, permission: P) -> bool {
        self.get(permission.bit())
    }

    /// Grant `permission`.
    pub fn insert(&mut self, permission: P) {
        self.set(permission.bit(), true);
    }

    /// Revoke `permission`.
    pub fn remove(&mut self, permission: P) {
        self.set(permission.bit(), false);
    }

    /// Flip a permission and return its new value.
    pub fn toggle(&mut self, permission: P) -> bool {
        let value = !self.has(permission);
        self.set(permission.bit(), value);
        value
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Granted named permissions in bit order.
    pub fn iter(&self) -> impl Iterator<Item = P> + '_ {
        P::ALL.iter().copied().filter(move |p| self.has(*p))
    }
}

impl<P: PermissionKind> FromIterator<P> for PermissionSet<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}

impl<P> Clone for PermissionSet<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PermissionSet<P> {}

impl<P> PartialEq for PermissionSet<P> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<P> Eq for PermissionSet<P> {}

impl<P> Hash for PermissionSet<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<P> Default for PermissionSet<P> {
    fn default() -> Self {
        Self {
            bits: 0,
            _kind: PhantomData,
        }
    }
}

impl<P: PermissionKind> fmt::Debug for PermissionSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<P> Serialize for PermissionSet<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits)
    }
}

impl<'de, P> Deserialize<'de> for PermissionSet<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self {
            bits,
            _kind: PhantomData,
        })
    }
}
