//! Operator tool for world protection saves.
//!
//! Usage:
//! - `parcelctl <save.json> list` - every claim and zone
//! - `parcelctl <save.json> at <x> <y> <z>` - what governs a position
//! - `parcelctl <save.json> check <x> <y> <z> <player-uuid> <permission>`
//! - `parcelctl <save.json> validate` - report entries that fail to load
//!
//! `PARCEL_CONFIG` points at a registry config file; defaults otherwise.

use std::io::{self, Write};
use std::path::PathBuf;

use eyre::{WrapErr, bail, eyre};
use parcel_core::{BlockPos, ClaimPermission, PermissionKind, Uuid, ZonePermission};
use parcel_registry::{RegistryConfig, WorldProtection};
use parcel_storage::WorldSave;
use tracing::info;

enum Command {
    List,
    At(BlockPos),
    Check {
        pos: BlockPos,
        player: Uuid,
        permission: ClaimPermission,
    },
    Validate,
}

impl Command {
    fn parse(args: &[String]) -> eyre::Result<Self> {
        let words: Vec<&str> = args.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["list"] => Ok(Self::List),
            ["validate"] => Ok(Self::Validate),
            ["at", x, y, z] => Ok(Self::At(parse_pos(x, y, z)?)),
            ["check", x, y, z, player, permission] => Ok(Self::Check {
                pos: parse_pos(x, y, z)?,
                player: Uuid::parse_str(player).wrap_err("invalid player uuid")?,
                permission: ClaimPermission::from_name(permission)
                    .ok_or_else(|| eyre!("unknown permission {permission}"))?,
            }),
            _ => bail!(
                "usage: parcelctl <save.json> list | at <x> <y> <z> \
                 | check <x> <y> <z> <player-uuid> <permission> | validate"
            ),
        }
    }
}

fn parse_pos(x: &str, y: &str, z: &str) -> eyre::Result<BlockPos> {
    Ok(BlockPos::new(
        x.parse().wrap_err("invalid x")?,
        y.parse().wrap_err("invalid y")?,
        z.parse().wrap_err("invalid z")?,
    ))
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("parcelctl=info".parse()?)
                .add_directive("parcel_storage=warn".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((save_path, rest)) = args.split_first() else {
        bail!("usage: parcelctl <save.json> <command>");
    };
    let command = Command::parse(rest)?;

    let config = match std::env::var("PARCEL_CONFIG") {
        Ok(path) => RegistryConfig::load(&path).wrap_err_with(|| format!("loading config {path}"))?,
        Err(_) => RegistryConfig::default(),
    };

    let path = PathBuf::from(save_path);
    let (save, report) = WorldSave::read(&path, config)
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    info!(
        "Loaded {} entries from {} ({} skipped, {} duplicates)",
        report.loaded,
        path.display(),
        report.skipped.len(),
        report.duplicates
    );

    let mut out = io::stdout().lock();
    match command {
        Command::List => list(&mut out, &save.protection)?,
        Command::At(pos) => at(&mut out, &save.protection, pos)?,
        Command::Check {
            pos,
            player,
            permission,
        } => {
            let allowed = save.protection.claims.check(pos, player, permission);
            writeln!(
                out,
                "{} {player} {} at {pos}",
                if allowed { "ALLOW" } else { "DENY" },
                permission.name()
            )?;
        }
        Command::Validate => {
            for error in &report.skipped {
                writeln!(out, "skipped: {error}")?;
            }
            writeln!(
                out,
                "{} loaded, {} skipped, {} duplicates",
                report.loaded,
                report.skipped.len(),
                report.duplicates
            )?;
            if !report.is_clean() {
                bail!("save has problems");
            }
        }
    }
    Ok(())
}

fn list(out: &mut impl Write, world: &WorldProtection) -> eyre::Result<()> {
    for claim in world.claims.all_claims() {
        let granted: Vec<_> = claim.permissions.iter().map(|p| p.name()).collect();
        writeln!(
            out,
            "claim {} {:?} owner={} box={} volume={} whitelist={} public=[{}]{}{}",
            claim.id(),
            claim.name,
            claim.owner,
            claim.bounds,
            claim.bounds.volume(),
            claim.whitelist.len(),
            granted.join(","),
            if claim.flags.hotel { " hotel" } else { "" },
            if claim.flags.room { " room" } else { "" },
        )?;
    }
    for zone in world.zones.all_zones() {
        let enabled: Vec<_> = zone.permissions.iter().map(|p| p.name()).collect();
        writeln!(
            out,
            "zone {} {:?} box={} rules=[{}]",
            zone.id(),
            zone.name,
            zone.bounds,
            enabled.join(",")
        )?;
    }
    Ok(())
}

fn at(out: &mut impl Write, world: &WorldProtection, pos: BlockPos) -> eyre::Result<()> {
    match world.claims.governing(pos) {
        Some(claim) => writeln!(
            out,
            "claim {} {:?} owner={} ({} claims here)",
            claim.id(),
            claim.name,
            claim.owner,
            world.claims.find_by_point(pos).len()
        )?,
        None => writeln!(out, "unclaimed (open world: {})", world.claims.open_world())?,
    }
    for permission in ZonePermission::ALL {
        writeln!(
            out,
            "{}={}",
            permission.name(),
            world.zones.allows(pos, *permission)
        )?;
    }
    Ok(())
}
