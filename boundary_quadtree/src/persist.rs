// Copyright 2025 the Boundary Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary containers for lookups and boundary region sets.
//!
//! Both formats are little-endian and share a header:
//!
//! | field            | type      |
//! |------------------|-----------|
//! | magic            | `[u8; 4]` |
//! | format version   | `u16`     |
//! | vertical power   | `u32`     |
//! | max iterations   | `u32`     |
//!
//! A lookup (`BQLK`) continues with its height, node count and one encoded `u32` per node.
//! A region set (`BQRS`) continues with a count and `(x, y)` pairs.

use std::io::{Read, Write};

use tracing::debug;

use crate::error::{CorruptDataError, PersistError};
use crate::lookup::RegionLookup;
use crate::node::RegionNode;
use crate::params::BoundaryParameters;
use crate::types::RegionId;
use crate::visited::MAX_HEIGHT;

/// Magic bytes of a persisted [`RegionLookup`].
pub const LOOKUP_MAGIC: [u8; 4] = *b"BQLK";
/// Magic bytes of a persisted boundary region set.
pub const REGIONS_MAGIC: [u8; 4] = *b"BQRS";
/// The only format version written and accepted.
pub const FORMAT_VERSION: u16 = 1;

// Caps the up-front allocation for a declared element count; larger inputs still load.
const PREALLOCATE_LIMIT: usize = 1 << 16;

/// A lookup together with the parameters it was computed for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedLookup {
    /// Parameters of the computation.
    pub parameters: BoundaryParameters,
    /// The lookup tree.
    pub lookup: RegionLookup,
}

/// A boundary region set together with the parameters it was computed for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedRegions {
    /// Parameters of the computation.
    pub parameters: BoundaryParameters,
    /// Border regions in search order.
    pub regions: Vec<RegionId>,
}

/// Write `lookup` and its parameters.
pub fn save_lookup<W: Write>(
    mut writer: W,
    parameters: &BoundaryParameters,
    lookup: &RegionLookup,
) -> Result<(), PersistError> {
    write_header(&mut writer, LOOKUP_MAGIC, parameters)?;
    write_u32(&mut writer, lookup.height())?;
    write_len(&mut writer, lookup.node_count())?;
    for node in lookup.nodes() {
        write_u32(&mut writer, node.to_bits())?;
    }
    writer.flush()?;
    debug!(nodes = lookup.node_count(), %parameters, "saved lookup");
    Ok(())
}

/// Read a lookup written by [`save_lookup`], validating its structure.
pub fn load_lookup<R: Read>(mut reader: R) -> Result<PersistedLookup, PersistError> {
    let parameters = read_header(&mut reader, LOOKUP_MAGIC)?;
    let height = read_u32(&mut reader)?;
    let count = read_u32(&mut reader)? as usize;
    let mut nodes = Vec::with_capacity(count.min(PREALLOCATE_LIMIT));
    for index in 0..count {
        let bits = read_u32(&mut reader)?;
        let node =
            RegionNode::from_bits(bits).ok_or(CorruptDataError::InvalidNode { index, bits })?;
        nodes.push(node);
    }
    let lookup = RegionLookup::from_nodes(height, nodes)?;
    debug!(nodes = lookup.node_count(), %parameters, "loaded lookup");
    Ok(PersistedLookup { parameters, lookup })
}

/// Write a boundary region set and its parameters.
pub fn save_boundary_regions<W: Write>(
    mut writer: W,
    parameters: &BoundaryParameters,
    regions: &[RegionId],
) -> Result<(), PersistError> {
    write_header(&mut writer, REGIONS_MAGIC, parameters)?;
    write_len(&mut writer, regions.len())?;
    for region in regions {
        write_u32(&mut writer, region.x)?;
        write_u32(&mut writer, region.y)?;
    }
    writer.flush()?;
    debug!(regions = regions.len(), %parameters, "saved boundary regions");
    Ok(())
}

/// Read a region set written by [`save_boundary_regions`].
pub fn load_boundary_regions<R: Read>(mut reader: R) -> Result<PersistedRegions, PersistError> {
    let parameters = read_header(&mut reader, REGIONS_MAGIC)?;
    let count = read_u32(&mut reader)? as usize;
    let mut regions = Vec::with_capacity(count.min(PREALLOCATE_LIMIT));
    for _ in 0..count {
        let x = read_u32(&mut reader)?;
        let y = read_u32(&mut reader)?;
        regions.push(RegionId::new(x, y));
    }
    debug!(regions = regions.len(), %parameters, "loaded boundary regions");
    Ok(PersistedRegions {
        parameters,
        regions,
    })
}

fn write_header<W: Write>(
    writer: &mut W,
    magic: [u8; 4],
    parameters: &BoundaryParameters,
) -> Result<(), PersistError> {
    writer.write_all(&magic)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    write_u32(writer, parameters.vertical_power)?;
    write_u32(writer, parameters.max_iterations)
}

fn read_header<R: Read>(
    reader: &mut R,
    expected: [u8; 4],
) -> Result<BoundaryParameters, PersistError> {
    let mut found = [0; 4];
    reader.read_exact(&mut found)?;
    if found != expected {
        return Err(PersistError::BadMagic { expected, found });
    }
    let mut version = [0; 2];
    reader.read_exact(&mut version)?;
    let version = u16::from_le_bytes(version);
    if version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(version));
    }
    let vertical_power = read_u32(reader)?;
    if vertical_power > MAX_HEIGHT {
        return Err(CorruptDataError::VerticalPowerTooLarge(vertical_power).into());
    }
    Ok(BoundaryParameters {
        vertical_power,
        max_iterations: read_u32(reader)?,
    })
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<(), PersistError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<(), PersistError> {
    let len = u32::try_from(len).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "too many elements for a u32 count",
        )
    })?;
    write_u32(writer, len)
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, PersistError> {
    let mut bytes = [0; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}
