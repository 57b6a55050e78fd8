//! Binary encode/decode for the checkpoint format.
//!
//! All integers are little-endian. Vectors are length-prefixed with a
//! `u32` count. The format is intentionally simple — no compression,
//! no alignment padding, no self-describing schema.

use std::io::{Read, Write};

use ibis_core::Vec2;
use ibis_mesh::CellClass;

use crate::error::CheckpointError;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CheckpointError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CheckpointError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), CheckpointError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), CheckpointError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed scalar field (u32 count + f64 values).
pub fn write_f64_vec(w: &mut dyn Write, v: &[f64]) -> Result<(), CheckpointError> {
    write_u32_le(w, v.len() as u32)?;
    for &x in v {
        write_f64_le(w, x)?;
    }
    Ok(())
}

/// Write a length-prefixed vector field (u32 count + f64 pairs).
pub fn write_vec2_vec(w: &mut dyn Write, v: &[Vec2]) -> Result<(), CheckpointError> {
    write_u32_le(w, v.len() as u32)?;
    for x in v {
        write_f64_le(w, x[0])?;
        write_f64_le(w, x[1])?;
    }
    Ok(())
}

/// Write a length-prefixed classification (u32 count + tag bytes).
pub fn write_class_vec(w: &mut dyn Write, v: &[CellClass]) -> Result<(), CheckpointError> {
    write_u32_le(w, v.len() as u32)?;
    for &c in v {
        write_u8(w, class_tag(c))?;
    }
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, CheckpointError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, CheckpointError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, CheckpointError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, CheckpointError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a length-prefixed scalar field.
pub fn read_f64_vec(r: &mut dyn Read) -> Result<Vec<f64>, CheckpointError> {
    let len = read_u32_le(r)? as usize;
    let mut v = Vec::with_capacity(len);
    for _ in 0..len {
        v.push(read_f64_le(r)?);
    }
    Ok(v)
}

/// Read a length-prefixed vector field.
pub fn read_vec2_vec(r: &mut dyn Read) -> Result<Vec<Vec2>, CheckpointError> {
    let len = read_u32_le(r)? as usize;
    let mut v = Vec::with_capacity(len);
    for _ in 0..len {
        let x = read_f64_le(r)?;
        let y = read_f64_le(r)?;
        v.push([x, y]);
    }
    Ok(v)
}

/// Read a length-prefixed classification.
pub fn read_class_vec(r: &mut dyn Read) -> Result<Vec<CellClass>, CheckpointError> {
    let len = read_u32_le(r)? as usize;
    let mut v = Vec::with_capacity(len);
    for _ in 0..len {
        v.push(class_from_tag(read_u8(r)?)?);
    }
    Ok(v)
}

fn class_tag(c: CellClass) -> u8 {
    match c {
        CellClass::Fluid => 0,
        CellClass::Solid => 1,
        CellClass::Cut => 2,
    }
}

fn class_from_tag(tag: u8) -> Result<CellClass, CheckpointError> {
    match tag {
        0 => Ok(CellClass::Fluid),
        1 => Ok(CellClass::Solid),
        2 => Ok(CellClass::Cut),
        tag => Err(CheckpointError::UnknownClassTag { tag }),
    }
}
