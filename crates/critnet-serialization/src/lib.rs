// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # critnet Spike Record Serialization
//!
//! One file per sweep combination holding the sparse spike history of a run.
//!
//! ## Usage
//! ```ignore
//! use critnet_serialization::{load_spike_record, save_spike_record, SpikeRecord};
//!
//! let record = SpikeRecord::from_dense(key, Some(seed), spikes.view())?;
//! save_spike_record(&record, out_dir.join(record.key.file_name()))?;
//! let loaded = load_spike_record(path)?;
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

mod record;

pub use record::{RecordKey, SpikeRecord};

/// Spike record I/O errors
#[derive(Error, Debug)]
pub enum SpikeRecordError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: u32,
        expected_version: u32,
    },

    #[error("Invalid magic number: expected CRITSPK, got {0:?}")]
    InvalidMagic([u8; 7]),

    #[error("Checksum mismatch: file may be corrupted")]
    ChecksumMismatch,

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Record too large for u32 coordinates: {neurons} neurons × {steps} steps")]
    TooLarge { neurons: usize, steps: usize },

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, SpikeRecordError>;

/// Magic number for spike record files
const MAGIC: &[u8; 7] = b"CRITSPK";

/// Current format version
const FORMAT_VERSION: u32 = 1;

/// Extension used by [`RecordKey::file_name`]
pub const FILE_EXTENSION: &str = "spk";

const FLAG_COMPRESSED: u8 = 1;

/// Save a spike record, LZ4-compressed when the `compression` feature is on.
///
/// # Format
/// ```text
/// [Header]
/// - Magic: "CRITSPK" (7 bytes)
/// - Version: u32 LE
/// - Flags: u8 (bit 0: compressed)
/// - Uncompressed size: u64 LE
/// - Checksum: u64 LE (FNV-1a of the payload)
/// [Payload]
/// - bincode-serialized SpikeRecord, optionally LZ4 block-compressed
/// ```
pub fn save_spike_record<P: AsRef<Path>>(record: &SpikeRecord, path: P) -> Result<()> {
    record.check_bounds()?;
    let data =
        bincode::serialize(record).map_err(|e| SpikeRecordError::Serialization(e.to_string()))?;

    #[cfg(feature = "compression")]
    let (payload, flags, uncompressed_size) = {
        let original_size = data.len();
        let compressed = lz4::block::compress(&data, None, false)
            .map_err(|e| SpikeRecordError::Compression(e.to_string()))?;
        (compressed, FLAG_COMPRESSED, original_size as u64)
    };

    #[cfg(not(feature = "compression"))]
    let (payload, flags, uncompressed_size) = (data, 0u8, 0u64);

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(MAGIC)?;
    file.write_all(&FORMAT_VERSION.to_le_bytes())?;
    file.write_all(&[flags])?;
    file.write_all(&uncompressed_size.to_le_bytes())?;
    file.write_all(&calculate_checksum(&payload).to_le_bytes())?;
    file.write_all(&payload)?;
    file.flush()?;
    Ok(())
}

/// Load a spike record, decompressing if needed.
pub fn load_spike_record<P: AsRef<Path>>(path: P) -> Result<SpikeRecord> {
    let mut file = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 7];
    file.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(SpikeRecordError::InvalidMagic(magic));
    }

    let version = u32::from_le_bytes(read_array(&mut file)?);
    if version != FORMAT_VERSION {
        return Err(SpikeRecordError::VersionMismatch {
            file_version: version,
            expected_version: FORMAT_VERSION,
        });
    }

    let [flags] = read_array::<1>(&mut file)?;
    let uncompressed_size = u64::from_le_bytes(read_array(&mut file)?);
    let expected_checksum = u64::from_le_bytes(read_array(&mut file)?);

    let mut payload = Vec::new();
    file.read_to_end(&mut payload)?;
    if calculate_checksum(&payload) != expected_checksum {
        return Err(SpikeRecordError::ChecksumMismatch);
    }

    let data = if flags & FLAG_COMPRESSED != 0 {
        decompress(&payload, uncompressed_size)?
    } else {
        payload
    };

    let record: SpikeRecord = bincode::deserialize(&data)
        .map_err(|e| SpikeRecordError::Deserialization(e.to_string()))?;
    record.check_bounds()?;
    Ok(record)
}

#[cfg(feature = "compression")]
fn decompress(payload: &[u8], uncompressed_size: u64) -> Result<Vec<u8>> {
    let size = i32::try_from(uncompressed_size).map_err(|_| {
        SpikeRecordError::Compression(format!("uncompressed size {uncompressed_size} too large"))
    })?;
    lz4::block::decompress(payload, Some(size))
        .map_err(|e| SpikeRecordError::Compression(format!("Decompression failed: {}", e)))
}

#[cfg(not(feature = "compression"))]
fn decompress(_payload: &[u8], _uncompressed_size: u64) -> Result<Vec<u8>> {
    Err(SpikeRecordError::Compression(
        "File is compressed but compression feature is not enabled".to_string(),
    ))
}

fn read_array<const N: usize>(reader: &mut impl Read) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// FNV-1a hash of the payload
fn calculate_checksum(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
