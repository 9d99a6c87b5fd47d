//! Roland 7-bit checksum.
//!
//! The checksum byte makes the sum of the checked range (address and data)
//! plus the checksum itself a multiple of 128.

/// Checksum for `bytes`, always in `0..=127`.
pub fn checksum(bytes: &[u8]) -> u8 {
    let remainder = (sum(bytes) % 128) as u8;
    if remainder == 0 {
        0
    } else {
        128 - remainder
    }
}

/// Checks a range that ends with its checksum byte.
pub fn verify_checksum(data_including_checksum: &[u8]) -> bool {
    sum(data_including_checksum) % 128 == 0
}

fn sum(bytes: &[u8]) -> u32 {
    bytes.iter().map(|&b| u32::from(b)).sum()
}
