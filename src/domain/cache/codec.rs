//! Byte layout of cached embeddings
//!
//! Each component is written as a little-endian IEEE-754 single precision
//! float, in vector order, so a payload is exactly `4 * dimension` bytes. An
//! empty vector encodes to an empty payload.

use crate::domain::DomainError;

const COMPONENT_BYTES: usize = std::mem::size_of::<f32>();

/// Encodes an embedding into its little-endian byte payload
pub fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(vector.len() * COMPONENT_BYTES);

    for component in vector {
        buf.extend_from_slice(&component.to_le_bytes());
    }

    buf
}

/// Decodes a payload produced by [`encode_embedding`]
pub fn decode_embedding(data: &[u8]) -> Result<Vec<f32>, DomainError> {
    if data.len() % COMPONENT_BYTES != 0 {
        return Err(DomainError::cache(format!(
            "Payload length {} is not a multiple of {}",
            data.len(),
            COMPONENT_BYTES
        )));
    }

    Ok(data
        .chunks_exact(COMPONENT_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
