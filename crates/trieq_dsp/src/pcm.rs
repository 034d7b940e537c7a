//! 16-bit PCM helpers
//!
//! Buffers are little-endian signed 16-bit samples, interleaved by channel.

/// Bytes in one i16 sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// Full-scale divisor used for i16 <-> float conversion
const FULL_SCALE: f64 = 32768.0;

/// Bytes in one interleaved frame
#[inline]
pub fn frame_bytes(channels: usize) -> usize {
    BYTES_PER_SAMPLE * channels
}

/// Largest whole-frame prefix length of a buffer of `len` bytes
#[inline]
pub fn aligned_len(len: usize, channels: usize) -> usize {
    let frame = frame_bytes(channels);
    len - len % frame
}

/// i16 sample to normalised amplitude in [-1.0, 1.0)
#[inline]
pub fn sample_to_f64(sample: i16) -> f64 {
    f64::from(sample) / FULL_SCALE
}

/// Normalised amplitude back to i16, saturating instead of wrapping
///
/// NaN maps to 0; callers that care check finiteness first.
#[inline]
pub fn f64_to_sample(value: f64) -> i16 {
    // `as` saturates for out-of-range floats, the clamp makes the bound explicit
    (value * FULL_SCALE).round().clamp(-32768.0, 32767.0) as i16
}

#[inline]
pub fn read_sample(bytes: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
pub fn write_sample(bytes: &mut [u8], offset: usize, sample: i16) {
    bytes[offset..offset + BYTES_PER_SAMPLE].copy_from_slice(&sample.to_le_bytes());
}

/// Encode samples as little-endian bytes
pub fn to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Decode little-endian bytes into samples, ignoring a trailing odd byte
#[cfg(test)]
pub(crate) fn from_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        assert_eq!(aligned_len(0, 1), 0);
        assert_eq!(aligned_len(3, 1), 2);
        assert_eq!(aligned_len(4, 1), 4);
        assert_eq!(aligned_len(7, 2), 4);
        assert_eq!(aligned_len(8, 2), 8);
        assert_eq!(frame_bytes(2), 4);
    }

    #[test]
    fn test_conversion_is_lossless_for_every_sample() {
        for s in i16::MIN..=i16::MAX {
            assert_eq!(f64_to_sample(sample_to_f64(s)), s);
        }
    }

    #[test]
    fn test_saturation() {
        assert_eq!(f64_to_sample(1.0), i16::MAX);
        assert_eq!(f64_to_sample(4.0), i16::MAX);
        assert_eq!(f64_to_sample(-1.0), i16::MIN);
        assert_eq!(f64_to_sample(-4.0), i16::MIN);
        assert_eq!(f64_to_sample(f64::INFINITY), i16::MAX);
        assert_eq!(f64_to_sample(f64::NAN), 0);
    }

    #[test]
    fn test_little_endian_layout() {
        let bytes = to_bytes(&[1, -2, 0x1234]);
        assert_eq!(bytes, vec![0x01, 0x00, 0xFE, 0xFF, 0x34, 0x12]);
        assert_eq!(from_bytes(&bytes), vec![1, -2, 0x1234]);

        let mut out = vec![0u8; 4];
        write_sample(&mut out, 2, -2);
        assert_eq!(read_sample(&out, 2), -2);
    }

    #[test]
    fn test_odd_trailing_byte_ignored() {
        assert_eq!(from_bytes(&[0x01, 0x00, 0x7F]), vec![1]);
    }
}
