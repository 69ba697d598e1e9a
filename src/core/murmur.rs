//! MurmurHash2
//!
//! 字符串点 ID 通过 MurmurHash2 映射到分区。

const M: u32 = 0x5bd1e995;
const R: u32 = 24;

/// 计算字节序列的 MurmurHash2
pub fn murmurhash2(data: &[u8], seed: u32) -> u32 {
    let mut h: u32 = seed ^ (data.len() as u32);
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M) ^ k;
    }

    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        h ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        h ^= tail[0] as u32;
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^ (h >> 15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(murmurhash2(b"player100", 0), murmurhash2(b"player100", 0));
        assert_ne!(murmurhash2(b"player100", 0), murmurhash2(b"player101", 0));
        assert_eq!(murmurhash2(b"", 0), 0);
    }
}
