//! 비밀번호 해싱
//!
//! `hex(SHA-256(password || secret))` 형태의 단방향 해시입니다.
//! 비밀번호 강도 정책은 여기서 다루지 않습니다.

use sha2::{Digest, Sha256};

/// 비밀번호 해시 계산
pub fn hash_password(password: &str, secret: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(secret);
    hex::encode(hasher.finalize())
}

/// 비밀번호 검증
///
/// 저장된 해시와의 비교는 상수 시간으로 수행합니다.
pub fn verify_password(password: &str, secret: &[u8], stored_hash: &str) -> bool {
    let computed = hash_password(password, secret);
    constant_time_eq(computed.as_bytes(), stored_hash.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(
            hash_password("hunter2", SECRET),
            hash_password("hunter2", SECRET)
        );
    }

    #[test]
    fn test_verify_roundtrip() {
        let stored = hash_password("hunter2", SECRET);

        assert!(verify_password("hunter2", SECRET, &stored));
        assert!(!verify_password("hunter3", SECRET, &stored));
        assert!(!verify_password("hunter2", b"other-secret", &stored));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let stored = hash_password("hunter2", SECRET);
        assert_eq!(stored.len(), 64);
        assert!(stored.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
