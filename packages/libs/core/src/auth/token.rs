//! 토큰 발급 및 검증
//!
//! `subject_id|expiry|signature` 형식의 bearer 토큰을 다룹니다.
//!
//! - `expiry`: 만료 시각 (unix 초)
//! - `signature`: `subject_id|expiry`에 대한 HMAC-SHA256, hex 인코딩
//!
//! 토큰은 상태가 없습니다. 발급 기록을 남기지 않고, 검증도 Secret과
//! 시계 외에는 아무것도 참조하지 않으므로 임의 개수의 요청 태스크에서
//! 동시에 호출해도 안전합니다.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

/// 토큰 필드 구분자. subject_id에는 포함될 수 없습니다.
pub const DELIMITER: char = '|';

/// 토큰 유효 기간 (24시간, 호출별 조정 불가)
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// 토큰 발급기/검증기
///
/// Secret은 생성 시 주입되며 이후 변경되지 않습니다. 테스트에서는
/// 임의의 Secret으로 인스턴스를 만들어 사용합니다.
pub struct TokenAuthenticator {
    secret: Vec<u8>,
}

impl TokenAuthenticator {
    /// 새 인스턴스 생성
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// 토큰 발급
    ///
    /// 현재 시각 기준 24시간 뒤에 만료되는 토큰을 반환합니다.
    /// 같은 subject_id라도 호출 시각이 다르면 서로 다른 토큰이 나오며,
    /// 둘 다 독립적으로 유효합니다.
    pub fn issue(&self, subject_id: &str) -> Result<String> {
        self.issue_at(subject_id, Utc::now().timestamp())
    }

    /// 토큰 검증
    ///
    /// 성공 시 subject_id를 그대로 반환합니다. 반환된 id가 실제 계정에
    /// 대응하는지는 호출자가 확인해야 합니다.
    pub fn verify(&self, credential: &str) -> Result<String> {
        self.verify_at(credential, Utc::now().timestamp())
    }

    /// 지정한 시각 기준으로 토큰 발급
    pub fn issue_at(&self, subject_id: &str, now: i64) -> Result<String> {
        if subject_id.is_empty() || subject_id.contains(DELIMITER) {
            return Err(AuthError::InvalidSubject);
        }

        let expiry = now + TOKEN_TTL_SECS;
        let payload = format!("{subject_id}{DELIMITER}{expiry}");
        let signature = self.sign(&payload);

        Ok(format!("{payload}{DELIMITER}{signature}"))
    }

    /// 지정한 시각 기준으로 토큰 검증
    ///
    /// 검사는 순서대로 진행되며 첫 위반에서 즉시 실패합니다:
    ///
    /// 1. 구분자로 분리해 정확히 3개 필드가 아니면 `Malformed`
    /// 2. 앞 두 필드로 서명을 재계산해 불일치면 `Tampered`
    /// 3. 만료 시각이 정수로 파싱되지 않으면 `Malformed`
    /// 4. 만료 시각이 `now` 이하면 `Expired`
    ///
    /// 서명 검사가 만료 검사보다 먼저입니다. 만료 필드를 조작한 토큰은
    /// `Expired`가 아니라 `Tampered`로 거부됩니다.
    pub fn verify_at(&self, credential: &str, now: i64) -> Result<String> {
        let parts: Vec<&str> = credential.split(DELIMITER).collect();
        if parts.len() != 3 {
            return Err(AuthError::Malformed);
        }
        let (subject_id, expiry_raw, signature) = (parts[0], parts[1], parts[2]);

        // hex로 디코딩되지 않는 서명은 어떤 실제 서명과도 일치할 수 없음
        let presented = hex::decode(signature).map_err(|_| AuthError::Tampered)?;

        let payload = format!("{subject_id}{DELIMITER}{expiry_raw}");
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&presented)
            .map_err(|_| AuthError::Tampered)?;

        let expiry: i64 = expiry_raw.parse().map_err(|_| AuthError::Malformed)?;
        if expiry <= now {
            return Err(AuthError::Expired);
        }

        Ok(subject_id.to_string())
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC-SHA256은 임의 길이 키를 받으므로 실패하지 않음
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length")
    }
}
