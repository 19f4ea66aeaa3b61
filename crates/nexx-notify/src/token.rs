//! Request token computation

use digest::Digest;
use md5::Md5;

use nexx_core::types::EntityKind;

pub fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Token sent as `X-Request-Token`: MD5 over kind, installation ID and
/// shared secret, concatenated without separators.
pub fn request_token(kind: EntityKind, installation_id: &str, shared_secret: &str) -> String {
    md5_hex(format!("{}{}{}", kind, installation_id, shared_secret).as_bytes())
}
