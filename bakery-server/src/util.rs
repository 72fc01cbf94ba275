//! Password hashing and random secrets

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// `len` random bytes, hex encoded
pub fn random_hex(len: usize) -> String {
    hex::encode(random_bytes(len))
}

/// Printable random password from `len` random bytes (base64url, no padding)
pub fn random_password(len: usize) -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(len))
}

/// bcrypt hash, off the async runtime
pub async fn hash_password(password: String, cost: u32) -> Result<String, BoxError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// bcrypt comparison; malformed hashes never match
pub async fn verify_password(password: String, hash: String) -> bool {
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::warn!("Stored admin hash is not valid bcrypt: {e}");
            false
        }
        Err(e) => {
            tracing::error!("spawn_blocking join error: {e}");
            false
        }
    }
}
