use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

/// Hash un mot de passe avec PBKDF2-HMAC-SHA256
/// Format: pbkdf2:sha256:iterations$salt$hash (salt et hash en base64 URL-safe sans padding)
pub fn hash_password(password: &str) -> Result<String, String> {
    hash_with_iterations(password, ITERATIONS)
}

pub(crate) fn hash_with_iterations(password: &str, iterations: u32) -> Result<String, String> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut key)
        .map_err(|e| format!("PBKDF2 hash generation failed: {}", e))?;

    Ok(format!(
        "pbkdf2:sha256:{}${}${}",
        iterations,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    ))
}

/// Vérifie un mot de passe contre un hash stocké
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    let mut parts = stored_hash.split('$');
    let (Some(header), Some(salt_str), Some(hash_str), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err("Invalid hash format".to_string());
    };

    let iterations = match header.split(':').collect::<Vec<_>>().as_slice() {
        ["pbkdf2", "sha256", iterations] => iterations
            .parse::<u32>()
            .map_err(|_| "Invalid iterations".to_string())?,
        _ => return Err("Invalid header".to_string()),
    };

    let salt = URL_SAFE_NO_PAD
        .decode(salt_str)
        .map_err(|e| format!("Invalid salt: {}", e))?;
    let expected = URL_SAFE_NO_PAD
        .decode(hash_str)
        .map_err(|e| format!("Invalid hash: {}", e))?;

    let mut computed = vec![0u8; expected.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| format!("PBKDF2 hash verification failed: {}", e))?;

    Ok(constant_time_eq(&computed, &expected))
}

// Comparaison sans sortie anticipée
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_with_iterations("hunter22", 1000).unwrap();

        assert!(hash.starts_with("pbkdf2:sha256:1000$"));
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_with_iterations("same", 1000).unwrap();
        let b = hash_with_iterations("same", 1000).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
        assert!(verify_password("x", "md5:1$abc$def").is_err());
        assert!(verify_password("x", "pbkdf2:sha256:abc$abc$def").is_err());
    }
}
