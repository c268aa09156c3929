use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use chrono::{Duration, Utc};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,           // user_id
    pub username: String,
    pub roles: Vec<String>, // 'ROLE_USER', 'ROLE_ADMIN'
    pub exp: i64,           // expiration timestamp
}

/// Génère un JWT signé HS256 pour un utilisateur et ses rôles
pub fn generate_token(
    secret: &str,
    expiration_hours: i64,
    user_id: i32,
    username: &str,
    roles: &[String],
) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(expiration_hours))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        roles: roles.to_vec(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie la signature et l'expiration, puis décode les claims
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}
