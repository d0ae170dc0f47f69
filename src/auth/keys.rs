//! Signing-key set sourced from the identity provider's JWKS document.
//!
//! The key set is fetched once at startup and treated as immutable
//! configuration for the process lifetime. Only RSA keys are usable for
//! RS256 verification; other key types in the document are skipped.

use std::collections::HashMap;

use jsonwebtoken::DecodingKey;
use serde::Deserialize;

/// A single JSON Web Key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: Option<String>,
    #[serde(rename = "use")]
    pub key_use: Option<String>,
    pub alg: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
}

/// JSON Web Key Set, as served from `/.well-known/jwks.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Verification keys indexed by key id.
#[derive(Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, DecodingKey>,
}

impl KeySet {
    /// Build a key set from a parsed JWKS document.
    pub fn from_jwks(jwks: &Jwks) -> Self {
        let mut keys = HashMap::new();

        for jwk in &jwks.keys {
            if jwk.kty != "RSA" {
                tracing::debug!(kty = %jwk.kty, "skipping non-RSA key in JWKS");
                continue;
            }

            let (Some(kid), Some(n), Some(e)) = (&jwk.kid, &jwk.n, &jwk.e) else {
                tracing::warn!("skipping RSA key with missing kid/n/e in JWKS");
                continue;
            };

            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    keys.insert(kid.clone(), key);
                }
                Err(err) => {
                    tracing::warn!(kid = %kid, "skipping unusable RSA key: {}", err);
                }
            }
        }

        Self { keys }
    }

    /// Fetch and parse the JWKS document from the identity provider.
    pub async fn fetch(jwks_url: &str) -> anyhow::Result<Self> {
        tracing::info!(jwks_url = %jwks_url, "fetching signing keys");
        let jwks: Jwks = reqwest::get(jwks_url).await?.error_for_status()?.json().await?;
        Ok(Self::from_jwks(&jwks))
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for KeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySet")
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_N: &str = "-GJOmvPQzXsM7afpEVYvXXhBdKoAJcF_bS46SNty1_rUBNyWjh9crzE8czxGaNUcCVDp5H8eo96XrSxZyhpk6gygCVadVD64h02fatwiHEJUm9m5EX3c8wv1aDwJE8CtOjkSDV81dJgKSQ6aLEfc8IZd5yrMv22Hh9SqMPJVZUtHYvBEyRkp5byl4rZQZtlt8EAANQC_pzsuQxPmanUxApepNZhm1Uis_6jMfiuOfQHNpBtIJMdkD-2pvq0D_uoufvfqUtlfepftPAv0n8ZrVciwWsOOe-N9VaddJZg-bg4AnT6Ad8LBliRhyXzKGlaLHWdt7ln7LCkboNqZ_H-ANQ";

    fn test_jwks_json() -> String {
        format!(
            r#"{{"keys": [
                {{"kty": "RSA", "kid": "test-key-1", "use": "sig", "alg": "RS256", "n": "{TEST_N}", "e": "AQAB"}},
                {{"kty": "EC", "kid": "ec-key", "use": "sig", "alg": "ES256"}},
                {{"kty": "RSA", "use": "sig", "alg": "RS256"}}
            ]}}"#
        )
    }

    #[test]
    fn parses_jwks_document() {
        let jwks: Jwks = serde_json::from_str(&test_jwks_json()).unwrap();
        assert_eq!(jwks.keys.len(), 3);
        assert_eq!(jwks.keys[0].kid.as_deref(), Some("test-key-1"));
        assert_eq!(jwks.keys[0].key_use.as_deref(), Some("sig"));
    }

    #[test]
    fn keeps_only_usable_rsa_keys() {
        let jwks: Jwks = serde_json::from_str(&test_jwks_json()).unwrap();
        let keys = KeySet::from_jwks(&jwks);
        assert_eq!(keys.len(), 1);
        assert!(keys.get("test-key-1").is_some());
        assert!(keys.get("ec-key").is_none());
    }

    #[test]
    fn empty_jwks_gives_empty_key_set() {
        let jwks: Jwks = serde_json::from_str(r#"{"keys": []}"#).unwrap();
        assert!(KeySet::from_jwks(&jwks).is_empty());
    }
}
