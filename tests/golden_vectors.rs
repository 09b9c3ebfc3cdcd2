//! Golden test vector validation
//!
//! `testdata/golden-vectors.json` was produced outside this crate with an
//! independent PBKDF2-HMAC-SHA256 + AES-256-GCM implementation using the
//! same envelope layout as the browser version of textshield.

use anyhow::Result;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::Deserialize;
use textshield::entropy::ScriptedEntropy;
use textshield::{Shield, ShieldConfig};

#[derive(Debug, Deserialize)]
struct GoldenVector {
    plaintext: String,
    password: String,
    salt: String,
    nonce: String,
    iterations: u32,
    token: String,
    comment: String,
}

fn load_golden_vectors() -> Result<Vec<GoldenVector>> {
    let json_data = include_str!("../testdata/golden-vectors.json");
    let vectors: Vec<GoldenVector> = serde_json::from_str(json_data)?;
    Ok(vectors)
}

fn check_vector(i: usize, vector: &GoldenVector) -> Result<()> {
    let salt = BASE64_STANDARD.decode(&vector.salt)?;
    let nonce = BASE64_STANDARD.decode(&vector.nonce)?;
    anyhow::ensure!(salt.len() == 16, "salt must be 16 bytes, got {}", salt.len());
    anyhow::ensure!(nonce.len() == 12, "nonce must be 12 bytes, got {}", nonce.len());

    let config = ShieldConfig::default().with_iterations(vector.iterations);

    // Encryption with pinned salt and nonce reproduces the token exactly
    let scripted = Shield::with_entropy(config, ScriptedEntropy::salt_then_nonce(&salt, &nonce));
    let token = scripted.encrypt(&vector.plaintext, &vector.password)?;
    anyhow::ensure!(
        token == vector.token,
        "vector {} ({}): token mismatch\n  expected: {}\n  actual:   {}",
        i,
        vector.comment,
        vector.token,
        token
    );

    // Decryption of the reference token recovers the plaintext
    let decrypted = Shield::new(config).decrypt(&vector.token, &vector.password)?;
    anyhow::ensure!(
        decrypted == vector.plaintext,
        "vector {} ({}): plaintext mismatch",
        i,
        vector.comment
    );
    Ok(())
}

#[test]
fn test_golden_vectors() {
    let vectors = load_golden_vectors().expect("failed to load golden vectors");
    assert!(!vectors.is_empty(), "No golden vectors were tested");

    let failures: Vec<String> = vectors
        .iter()
        .enumerate()
        .filter_map(|(i, v)| check_vector(i, v).err().map(|e| format!("{:#}", e)))
        .collect();

    assert!(failures.is_empty(), "golden vectors failed:\n{}", failures.join("\n"));
}

#[test]
fn test_golden_vectors_reject_wrong_password() {
    let vectors = load_golden_vectors().expect("failed to load golden vectors");
    for vector in vectors.iter().filter(|v| v.iterations <= 1000) {
        let shield = Shield::new(ShieldConfig::default().with_iterations(vector.iterations));
        let wrong = format!("{}x", vector.password);
        assert!(
            shield.decrypt(&vector.token, &wrong).is_err(),
            "{}: wrong password accepted",
            vector.comment
        );
    }
}

/// A token with random salt and nonce at the default work factor, as the
/// browser version produces them, decrypts with the library defaults.
#[test]
fn test_browser_token() {
    let token = include_str!("../testdata/hello.txt.shield");
    let expected = include_str!("../testdata/hello.txt");
    assert_eq!(textshield::decrypt(token, "pass1234").unwrap(), expected);
}
