// Example demonstrating the key lifecycle as a library
//
// Run with: cargo run --example basic_signing
//
// Uses the in-memory software store; no hardware keystore is needed.

use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use securesign::api::{KeyId, KeyPolicy};

fn main() -> anyhow::Result<()> {
    println!("securesign Basic Signing Example");
    println!("================================\n");

    let manager = securesign::software_key_manager(KeyPolicy::default());
    let id = KeyId::new("example-key")?;

    println!("Creating key pair {}...", id);
    let handle = manager.fetch_or_create(&id)?;
    let point = handle.public_point()?;
    println!("✓ Key pair ready");
    println!("  Public point: {}\n", hex::encode(point.as_bytes()));

    let message = b"Hello, secure store!";
    println!("Signing message: {:?}", String::from_utf8_lossy(message));
    let signature = manager.sign(&handle, message)?;
    println!("✓ Message signed");
    println!("  Signature (r||s): {}\n", hex::encode(signature.as_bytes()));

    println!("Verifying signature...");
    let verifying_key = VerifyingKey::from_sec1_bytes(point.as_bytes())?;
    let signature = Signature::from_slice(signature.as_bytes())?;
    match verifying_key.verify(message, &signature) {
        Ok(()) => println!("✓ Signature verified successfully!"),
        Err(e) => println!("✗ Signature verification failed: {:?}", e),
    }

    println!("\nDeleting key pair: {}", manager.delete(&id)?);

    Ok(())
}
