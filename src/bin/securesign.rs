use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use std::io::{self, Read};
use tracing::{error, info};

use securesign::{
    api::{DeleteOutcome, KeyId, KeyPolicy},
    SigningError, SigningResult,
};

#[derive(Parser, Debug)]
#[command(name = "securesign")]
#[command(about = "P-256 key lifecycle and ECDSA signature transcoding", version)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a DER ECDSA signature from stdin into 64-byte r||s hex
    Convert {
        /// Read stdin as hex text instead of raw bytes
        #[arg(long)]
        hex: bool,
    },

    /// Extract the 65-byte uncompressed point from a DER SubjectPublicKeyInfo on stdin
    PublicPoint {
        /// Read stdin as hex text instead of raw bytes
        #[arg(long)]
        hex: bool,
    },

    /// Generate, sign, verify and delete a key in an in-memory software store
    Demo {
        /// Identifier of the key pair
        #[arg(long, default_value = "demo-key")]
        key_id: String,

        /// Message to sign
        #[arg(long, default_value = "hello")]
        message: String,

        /// Gate the key behind user authentication (simulated before signing)
        #[arg(long)]
        require_auth: bool,
    },
}

struct DemoReport {
    public_point: String,
    signature: String,
    verified: bool,
    deleted: DeleteOutcome,
    exists_after: bool,
}

fn read_input(hex_input: bool) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .context("failed to read stdin")?;

    if !hex_input {
        return Ok(buf);
    }
    let text = String::from_utf8(buf).context("hex input is not UTF-8")?;
    hex::decode(text.trim()).context("invalid hex input")
}

fn fail(action: &str, err: SigningError) -> ! {
    error!("Failed to {} [{}]: {}", action, err.kind().code(), err);
    std::process::exit(1);
}

fn run_demo(key_id: &str, message: &[u8], require_auth: bool) -> SigningResult<DemoReport> {
    let id = KeyId::new(key_id)?;
    let policy = if require_auth {
        KeyPolicy::recommended()
    } else {
        KeyPolicy::default()
    };
    let manager = securesign::software_key_manager(policy);

    let handle = manager.fetch_or_create(&id)?;
    let point = handle.public_point()?;

    if require_auth {
        manager
            .store()
            .authenticate_user()
            .map_err(|fault| fault.classify(securesign::StoreOperation::Sign))?;
        info!("Simulated user authentication");
    }

    let signature = manager.sign(&handle, message)?;
    let verified = VerifyingKey::from_sec1_bytes(point.as_bytes())
        .and_then(|key| {
            let signature = Signature::from_slice(signature.as_bytes())?;
            key.verify(message, &signature)
        })
        .is_ok();

    let deleted = manager.delete(&id)?;
    let exists_after = manager.exists(&id)?;

    Ok(DemoReport {
        public_point: hex::encode(point.as_bytes()),
        signature: hex::encode(signature.as_bytes()),
        verified,
        deleted,
        exists_after,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Convert { hex: hex_input } => {
            let der = read_input(hex_input)?;
            match securesign::der_to_p1363(&der) {
                Ok(signature) => println!("{}", hex::encode(signature.as_bytes())),
                Err(e) => fail("convert signature", e),
            }
        }
        Commands::PublicPoint { hex: hex_input } => {
            let spki = read_input(hex_input)?;
            match securesign::extract_public_point(&spki) {
                Ok(point) => println!("{}", hex::encode(point.as_bytes())),
                Err(e) => fail("extract public point", e),
            }
        }
        Commands::Demo {
            key_id,
            message,
            require_auth,
        } => match run_demo(&key_id, message.as_bytes(), require_auth) {
            Ok(report) => {
                println!("key id: {}", key_id);
                println!("public point: {}", report.public_point);
                println!("signature: {}", report.signature);
                println!("verified: {}", report.verified);
                println!("delete: {}", report.deleted);
                println!("exists after delete: {}", report.exists_after);
            }
            Err(e) => fail("run demo", e),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;

    fn valid_der_hex() -> String {
        format!("30440220{}0220{}", "01".repeat(32), "02".repeat(32))
    }

    #[test]
    fn test_cli_version_parameter() {
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd.arg("--version").assert();
        assert.success();
    }

    #[test]
    fn test_cli_convert_hex() {
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd
            .arg("convert")
            .arg("--hex")
            .write_stdin(valid_der_hex())
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        assert_eq!(
            stdout.trim(),
            format!("{}{}", "01".repeat(32), "02".repeat(32))
        );
    }

    #[test]
    fn test_cli_convert_raw_bytes() {
        let der = hex::decode(valid_der_hex()).unwrap();
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd.arg("convert").write_stdin(der).assert().success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        assert_eq!(stdout.trim().len(), 128);
    }

    #[test]
    fn test_cli_convert_malformed_reports_code() {
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd
            .arg("convert")
            .arg("--hex")
            .write_stdin("3003020101")
            .assert()
            .failure();

        let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
        assert!(stderr.contains("invalidData"), "stderr: {}", stderr);
    }

    #[test]
    fn test_cli_public_point_hex() {
        let spki = format!(
            "3059301306072a8648ce3d020106082a8648ce3d03010703420004{}",
            "11".repeat(64)
        );
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd
            .arg("public-point")
            .arg("--hex")
            .write_stdin(spki)
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        assert_eq!(stdout.trim(), format!("04{}", "11".repeat(64)));
    }

    #[test]
    fn test_cli_demo() {
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd
            .arg("demo")
            .arg("--key-id")
            .arg("k1")
            .arg("--message")
            .arg("hello")
            .assert()
            .success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        assert!(stdout.contains("verified: true"), "stdout: {}", stdout);
        assert!(stdout.contains("delete: deleted"), "stdout: {}", stdout);
        assert!(stdout.contains("exists after delete: false"), "stdout: {}", stdout);
    }

    #[test]
    fn test_cli_demo_with_authentication() {
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd.arg("demo").arg("--require-auth").assert().success();

        let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
        assert!(stdout.contains("verified: true"), "stdout: {}", stdout);
    }

    #[test]
    fn test_cli_demo_empty_key_id() {
        let mut cmd = Command::cargo_bin("securesign").unwrap();
        let assert = cmd.arg("demo").arg("--key-id").arg("").assert().failure();

        let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
        assert!(stderr.contains("missingKey"), "stderr: {}", stderr);
    }
}
