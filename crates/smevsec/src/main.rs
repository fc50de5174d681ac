#![forbid(unsafe_code)]

//! smevsec CLI — sign and verify SOAP envelopes per the WS-Security
//! X.509 Token Profile.

use clap::{Parser, Subcommand};
use smevsec_core::{algorithm, ns, Error};
use smevsec_wsse::{verify_envelope, X509TokenProfile};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "smevsec",
    about = "WS-Security X.509 Token Profile signing for SMEV SOAP envelopes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a SOAP envelope
    Sign {
        /// Input envelope XML file
        envelope: PathBuf,

        /// Signer certificate (PEM)
        #[arg(long)]
        cert: PathBuf,

        /// Signer private key (PEM)
        #[arg(short, long)]
        key: PathBuf,

        /// Passphrase for an encrypted private key
        #[arg(long)]
        passphrase: Option<String>,

        /// Body digest method name
        #[arg(long, default_value = "sha1")]
        digest: String,

        /// SOAP actor the Security header is addressed to
        #[arg(long, default_value = ns::SMEV_ACTOR)]
        actor: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a signed SOAP envelope
    Verify {
        /// Input envelope XML file
        envelope: PathBuf,

        /// Expected signer certificate (PEM)
        #[arg(long)]
        cert: PathBuf,
    },

    /// List registered algorithm names
    ListAlgorithms,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sign {
            envelope,
            cert,
            key,
            passphrase,
            digest,
            actor,
            output,
        } => cmd_sign(envelope, cert, key, passphrase, digest, actor, output),

        Commands::Verify { envelope, cert } => cmd_verify(envelope, cert),

        Commands::ListAlgorithms => cmd_list_algorithms(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn cmd_sign(
    envelope: PathBuf,
    cert: PathBuf,
    key: PathBuf,
    passphrase: Option<String>,
    digest: String,
    actor: String,
    output: Option<PathBuf>,
) -> Result<(), Error> {
    let envelope_xml = read_file(&envelope)?;
    let cert_pem = read_file(&cert)?;
    let key_pem = std::fs::read(&key)?;

    let mut profile = X509TokenProfile::new(cert_pem, key_pem)
        .with_digest_method(digest)
        .with_actor(actor);
    if let Some(pwd) = passphrase {
        profile = profile.with_passphrase(pwd);
    }

    let signed = profile.apply(&envelope_xml)?;
    write_output(output, signed.as_bytes())
}

fn cmd_verify(envelope: PathBuf, cert: PathBuf) -> Result<(), Error> {
    let envelope_xml = read_file(&envelope)?;
    let cert_pem = read_file(&cert)?;

    match verify_envelope(&envelope_xml, &cert_pem) {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) if e.is_invalid_signature() || matches!(e, Error::Certificate(_)) => {
            eprintln!("INVALID: {e}");
            process::exit(1);
        }
        Err(e) => Err(e),
    }
}

fn cmd_list_algorithms() -> Result<(), Error> {
    println!("Digest methods:");
    for name in algorithm::digest_method_names() {
        println!("  {name}");
    }
    println!();
    println!("Signature methods:");
    for name in algorithm::signature_method_names() {
        println!("  {name}");
    }
    println!();
    println!("Canonicalization:");
    println!("  C14N 1.0 (±comments)");
    println!("  Exclusive C14N 1.0 (±comments)");
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn read_file(path: &PathBuf) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(Error::Io)
}

fn write_output(path: Option<PathBuf>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(p) => std::fs::write(&p, data).map_err(Error::Io),
        None => {
            use std::io::Write;
            std::io::stdout().write_all(data).map_err(Error::Io)
        }
    }
}
