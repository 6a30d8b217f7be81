//! Routing state CLI: the `rsr` command.
//!
//! Generates encrypted signing keys, signs routing state records, and
//! authenticates, inspects and compares records received from peers.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};

use routing_state::storage::{load_keypair, read_peer_id, save_keypair, write_atomic};
use routing_state::{Keypair, Multiaddr, RoutingStateBuilder, SignedRoutingState};

/// Environment variable consulted before prompting for a passphrase.
const PASSPHRASE_ENV: &str = "RSR_PASSPHRASE";

// ── Path helpers ──────────────────────────────────────────────────────────────

fn default_key_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set; pass --key explicitly")?;
    Ok(PathBuf::from(home)
        .join(".routing-state")
        .join("keys")
        .join("default.key"))
}

// ── Passphrase helper ─────────────────────────────────────────────────────────

fn read_passphrase(prompt: &str, confirm: bool) -> Result<String> {
    if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV) {
        log::debug!("using passphrase from {PASSPHRASE_ENV}");
        return Ok(passphrase);
    }

    let passphrase = prompt_line(prompt)?;
    if passphrase.is_empty() {
        bail!("passphrase cannot be empty");
    }
    if confirm && prompt_line("Confirm passphrase: ")? != passphrase {
        bail!("passphrases do not match");
    }
    Ok(passphrase)
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read passphrase")?;
    Ok(line.trim().to_string())
}

// ── Record file helpers ───────────────────────────────────────────────────────

/// Read a record file holding either raw envelope bytes or base64 text.
fn read_record(path: &Path) -> Result<SignedRoutingState> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let decoded = std::str::from_utf8(&bytes)
        .ok()
        .and_then(|text| STANDARD.decode(text.trim()).ok());
    let envelope_bytes = decoded.as_deref().unwrap_or(bytes.as_slice());

    SignedRoutingState::from_bytes(envelope_bytes)
        .with_context(|| format!("{} is not an authentic routing state record", path.display()))
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// Routing state CLI: sign and verify peer routing state records.
#[derive(Parser, Debug)]
#[command(
    name = "rsr",
    about = "Routing state record CLI",
    version,
    long_about = "rsr: routing state record CLI\n\nGenerate signing keys, publish signed records of a peer's\naddresses, and authenticate records received from other peers."
)]
struct Cli {
    /// Key file to use (default: ~/.routing-state/keys/default.key)
    #[arg(long, global = true)]
    key: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new encrypted signing key
    Keygen {
        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Print the peer id of the key file
    PeerId,

    /// Sign a routing state record for the key's peer id
    Build {
        /// Address to advertise, in order (e.g. /ip4/1.2.3.4/tcp/4001); may be omitted
        #[arg(long = "addr")]
        addrs: Vec<String>,

        /// Explicit sequence number (default: current time in nanoseconds)
        #[arg(long)]
        seq: Option<u64>,

        /// Write raw envelope bytes here (default: base64 to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Authenticate a record file and print its contents
    Inspect {
        /// Record file (raw envelope bytes or base64)
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Authenticate two records of the same peer and report which is newer
    Compare {
        /// First record file
        a: PathBuf,

        /// Second record file
        b: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let key = cli.key;
    let key_path = || match key.clone() {
        Some(path) => Ok(path),
        None => default_key_path(),
    };
    let verbose = cli.verbose;

    match cli.command {
        Commands::Keygen { force } => cmd_keygen(&key_path()?, force, verbose),
        Commands::PeerId => cmd_peer_id(&key_path()?),
        Commands::Build { addrs, seq, output } => {
            cmd_build(&key_path()?, &addrs, seq, output.as_deref(), verbose)
        }
        Commands::Inspect { file, json } => cmd_inspect(&file, json, verbose),
        Commands::Compare { a, b } => cmd_compare(&a, &b),
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `rsr keygen [--force]`
fn cmd_keygen(key_path: &Path, force: bool, verbose: bool) -> Result<()> {
    if key_path.exists() && !force {
        return Err(anyhow!(
            "key file already exists at {} (use --force to overwrite)",
            key_path.display()
        ));
    }

    let passphrase = read_passphrase("Enter passphrase for new key: ", true)?;
    let keypair = Keypair::generate();
    save_keypair(&keypair, key_path, &passphrase).context("failed to save key file")?;

    println!("Created key");
    println!("  Peer ID: {}", keypair.peer_id());
    println!("  File:    {}", key_path.display());
    if verbose {
        println!("  Public:  {:?}", keypair.public());
    }
    Ok(())
}

/// `rsr peer-id`
fn cmd_peer_id(key_path: &Path) -> Result<()> {
    let peer_id = read_peer_id(key_path)
        .with_context(|| format!("failed to read key file {}", key_path.display()))?;
    println!("{peer_id}");
    Ok(())
}

/// `rsr build --addr ADDR... [--seq N] [--output FILE]`
fn cmd_build(
    key_path: &Path,
    addrs: &[String],
    seq: Option<u64>,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let addresses = addrs
        .iter()
        .map(|a| {
            a.parse::<Multiaddr>()
                .with_context(|| format!("invalid address '{a}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let passphrase = read_passphrase("Enter passphrase: ", false)?;
    let keypair = load_keypair(key_path, &passphrase)
        .with_context(|| format!("failed to load key file {}", key_path.display()))?;

    let mut builder = RoutingStateBuilder::new(addresses);
    if let Some(seq) = seq {
        builder = builder.seq(seq);
    }
    let record = builder.sign(&keypair).context("failed to sign record")?;
    log::debug!("signed record for {} seq={}", record.peer_id(), record.seq());

    match output {
        Some(path) => {
            write_atomic(path, &record.marshal())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Signed record");
            println!("  Peer ID: {}", record.peer_id());
            println!("  Seq:     {}", record.seq());
            println!("  File:    {}", path.display());
            if verbose {
                for addr in record.addresses() {
                    println!("  Addr:    {addr}");
                }
            }
        }
        None => println!("{}", STANDARD.encode(record.marshal())),
    }
    Ok(())
}

/// `rsr inspect FILE [--json]`
fn cmd_inspect(file: &Path, json: bool, verbose: bool) -> Result<()> {
    let record = read_record(file)?;
    let summary = record.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Routing state record (authentic)");
    println!("  Peer ID: {}", summary.peer_id);
    println!("  Seq:     {}", summary.seq);
    if let Some(ref issued_at) = summary.issued_at {
        println!("  Issued:  {issued_at}");
    }
    if summary.addresses.is_empty() {
        println!("  Addrs:   (none)");
    }
    for addr in &summary.addresses {
        println!("  Addr:    {addr}");
    }
    if verbose {
        println!("  Type:    {}", summary.payload_type);
        println!("  Key:     {}", summary.public_key);
    }
    Ok(())
}

/// `rsr compare A B`
fn cmd_compare(a: &Path, b: &Path) -> Result<()> {
    let record_a = read_record(a)?;
    let record_b = read_record(b)?;

    if record_a.peer_id() != record_b.peer_id() {
        bail!(
            "records describe different peers ({} vs {})",
            record_a.peer_id(),
            record_b.peer_id()
        );
    }

    if record_a == record_b {
        println!("identical (seq {})", record_a.seq());
    } else if record_a.supersedes(&record_b) {
        println!("{} is newer (seq {} > {})", a.display(), record_a.seq(), record_b.seq());
    } else if record_b.supersedes(&record_a) {
        println!("{} is newer (seq {} > {})", b.display(), record_b.seq(), record_a.seq());
    } else {
        println!(
            "conflicting records with equal seq {}; neither supersedes the other",
            record_a.seq()
        );
    }
    Ok(())
}
