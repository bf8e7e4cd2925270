//! CLI command implementations

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use tapdealer_core::{
    derive_group_key, reconstruct_group_key, trusted_dealer_keygen, DealerOutput, PublicPackage,
    SecretSharePackage,
};

use crate::config::DealerConfig;

/// File holding the public half of a ceremony
pub const PUBLIC_FILE: &str = "public.json";

/// File holding the share of participant `id`
pub fn share_file_name(id: u16) -> String {
    format!("share-{}.json", id)
}

/// Tapdealer - trusted-dealer key shares for Taproot threshold signing
#[derive(Parser)]
#[command(name = "tapdealer")]
#[command(about = "Trusted-dealer Feldman VSS key generation for Taproot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file (defaults to $TAPDEALER_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a ceremony and write one file per participant
    Deal {
        /// Shares needed to sign
        #[arg(short, long)]
        threshold: Option<u16>,

        /// Number of participants
        #[arg(short = 'n', long)]
        participants: Option<u16>,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,
    },

    /// Verify a participant share file
    Verify {
        /// Share file written by `deal`
        #[arg(short, long)]
        share: PathBuf,

        /// Also check the share against this public package
        #[arg(short, long)]
        public: Option<PathBuf>,
    },

    /// Print the group key derived from a public package
    GroupKey {
        /// Public package written by `deal`
        #[arg(short, long)]
        public: PathBuf,
    },

    /// Reconstruct the group key from a subset of public shares
    Reconstruct {
        /// Public package written by `deal`
        #[arg(short, long)]
        public: PathBuf,

        /// Participant ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<u16>,
    },
}

/// Run the CLI
pub fn run(cli: Cli, config: &DealerConfig) -> Result<()> {
    match cli.command {
        Commands::Deal {
            threshold,
            participants,
            out_dir,
        } => {
            let threshold = threshold.unwrap_or(config.threshold);
            let participants = participants.unwrap_or(config.participants);

            let output = deal_with_retries(threshold, participants, config.max_attempts, &mut OsRng)?;
            let written = write_ceremony(&output, &out_dir, config.pretty)?;

            println!("✓ Dealt {}-of-{} key shares", threshold, participants);
            println!("  Group key (x-only): {}", output.group_key().xonly_hex());
            println!("  Output: {}", out_dir.display());
            println!("  Files: {}", written.len());
        }

        Commands::Verify { share, public } => {
            let package: SecretSharePackage = read_json(&share)?;
            if !package.verify() {
                bail!(
                    "share {} does not verify against its commitment",
                    package.id
                );
            }

            if let Some(public) = public {
                let public_package: PublicPackage = read_json(&public)?;
                check_share_matches_public(&package, &public_package)?;
            }

            println!("✓ Share {} is valid", package.id);
        }

        Commands::GroupKey { public } => {
            let package: PublicPackage = read_json(&public)?;
            let group_key = derive_group_key(&package.commitment)
                .context("failed to derive group key from commitment")?;

            println!("Group key:");
            println!("  x-only: {}", group_key.xonly_hex());
            println!("  compressed: {}", hex::encode(group_key.to_compressed_bytes()));
        }

        Commands::Reconstruct { public, ids } => {
            let package: PublicPackage = read_json(&public)?;
            if ids.len() < usize::from(package.threshold) {
                warn!(
                    "{} shares given, threshold is {}; the result will not be the group key",
                    ids.len(),
                    package.threshold
                );
            }

            let shares = package.select_shares(&ids)?;
            let reconstructed = reconstruct_group_key(&ids, &shares)
                .context("failed to reconstruct group key")?;
            let derived = derive_group_key(&package.commitment)?;

            println!("Reconstructed: {}", reconstructed.xonly_hex());
            println!("Derived:       {}", derived.xonly_hex());

            if reconstructed != derived {
                bail!("reconstructed key does not match the commitment");
            }
            println!("✓ Keys match");
        }
    }

    Ok(())
}

/// Run ceremonies until one succeeds or a non-retryable error occurs
pub fn deal_with_retries<R: RngCore + CryptoRng>(
    threshold: u16,
    participants: u16,
    max_attempts: u32,
    rng: &mut R,
) -> Result<DealerOutput> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match trusted_dealer_keygen(threshold, participants, rng) {
            Ok(output) => {
                debug!("Ceremony succeeded on attempt {}", attempt);
                return Ok(output);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!("Ceremony attempt {} failed: {}, retrying", attempt, e);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("key generation failed after {} attempt(s)", attempt)
                })
            }
        }
    }
}

/// Write `public.json` and one `share-<id>.json` per participant
pub fn write_ceremony(output: &DealerOutput, out_dir: &Path, pretty: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(output.shares().len() + 1);

    let public_path = out_dir.join(PUBLIC_FILE);
    let public = to_json(&PublicPackage::from_output(output), pretty)?;
    fs::write(&public_path, public)
        .with_context(|| format!("failed to write {}", public_path.display()))?;
    written.push(public_path);

    for share in output.shares() {
        let package = SecretSharePackage::for_participant(output, share.id())
            .context("share missing from dealer output")?;
        let path = out_dir.join(share_file_name(share.id()));
        write_secret(&path, &Zeroizing::new(to_json(&package, pretty)?))?;
        written.push(path);
    }

    info!("Wrote {} files to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Check that a share belongs to the ceremony described by `public`
pub fn check_share_matches_public(
    share: &SecretSharePackage,
    public: &PublicPackage,
) -> Result<()> {
    if share.commitment != public.commitment {
        bail!("share {} was dealt under a different commitment", share.id);
    }
    let expected = public.select_shares(&[share.id])?;
    if expected[0] != share.public_share {
        bail!("public share {} differs from the public package", share.id);
    }
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = Zeroizing::new(
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?,
    );
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn write_secret(path: &Path, content: &Zeroizing<String>) -> Result<()> {
    fs::write(path, content.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    // Share files are readable by the owner only (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}
