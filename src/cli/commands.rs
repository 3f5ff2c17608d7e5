//! CLI commands for the multi-sign console
//!
//! Offline helpers: input validation, quorum and fee arithmetic, seed
//! inspection, and management of the persisted signer registry.

use crate::config::ConsoleConfig;
use crate::core::{multisign_fee, Drops};
use crate::crypto::{detect_seed_format, is_valid_classic_address};
use crate::multisig::{
    add_signer, filled_entries, remove_signer, total_weight, validate_quorum, SignerEntry,
    SignerRegistry,
};
use crate::orchestrator::drafts_for;
use crate::storage::JsonFileStore;
use crate::validation::{validate_named, ActionKind, ValidationInputs};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn read_inputs(path: &Path) -> CliResult<ValidationInputs> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn open_registry(config: &ConsoleConfig) -> CliResult<SignerRegistry<JsonFileStore>> {
    let store = JsonFileStore::open(&config.store_path)?;
    Ok(SignerRegistry::new(Arc::new(store)))
}

/// Validate a JSON inputs file for `action`, returning every message
pub fn cmd_validate(action: &str, inputs_path: &Path) -> CliResult<Vec<String>> {
    let inputs = read_inputs(inputs_path)?;
    let errors = validate_named(&inputs, action)?;

    if errors.is_empty() {
        println!("✅ Inputs are valid for {}", action);
    } else {
        println!("❌ {} problem(s) for {}:", errors.len(), action);
        for (i, error) in errors.iter().enumerate() {
            let branch = if i + 1 == errors.len() { "└─" } else { "├─" };
            println!("   {} {}", branch, error);
        }
    }

    Ok(errors)
}

/// Print the transactions an action would send, without submitting
pub fn cmd_draft(action: &str, inputs_path: &Path) -> CliResult<()> {
    let kind: ActionKind = action.parse()?;
    let inputs = read_inputs(inputs_path)?;

    let errors = validate_named(&inputs, action)?;
    if !errors.is_empty() {
        println!("⚠️  Inputs are not valid: {}", errors.join("; "));
        return Ok(());
    }

    let drafts = drafts_for(kind, &inputs)?;
    if drafts.is_empty() {
        println!("📭 {} does not send a transaction", kind);
        return Ok(());
    }

    println!("📝 {} draft(s) for {}:", drafts.len(), kind);
    for draft in &drafts {
        println!();
        println!("   Type: {:?}", draft.transaction_type);
        if let Some(flags) = draft.flags {
            println!("   Flags: {:#010x}", flags);
        }
        if let Some(ticket) = draft.ticket_sequence {
            println!("   TicketSequence: {}", ticket);
        }
        if let Some(spend) = draft.spend {
            println!("   Spend: {} drops", spend);
        }
        println!("   {}", serde_json::to_string_pretty(&draft.fields)?);
    }

    Ok(())
}

/// Clamp a requested quorum against comma-separated weights
pub fn cmd_quorum(weights: &str, requested: u32) -> CliResult<u32> {
    let signers = weights
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(|w| {
            w.parse::<u16>()
                .map(|weight| SignerEntry::new("", "", weight))
                .map_err(|_| format!("Invalid signer weight: {}", w))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let quorum = validate_quorum(&signers, requested);

    println!("⚖️  Quorum");
    println!("   ├─ Total weight: {}", total_weight(&signers));
    println!("   ├─ Requested: {}", requested);
    println!("   └─ Effective: {}", quorum);

    Ok(quorum)
}

/// Fee for a transaction carrying `signers` signatures
pub fn cmd_fee(signers: usize, base: u64) -> CliResult<Drops> {
    let fee = multisign_fee(Drops::new(base), signers);

    println!("💸 Multi-sign fee");
    println!("   ├─ Base fee: {} drops", base);
    println!("   ├─ Signers: {}", signers);
    println!("   └─ Fee: {} drops", fee);

    Ok(fee)
}

/// Report the detected format of a seed
pub fn cmd_seed(value: &str) -> CliResult<()> {
    match detect_seed_format(value) {
        Ok(format) => println!("✅ Seed format: {}", format),
        Err(e) => println!("❌ Seed is invalid: {}", e),
    }
    Ok(())
}

/// List the signer entries stored for `address`
pub fn cmd_signers_list(config: &ConsoleConfig, address: &str) -> CliResult<Vec<SignerEntry>> {
    let registry = open_registry(config)?;
    let entries = registry.load(address)?;
    let filled = filled_entries(&entries);

    if filled.is_empty() {
        println!("📭 No signers stored for {}", address);
        return Ok(entries);
    }

    println!("👥 Signers for {} ({}):", address, filled.len());
    for (i, entry) in entries.iter().enumerate() {
        if entry.is_blank() {
            continue;
        }
        let seed = if entry.seed.is_empty() { "missing" } else { "stored" };
        println!(
            "   [{}] {} (weight {}, seed {})",
            i, entry.account, entry.weight, seed
        );
    }

    Ok(entries)
}

/// Append a signer to the stored list for `address`
pub fn cmd_signers_add(
    config: &ConsoleConfig,
    address: &str,
    signer: &str,
    seed: &str,
    weight: u16,
) -> CliResult<()> {
    if !is_valid_classic_address(signer) {
        return Err(format!("Invalid signer address: {}", signer).into());
    }

    let registry = open_registry(config)?;
    let mut entries = registry.load(address)?;

    // Fill the trailing blank slot before growing the list
    match entries.last_mut() {
        Some(last) if last.is_blank() => *last = SignerEntry::new(signer, seed, weight),
        _ => {
            add_signer(&mut entries)?;
            if let Some(last) = entries.last_mut() {
                *last = SignerEntry::new(signer, seed, weight);
            }
        }
    }

    registry.save(address, &entries)?;

    println!("✅ Added signer {} (weight {})", signer, weight);
    println!("   📁 Store: {:?}", config.store_path);
    Ok(())
}

/// Remove the signer at `index` from the stored list for `address`
pub fn cmd_signers_remove(config: &ConsoleConfig, address: &str, index: usize) -> CliResult<()> {
    let registry = open_registry(config)?;
    let mut entries = registry.load(address)?;

    match remove_signer(&mut entries, index) {
        Some(removed) => {
            registry.save(address, &entries)?;
            println!("✅ Removed signer {}", removed.account);
        }
        None => println!("⚠️  No removable signer at index {}", index),
    }

    Ok(())
}

/// Forget every stored signer for `address`
pub fn cmd_signers_clear(config: &ConsoleConfig, address: &str) -> CliResult<()> {
    let registry = open_registry(config)?;
    registry.remove(address)?;
    println!("🧹 Cleared stored signers for {}", address);
    Ok(())
}

/// Show the effective configuration
pub fn cmd_config_show(config: &ConsoleConfig) -> CliResult<()> {
    println!("🔧 Configuration");
    println!("   ├─ Environment: {:?}", config.environment);
    println!("   ├─ Validity window: {} ledgers", config.validity_window);
    println!("   ├─ Collection mode: {:?}", config.collection_mode);
    println!("   └─ Store: {:?}", config.store_path);
    Ok(())
}
