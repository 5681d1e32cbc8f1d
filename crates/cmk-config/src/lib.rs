//! cmk-config
//!
//! Jurisdiction configuration for the credit transfer gate.
//!
//! Config is layered YAML: earlier documents are base, later documents
//! override. The merged document is canonicalized to JSON and SHA-256 hashed
//! so audit logs can pin exactly which configuration produced a decision.
//!
//! Typed extraction reads two keys:
//! - `/cashout/lockup_strategy` — `"NOT_ALLOWED" | "FORCE_CASHOUT" | "ALLOWED"`
//! - `/cashout/exempt_faults`   — list of fault keys exempt from cash-out
//!   blocking
//!
//! A missing `/cashout` section falls back to jurisdiction defaults; a
//! malformed one is a hard error. Absence of data is not an error, bad data
//! always is.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

use cmk_gate::LockupStrategy;
use cmk_signals::ExemptFaults;

/// Merged configuration plus its canonical hash.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    // Merge YAML docs in order: earlier docs are base, later docs override.
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // Compact serialization; merge order is deterministic given deterministic
    // input ordering, so the hash is stable for semantically equal configs.
    let s = serde_json::to_string(v).context("canonical json serialize failed")?;
    Ok(s)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    hex::encode(out)
}

// ---------------------------------------------------------------------------
// Typed gate configuration
// ---------------------------------------------------------------------------

/// Typed view of the gate's jurisdiction configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub lockup_strategy: LockupStrategy,
    pub exempt_faults: ExemptFaults,
}

impl GateConfig {
    /// Defaults used when `/cashout` is absent: cash-out permitted in
    /// lockup, standard exemption set.
    pub fn jurisdiction_defaults() -> Self {
        Self {
            lockup_strategy: LockupStrategy::Allowed,
            exempt_faults: ExemptFaults::standard(),
        }
    }

    /// Extract the gate config from a merged document.
    pub fn from_loaded(cfg: &LoadedConfig) -> Result<Self> {
        let Some(cashout) = cfg.config_json.pointer("/cashout") else {
            return Ok(Self::jurisdiction_defaults());
        };

        let lockup_strategy = match cashout.pointer("/lockup_strategy") {
            None | Some(Value::Null) => LockupStrategy::Allowed,
            Some(Value::String(s)) => parse_lockup_strategy(s)?,
            Some(other) => bail!(
                "CONFIG_BAD_LOCKUP_STRATEGY: expected string at /cashout/lockup_strategy, got {other}"
            ),
        };

        let exempt_faults = match cashout.pointer("/exempt_faults") {
            None | Some(Value::Null) => ExemptFaults::standard(),
            Some(Value::Array(items)) => {
                let mut keys: Vec<String> = Vec::with_capacity(items.len());
                for item in items {
                    let Some(s) = item.as_str() else {
                        bail!(
                            "CONFIG_BAD_EXEMPT_FAULTS: expected string entries at \
                             /cashout/exempt_faults, got {item}"
                        );
                    };
                    keys.push(s.to_string());
                }
                ExemptFaults::from_keys(keys)
            }
            Some(other) => bail!(
                "CONFIG_BAD_EXEMPT_FAULTS: expected array at /cashout/exempt_faults, got {other}"
            ),
        };

        Ok(Self {
            lockup_strategy,
            exempt_faults,
        })
    }
}

/// Parse a lockup strategy string. Unknown values are a hard error — a
/// misspelled strategy must not silently default to a permissive one.
fn parse_lockup_strategy(s: &str) -> Result<LockupStrategy> {
    match s {
        "NOT_ALLOWED" => Ok(LockupStrategy::NotAllowed),
        "FORCE_CASHOUT" => Ok(LockupStrategy::ForceCashout),
        "ALLOWED" => Ok(LockupStrategy::Allowed),
        other => bail!("CONFIG_BAD_LOCKUP_STRATEGY: unknown value {other:?}"),
    }
}
