use anyhow::{Context, Result, bail};
use std::collections::HashSet;

/// Seed used when no usable token is supplied.
pub const DEFAULT_SEED: u64 = 1337;

/// Resolved seed plus the token it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub source: String,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            source: seed.to_string(),
        }
    }

    #[must_use]
    pub fn from_token(seed: u64, token: &str) -> Self {
        Self {
            seed,
            source: token.to_string(),
        }
    }
}

/// Resolve a list of CLI seed arguments into seeds.
///
/// Supports decimal integers (negative values use their magnitude), `0x` hex
/// literals, and the keyword `random` which draws a fresh seed from the OS.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut resolved: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let info = parse_seed_token(token)?;
        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(resolved)
}

fn parse_seed_token(token: &str) -> Result<SeedInfo> {
    if token.eq_ignore_ascii_case("random") {
        return Ok(SeedInfo::from_token(rand::random::<u64>(), token));
    }

    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        let seed = u64::from_str_radix(&hex.replace('_', ""), 16)
            .with_context(|| format!("invalid hex seed: {token}"))?;
        return Ok(SeedInfo::from_token(seed, token));
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(SeedInfo::from_numeric(value));
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(SeedInfo::from_token(value.unsigned_abs(), token));
    }

    bail!("Unrecognized seed token: {token}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numeric_negative_and_hex() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xC0_FFEE"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![42, 7, 0x00C0_FFEE]);
        assert_eq!(seeds[2].source, "0xC0_FFEE");
    }

    #[test]
    fn duplicates_are_dropped() {
        let seeds = resolve_seed_inputs(&tokens(&["16", "0x10", "16"])).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].source, "16");
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(DEFAULT_SEED)]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xZZ"])).is_err());
    }

    #[test]
    fn random_keyword_yields_a_seed() {
        let seeds = resolve_seed_inputs(&tokens(&["RANDOM"])).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].source, "RANDOM");
    }
}
