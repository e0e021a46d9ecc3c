//! Rules loading from TOML files and command-line overrides.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use lawn_defense_core::Rules;

/// Values supplied on the command line that replace file settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) tick_ms: Option<u64>,
    pub(crate) level_seconds: Option<u64>,
}

impl Overrides {
    pub(crate) fn apply(self, rules: &mut Rules) {
        if let Some(seed) = self.seed {
            rules.rng_seed = seed;
        }
        if let Some(tick_ms) = self.tick_ms {
            rules.tick_interval_ms = tick_ms;
        }
        if let Some(seconds) = self.level_seconds {
            rules.level_duration_ms = seconds.saturating_mul(1_000);
        }
    }
}

/// Reads the rules file when one is given, then applies overrides.
pub(crate) fn load_rules(path: Option<&Path>, overrides: Overrides) -> Result<Rules> {
    let mut rules = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules file {}", path.display()))?;
            parse_rules(&contents)
                .with_context(|| format!("invalid rules file {}", path.display()))?
        }
        None => Rules::default(),
    };
    overrides.apply(&mut rules);
    validate(&rules)?;
    Ok(rules)
}

fn parse_rules(contents: &str) -> Result<Rules> {
    toml::from_str(contents).context("failed to parse rules toml contents")
}

fn validate(rules: &Rules) -> Result<()> {
    if rules.rows == 0 || rules.columns == 0 {
        bail!(
            "lawn must have at least one cell (received {}x{})",
            rules.rows,
            rules.columns
        );
    }
    if rules.tick_interval_ms == 0 {
        bail!("tick interval must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let mut rules = parse_rules("rng_seed = 1\ntick_interval_ms = 50\n").expect("valid toml");
        Overrides {
            seed: Some(9),
            tick_ms: None,
            level_seconds: Some(30),
        }
        .apply(&mut rules);

        assert_eq!(rules.rng_seed, 9);
        assert_eq!(rules.tick_interval_ms, 50);
        assert_eq!(rules.level_duration_ms, 30_000);
    }

    #[test]
    fn empty_lawns_are_rejected() {
        let rules = parse_rules("rows = 0").expect("valid toml");

        assert!(validate(&rules).is_err());
        assert!(validate(&Rules::default()).is_ok());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_rules(Some(Path::new("/nonexistent/rules.toml")), Overrides::default())
            .expect_err("file does not exist");

        assert!(format!("{error:#}").contains("/nonexistent/rules.toml"));
    }
}
