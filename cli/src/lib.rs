use anyhow::{Context, Result};
use encoding_rs::Encoding;
use engine::{ConfigFormat, Die, GameConfig, ProbabilityTable};
use std::{fs, path::Path};
use tracing_subscriber::EnvFilter;

/// Log to stderr so the game transcript on stdout stays readable.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a text file, honouring a UTF-8/UTF-16 byte-order mark.
pub fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

/// Merge the optional config file with command-line overrides and validate.
pub fn load_config(
    path: Option<&Path>,
    dice_args: &[String],
    seed: Option<u64>,
    rounds: Option<u32>,
) -> Result<GameConfig> {
    let mut cfg = match path {
        Some(path) => {
            let text = read_text_auto(path)?;
            GameConfig::parse(&text, ConfigFormat::from_path(path))
                .with_context(|| format!("loading {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if !dice_args.is_empty() {
        cfg.dice = GameConfig::dice_from_args(dice_args)?;
    }
    if seed.is_some() {
        cfg.seed = seed;
    }
    if let Some(rounds) = rounds {
        cfg.rounds = rounds;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Tab-separated grid, row die's chance of beating the column die, and a
/// line naming any die nothing beats.
pub fn render_table(table: &ProbabilityTable) -> String {
    let mut out = String::from("Probability Table:\n");
    for i in 0..table.len() {
        out.push('\t');
        out.push_str(&format!("Die {}", i));
    }
    out.push('\n');
    for (i, row) in table.rows().enumerate() {
        out.push_str(&format!("Die {}", i));
        for p in row {
            out.push('\t');
            out.push_str(&p.to_string());
        }
        out.push('\n');
    }
    let safe = table.undominated();
    if safe.is_empty() {
        out.push_str("No die dominates: every die is beaten by another one.\n");
    } else {
        let names: Vec<String> = safe.iter().map(|i| format!("Die {}", i)).collect();
        out.push_str(&format!("Not beaten by any other die: {}\n", names.join(", ")));
    }
    out
}

pub fn render_menu(dice: &[Die]) -> String {
    dice.iter()
        .enumerate()
        .map(|(i, d)| format!("{} - {}\n", i, d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice() -> Vec<Die> {
        GameConfig::dice_from_args(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap()
    }

    #[test]
    fn table_snapshot() {
        insta::assert_snapshot!(render_table(&ProbabilityTable::build(&dice())), @r"
        Probability Table:
        	Die 0	Die 1	Die 2
        Die 0	0.50	0.56	0.44
        Die 1	0.44	0.50	0.56
        Die 2	0.56	0.44	0.50
        No die dominates: every die is beaten by another one.
        ");
    }

    #[test]
    fn transitive_set_names_the_strongest_die() {
        let dice = GameConfig::dice_from_args(&["1,1,1", "5,5,5", "3,3,3"]).unwrap();
        let text = render_table(&ProbabilityTable::build(&dice));
        assert!(text.ends_with("Not beaten by any other die: Die 1\n"));
    }

    #[test]
    fn menu_lists_indices() {
        assert_eq!(
            render_menu(&dice()[..2]),
            "0 - [2,2,4,4,9,9]\n1 - [1,1,6,6,8,8]\n"
        );
    }

    #[test]
    fn args_override_config_and_are_validated() {
        let args = vec!["1,2".to_string(), "3".to_string()];
        assert!(load_config(None, &args, None, None).is_err());

        let args = vec!["1,2".to_string(), "3".to_string(), "4,4".to_string()];
        let cfg = load_config(None, &args, Some(9), Some(2)).unwrap();
        assert_eq!(cfg.dice.len(), 3);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.rounds, 2);
    }

    #[test]
    fn config_file_with_bom_is_read() {
        let dir = std::env::temp_dir().join(format!("fairdice-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dice.yaml");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"dice: [[1, 2], [3], [4, 5, 6]]\nseed: 4\n");
        fs::write(&path, bytes).unwrap();

        let cfg = load_config(Some(path.as_path()), &[], None, None).unwrap();
        assert_eq!(cfg.dice.len(), 3);
        assert_eq!(cfg.seed, Some(4));
        assert_eq!(cfg.rounds, 1);
        fs::remove_dir_all(&dir).unwrap();
    }
}
