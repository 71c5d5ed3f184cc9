//! Level inspection tool.
//!
//! Usage:
//!   level-dump [--level N] [--seed N]   print one level as pretty JSON
//!   level-dump --all [--seed N]         one traversability line per level
//!
//! Exits with an error if any inspected level has an unbridged gap.

use anyhow::{anyhow, bail, Result};
use serde_json::json;

use super_capy::core::{check_traversable, parse_level_request, LevelCatalog};
use super_capy::types::LEVEL_COUNT;

struct Args {
    level: Option<String>,
    seed: u32,
    all: bool,
}

fn parse_args() -> Result<Args> {
    let mut out = Args {
        level: None,
        seed: 1,
        all: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--level" => {
                out.level = Some(args.next().ok_or_else(|| anyhow!("missing value for --level"))?)
            }
            "--seed" => {
                let raw = args.next().ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = raw
                    .parse()
                    .map_err(|_| anyhow!("invalid --seed value: {raw}"))?;
            }
            "--all" => out.all = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(out)
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let args = parse_args()?;
    let catalog = LevelCatalog::new(args.seed);

    if args.all {
        let mut failures = 0;
        for index in 0..catalog.level_count() {
            let level = catalog.level(index);
            let verdict = match check_traversable(&level) {
                Ok(()) => "ok".to_string(),
                Err(issue) => {
                    failures += 1;
                    issue.to_string()
                }
            };
            println!(
                "level {:>2}  width {:>5.0}  {:<9} {:>2} enemies  {:>2} bonuses  {}",
                index + 1,
                level.width,
                if level.underwater { "underwater" } else { level.direction.as_str() },
                level.enemies.len(),
                level.bonuses.len(),
                verdict
            );
        }
        if failures > 0 {
            bail!("{failures} of {LEVEL_COUNT} levels are not traversable");
        }
        return Ok(());
    }

    let index = parse_level_request(args.level.as_deref());
    let level = catalog.level(index);
    let verdict = check_traversable(&level);
    let report = json!({
        "level": index + 1,
        "seed": args.seed,
        "traversable": verdict.is_ok(),
        "issue": verdict.as_ref().err().map(|issue| issue.to_string()),
        "descriptor": level,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    verdict.map_err(|issue| anyhow!("level {} is not traversable: {issue}", index + 1))
}
