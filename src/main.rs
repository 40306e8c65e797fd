use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use lcb_insights::ingest::load_records_csv;
use lcb_insights::record::Record;
use lcb_insights::summary::{
    GroupBy, Scope, aggregate_team, metric_names, rank_leaderboard, summarize,
};
use lcb_insights::targets::TargetConfig;

const USAGE: &str = "usage: lcb_insights <data.csv> <command> [...]
  player <full name>          per-metric summary for one player
  team <team>                 per-metric team aggregates
  leaderboard <metric> [n]    top-n best scores for a metric (n in 3..=30)
  metrics                     list metric names in the data
options: --targets <file.json>   override the built-in target table
         --grouped               leaderboard keyed by player+team+age
         --json                  print rows as JSON";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let as_json = take_flag(&mut args, "--json");
    let grouped = take_flag(&mut args, "--grouped");
    let targets_path = take_value(&mut args, "--targets")?;

    if args.len() < 2 {
        bail!("{USAGE}");
    }
    let data_path = PathBuf::from(&args[0]);
    let cfg = match targets_path {
        Some(path) => TargetConfig::load(Path::new(&path))?,
        None => TargetConfig::builtin(),
    };
    let records = load_records_csv(&data_path)?;

    match args[1].as_str() {
        "player" => {
            let name = args.get(2).context("player command needs a full name")?;
            run_summary(&records, Scope::Player(name), &cfg, as_json)
        }
        "team" => {
            let team = args.get(2).context("team command needs a team name")?;
            run_team(&records, team, &cfg, as_json)
        }
        "leaderboard" => {
            let metric = args.get(2).context("leaderboard command needs a metric")?;
            let top_n = args
                .get(3)
                .map(|raw| raw.parse::<usize>().context("top-n must be a number"))
                .transpose()?
                .unwrap_or(10)
                .clamp(3, 30);
            let group_by = if grouped {
                GroupBy::PlayerTeamAge
            } else {
                GroupBy::Player
            };
            run_leaderboard(&records, metric, top_n, group_by, &cfg, as_json)
        }
        "metrics" => {
            for metric in metric_names(&records) {
                println!("{metric}");
            }
            Ok(())
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

fn run_summary(
    records: &[Record],
    scope: Scope<'_>,
    cfg: &TargetConfig,
    as_json: bool,
) -> Result<()> {
    let rows: Vec<_> = metric_names(records)
        .iter()
        .filter_map(|metric| summarize(records, scope, metric, cfg))
        .collect();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("no summarizable records for that scope");
        return Ok(());
    }
    println!(
        "{:<20} {:>4} {:>8} {:>8} {:>8} {:>8} {:>8}  met",
        "metric", "n", "first", "last", "best", "growth", "goal"
    );
    for row in rows {
        println!(
            "{:<20} {:>4} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8}  {}",
            row.metric,
            row.sessions,
            row.first,
            row.last,
            row.best,
            row.growth,
            fmt_opt(row.goal),
            fmt_met(row.goal_met),
        );
    }
    Ok(())
}

fn run_team(records: &[Record], team: &str, cfg: &TargetConfig, as_json: bool) -> Result<()> {
    let rows: Vec<_> = metric_names(records)
        .iter()
        .filter_map(|metric| aggregate_team(records, team, metric, cfg))
        .collect();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("no summarizable records for team {team:?}");
        return Ok(());
    }
    println!(
        "{:<20} {:>7} {:>8} {:>8} {:>8} {:>8} {:>8}  met",
        "metric", "players", "first", "last", "best", "growth", "goal"
    );
    for row in rows {
        println!(
            "{:<20} {:>7} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8}  {}",
            row.metric,
            row.players_counted,
            row.first,
            row.last,
            row.best,
            row.growth,
            fmt_opt(row.goal),
            fmt_met(row.goal_met),
        );
    }
    Ok(())
}

fn run_leaderboard(
    records: &[Record],
    metric: &str,
    top_n: usize,
    group_by: GroupBy,
    cfg: &TargetConfig,
    as_json: bool,
) -> Result<()> {
    let rows = rank_leaderboard(records, metric, top_n, group_by, cfg);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("no records for metric {metric:?}");
        return Ok(());
    }
    println!("Top {} - {metric}", rows.len());
    for row in rows {
        println!(
            "{:>3}. {:<24} {:<16} {:>4} {:>8.2}",
            row.rank,
            row.player,
            row.team,
            row.age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            row.best_score
        );
    }
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn fmt_met(met: Option<bool>) -> &'static str {
    match met {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    match args.iter().position(|a| a == flag) {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    }
}

fn take_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if i + 1 >= args.len() {
        bail!("{flag} needs a value");
    }
    args.remove(i);
    Ok(Some(args.remove(i)))
}
