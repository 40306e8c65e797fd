use std::collections::HashMap;

use serde::Serialize;

use crate::record::{AgeGroup, Record};
use crate::targets::{Direction, TargetConfig};

/// What a summary request is scoped to. A team scope computes per-player
/// summaries first and averages them, so a team is never dominated by its
/// most frequently tested player.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Player(&'a str),
    Team(&'a str),
}

/// Why a (scope, metric) group produced no summary row. These are expected
/// data conditions, not failures; callers skip the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No records match the scope and metric.
    EmptyGroup,
    /// Records match but none carries a usable value.
    NoUsableValues,
    /// Records match but none carries a date, so first/last are undefined.
    NoDatedRecords,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub scope: String,
    pub metric: String,
    pub age_group: AgeGroup,
    pub sessions: usize,
    pub first: f64,
    pub last: f64,
    pub best: f64,
    /// Sign-normalized: positive always means improvement, regardless of
    /// the metric's direction.
    pub growth: f64,
    pub goal: Option<f64>,
    pub goal_met: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummaryRow {
    pub team: String,
    pub metric: String,
    /// Players that contributed a summary row; players with no usable
    /// records for the metric are excluded from the means, not zeroed.
    pub players_counted: usize,
    pub mean_age: Option<f64>,
    pub first: f64,
    pub last: f64,
    pub best: f64,
    pub growth: f64,
    pub goal: Option<f64>,
    pub goal_met: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    /// 1-based ordinal rank. Ties get consecutive distinct ranks in input
    /// first-appearance order; ranks are never shared.
    pub rank: usize,
    pub player: String,
    pub team: String,
    pub age: Option<u32>,
    pub best_score: f64,
}

/// Leaderboard grouping key. `Player` collapses by name alone;
/// `PlayerTeamAge` keeps same-named players on different teams apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Player,
    PlayerTeamAge,
}

/// Summarize one (scope, metric) pair. Returns `None` when the group is
/// empty or unusable; the caller skips the row.
pub fn summarize(
    records: &[Record],
    scope: Scope<'_>,
    metric: &str,
    cfg: &TargetConfig,
) -> Option<SummaryRow> {
    match scope {
        Scope::Player(name) => summarize_player(records, name, metric, cfg).ok(),
        Scope::Team(team) => {
            let row = aggregate_team(records, team, metric, cfg)?;
            let sessions = records
                .iter()
                .filter(|r| r.team == team && r.metric == metric)
                .count();
            Some(SummaryRow {
                scope: row.team,
                metric: row.metric,
                age_group: row
                    .mean_age
                    .map(AgeGroup::from_mean_age)
                    .unwrap_or(AgeGroup::Unknown),
                sessions,
                first: row.first,
                last: row.last,
                best: row.best,
                growth: row.growth,
                goal: row.goal,
                goal_met: row.goal_met,
            })
        }
    }
}

/// Per-player summary with an inspectable skip reason.
pub fn summarize_player(
    records: &[Record],
    player: &str,
    metric: &str,
    cfg: &TargetConfig,
) -> Result<SummaryRow, SkipReason> {
    let group: Vec<&Record> = records
        .iter()
        .filter(|r| r.full_name == player && r.metric == metric)
        .collect();
    summarize_group(&group, player, metric, cfg)
}

fn summarize_group(
    group: &[&Record],
    scope: &str,
    metric: &str,
    cfg: &TargetConfig,
) -> Result<SummaryRow, SkipReason> {
    if group.is_empty() {
        return Err(SkipReason::EmptyGroup);
    }
    let dir = cfg.direction(metric);

    // Best considers every record, dated or not. First/last need an
    // ordering, so they only see dated records; equal dates keep input
    // order via the stable sort.
    let mut dated: Vec<&Record> = group.iter().copied().filter(|r| r.date.is_some()).collect();
    dated.sort_by_key(|r| r.date);
    if dated.is_empty() {
        return Err(SkipReason::NoDatedRecords);
    }

    let first = dated.iter().find_map(|r| r.average);
    let last = dated.iter().rev().find_map(|r| r.average);

    let mut best: Option<f64> = None;
    for r in group {
        let Some(v) = best_value(r, dir) else { continue };
        best = Some(match best {
            Some(b) if !beats(v, b, dir) => b,
            _ => v,
        });
    }

    let (Some(first), Some(last), Some(best)) = (first, last, best) else {
        return Err(SkipReason::NoUsableValues);
    };

    let growth = match dir {
        Direction::HigherBetter => best - first,
        Direction::LowerBetter => first - best,
    };

    let age_group = group[0].age_group();
    let goal = cfg.target(age_group, metric);
    let goal_met = goal.map(|g| match dir {
        Direction::HigherBetter => best >= g,
        Direction::LowerBetter => best <= g,
    });

    Ok(SummaryRow {
        scope: scope.to_string(),
        metric: metric.to_string(),
        age_group,
        sessions: group.len(),
        first,
        last,
        best,
        growth,
        goal,
        goal_met,
    })
}

/// Rank the best score per group for one metric, best first, truncated to
/// `top_n`. Fewer groups than `top_n` yields all of them; no records for
/// the metric yields an empty vec.
pub fn rank_leaderboard(
    records: &[Record],
    metric: &str,
    top_n: usize,
    group_by: GroupBy,
    cfg: &TargetConfig,
) -> Vec<LeaderboardRow> {
    struct Acc {
        player: String,
        team: String,
        age: Option<u32>,
        best: f64,
    }

    let dir = cfg.direction(metric);
    let mut groups: Vec<Acc> = Vec::new();
    let mut index: HashMap<(String, String, Option<u32>), usize> = HashMap::new();

    for r in records.iter().filter(|r| r.metric == metric) {
        // The leaderboard ranks session averages, matching the summary's
        // trend field rather than single-attempt spikes.
        let Some(v) = r.average else { continue };
        let key = match group_by {
            GroupBy::Player => (r.full_name.clone(), String::new(), None),
            GroupBy::PlayerTeamAge => (r.full_name.clone(), r.team.clone(), r.age),
        };
        match index.get(&key).copied() {
            Some(i) => {
                if beats(v, groups[i].best, dir) {
                    groups[i].best = v;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(Acc {
                    player: r.full_name.clone(),
                    team: r.team.clone(),
                    age: r.age,
                    best: v,
                });
            }
        }
    }

    // Stable sort: tied scores keep first-appearance order, then take
    // consecutive distinct ranks.
    match dir {
        Direction::LowerBetter => groups.sort_by(|a, b| a.best.total_cmp(&b.best)),
        Direction::HigherBetter => groups.sort_by(|a, b| b.best.total_cmp(&a.best)),
    }

    groups
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, g)| LeaderboardRow {
            rank: i + 1,
            player: g.player,
            team: g.team,
            age: g.age,
            best_score: g.best,
        })
        .collect()
}

/// Team aggregate for one metric: the mean of the per-player summary
/// fields. The goal is looked up once via the team's mean age, a coarser
/// approximation than per-player targets.
pub fn aggregate_team(
    records: &[Record],
    team: &str,
    metric: &str,
    cfg: &TargetConfig,
) -> Option<TeamSummaryRow> {
    let team_records: Vec<&Record> = records.iter().filter(|r| r.team == team).collect();
    if team_records.is_empty() {
        return None;
    }

    let mut players: Vec<&str> = Vec::new();
    for r in &team_records {
        if !players.contains(&r.full_name.as_str()) {
            players.push(&r.full_name);
        }
    }

    let mut rows: Vec<SummaryRow> = Vec::new();
    for player in players {
        let group: Vec<&Record> = team_records
            .iter()
            .copied()
            .filter(|r| r.full_name == player && r.metric == metric)
            .collect();
        if let Ok(row) = summarize_group(&group, player, metric, cfg) {
            rows.push(row);
        }
    }
    if rows.is_empty() {
        return None;
    }

    let n = rows.len() as f64;
    let first = rows.iter().map(|r| r.first).sum::<f64>() / n;
    let last = rows.iter().map(|r| r.last).sum::<f64>() / n;
    let best = rows.iter().map(|r| r.best).sum::<f64>() / n;
    let growth = rows.iter().map(|r| r.growth).sum::<f64>() / n;

    // Mean age over every team record with a known age, not just this
    // metric's records, matching how the team profile reports age.
    let ages: Vec<f64> = team_records
        .iter()
        .filter_map(|r| r.age.map(f64::from))
        .collect();
    let mean_age = if ages.is_empty() {
        None
    } else {
        Some(ages.iter().sum::<f64>() / ages.len() as f64)
    };

    let goal = mean_age.and_then(|age| cfg.target(AgeGroup::from_mean_age(age), metric));
    let goal_met = goal.map(|g| match cfg.direction(metric) {
        Direction::HigherBetter => best >= g,
        Direction::LowerBetter => best <= g,
    });

    Some(TeamSummaryRow {
        team: team.to_string(),
        metric: metric.to_string(),
        players_counted: rows.len(),
        mean_age,
        first,
        last,
        best,
        growth,
        goal,
        goal_met,
    })
}

/// Distinct metric names in first-appearance order, for view pickers.
pub fn metric_names(records: &[Record]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in records {
        if !out.iter().any(|m| m == &r.metric) {
            out.push(r.metric.clone());
        }
    }
    out
}

fn beats(candidate: f64, incumbent: f64, dir: Direction) -> bool {
    match dir {
        Direction::HigherBetter => candidate > incumbent,
        Direction::LowerBetter => candidate < incumbent,
    }
}

/// Canonical "best" field per record: the session bound for the metric's
/// direction, falling back to the session average when the bound is absent.
fn best_value(r: &Record, dir: Direction) -> Option<f64> {
    match dir {
        Direction::HigherBetter => r.highest.or(r.average),
        Direction::LowerBetter => r.lowest.or(r.average),
    }
}
