//! Browser query resolution.
//!
//! Supported forms, case-insensitive, separated by commas or `or`:
//! `defaults`, `last N versions`, `last N <browser> versions`,
//! `<browser> >= V` (and `>`, `<=`, `<`), `<browser> V`, `<browser> V1-V2`,
//! `<browser> all`, and `not <query>`.

use crate::agents::{Agent, AgentDatabase, BrowserTarget, version_number};
use crate::error::BrowsersError;
use core::iter;
use std::collections::BTreeSet;

const ALIASES: &[(&str, &str)] = &[
    ("fx", "firefox"),
    ("ff", "firefox"),
    ("ios", "ios_saf"),
    ("explorer", "ie"),
    ("blackberry", "bb"),
    ("explorermobile", "ie_mob"),
    ("operamini", "op_mini"),
    ("operamobile", "op_mob"),
    ("chromeandroid", "and_chr"),
    ("firefoxandroid", "and_ff"),
    ("ucandroid", "and_uc"),
    ("qqandroid", "and_qq"),
];

/// Query used when the caller does not provide one.
pub const DEFAULT_QUERY: &str = "last 2 versions";

#[derive(Clone, Copy)]
enum Comparison {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Self::Greater => left > right,
            Self::GreaterOrEqual => left >= right,
            Self::Less => left < right,
            Self::LessOrEqual => left <= right,
        }
    }
}

fn find_agent<'db>(db: &'db AgentDatabase, name: &str) -> Result<&'db Agent, BrowsersError> {
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, target)| *target);
    db.get(key)
        .or_else(|| db.iter().find(|agent| agent.browser.eq_ignore_ascii_case(name)))
        .ok_or_else(|| BrowsersError::UnknownBrowser(name.to_owned()))
}

fn targets<'agent>(
    agent: &'agent Agent,
    versions: impl Iterator<Item = &'agent str>,
) -> Vec<BrowserTarget> {
    versions
        .map(|version| BrowserTarget::new(agent.name.clone(), version))
        .collect()
}

fn parse_count(text: &str, query: &str) -> Result<usize, BrowsersError> {
    text.parse()
        .map_err(|_err| BrowsersError::UnknownQuery(query.to_owned()))
}

fn last_versions(
    db: &AgentDatabase,
    words: &[&str],
    query: &str,
) -> Result<Vec<BrowserTarget>, BrowsersError> {
    match words {
        [count, "versions" | "version"] => {
            let count = parse_count(count, query)?;
            Ok(db
                .iter()
                .flat_map(|agent| targets(agent, agent.last_versions(count)))
                .collect())
        }
        [count, browser, "versions" | "version"] => {
            let count = parse_count(count, query)?;
            let agent = find_agent(db, browser)?;
            Ok(targets(agent, agent.last_versions(count)))
        }
        _ => Err(BrowsersError::UnknownQuery(query.to_owned())),
    }
}

/// Find a released version, accepting `5.0` for `5` and `4.2` for `4.2-4.3`.
fn exact_version<'agent>(agent: &'agent Agent, version: &str) -> Option<&'agent str> {
    let wanted = version_number(version);
    agent
        .versions
        .iter()
        .find(|known| known.as_str() == version)
        .or_else(|| {
            agent
                .versions
                .iter()
                .find(|known| known.split('-').any(|part| part == version))
        })
        .or_else(|| {
            agent
                .versions
                .iter()
                .find(|known| {
                    !known.contains('-')
                        && !version.contains('-')
                        && wanted.is_some()
                        && version_number(known) == wanted
                })
        })
        .map(String::as_str)
}

fn compare_versions(
    agent: &Agent,
    comparison: Comparison,
    version: &str,
    query: &str,
) -> Result<Vec<BrowserTarget>, BrowsersError> {
    let bound = version_number(version).ok_or_else(|| BrowsersError::UnknownQuery(query.to_owned()))?;
    Ok(targets(
        agent,
        agent.versions.iter().map(String::as_str).filter(|known| {
            version_number(known).is_some_and(|number| comparison.holds(number, bound))
        }),
    ))
}

fn browser_query(
    db: &AgentDatabase,
    words: &[&str],
    query: &str,
) -> Result<Vec<BrowserTarget>, BrowsersError> {
    let (browser, rest) = words
        .split_first()
        .ok_or_else(|| BrowsersError::UnknownQuery(query.to_owned()))?;
    let agent = find_agent(db, browser)?;
    match rest {
        ["all"] => Ok(targets(agent, agent.versions.iter().map(String::as_str))),
        [">=", version] => compare_versions(agent, Comparison::GreaterOrEqual, version, query),
        [">", version] => compare_versions(agent, Comparison::Greater, version, query),
        ["<=", version] => compare_versions(agent, Comparison::LessOrEqual, version, query),
        ["<", version] => compare_versions(agent, Comparison::Less, version, query),
        [version] => {
            if let Some(known) = exact_version(agent, version) {
                return Ok(targets(agent, iter::once(known)));
            }
            if let Some((from, to)) = version.split_once('-') {
                let unknown = || BrowsersError::UnknownQuery(query.to_owned());
                let from = version_number(from).ok_or_else(unknown)?;
                let to = version_number(to).ok_or_else(unknown)?;
                return Ok(targets(
                    agent,
                    agent.versions.iter().map(String::as_str).filter(|known| {
                        version_number(known).is_some_and(|number| number >= from && number <= to)
                    }),
                ));
            }
            Err(BrowsersError::UnknownVersion {
                browser: agent.name.clone(),
                version: (*version).to_owned(),
            })
        }
        _ => Err(BrowsersError::UnknownQuery(query.to_owned())),
    }
}

/// Put spaces around comparison operators so `ie>=10` splits like `ie >= 10`.
fn spaced_operators(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 4);
    let mut chars = query.chars().peekable();
    while let Some(letter) = chars.next() {
        if letter == '>' || letter == '<' {
            out.push(' ');
            out.push(letter);
            if chars.peek() == Some(&'=') {
                out.push('=');
                chars.next();
            }
            out.push(' ');
        } else {
            out.push(letter);
        }
    }
    out
}

fn resolve_one(db: &AgentDatabase, query: &str) -> Result<Vec<BrowserTarget>, BrowsersError> {
    if query == "defaults" {
        return resolve_one(db, DEFAULT_QUERY);
    }
    if query.contains('%') || query.starts_with('>') || query.starts_with('<') {
        return Err(BrowsersError::UsageQuery(query.to_owned()));
    }
    let spaced = spaced_operators(query);
    let words: Vec<&str> = spaced.split_whitespace().collect();
    match words.as_slice() {
        ["last", rest @ ..] => last_versions(db, rest, query),
        _ => browser_query(db, &words, query),
    }
}

fn split_queries(queries: &[String]) -> Vec<String> {
    let mut parts = Vec::new();
    for query in queries {
        let lower = query.to_ascii_lowercase();
        for comma_part in lower.split(',') {
            for part in comma_part.split(" or ") {
                let part = part.trim();
                if !part.is_empty() {
                    parts.push(part.to_owned());
                }
            }
        }
    }
    parts
}

/// Resolve queries into a sorted, deduplicated browser selection.
///
/// `not` queries remove versions selected by earlier queries.
///
/// # Errors
/// Returns an error for unknown browsers, unknown versions or any query form
/// that is not supported, including usage-based queries such as `> 1%`.
pub fn resolve(db: &AgentDatabase, queries: &[String]) -> Result<Vec<BrowserTarget>, BrowsersError> {
    let mut selected = BTreeSet::new();
    for part in split_queries(queries) {
        if let Some(negated) = part.strip_prefix("not ") {
            for target in resolve_one(db, negated.trim())? {
                selected.remove(&target);
            }
        } else {
            selected.extend(resolve_one(db, &part)?);
        }
    }
    log::debug!("resolved {queries:?} into {} browser versions", selected.len());
    Ok(selected.into_iter().collect())
}
