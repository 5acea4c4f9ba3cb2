//! Intent matching: deterministic keyword overlap, no fuzzy or learned scoring.
//!
//! A query is normalized into word tokens, each token is scored against a
//! pattern's intent keywords by bidirectional substring containment, a small
//! synonym table adds a bonus, and the best pattern is chosen with a
//! trend-tag tie-break.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::models::{MatchResult, Pattern};

/// Hand-authored synonym groups. A query token that is a group key or member
/// earns one extra point when the pattern's keywords contain the key or any member.
pub const SYNONYMS: &[(&str, &[&str])] = &[
    ("ml", &["machine", "learning", "model"]),
    ("ai", &["artificial", "intelligence", "smart"]),
    ("deploy", &["deployment", "host", "serve"]),
    ("frontend", &["web", "ui", "interface", "client"]),
    ("backend", &["api", "server", "service"]),
];

/// Normalize free text into lower-case word tokens.
///
/// Anything that is not an ASCII letter, digit, or whitespace becomes a space.
/// Tokens of a single character are dropped. Order and duplicates are kept.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.len() > 1)
        .map(String::from)
        .collect()
}

fn lowercase_keywords(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}

fn token_hits_keyword(token: &str, keyword: &str) -> bool {
    keyword.contains(token) || token.contains(keyword)
}

fn in_group(word: &str, key: &str, members: &[&str]) -> bool {
    word == key || members.contains(&word)
}

/// Score a query against one pattern.
///
/// Each token scores at most one point for a direct hit, plus one point per
/// synonym group it belongs to when the pattern's keywords also fall in that
/// group. A pattern without keywords always scores 0.
pub fn score(query: &str, pattern: &Pattern) -> usize {
    let tokens = normalize(query);
    if tokens.is_empty() || pattern.intent_keywords.is_empty() {
        return 0;
    }

    let keywords = lowercase_keywords(&pattern.intent_keywords);
    let mut total = 0;

    for token in &tokens {
        if keywords.iter().any(|k| token_hits_keyword(token, k)) {
            total += 1;
        }

        for (key, members) in SYNONYMS {
            if in_group(token, key, members) && keywords.iter().any(|k| in_group(k, key, members))
            {
                total += 1;
            }
        }
    }

    total
}

/// Compare two patterns by how many trend tags they carry.
/// `Greater` means `a` is the more specifically tagged one.
pub fn compare_tag_specificity(a: &Pattern, b: &Pattern) -> Ordering {
    a.trend_tags.len().cmp(&b.trend_tags.len())
}

/// Keywords of `keywords` hit by `tokens`, lower-cased, deduplicated, in the
/// order their first hitting token appears. Each token contributes at most
/// its first hit.
pub fn matched_keywords(tokens: &[String], keywords: &[String]) -> Vec<String> {
    let keywords = lowercase_keywords(keywords);
    let mut matched: Vec<String> = Vec::new();

    for token in tokens {
        if let Some(keyword) = keywords.iter().find(|k| token_hits_keyword(token, k)) {
            if !matched.contains(keyword) {
                matched.push(keyword.clone());
            }
        }
    }

    matched
}

/// Pick the best pattern for a query.
///
/// Strictly higher scores win. On an equal non-zero score the candidate with
/// more trend tags replaces the current best; otherwise the earlier one stays.
/// A zero score never produces a match.
pub fn find_best_match<'a>(query: &str, patterns: &'a [Pattern]) -> MatchResult<'a> {
    if query.is_empty() || patterns.is_empty() {
        return MatchResult::none();
    }

    let mut best: Option<&'a Pattern> = None;
    let mut best_score = 0;

    for candidate in patterns {
        let candidate_score = score(query, candidate);
        trace!(pattern = %candidate.id, score = candidate_score, "scored candidate");

        if candidate_score > best_score {
            best = Some(candidate);
            best_score = candidate_score;
        } else if candidate_score == best_score && candidate_score > 0 {
            if let Some(current) = best {
                if compare_tag_specificity(candidate, current) == Ordering::Greater {
                    best = Some(candidate);
                }
            }
        }
    }

    match best {
        Some(pattern) if best_score > 0 => {
            // Second pass, only for the winner, keeps `score` side-effect free.
            let matched = matched_keywords(&normalize(query), &pattern.intent_keywords);
            debug!(pattern = %pattern.id, score = best_score, "best intent match");
            MatchResult {
                pattern: Some(pattern),
                score: best_score,
                matched_keywords: matched,
                no_match: false,
            }
        }
        _ => MatchResult::none(),
    }
}
