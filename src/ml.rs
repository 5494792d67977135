//! Lexicon-based sentiment scoring for short comments.
//!
//! `LexiconScorer` produces a VADER-style compound score in `[-1, 1]`: word
//! valences are summed with booster, negation, contrast ("but") and
//! punctuation adjustments, then squashed with `s / sqrt(s² + 15)`.
//! On top of that, `adjust_polarity` applies fixed ±0.2 nudges for emoji and
//! phrases that the lexicon alone misreads in comment sections.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

/// Scores above this are positive, below its negation negative
pub const NEUTRAL_BAND: f64 = 0.05;

/// Shift applied per matched marker
pub const MARKER_WEIGHT: f64 = 0.2;

const NORMALIZATION_ALPHA: f64 = 15.0;
const BOOSTER_INCREMENT: f64 = 0.293;
const NEGATION_SCALAR: f64 = -0.74;
const CAPS_INCREMENT: f64 = 0.733;
const EXCLAMATION_INCREMENT: f64 = 0.292;

pub const POSITIVE_MARKERS: &[&str] = &["🔥", "😍", "🥳", "😃", "😊", "👍", "💯", "🥵", "uffffff"];
pub const NEGATIVE_MARKERS: &[&str] = &[
    "😡", "😠", "👎", "😢", "😞", "💔", "mad", "really mad", "killing", "no spiderman",
];

// Word valences on a -4..4 scale
static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    vec![
        // positive
        ("agree", 1.5), ("amazing", 2.8), ("awesome", 3.1), ("beautiful", 2.9),
        ("best", 3.2), ("better", 1.9), ("blessed", 2.9), ("brilliant", 2.8),
        ("classic", 1.2), ("cool", 1.3), ("cute", 2.0), ("enjoy", 2.2),
        ("enjoyed", 2.3), ("epic", 2.2), ("excellent", 2.7), ("excited", 1.4),
        ("fantastic", 2.6), ("favorite", 2.0), ("favourite", 2.0), ("fine", 0.8),
        ("fun", 2.3), ("funny", 1.9), ("glad", 2.0), ("good", 1.9),
        ("gorgeous", 3.0), ("great", 3.1), ("haha", 2.0), ("happy", 2.7),
        ("helpful", 1.8), ("hilarious", 1.7), ("hope", 1.9), ("impressive", 2.3),
        ("incredible", 1.7), ("inspiring", 2.4), ("interesting", 1.7), ("joy", 2.8),
        ("legend", 1.4), ("legendary", 2.2), ("like", 1.5), ("liked", 1.8),
        ("lol", 1.8), ("love", 3.2), ("loved", 2.9), ("lovely", 2.8),
        ("loving", 2.9), ("masterpiece", 3.1), ("nice", 1.8), ("ok", 1.2),
        ("okay", 0.9), ("perfect", 2.7), ("pretty", 2.2), ("proud", 2.1),
        ("recommend", 1.5), ("respect", 2.1), ("smart", 1.7),
        ("support", 1.7), ("sweet", 2.0), ("talented", 2.3), ("thank", 1.5),
        ("thanks", 1.9), ("underrated", 1.0), ("useful", 1.9), ("win", 2.8),
        ("wonderful", 2.7), ("wow", 2.8), ("yes", 1.7),
        // negative
        ("angry", -2.3), ("annoying", -1.7), ("awful", -2.0), ("bad", -2.5),
        ("boring", -1.3), ("broke", -1.8), ("cringe", -1.6), ("cry", -2.1),
        ("crying", -2.1), ("dead", -3.3), ("die", -2.9), ("disappointed", -1.9),
        ("disappointing", -2.2), ("disgusting", -2.4), ("dumb", -2.3), ("fail", -2.5),
        ("failed", -2.3), ("fake", -1.6), ("garbage", -1.9), ("hate", -2.7),
        ("hated", -3.2), ("horrible", -2.5), ("hurt", -2.4), ("kill", -3.7),
        ("killed", -3.5), ("killing", -3.4), ("lame", -1.8), ("mad", -2.2),
        ("miss", -1.2), ("no", -1.2), ("pain", -2.3), ("pathetic", -2.2),
        ("poor", -2.1), ("problem", -1.7), ("sad", -2.1), ("scam", -2.4),
        ("scary", -2.2), ("sorry", -0.3), ("stupid", -2.4), ("sucks", -1.5),
        ("terrible", -2.1), ("trash", -1.5), ("ugly", -2.3), ("unfortunately", -1.9),
        ("useless", -1.8), ("waste", -1.8), ("worse", -2.1), ("worst", -3.1),
        ("wrong", -2.1),
        // emoticons (matched before punctuation stripping)
        (":)", 2.0), (":-)", 2.0), (":d", 2.3), ("<3", 1.9), (":(", -1.9), (":-(", -1.9),
    ]
    .into_iter()
    .collect()
});

static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let up = [
        "absolutely", "completely", "deeply", "extremely", "fucking", "highly",
        "incredibly", "insanely", "really", "so", "super", "totally", "truly", "very",
    ];
    let down = ["barely", "hardly", "kinda", "kindof", "less", "little", "slightly", "somewhat"];
    up.into_iter()
        .map(|w| (w, BOOSTER_INCREMENT))
        .chain(down.into_iter().map(|w| (w, -BOOSTER_INCREMENT)))
        .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "not", "never", "none", "nothing", "nowhere", "neither", "nor", "cannot",
        "cant", "can't", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't",
        "isnt", "isn't", "wasnt", "wasn't", "arent", "aren't", "wont", "won't",
        "wouldnt", "wouldn't", "shouldnt", "shouldn't", "aint", "ain't", "without",
    ]
    .into_iter()
    .collect()
});

/// Sentiment bucket, also used as the aggregate verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn from_score(score: f64) -> Self {
        if score > NEUTRAL_BAND {
            Sentiment::Positive
        } else if score < -NEUTRAL_BAND {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Baseline lexical polarity, before marker adjustments.
pub trait PolarityScorer: Send + Sync {
    /// Compound score in `[-1, 1]`
    fn compound(&self, text: &str) -> f64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    fn token_valence(&self, tokens: &[&str], i: usize, mixed_case: bool) -> f64 {
        let raw = tokens[i];
        let word = normalize_token(raw);
        let valence = match LEXICON.get(raw.to_lowercase().as_str()) {
            Some(v) => *v,
            None => match LEXICON.get(word.as_str()) {
                Some(v) => *v,
                None => return 0.0,
            },
        };
        // "no" only carries valence when it stands alone, as in "no, just no"
        if word == "no"
            && i + 1 < tokens.len()
            && LEXICON.contains_key(normalize_token(tokens[i + 1]).as_str())
        {
            return 0.0;
        }

        let sign = valence.signum();
        let mut valence = valence;

        if mixed_case && is_shouting(raw) {
            valence += sign * CAPS_INCREMENT;
        }

        let mut negated = false;
        for distance in 1..=3 {
            if distance > i {
                break;
            }
            let prev = normalize_token(tokens[i - distance]);
            if let Some(boost) = BOOSTERS.get(prev.as_str()) {
                let damp = match distance {
                    1 => 1.0,
                    2 => 0.95,
                    _ => 0.9,
                };
                valence += sign * boost * damp;
            }
            if NEGATIONS.contains(prev.as_str()) {
                negated = true;
            }
        }
        if negated {
            valence *= NEGATION_SCALAR;
        }
        valence
    }
}

impl PolarityScorer for LexiconScorer {
    fn compound(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return 0.0;
        }
        let mixed_case = text.chars().any(char::is_lowercase) && tokens.iter().any(|t| is_shouting(t));

        let but_index = tokens.iter().position(|t| normalize_token(t) == "but");

        let mut sum = 0.0;
        for i in 0..tokens.len() {
            let mut valence = self.token_valence(&tokens, i, mixed_case);
            if let Some(b) = but_index {
                if i < b {
                    valence *= 0.5;
                } else if i > b {
                    valence *= 1.5;
                }
            }
            sum += valence;
        }

        if sum != 0.0 {
            let exclamations = text.chars().filter(|&c| c == '!').count().min(4) as f64;
            let questions = text.chars().filter(|&c| c == '?').count();
            let question_boost = match questions {
                0 | 1 => 0.0,
                2 | 3 => questions as f64 * 0.18,
                _ => 0.96,
            };
            sum += sum.signum() * (exclamations * EXCLAMATION_INCREMENT + question_boost);
        }

        normalize(sum)
    }
}

fn normalize(score: f64) -> f64 {
    let norm = score / (score * score + NORMALIZATION_ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}

fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .to_lowercase()
}

fn is_shouting(token: &str) -> bool {
    let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() > 1 && letters.iter().all(|c| c.is_uppercase())
}

/// Applies the emoji/phrase nudges to a baseline score.
///
/// Markers are plain substrings, so "madness" carries the "mad" nudge and
/// "really mad" carries both of its markers.
pub fn adjust_polarity(text: &str, base: f64) -> f64 {
    let positive = POSITIVE_MARKERS.iter().filter(|m| text.contains(*m)).count();
    let negative = NEGATIVE_MARKERS.iter().filter(|m| text.contains(*m)).count();
    base + (positive as f64 - negative as f64) * MARKER_WEIGHT
}

/// Polarity of every comment plus the three buckets, in input order.
#[derive(Debug, Clone, Default)]
pub struct SentimentBreakdown {
    pub polarity: Vec<f64>,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

impl SentimentBreakdown {
    pub fn total(&self) -> usize {
        self.positive.len() + self.negative.len() + self.neutral.len()
    }

    pub fn bucket(&self, sentiment: Sentiment) -> &[String] {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
            Sentiment::Neutral => &self.neutral,
        }
    }

    pub fn average_polarity(&self) -> f64 {
        if self.polarity.is_empty() {
            return 0.0;
        }
        self.polarity.iter().sum::<f64>() / self.polarity.len() as f64
    }
}

/// Scores one comment: lexical baseline plus marker adjustments.
pub fn score_comment(text: &str, scorer: &dyn PolarityScorer) -> f64 {
    adjust_polarity(text, scorer.compound(text))
}

pub fn analyze_sentiments<S: AsRef<str>>(
    comments: &[S],
    scorer: &dyn PolarityScorer,
) -> SentimentBreakdown {
    let mut breakdown = SentimentBreakdown::default();

    for comment in comments {
        let text = comment.as_ref();
        let score = score_comment(text, scorer);
        breakdown.polarity.push(score);
        match Sentiment::from_score(score) {
            Sentiment::Positive => breakdown.positive.push(text.to_string()),
            Sentiment::Negative => breakdown.negative.push(text.to_string()),
            Sentiment::Neutral => breakdown.neutral.push(text.to_string()),
        }
    }

    tracing::debug!(
        "🧠 Sentiment Analysis: {} comments scored, {} positive, {} negative, {} neutral",
        breakdown.total(),
        breakdown.positive.len(),
        breakdown.negative.len(),
        breakdown.neutral.len()
    );
    breakdown
}
