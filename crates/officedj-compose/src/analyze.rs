//! Text analysis: tokenizing, keyword sampling, and hashing.

use std::sync::OnceLock;

use regex::Regex;

use crate::rng::{index, UnitRng};

/// Characters treated as separators during tokenization.
const SEPARATORS: &str = "[](){}<>.,!?/\\|:;\"'`~@#$%^&*+=_-";

/// Words shorter than this (in characters) are discarded.
const MIN_TOKEN_CHARS: usize = 2;

const LINE_BREAK_PATTERN: &str = r"(?i)<br\s*/?>";
const BRIGHTNESS_PATTERN: &str = r"(?i)LED|조명|빛|화이트|밝|깔끔";
const CALM_PATTERN: &str = r"(?i)빈|휴식|여유|편하게|유예|기간";

static LINE_BREAK_REGEX: OnceLock<Regex> = OnceLock::new();
static BRIGHTNESS_REGEX: OnceLock<Regex> = OnceLock::new();
static CALM_REGEX: OnceLock<Regex> = OnceLock::new();

fn line_break_regex() -> &'static Regex {
    LINE_BREAK_REGEX.get_or_init(|| Regex::new(LINE_BREAK_PATTERN).expect("invalid regex pattern"))
}

fn brightness_regex() -> &'static Regex {
    BRIGHTNESS_REGEX.get_or_init(|| Regex::new(BRIGHTNESS_PATTERN).expect("invalid regex pattern"))
}

fn calm_regex() -> &'static Regex {
    CALM_REGEX.get_or_init(|| Regex::new(CALM_PATTERN).expect("invalid regex pattern"))
}

/// Keyword classes matched against sampled words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    /// Light and cleanliness words.
    Brightness,
    /// Rest and free-time words.
    Calm,
}

impl KeywordClass {
    /// True if the word contains any keyword of this class (case-insensitive).
    pub fn matches(&self, word: &str) -> bool {
        match self {
            KeywordClass::Brightness => brightness_regex().is_match(word),
            KeywordClass::Calm => calm_regex().is_match(word),
        }
    }

    /// Number of words matching this class.
    pub fn count_hits<S: AsRef<str>>(&self, words: &[S]) -> usize {
        words.iter().filter(|w| self.matches(w.as_ref())).count()
    }
}

/// Splits explanation text into candidate keywords.
///
/// Line-break tags, digits, and punctuation become spaces; tokens shorter
/// than two characters are dropped.
///
/// # Example
/// ```
/// use officedj_compose::analyze::tokenize;
///
/// assert_eq!(tokenize("LED 조명 7개 설치"), vec!["LED", "조명", "설치"]);
/// assert!(tokenize("").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let without_breaks = line_break_regex().replace_all(text, " ");
    let cleaned: String = without_breaks
        .chars()
        .map(|c| {
            if c.is_ascii_digit() || SEPARATORS.contains(c) {
                ' '
            } else {
                c
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Draws up to `count` items without replacement.
///
/// Each draw removes `pool[floor(r * pool.len())]` from the remaining pool,
/// so the output order depends only on the rng stream.
pub fn sample_unique<T: Clone, R: UnitRng + ?Sized>(
    items: &[T],
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    let limit = count.min(pool.len());
    let mut picked = Vec::with_capacity(limit);
    for _ in 0..limit {
        let idx = index(pool.len(), rng);
        picked.push(pool.remove(idx));
    }
    picked
}

/// Samples six keywords from rich text, three otherwise.
pub fn sample_keywords<R: UnitRng + ?Sized>(words: &[String], rng: &mut R) -> Vec<String> {
    let desired = if words.len() >= 6 { 6 } else { 3 };
    sample_unique(words, desired, rng)
}

/// Polynomial string hash over UTF-16 code units.
///
/// `h = h * 31 + unit` with wrapping 32-bit arithmetic.
pub fn string_hash(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u32))
}

/// Counts maximal runs of ASCII digits.
pub fn count_numbers(text: &str) -> usize {
    let mut count = 0;
    let mut in_run = false;
    for c in text.chars() {
        let digit = c.is_ascii_digit();
        if digit && !in_run {
            count += 1;
        }
        in_run = digit;
    }
    count
}

/// Everything the analyzer extracts from one explanation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextAnalysis {
    /// Sampled keywords.
    pub words: Vec<String>,
    /// Tokens available before sampling.
    pub word_count: usize,
    /// Sampled words matching a brightness keyword.
    pub brightness_hits: usize,
    /// Sampled words matching a calm keyword.
    pub calm_hits: usize,
    /// Digit runs in the raw text.
    pub number_count: usize,
}

impl TextAnalysis {
    /// Tokenizes, samples, and counts hits; consumes rng draws for sampling only.
    pub fn analyze<R: UnitRng + ?Sized>(text: &str, rng: &mut R) -> Self {
        let tokens = tokenize(text);
        let words = sample_keywords(&tokens, rng);
        let brightness_hits = KeywordClass::Brightness.count_hits(&words);
        let calm_hits = KeywordClass::Calm.count_hits(&words);
        Self {
            word_count: tokens.len(),
            number_count: count_numbers(text),
            words,
            brightness_hits,
            calm_hits,
        }
    }
}
