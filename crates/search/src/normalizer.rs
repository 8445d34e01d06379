//! Text normalization for complaint search
//!
//! Pipeline: lowercase → Unicode NFD → drop combining marks → punctuation
//!           to spaces → collapse whitespace
//!
//! Everything here is pure and locale-independent: the same input always
//! produces the same output, so index keys built at one time match query
//! keys produced at another.

use rustc_hash::FxHashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// N-gram length used when nothing else is configured.
pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// Characters kept by normalization; everything else becomes a separator.
#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Normalize text for indexing and lookup.
///
/// 1. Lowercase
/// 2. Canonical decomposition (NFD)
/// 3. Remove combining marks (accents, cedillas, tildes)
/// 4. Replace non-word characters with spaces
/// 5. Collapse runs of whitespace and trim
///
/// Empty or whitespace-only input yields an empty string. Normalizing an
/// already normalized string returns it unchanged.
///
/// # Example
///
/// ```
/// use triage_search::normalizer::normalize;
///
/// assert_eq!(normalize("  Dor de Cabeça! "), "dor de cabeca");
/// ```
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if is_word_char(c) { c } else { ' ' })
        .collect();

    let mut out = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Split normalized text into tokens on UAX#29 word boundaries.
///
/// Zero-length pieces are discarded. The result is an owned list, so it can
/// be iterated any number of times.
///
/// # Example
///
/// ```
/// use triage_search::normalizer::tokenize;
///
/// assert_eq!(tokenize("dor no peito"), vec!["dor", "no", "peito"]);
/// ```
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .unicode_words()
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate, keeping first-occurrence order.
///
/// # Example
///
/// ```
/// use triage_search::normalizer::tokenize_unique;
///
/// assert_eq!(tokenize_unique("dor dor peito"), vec!["dor", "peito"]);
/// ```
pub fn tokenize_unique(normalized: &str) -> Vec<String> {
    let mut seen = FxHashSet::default();
    tokenize(normalized)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Distinct character n-grams of a token.
///
/// Windows are counted in characters, not bytes, so accented input that
/// slipped past normalization cannot split a code point. A token shorter
/// than `n` is its own single n-gram; an empty token or `n == 0` has none.
///
/// # Example
///
/// ```
/// use triage_search::normalizer::generate_ngrams;
///
/// assert_eq!(generate_ngrams("tosse", 3), vec!["tos", "oss", "sse"]);
/// assert_eq!(generate_ngrams("ta", 3), vec!["ta"]);
/// ```
pub fn generate_ngrams(token: &str, n: usize) -> Vec<String> {
    if n == 0 || token.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = token.chars().collect();
    if chars.len() < n {
        return vec![token.to_string()];
    }

    let mut seen = FxHashSet::default();
    chars
        .windows(n)
        .map(|w| w.iter().collect::<String>())
        .filter(|gram| seen.insert(gram.clone()))
        .collect()
}

/// N-grams of every token of a piece of raw text, deduplicated.
///
/// Used on the query side: a user's partial input is normalized and
/// tokenized exactly like indexed text before its n-grams are looked up.
pub fn ngrams_for_text(text: &str, n: usize) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut grams = Vec::new();
    for token in tokenize(&normalize(text)) {
        for gram in generate_ngrams(&token, n) {
            if seen.insert(gram.clone()) {
                grams.push(gram);
            }
        }
    }
    grams
}
