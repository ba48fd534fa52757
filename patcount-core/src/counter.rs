//! Character counting under the three supported modes.
//!
//! Counts operate on raw codepoints; no normalization is applied before
//! classification.

use crate::types::CountMode;
use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled token classes for mixed-word counting
static LATIN_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]+").unwrap());
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{P}").unwrap());

/// True for codepoints in the three CJK Unified Ideograph ranges counted
/// by script-aware mode (base block, Extension A, Extension B).
fn is_cjk_ideograph(c: char) -> bool {
    matches!(c as u32, 0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0x20000..=0x2A6DF)
}

/// True for the base block and Extension A only. Mixed-word mode does not
/// count Extension B ideographs.
fn is_basic_cjk_ideograph(c: char) -> bool {
    matches!(c as u32, 0x4E00..=0x9FFF | 0x3400..=0x4DBF)
}

/// Count `text` under `mode`. Empty input returns 0 in every mode.
pub fn count(text: &str, mode: CountMode) -> u64 {
    if text.is_empty() {
        return 0;
    }
    match mode {
        CountMode::ScriptAware => text.chars().filter(|c| is_cjk_ideograph(*c)).count() as u64,
        CountMode::MixedWord => {
            let cjk = text.chars().filter(|c| is_basic_cjk_ideograph(*c)).count();
            let words = LATIN_WORD.find_iter(text).count();
            let numbers = DIGIT_RUN.find_iter(text).count();
            let punctuation = PUNCTUATION.find_iter(text).count();
            (cjk + words + numbers + punctuation) as u64
        }
        CountMode::All => text.chars().filter(|c| !c.is_whitespace()).count() as u64,
    }
}
