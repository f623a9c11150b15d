// Phonetic similarity over IPA transcriptions.
//
// Transcriptions are normalized before comparison so that notation detail
// (stress, length, tie bars, syllabic marks) and closely related symbols do
// not count as edits. The normalized strings are then compared with the same
// normalized Levenshtein formula as the lexical metric.
//
// Unlike the lexical metric, two forms that normalize to nothing score 0.0:
// an empty transcription carries no phonetic evidence.

use super::levenshtein;
use super::traits::SimilarityMetric;

#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneticMetric;

impl SimilarityMetric for PhoneticMetric {
    fn name(&self) -> &'static str {
        "phonetic"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = normalize_ipa(a);
        let b = normalize_ipa(b);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        levenshtein::normalized_similarity(&a, &b)
    }
}

/// Suprasegmental and linking marks that are stripped outright.
const STRIPPED: &[char] = &[
    'ˈ', // primary stress
    'ˌ', // secondary stress
    'ː', // long
    'ˑ', // half-long
    '‿', // undertie
    '.', // syllable break
];

/// Normalize an IPA transcription into a sequence of representative symbols.
pub fn normalize_ipa(ipa: &str) -> Vec<char> {
    ipa.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| !STRIPPED.contains(c) && !is_combining_mark(*c))
        .map(collapse_symbol)
        .collect()
}

/// Combining diacritics block: syllabic/non-syllabic marks, tie bars
/// (U+035C, U+0361), nasalization, and the rest.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Map related symbols onto one representative.
fn collapse_symbol(c: char) -> char {
    match c {
        'a' | 'ɑ' | 'ɐ' | 'æ' | 'ɒ' | 'ä' => 'a',
        'r' | 'ɾ' | 'ɹ' | 'ʁ' | 'ʀ' | 'ɽ' | 'ɻ' | 'ɺ' => 'r',
        'e' | 'ɛ' => 'e',
        'o' | 'ɔ' => 'o',
        'i' | 'ɪ' => 'i',
        'u' | 'ʊ' => 'u',
        'ɡ' => 'g',
        other => other,
    }
}
