// Unit tests for the word-form similarity metrics.
//
// Tests the metric contract both modes share (range, symmetry, identity,
// missing forms) and the mode-specific behavior: exact edit-distance scores
// for written forms, notation-insensitivity for IPA.

use langprox::similarity::levenshtein;
use langprox::similarity::lexical::LexicalMetric;
use langprox::similarity::phonetic::{normalize_ipa, PhoneticMetric};
use langprox::similarity::traits::SimilarityMetric;
use langprox::similarity::MetricMode;

const WORDS: &[&str] = &["cat", "katze", "gato", "chat", "кошка", "猫", "Hund", "hound"];

// ============================================================
// Shared metric contract
// ============================================================

#[test]
fn scores_are_in_unit_range_and_symmetric() {
    for mode in MetricMode::ALL {
        let metric = mode.metric();
        for a in WORDS {
            for b in WORDS {
                let ab = metric.similarity(a, b);
                let ba = metric.similarity(b, a);
                assert!((0.0..=1.0).contains(&ab), "{mode}: {a}/{b} = {ab}");
                assert_eq!(ab, ba, "{mode}: {a}/{b} not symmetric");
            }
        }
    }
}

#[test]
fn identical_forms_score_one() {
    for mode in MetricMode::ALL {
        let metric = mode.metric();
        for w in WORDS {
            assert_eq!(metric.similarity(w, w), 1.0, "{mode}: {w}");
        }
    }
}

#[test]
fn missing_form_scores_zero_in_both_modes() {
    for mode in MetricMode::ALL {
        let metric = mode.metric();
        assert_eq!(metric.similarity_of(None, Some("cat")), 0.0);
        assert_eq!(metric.similarity_of(Some("cat"), None), 0.0);
        assert_eq!(metric.similarity_of(None, None), 0.0);
    }
}

#[test]
fn mode_names_match_suffixes() {
    for mode in MetricMode::ALL {
        assert_eq!(mode.metric().name(), mode.suffix());
        assert_eq!(mode.to_string().parse::<MetricMode>().unwrap(), mode);
    }
    assert!("semantic".parse::<MetricMode>().is_err());
}

// ============================================================
// Lexical: exact scores
// ============================================================

#[test]
fn cat_katze_is_point_four() {
    // c->k, insert z, insert e: 3 edits over a max length of 5
    let sim = LexicalMetric.similarity("cat", "katze");
    assert!((sim - 0.4).abs() < 1e-12);
}

#[test]
fn lexical_counts_characters_not_bytes() {
    assert_eq!(levenshtein::distance("кошка", "кошки"), 1);
    let sim = LexicalMetric.similarity("кошка", "кошки");
    assert!((sim - 0.8).abs() < 1e-12);
}

#[test]
fn lexical_is_case_sensitive() {
    assert!(LexicalMetric.similarity("Hund", "hund") < 1.0);
}

#[test]
fn lexical_completely_different_scores_zero() {
    assert_eq!(LexicalMetric.similarity("abc", "xyz"), 0.0);
}

#[test]
fn lexical_two_empty_strings_score_one() {
    assert_eq!(LexicalMetric.similarity("", ""), 1.0);
    assert_eq!(LexicalMetric.similarity("", "cat"), 0.0);
}

// ============================================================
// Phonetic: normalization
// ============================================================

#[test]
fn phonetic_ignores_stress_and_length() {
    assert_eq!(PhoneticMetric.similarity("ˈhʊnt", "hʊnt"), 1.0);
    assert_eq!(PhoneticMetric.similarity("kaːt", "kat"), 1.0);
}

#[test]
fn phonetic_merges_rhotics() {
    // French uvular vs English approximant r
    assert_eq!(PhoneticMetric.similarity("ʁoz", "ɹoz"), 1.0);
}

#[test]
fn phonetic_still_sees_real_differences() {
    let sim = PhoneticMetric.similarity("kat", "hʊnt");
    assert!(sim < 0.5, "got {sim}");
}

#[test]
fn phonetic_empty_transcriptions_score_zero() {
    assert_eq!(PhoneticMetric.similarity("", ""), 0.0);
    assert_eq!(PhoneticMetric.similarity("ˈ", "ˈ"), 0.0);
}

#[test]
fn normalize_drops_combining_marks() {
    // syllabic n (U+0329) and nasal tilde (U+0303)
    let normalized: String = normalize_ipa("bɔ̃n̩").into_iter().collect();
    assert_eq!(normalized, "bon");
}
