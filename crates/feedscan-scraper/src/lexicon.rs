//! Lexicon scorer for short social-media comments.

/// Comment word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("love", 0.5),
    ("loved", 0.5),
    ("lovely", 0.4),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("beautiful", 0.5),
    ("gorgeous", 0.5),
    ("great", 0.4),
    ("good", 0.3),
    ("nice", 0.3),
    ("best", 0.5),
    ("perfect", 0.5),
    ("stunning", 0.5),
    ("cute", 0.3),
    ("wow", 0.3),
    ("congrats", 0.4),
    ("congratulations", 0.4),
    ("thanks", 0.3),
    ("thank", 0.3),
    ("fire", 0.3),
    ("obsessed", 0.4),
    ("incredible", 0.5),
    ("favourite", 0.4),
    ("favorite", 0.4),
    // Negative signals
    ("hate", -0.6),
    ("ugly", -0.5),
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("boring", -0.4),
    ("fake", -0.5),
    ("scam", -0.7),
    ("spam", -0.5),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("unfollow", -0.5),
    ("cringe", -0.4),
    ("sad", -0.3),
    ("trash", -0.6),
    ("overpriced", -0.4),
    ("rip", -0.2),
];

/// Emoji weights, matched per character.
pub(crate) const EMOJI_WEIGHTS: &[(char, f32)] = &[
    ('\u{2764}', 0.4),  // heavy black heart
    ('\u{1F60D}', 0.5), // heart eyes
    ('\u{1F525}', 0.3), // fire
    ('\u{1F44F}', 0.3), // clapping hands
    ('\u{1F64C}', 0.3), // raised hands
    ('\u{1F602}', 0.2), // tears of joy
    ('\u{1F970}', 0.5), // smiling face with hearts
    ('\u{1F44D}', 0.3), // thumbs up
    ('\u{1F621}', -0.5), // pouting face
    ('\u{1F92E}', -0.6), // vomiting face
    ('\u{1F44E}', -0.4), // thumbs down
    ('\u{1F612}', -0.3), // unamused face
    ('\u{1F622}', -0.2), // crying face
];

/// Polarity thresholds around zero.
const POLARITY_THRESHOLD: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

/// Score a text string using the comment lexicon.
///
/// Splits text into lowercase words, sums matching word and emoji weights,
/// and clamps the result to `[-1.0, 1.0]`. Returns `0.0` for empty or
/// unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|&&(lex_word, _)| w == lex_word) {
            score += weight;
        }
    }
    for c in text.chars() {
        if let Some(&(_, weight)) = EMOJI_WEIGHTS.iter().find(|&&(e, _)| c == e) {
            score += weight;
        }
    }
    score.clamp(-1.0, 1.0)
}

#[must_use]
pub fn classify(text: &str) -> Polarity {
    let score = lexicon_score(text);
    if score > POLARITY_THRESHOLD {
        Polarity::Positive
    } else if score < -POLARITY_THRESHOLD {
        Polarity::Negative
    } else {
        Polarity::Neutral
    }
}

/// True when `text` contains at least one emoji and nothing but emoji and
/// whitespace.
#[must_use]
pub fn is_emoji_only(text: &str) -> bool {
    let mut saw_emoji = false;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        match c {
            // Joiners and variation selectors ride along with a base emoji.
            '\u{200D}' | '\u{FE0E}' | '\u{FE0F}' => {}
            '\u{2600}'..='\u{27BF}' | '\u{1F000}'..='\u{1FAFF}' => saw_emoji = true,
            _ => return false,
        }
    }
    saw_emoji
}
