//! Deterministic English lemmatizer built from lookup tables and suffix rules.
//!
//! Pipeline per utterance:
//! 1. lowercase and normalize typographic apostrophes
//! 2. split on anything that is not alphanumeric or an apostrophe
//! 3. split clitics (`what's` -> `what` + `'s`, `don't` -> `do` + `n't`) and
//!    expand contractions typed without the apostrophe (`dont`, `youre`)
//! 4. map each piece through the irregular table, the protected list, or the
//!    ordered suffix rules
//!
//! The output is good enough for keyword routing, not for general NLP: it
//! errs towards leaving a word untouched rather than over-stripping it.

use super::Lemmatizer;

/// Clitic suffixes and the lemma each one stands for.
const CLITICS: &[(&str, &str)] = &[
    ("n't", "not"),
    ("'s", "be"),
    ("'m", "be"),
    ("'re", "be"),
    ("'ve", "have"),
    ("'ll", "will"),
    ("'d", "would"),
];

/// Contractions typed without an apostrophe, expanded to their lemmas.
///
/// Only forms that are not also ordinary words are listed (no `ill`, `were`,
/// `well`, `shed`).
const BARE_CONTRACTIONS: &[(&str, &[&str])] = &[
    ("dont", &["do", "not"]),
    ("doesnt", &["do", "not"]),
    ("didnt", &["do", "not"]),
    ("cant", &["can", "not"]),
    ("wont", &["will", "not"]),
    ("isnt", &["be", "not"]),
    ("arent", &["be", "not"]),
    ("wasnt", &["be", "not"]),
    ("werent", &["be", "not"]),
    ("havent", &["have", "not"]),
    ("hasnt", &["have", "not"]),
    ("couldnt", &["could", "not"]),
    ("shouldnt", &["should", "not"]),
    ("wouldnt", &["would", "not"]),
    ("im", &["i", "be"]),
    ("ive", &["i", "have"]),
    ("youre", &["you", "be"]),
    ("youll", &["you", "will"]),
    ("youve", &["you", "have"]),
    ("youd", &["you", "would"]),
    ("theyre", &["they", "be"]),
    ("whats", &["what", "be"]),
    ("thats", &["that", "be"]),
];

/// Words the suffix rules must leave alone.
const PROTECTED: &[&str] = &[
    "afterwards", "alias", "always", "anything", "atlas", "bed", "bias", "bred", "canvas",
    "ceiling", "chaos", "during", "evening", "everything", "feed", "hatred", "hundred", "indeed",
    "kindred", "lens", "mathematics", "morning", "naked", "need", "news", "nothing", "perhaps",
    "physics", "politics", "pudding", "red", "sacred", "seed", "series", "shed", "something",
    "sometimes", "species", "speed", "spring", "string", "towards", "wedding", "whereas",
    "wicked", "wretched", "yes",
];

/// Multi-syllable stems with these endings lost a silent `e` to the suffix.
const E_FINAL_ENDINGS: &[&str] = &["at", "ut", "iz", "iv", "ov", "ur"];

/// Irregular inflections.
fn irregular(word: &str) -> Option<&'static str> {
    let lemma = match word {
        "am" | "is" | "are" | "was" | "were" | "been" | "being" => "be",
        "has" | "had" | "having" => "have",
        "does" | "did" | "done" | "doing" => "do",
        "goes" | "went" | "gone" | "going" => "go",
        "woke" | "woken" => "wake",
        "shown" => "show",
        "said" | "says" => "say",
        "made" => "make",
        "got" | "gotten" => "get",
        "told" => "tell",
        "knew" | "known" => "know",
        "thought" => "think",
        "saw" | "seen" => "see",
        "came" => "come",
        "took" | "taken" => "take",
        "gave" | "given" => "give",
        "found" => "find",
        "felt" => "feel",
        "ran" => "run",
        "began" | "begun" => "begin",
        "bought" => "buy",
        "brought" => "bring",
        "kept" => "keep",
        "slept" => "sleep",
        "wrote" | "written" => "write",
        "spoke" | "spoken" => "speak",
        "forgot" | "forgotten" => "forget",
        "used" => "use",
        "adding" | "added" => "add",
        "opening" | "opened" => "open",
        "happening" | "happened" => "happen",
        "listening" | "listened" => "listen",
        "visiting" | "visited" => "visit",
        "funnier" | "funniest" => "funny",
        "movies" => "movie",
        "cookies" => "cookie",
        "men" => "man",
        "women" => "woman",
        "children" => "child",
        "feet" => "foot",
        "teeth" => "tooth",
        "mice" => "mouse",
        _ => return None,
    };
    Some(lemma)
}

/// Stems left over after splitting `n't` that are not words on their own.
fn negated_stem(stem: &str) -> Option<&'static str> {
    match stem {
        "ai" => Some("be"),
        "ca" => Some("can"),
        "wo" => Some("will"),
        "sha" => Some("shall"),
        _ => None,
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c)
}

fn vowel_groups(stem: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in stem.chars() {
        let v = is_vowel(c) || c == 'y';
        if v && !in_group {
            groups += 1;
        }
        in_group = v;
    }
    groups
}

/// Undo the spelling changes `-ing` / `-ed` make to a stem.
fn repair_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();

    // setting -> set, stopping -> stop; keep "tell", "miss", "buzz", "stuff"
    if n >= 3 && chars[n - 1] == chars[n - 2] && is_consonant(chars[n - 1]) {
        if !matches!(chars[n - 1], 'l' | 's' | 'z' | 'f') {
            return chars[..n - 1].iter().collect();
        }
        return stem.to_string();
    }

    // waking -> wake, joked -> joke (single syllable consonant-vowel-consonant)
    if n >= 3
        && is_consonant(chars[n - 3])
        && is_vowel(chars[n - 2])
        && is_consonant(chars[n - 1])
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
        && vowel_groups(stem) == 1
    {
        return format!("{stem}e");
    }

    // computing -> compute, organized -> organize
    if n >= 4
        && vowel_groups(stem) > 1
        && is_consonant(chars[n - 3])
        && E_FINAL_ENDINGS.iter().any(|ending| stem.ends_with(ending))
    {
        return format!("{stem}e");
    }

    stem.to_string()
}

/// Lemmatize a single lowercase word with no clitics attached.
fn lemmatize_word(word: &str) -> String {
    if let Some(lemma) = irregular(word) {
        return lemma.to_string();
    }
    if PROTECTED.contains(&word) || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return word.to_string();
    }

    let len = word.len();

    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..len - 3]);
    }
    if word.ends_with("sses") {
        return word[..len - 2].to_string();
    }
    if len > 4 && ["ches", "shes", "xes", "zes"].iter().any(|s| word.ends_with(s)) {
        return word[..len - 2].to_string();
    }
    if len > 3
        && word.ends_with('s')
        && !["ss", "us", "is"].iter().any(|s| word.ends_with(s))
    {
        return word[..len - 1].to_string();
    }

    if len >= 6 && word.ends_with("ing") {
        let stem = &word[..len - 3];
        if stem.chars().any(|c| is_vowel(c) || c == 'y') {
            return repair_stem(stem);
        }
        return word.to_string();
    }

    if len > 5 && word.ends_with("eed") {
        return word[..len - 1].to_string();
    }
    if len >= 5 && word.ends_with("ied") {
        return format!("{}y", &word[..len - 3]);
    }
    if len >= 5 && word.ends_with("ed") {
        let stem = &word[..len - 2];
        if stem.chars().any(is_vowel) {
            return repair_stem(stem);
        }
    }

    word.to_string()
}

/// Split a token into its word and trailing clitic (if any), each lemmatized.
fn lemmatize_token(token: &str, out: &mut Vec<String>) {
    if let Some((_, lemmas)) = BARE_CONTRACTIONS.iter().find(|(form, _)| *form == token) {
        out.extend(lemmas.iter().map(|l| (*l).to_string()));
        return;
    }

    for (suffix, clitic_lemma) in CLITICS {
        if token.len() > suffix.len() && token.ends_with(suffix) {
            let stem = &token[..token.len() - suffix.len()];
            let stem = stem.trim_matches('\'');
            if !stem.is_empty() {
                let negated = if *suffix == "n't" { negated_stem(stem) } else { None };
                match negated {
                    Some(lemma) => out.push(lemma.to_string()),
                    None => out.push(lemmatize_word(stem)),
                }
            }
            out.push((*clitic_lemma).to_string());
            return;
        }
    }
    out.push(lemmatize_word(token));
}

/// Rule-based English lemmatizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleLemmatizer;

impl RuleLemmatizer {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase the text and split it into raw tokens (clitics still attached).
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .replace(&['\u{2019}', '\u{2018}'][..], "'")
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, text: &str) -> Vec<String> {
        let mut lemmas = Vec::new();
        for token in Self::tokenize(text) {
            lemmatize_token(&token, &mut lemmas);
        }
        lemmas
    }
}
