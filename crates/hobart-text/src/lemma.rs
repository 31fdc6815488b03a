//! Rule-based verb lemmatization.
//!
//! Maps inflected verb forms to base forms with an irregular-form table
//! and ordered orthographic suffix rules. Best effort: a word matching
//! no rule passes through unchanged, and lemmatization is idempotent on
//! its own outputs.

use std::collections::HashMap;

/// Irregular inflections, checked before any suffix rule.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("going", "go"),
    ("said", "say"),
    ("saying", "say"),
    ("got", "get"),
    ("gotten", "get"),
    ("made", "make"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("took", "take"),
    ("taken", "take"),
    ("undertook", "undertake"),
    ("undertaken", "undertake"),
    ("saw", "see"),
    ("seen", "see"),
    ("seeing", "see"),
    ("foresaw", "foresee"),
    ("foreseen", "foresee"),
    ("came", "come"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("told", "tell"),
    ("became", "become"),
    ("shown", "show"),
    ("left", "leave"),
    ("felt", "feel"),
    ("brought", "bring"),
    ("began", "begin"),
    ("begun", "begin"),
    ("kept", "keep"),
    ("held", "hold"),
    ("withheld", "withhold"),
    ("wrote", "write"),
    ("written", "write"),
    ("stood", "stand"),
    ("understood", "understand"),
    ("heard", "hear"),
    ("meant", "mean"),
    ("met", "meet"),
    ("ran", "run"),
    ("paid", "pay"),
    ("repaid", "repay"),
    ("sat", "sit"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("lay", "lie"),
    ("lain", "lie"),
    ("lying", "lie"),
    ("led", "lead"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("lost", "lose"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("sent", "send"),
    ("built", "build"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("broke", "break"),
    ("broken", "break"),
    ("spent", "spend"),
    ("rose", "rise"),
    ("risen", "rise"),
    ("arose", "arise"),
    ("arisen", "arise"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("bought", "buy"),
    ("wore", "wear"),
    ("worn", "wear"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("sought", "seek"),
    ("dealt", "deal"),
    ("won", "win"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("caught", "catch"),
    ("taught", "teach"),
    ("sold", "sell"),
    ("fought", "fight"),
    ("bore", "bear"),
    ("borne", "bear"),
    ("beaten", "beat"),
    ("bound", "bind"),
    ("swore", "swear"),
    ("sworn", "swear"),
    ("tying", "tie"),
    ("dying", "die"),
    ("freed", "free"),
    ("freeing", "free"),
    ("agreed", "agree"),
    ("agreeing", "agree"),
    ("created", "create"),
    ("creating", "create"),
    ("required", "require"),
    ("requiring", "require"),
    ("acquired", "acquire"),
    ("acquiring", "acquire"),
    ("changed", "change"),
    ("changing", "change"),
    ("exchanged", "exchange"),
    ("exchanging", "exchange"),
    ("ranged", "range"),
    ("ranging", "range"),
    ("arranged", "arrange"),
    ("arranging", "arrange"),
    ("challenged", "challenge"),
    ("challenging", "challenge"),
];

/// Verb lemmatizer: irregular table plus suffix detachment.
///
/// Expects lowercase input; tokens from the cleaning step already are.
#[derive(Debug, Clone)]
pub struct VerbLemmatizer {
    irregular: HashMap<&'static str, &'static str>,
}

impl VerbLemmatizer {
    /// Lemmatizer with the built-in irregular-form table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR_FORMS.iter().copied().collect(),
        }
    }

    /// Map one word to its base form.
    ///
    /// # Example
    /// ```
    /// use hobart_text::lemma::VerbLemmatizer;
    ///
    /// let lemmatizer = VerbLemmatizer::new();
    /// assert_eq!(lemmatizer.lemmatize("increased"), "increase");
    /// assert_eq!(lemmatizer.lemmatize("was"), "be");
    /// assert_eq!(lemmatizer.lemmatize("risk"), "risk");
    /// ```
    #[must_use]
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = self.irregular.get(word) {
            return (*base).to_string();
        }
        if word.len() < 3 {
            return word.to_string();
        }
        if let Some(base) = detach_s(word) {
            return base;
        }
        if let Some(base) = detach_ed(word) {
            return base;
        }
        if let Some(base) = detach_ing(word) {
            return base;
        }
        word.to_string()
    }

    /// Map a token list through [`VerbLemmatizer::lemmatize`].
    #[must_use]
    pub fn lemmatize_words(&self, words: &[String]) -> Vec<String> {
        words.iter().map(|w| self.lemmatize(w)).collect()
    }
}

impl Default for VerbLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

fn has_vowel(s: &str) -> bool {
    s.bytes().any(is_vowel)
}

fn vowel_groups(s: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for b in s.bytes() {
        if is_vowel(b) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    groups
}

/// Third-person `-s` endings: `-ies`, sibilant `-es`, plain `-s`.
fn detach_s(word: &str) -> Option<String> {
    if !word.ends_with('s') || word.ends_with("ss") {
        return None;
    }
    if word.ends_with("ies") && word.len() > 4 {
        return Some(format!("{}y", &word[..word.len() - 3]));
    }
    for sibilant in ["sses", "shes", "ches", "xes", "zes", "oes"] {
        if word.ends_with(sibilant) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    if word.ends_with("us") || word.ends_with("is") {
        return None;
    }
    let stem = &word[..word.len() - 1];
    if stem.len() >= 2 && has_vowel(stem) {
        return Some(stem.to_string());
    }
    None
}

/// Past `-ed` endings.
fn detach_ed(word: &str) -> Option<String> {
    if !word.ends_with("ed") || word.len() < 4 || word.ends_with("eed") {
        return None;
    }
    if word.ends_with("ied") {
        if word.len() > 4 {
            return Some(format!("{}y", &word[..word.len() - 3]));
        }
        // died, tied: drop only the final d
        return Some(word[..word.len() - 1].to_string());
    }
    let stem = &word[..word.len() - 2];
    if stem.len() < 2 || !has_vowel(stem) {
        return None;
    }
    Some(restore_base(stem))
}

/// Progressive `-ing` endings.
fn detach_ing(word: &str) -> Option<String> {
    if !word.ends_with("ing") || word.len() < 5 {
        return None;
    }
    let stem = &word[..word.len() - 3];
    if stem.len() < 2 || !has_vowel(stem) {
        return None;
    }
    Some(restore_base(stem))
}

/// Repair a stripped stem: undouble the final consonant or restore a
/// dropped final `e`.
fn restore_base(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let last = bytes[bytes.len() - 1];

    // stopped -> stop, planning -> plan; ll/ss/ff/zz endings stay
    if bytes.len() >= 3
        && last == bytes[bytes.len() - 2]
        && matches!(last, b'b' | b'd' | b'g' | b'k' | b'm' | b'n' | b'p' | b'r' | b't')
    {
        return stem[..stem.len() - 1].to_string();
    }

    // no English verb ends in a bare v or c: serv -> serve, produc -> produce
    if matches!(last, b'v' | b'c') {
        return format!("{stem}e");
    }

    // manag -> manage, charg -> charge; -ng endings stay (belong, hang)
    if last == b'g' && bytes[bytes.len() - 2] != b'n' {
        return format!("{stem}e");
    }

    // recogniz -> recognize, amortiz -> amortize
    if last == b'z' && !stem.ends_with("zz") {
        return format!("{stem}e");
    }

    // increas -> increase, exercis -> exercise, caus -> cause;
    // -ss (discuss), -ias (bias) and multi-syllable -us (focus) stay
    if last == b's'
        && !stem.ends_with("ss")
        && !stem.ends_with("ias")
        && (!stem.ends_with("us") || vowel_groups(stem) == 1)
    {
        return format!("{stem}e");
    }

    // operat -> operate, includ -> include, determin -> determine,
    // compil -> compile, declar -> declare, assum -> assume; the tail
    // needs a consonant before it (avoid, repair, appear, ruin stay)
    if bytes.len() >= 4 {
        let tail = [bytes[bytes.len() - 2], last];
        if matches!(
            &tail,
            b"at" | b"ut" | b"ud" | b"id" | b"in" | b"il" | b"ar" | b"um" | b"om"
        ) && !is_vowel(bytes[bytes.len() - 3])
        {
            return format!("{stem}e");
        }
    }

    // single-syllable consonant-vowel-consonant stems: mak -> make, us -> use
    if !is_vowel(last)
        && !matches!(last, b'w' | b'x')
        && is_vowel(bytes[bytes.len() - 2])
        && (bytes.len() == 2 || !is_vowel(bytes[bytes.len() - 3]))
        && vowel_groups(stem) == 1
    {
        return format!("{stem}e");
    }

    stem.to_string()
}
