//! Answer parsing: collapses free model text onto a closed vocabulary.
//!
//! Every task owns an ordered [`RuleTable`]. The raw answer is normalized once (trimmed,
//! uppercased, trailing punctuation dropped) and the rules are tried top to bottom; the first
//! rule that matches decides the label. Text no rule recognizes becomes the table's unknown
//! label, so parsing is total and never fails.

/// How a rule recognizes its label inside a normalized answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matcher {
    /// The whole answer equals the needle.
    Exact(&'static str),
    /// The answer starts with the needle.
    Prefix(&'static str),
    /// The needle appears anywhere in the answer.
    Contains(&'static str),
}

impl Matcher {
    /// Needles are written uppercase; `text` must already be normalized.
    pub fn matches(&self, text: &str) -> bool {
        match *self {
            Matcher::Exact(needle) => text == needle,
            Matcher::Prefix(needle) => text.starts_with(needle),
            Matcher::Contains(needle) => text.contains(needle),
        }
    }
}

/// One row of a rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule<L> {
    /// What to look for in the normalized answer.
    pub matcher: Matcher,
    /// Label returned when the matcher hits.
    pub label: L,
}

impl<L> Rule<L> {
    /// A row answering `label` when `matcher` hits.
    pub const fn new(matcher: Matcher, label: L) -> Self {
        Self { matcher, label }
    }
}

/// Ordered rules plus the label used when nothing matches.
#[derive(Clone, Copy, Debug)]
pub struct RuleTable<L: 'static> {
    rules: &'static [Rule<L>],
    unknown: L,
}

impl<L: Copy> RuleTable<L> {
    /// Builds a table from `rules`, tried in slice order, falling back to `unknown`.
    pub const fn new(rules: &'static [Rule<L>], unknown: L) -> Self {
        Self { rules, unknown }
    }

    /// The label given to answers no rule recognizes.
    pub fn unknown(&self) -> L {
        self.unknown
    }

    /// Classifies raw backend text.
    pub fn classify(&self, raw: &str) -> L {
        let text = normalize(raw);
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&text))
            .map_or(self.unknown, |rule| rule.label)
    }
}

/// Trims whitespace, drops trailing punctuation and uppercases.
///
/// `"  Yes.\n"` becomes `"YES"`, `"option b!"` becomes `"OPTION B"`.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim_end()
        .to_uppercase()
}

/// Landing-zone classification used by the decision service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Option A: open grass, fit for landing.
    Safe,
    /// Option B: forest or cliffs.
    Unsafe,
    /// Nothing in the answer matched.
    Unknown,
}

impl Terrain {
    /// Every variant, for exhaustive checks.
    pub const ALL: [Terrain; 3] = [Terrain::Safe, Terrain::Unsafe, Terrain::Unknown];

    /// Lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Terrain::Safe => "safe",
            Terrain::Unsafe => "unsafe",
            Terrain::Unknown => "unknown",
        }
    }
}

const TERRAIN: &[Rule<Terrain>] = &[
    Rule::new(Matcher::Exact("A"), Terrain::Safe),
    Rule::new(Matcher::Exact("B"), Terrain::Unsafe),
    Rule::new(Matcher::Prefix("A"), Terrain::Safe),
    Rule::new(Matcher::Prefix("B"), Terrain::Unsafe),
    Rule::new(Matcher::Contains("OPTION A"), Terrain::Safe),
    Rule::new(Matcher::Contains("OPTION B"), Terrain::Unsafe),
];

/// Exact letters first, then a leading letter, then the spelled-out option anywhere.
///
/// Rows are grouped by match kind rather than by option, so a leading "B" beats a later
/// "option A": `"B, not sure, maybe option A"` moves on instead of landing.
pub const TERRAIN_RULES: RuleTable<Terrain> = RuleTable::new(TERRAIN, Terrain::Unknown);

/// Classification produced by the probe harness tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Observation {
    Detected,
    NotDetected,
    Flat,
    Rocky,
    Unknown,
}

impl Observation {
    pub const ALL: [Observation; 5] = [
        Observation::Detected,
        Observation::NotDetected,
        Observation::Flat,
        Observation::Rocky,
        Observation::Unknown,
    ];
}

const PRESENCE: &[Rule<Observation>] = &[
    Rule::new(Matcher::Contains("YES"), Observation::Detected),
    Rule::new(Matcher::Contains("NO"), Observation::NotDetected),
];

const SURFACE: &[Rule<Observation>] = &[
    Rule::new(Matcher::Contains("FLAT"), Observation::Flat),
    Rule::new(Matcher::Contains("ROCKY"), Observation::Rocky),
];

/// YES/NO questions. The positive keyword is checked first.
pub const PRESENCE_RULES: RuleTable<Observation> = RuleTable::new(PRESENCE, Observation::Unknown);

/// FLAT/ROCKY ground question.
pub const SURFACE_RULES: RuleTable<Observation> = RuleTable::new(SURFACE, Observation::Unknown);
