//! The Intent Matcher: a pure, deterministic classifier from request text to
//! one of a closed set of intent tags.

use std::collections::BTreeMap;

/// Score a request against a fixed keyword set, per tag. `intent` is the
/// argmax; ties are broken first by a fixed tag-priority order (see
/// `tag_priority`) favoring the more specific tag among tags that
/// commonly co-occur (e.g. `energy_monitoring` over the broader `energy`),
/// and failing that, by lexicographically smallest tag name.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentMatch {
    pub intent: String,
    pub confidence: f64,
    pub reason: String,
    pub all_matches: BTreeMap<String, f64>,
}

/// Keyword sets for the closed intent vocabulary. `out_of_scope` is
/// distinguished only in that its `reason` echoes the matched vocabulary;
/// scoring treats it like any other tag.
fn keyword_table() -> &'static [(&'static str, &'static [&'static str])] {
    &[
        ("energy", &["energy", "consumption", "usage", "kwh", "meter"]),
        ("portfolio", &["portfolio", "buildings", "facilities", "properties"]),
        ("finance", &["roi", "cost", "savings", "budget", "financial"]),
        ("monitoring", &["monitor", "alert", "anomaly", "real-time", "iot"]),
        ("time", &["time", "date", "today", "clock", "schedule"]),
        ("energy_monitoring", &["latest", "recent", "reading", "sensor", "live"]),
        (
            "out_of_scope",
            &[
                "weather", "cooking", "recipe", "geography", "politics", "sports",
                "history", "trivia",
            ],
        ),
    ]
}

/// Tie-break priority among tags whose keyword sets commonly overlap on the
/// same request, lowest index wins. `energy_monitoring` asks about a specific
/// live reading ("what's the latest/most recent energy reading") and should
/// win over the broader `energy` tag when both score equally. Tags not
/// listed here fall through to the lexicographic tie-break.
fn tag_priority(tag: &str) -> usize {
    const PRIORITY: &[&str] = &["energy_monitoring", "energy"];
    PRIORITY.iter().position(|t| *t == tag).unwrap_or(PRIORITY.len())
}

/// Deterministic keyword-based matcher. Holds no state beyond its fixed
/// keyword table, so it is cheap to construct per request or share behind
/// an `Arc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Normalize, score every tag, and pick the argmax. Pure: no I/O, no
    /// shared mutable state, same input always yields the same output.
    pub fn match_intent(&self, request: &str) -> IntentMatch {
        let lower = request.to_lowercase();
        let mut all_matches = BTreeMap::new();

        for (tag, keywords) in keyword_table() {
            let hits = keywords.iter().filter(|kw| lower.contains(*kw)).count();
            if hits > 0 {
                all_matches.insert(tag.to_string(), hits as f64 / keywords.len() as f64);
            }
        }

        let best = all_matches
            .iter()
            .max_by(|a, b| {
                a.1.partial_cmp(b.1)
                    .unwrap()
                    .then_with(|| tag_priority(b.0).cmp(&tag_priority(a.0)))
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(tag, score)| (tag.clone(), *score));

        match best {
            None => IntentMatch {
                intent: "unknown".to_string(),
                confidence: 0.0,
                reason: "no keywords matched".to_string(),
                all_matches,
            },
            Some((intent, confidence)) => {
                let reason = if intent == "out_of_scope" {
                    let matched: Vec<&str> = keyword_table()
                        .iter()
                        .find(|(tag, _)| *tag == "out_of_scope")
                        .map(|(_, kws)| kws.iter().filter(|kw| lower.contains(*kw)).copied().collect())
                        .unwrap_or_default();
                    format!("matched out-of-scope vocabulary: {}", matched.join(", "))
                } else {
                    format!("matched '{intent}' keyword set with score {confidence:.2}")
                };
                IntentMatch {
                    intent,
                    confidence,
                    reason,
                    all_matches,
                }
            }
        }
    }
}
