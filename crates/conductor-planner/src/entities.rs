//! Entity extraction helpers used by the Rule Planner's routing rules.
//! Every default and lookup table here is part of the planner's
//! configuration surface (§6.2) and is echoed into `planning_reason` by the
//! caller so a plan always explains what it detected vs. defaulted.

use regex::Regex;
use std::sync::OnceLock;

/// A date range with a fixed ISO start/end, looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: &'static str,
    pub end_date: &'static str,
}

/// Fixture literals, not computed from wall-clock time, so the worked
/// scenarios stay exact across runs.
pub const DATE_RANGES: &[(&str, DateRange)] = &[
    ("current_year", DateRange { start_date: "2025-01-01", end_date: "2025-12-31" }),
    ("last_year", DateRange { start_date: "2024-01-01", end_date: "2024-12-31" }),
    ("last_quarter", DateRange { start_date: "2025-04-01", end_date: "2025-06-30" }),
    ("this_quarter", DateRange { start_date: "2025-07-01", end_date: "2025-09-30" }),
    ("last_month", DateRange { start_date: "2025-06-01", end_date: "2025-06-30" }),
    ("last_6_months", DateRange { start_date: "2025-01-01", end_date: "2025-06-30" }),
];

pub fn date_range(name: &str) -> DateRange {
    DATE_RANGES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, range)| *range)
        .unwrap_or(DATE_RANGES[0].1)
}

/// Checked in this order so "jp" never shadows "jpmorgan".
const COMPANY_PORTFOLIO_MAP: &[(&str, &str)] = &[
    ("walmart", "PORTFOLIO-002"),
    ("microsoft", "PORTFOLIO-001"),
    ("jpmorgan", "PORTFOLIO-003"),
    ("jp", "PORTFOLIO-003"),
    ("general motors", "PORTFOLIO-004"),
    ("gm", "PORTFOLIO-004"),
    ("amazon", "PORTFOLIO-005"),
];

/// Detected portfolio id plus a label describing how it was detected, for
/// folding into `planning_reason`.
pub struct PortfolioDetection {
    pub portfolio_id: String,
    pub detected_via: String,
}

/// Company-name lookup, falling back to an explicit `portfolio X` mention,
/// falling back to a fixed sentinel.
pub fn detect_portfolio(request_lower: &str) -> PortfolioDetection {
    for (company, portfolio_id) in COMPANY_PORTFOLIO_MAP {
        if request_lower.contains(company) {
            return PortfolioDetection {
                portfolio_id: portfolio_id.to_string(),
                detected_via: company.to_string(),
            };
        }
    }

    static EXPLICIT_PORTFOLIO: OnceLock<Regex> = OnceLock::new();
    let re = EXPLICIT_PORTFOLIO.get_or_init(|| Regex::new(r"portfolio\s+([a-zA-Z0-9_-]+)").unwrap());
    if let Some(caps) = re.captures(request_lower) {
        return PortfolioDetection {
            portfolio_id: caps[1].to_uppercase(),
            detected_via: "explicit_portfolio_id".to_string(),
        };
    }

    PortfolioDetection {
        portfolio_id: "PORTFOLIO-002".to_string(),
        detected_via: "default_fallback".to_string(),
    }
}

/// `building_N` from `building 3`, the bare word from `acme building`, or a
/// fixed sentinel when neither pattern is present.
pub fn detect_building_id(request_lower: &str) -> String {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    static NAMED: OnceLock<Regex> = OnceLock::new();

    let numbered = NUMBERED.get_or_init(|| Regex::new(r"building\s+(\d+)").unwrap());
    if let Some(caps) = numbered.captures(request_lower) {
        return format!("building_{}", &caps[1]);
    }

    let named = NAMED.get_or_init(|| Regex::new(r"(\w+)\s+building").unwrap());
    if let Some(caps) = named.captures(request_lower) {
        return caps[1].to_string();
    }

    "default_building".to_string()
}

/// Recognized time-period literals, checked in this order; default
/// `current_year` when nothing matches.
const TIME_PERIOD_PHRASES: &[(&str, &str)] = &[
    ("last month", "last_month"),
    ("this year", "current_year"),
    ("last 6 months", "last_6_months"),
    ("last quarter", "last_quarter"),
    ("this quarter", "this_quarter"),
    ("last year", "last_year"),
];

pub fn detect_time_period(request_lower: &str) -> &'static str {
    for (phrase, period) in TIME_PERIOD_PHRASES {
        if request_lower.contains(phrase) {
            return period;
        }
    }
    "current_year"
}

const PROJECT_TYPE_KEYWORDS: &[&str] = &["led", "hvac", "solar", "storage", "controls"];

/// `(display_name, matched_keyword)`; `matched_keyword` is `None` when the
/// LED default was used without any keyword present.
pub fn detect_project_type(request_lower: &str) -> (String, Option<&'static str>) {
    for keyword in PROJECT_TYPE_KEYWORDS {
        if request_lower.contains(keyword) {
            let display = if *keyword == "led" { "LED".to_string() } else { keyword.to_uppercase() };
            return (display, Some(keyword));
        }
    }
    ("LED".to_string(), None)
}

/// First amount mention, honoring a `k`/`thousand` multiplier; defaults to
/// 50,000 when nothing matches. The bare fallback requires a leading `$` so
/// an unrelated number earlier in the sentence (a building id, a building
/// count) never wins over the actual dollar figure.
pub fn detect_investment_amount(request_lower: &str) -> f64 {
    static WITH_SUFFIX: OnceLock<Regex> = OnceLock::new();
    static BARE: OnceLock<Regex> = OnceLock::new();

    let with_suffix = WITH_SUFFIX.get_or_init(|| {
        Regex::new(r"\$?(\d+(?:,\d+)*(?:\.\d+)?)\s*(?:k|thousand)").unwrap()
    });
    if let Some(caps) = with_suffix.captures(request_lower) {
        if let Ok(value) = caps[1].replace(',', "").parse::<f64>() {
            return value * 1000.0;
        }
    }

    let bare = BARE.get_or_init(|| Regex::new(r"\$(\d+(?:,\d+)*(?:\.\d+)?)").unwrap());
    if let Some(caps) = bare.captures(request_lower) {
        if let Ok(value) = caps[1].replace(',', "").parse::<f64>() {
            return value;
        }
    }

    50_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_id_prefers_numbered_pattern() {
        assert_eq!(detect_building_id("status for building 12 please"), "building_12");
    }

    #[test]
    fn building_id_falls_back_to_named_pattern() {
        assert_eq!(detect_building_id("the acme building uses too much power"), "acme");
    }

    #[test]
    fn building_id_defaults_when_absent() {
        assert_eq!(detect_building_id("how are we doing overall"), "default_building");
    }

    #[test]
    fn portfolio_detection_does_not_let_jp_shadow_jpmorgan() {
        let d = detect_portfolio("jpmorgan chase portfolio review");
        assert_eq!(d.portfolio_id, "PORTFOLIO-003");
        assert_eq!(d.detected_via, "jpmorgan");
    }

    #[test]
    fn portfolio_detection_honors_explicit_portfolio_mention() {
        let d = detect_portfolio("show me portfolio abc-123");
        assert_eq!(d.portfolio_id, "ABC-123");
        assert_eq!(d.detected_via, "explicit_portfolio_id");
    }

    #[test]
    fn investment_amount_applies_k_suffix() {
        assert_eq!(detect_investment_amount("budget is 75k for this retrofit"), 75_000.0);
    }

    #[test]
    fn investment_amount_defaults_when_absent() {
        assert_eq!(detect_investment_amount("no numbers mentioned here"), 50_000.0);
    }

    #[test]
    fn investment_amount_ignores_an_earlier_building_number() {
        let amount = detect_investment_amount(
            "calculate roi for led retrofit project for building 123 with $50000 budget",
        );
        assert_eq!(amount, 50_000.0);
    }

    #[test]
    fn project_type_defaults_to_led_without_keyword() {
        let (display, matched) = detect_project_type("what should we retrofit");
        assert_eq!(display, "LED");
        assert!(matched.is_none());
    }

    #[test]
    fn project_type_detects_hvac() {
        let (display, matched) = detect_project_type("we need an hvac upgrade");
        assert_eq!(display, "HVAC");
        assert_eq!(matched, Some("hvac"));
    }
}
