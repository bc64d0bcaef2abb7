//! The confidence heuristic attached to every terminal result.
//!
//! A cheap proxy for answer quality, scored from what the run actually did
//! rather than from the text: knowledge-base grounding is worth the most,
//! visible effort a little, and web-only answers are penalized but never
//! below 0.4 — a web-grounded answer still beats a guess.

/// The fixed confidence of a timed-out run's holding message.
pub const TIMEOUT_CONFIDENCE: f32 = 0.3;

const BASE: f32 = 0.5;
const KB_BONUS: f32 = 0.25;
const EFFORT_BONUS: f32 = 0.10;
const WEB_ONLY_PENALTY: f32 = 0.10;
const WEB_ONLY_FLOOR: f32 = 0.4;

/// Score a completed run.
///
/// `search_calls` counts both knowledge-base and web searches.
pub fn estimate(kb_grounded: bool, search_calls: usize, web_searched: bool) -> f32 {
    let mut score = BASE;
    if kb_grounded {
        score += KB_BONUS;
    }
    if search_calls >= 2 {
        score += EFFORT_BONUS;
    }
    if web_searched && !kb_grounded {
        score = (score - WEB_ONLY_PENALTY).max(WEB_ONLY_FLOOR);
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_tools_is_base() {
        assert_eq!(estimate(false, 0, false), 0.5);
    }

    #[test]
    fn kb_grounding_dominates() {
        assert_eq!(estimate(true, 1, false), 0.75);
        assert_eq!(estimate(true, 2, false), 0.85);
    }

    #[test]
    fn kb_plus_web_gets_no_penalty() {
        // Grounded answers keep the full score even if the web was consulted
        assert_eq!(estimate(true, 2, true), 0.85);
    }

    #[test]
    fn web_only_is_penalized() {
        assert_eq!(estimate(false, 1, true), 0.4);
        // Effort bonus applies before the penalty
        assert!((estimate(false, 2, true) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn web_only_never_drops_below_floor() {
        assert!(estimate(false, 1, true) >= WEB_ONLY_FLOOR);
    }

    #[test]
    fn always_in_unit_interval() {
        for kb in [false, true] {
            for calls in 0..5 {
                for web in [false, true] {
                    let score = estimate(kb, calls, web);
                    assert!((0.0..=1.0).contains(&score));
                }
            }
        }
    }
}
