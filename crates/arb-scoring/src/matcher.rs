//! Multi-Q matching
//!
//! One multi-Q definition is checked against the qualifying runs of a single
//! day. Each required (division, level, event) item consumes its own run.

use arb_config::MultiQ;
use arb_tree::ArbDate;
use smallvec::SmallVec;

/// A qualifying run as seen by the matcher
pub trait MultiQCandidate {
    /// Day the run happened, checked against the multi-Q validity window
    fn date(&self) -> Option<ArbDate>;
    /// Division the run was entered in
    fn division(&self) -> &str;
    /// Leaf level the run was entered at
    fn level(&self) -> &str;
    /// Event that was run
    fn event(&self) -> &str;
}

/// Try to satisfy `multi_q` from `runs`
///
/// On success the consumed runs are removed from `runs` and returned in item
/// order; on failure `runs` is left untouched. Runs must already be limited
/// to one day and qualifying; the multi-Q's own validity window is checked
/// here.
pub fn match_multi_q<T: MultiQCandidate>(multi_q: &MultiQ, runs: &mut Vec<T>) -> Option<Vec<T>> {
    let needed = multi_q.item_count();
    if needed == 0 || runs.len() < needed {
        return None;
    }

    let mut used: SmallVec<[usize; 4]> = SmallVec::new();
    for item in multi_q.items() {
        let found = (0..runs.len()).find(|&i| {
            let run = &runs[i];
            !used.contains(&i)
                && multi_q.is_valid_on(run.date())
                && item.matches(run.division(), run.level(), run.event())
        })?;
        used.push(found);
    }

    let mut by_position: SmallVec<[usize; 4]> = used.clone();
    by_position.sort_unstable_by(|a, b| b.cmp(a));
    let mut taken: Vec<(usize, T)> = by_position.into_iter().map(|i| (i, runs.remove(i))).collect();

    let mut matched = Vec::with_capacity(needed);
    for index in used {
        if let Some(pos) = taken.iter().position(|(i, _)| *i == index) {
            matched.push(taken.swap_remove(pos).1);
        }
    }
    Some(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Run(&'static str, &'static str, Option<ArbDate>);

    impl MultiQCandidate for Run {
        fn date(&self) -> Option<ArbDate> {
            self.2
        }
        fn division(&self) -> &str {
            "Open"
        }
        fn level(&self) -> &str {
            self.0
        }
        fn event(&self) -> &str {
            self.1
        }
    }

    fn qq() -> MultiQ {
        MultiQ::new("Double Q", "QQ")
            .with_item("Open", "Excellent", "Standard")
            .unwrap()
            .with_item("Open", "Excellent", "Jumpers")
            .unwrap()
    }

    #[test]
    fn consumes_one_run_per_item() {
        let mut runs = vec![
            Run("Excellent", "Jumpers", None),
            Run("Novice", "Standard", None),
            Run("Excellent", "Standard", None),
            Run("Excellent", "Jumpers", None),
        ];
        let matched = match_multi_q(&qq(), &mut runs).unwrap();
        assert_eq!(
            matched,
            vec![Run("Excellent", "Standard", None), Run("Excellent", "Jumpers", None)]
        );
        assert_eq!(
            runs,
            vec![Run("Novice", "Standard", None), Run("Excellent", "Jumpers", None)]
        );
    }

    #[test]
    fn missing_item_leaves_runs() {
        let mut runs = vec![Run("Excellent", "Jumpers", None), Run("Excellent", "Jumpers", None)];
        assert!(match_multi_q(&qq(), &mut runs).is_none());
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn window_is_checked() {
        let mut multi_q = qq();
        multi_q.valid_from = ArbDate::from_ymd(2020, 1, 1);
        let day = ArbDate::from_ymd(2019, 6, 1);
        let mut runs = vec![Run("Excellent", "Standard", day), Run("Excellent", "Jumpers", day)];
        assert!(match_multi_q(&multi_q, &mut runs).is_none());

        let day = ArbDate::from_ymd(2021, 6, 1);
        let mut runs = vec![Run("Excellent", "Standard", day), Run("Excellent", "Jumpers", day)];
        assert_eq!(match_multi_q(&multi_q, &mut runs).map(|m| m.len()), Some(2));
        assert!(runs.is_empty());
    }

    #[test]
    fn empty_definition_never_matches() {
        let mut runs = vec![Run("Excellent", "Standard", None)];
        assert!(match_multi_q(&MultiQ::new("Empty", "E"), &mut runs).is_none());
    }
}
