//! Multi-criteria route selection.
//!
//! Picks the fastest and the least crowded candidates and draws the
//! balanced route from the Pareto frontier over (duration, workload).
//! Missing durations or workloads count as `+inf`, so such candidates
//! sort last and never dominate anything.

use crate::domain::{RouteCandidate, SelectionResult};

/// Returns true if `a` dominates `b`: no worse on both axes and strictly
/// better on at least one.
pub fn dominates(a: &RouteCandidate, b: &RouteCandidate) -> bool {
    let (a_dur, a_load) = (a.duration_key(), a.workload_key());
    let (b_dur, b_load) = (b.duration_key(), b.workload_key());

    (a_load < b_load && a_dur <= b_dur) || (a_load <= b_load && a_dur < b_dur)
}

/// Non-dominated candidates, in input order.
///
/// All-pairs comparison; candidate sets are bounded by the product of the
/// two stop-count caps.
pub fn pareto_frontier(candidates: &[RouteCandidate]) -> Vec<&RouteCandidate> {
    candidates
        .iter()
        .filter(|c| !candidates.iter().any(|other| dominates(other, c)))
        .collect()
}

/// The candidate with the shortest duration; the first wins ties.
pub fn fastest(candidates: &[RouteCandidate]) -> Option<&RouteCandidate> {
    candidates
        .iter()
        .min_by(|a, b| a.duration_key().total_cmp(&b.duration_key()))
}

/// The candidate with the lowest workload; the first wins ties.
pub fn least_crowded(candidates: &[RouteCandidate]) -> Option<&RouteCandidate> {
    candidates
        .iter()
        .min_by(|a, b| a.workload_key().total_cmp(&b.workload_key()))
}

/// Select the fastest, balanced and least crowded routes.
///
/// Every field is `None` when `candidates` is empty, and only then.
pub fn select(candidates: &[RouteCandidate]) -> SelectionResult {
    SelectionResult {
        fastest_route: fastest(candidates).cloned(),
        balanced_route: pareto_frontier(candidates).first().map(|c| (*c).clone()),
        least_crowded_route: least_crowded(candidates).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, duration: f64, workload: f64) -> RouteCandidate {
        let mut c = RouteCandidate {
            total_duration: Some(duration),
            workload: Some(workload),
            ..Default::default()
        };
        c.extra.insert("id".into(), id.into());
        c
    }

    fn ids<'a>(routes: impl IntoIterator<Item = &'a RouteCandidate>) -> Vec<&'a str> {
        routes.into_iter().map(|r| r.id().unwrap()).collect()
    }

    #[test]
    fn empty_selection_is_all_none() {
        assert_eq!(select(&[]), SelectionResult::empty());
        assert!(pareto_frontier(&[]).is_empty());
    }

    #[test]
    fn strict_winner_is_sole_frontier_member() {
        let routes = [route("slow", 300.0, 0.8), route("best", 100.0, 0.2)];

        assert_eq!(ids(pareto_frontier(&routes)), ["best"]);
        assert!(dominates(&routes[1], &routes[0]));
        assert!(!dominates(&routes[0], &routes[1]));
    }

    #[test]
    fn four_pair_scenario() {
        let routes = [
            route("r100", 100.0, 0.9),
            route("r200", 200.0, 0.1),
            route("r150", 150.0, 0.5),
            route("r300", 300.0, 0.2),
        ];

        let result = select(&routes);

        assert_eq!(result.fastest_route.unwrap().id(), Some("r100"));
        assert_eq!(result.least_crowded_route.unwrap().id(), Some("r200"));
        assert_eq!(ids(pareto_frontier(&routes)), ["r100", "r200", "r150"]);
        assert_eq!(result.balanced_route.unwrap().id(), Some("r100"));
    }

    #[test]
    fn ties_resolve_to_first_occurrence() {
        let routes = [
            route("a", 100.0, 0.5),
            route("b", 100.0, 0.3),
            route("c", 200.0, 0.3),
        ];

        assert_eq!(fastest(&routes).unwrap().id(), Some("a"));
        assert_eq!(least_crowded(&routes).unwrap().id(), Some("b"));
    }

    #[test]
    fn identical_candidates_do_not_dominate_each_other() {
        let routes = [route("a", 100.0, 0.5), route("b", 100.0, 0.5)];
        assert_eq!(ids(pareto_frontier(&routes)), ["a", "b"]);
    }

    #[test]
    fn missing_metrics_sort_last_and_never_dominate() {
        let mut no_duration = route("no-duration", 0.0, 0.0);
        no_duration.total_duration = None;
        let mut no_workload = route("no-workload", 0.0, 0.0);
        no_workload.workload = None;
        let routes = [no_duration, no_workload, route("ok", 500.0, 0.9)];

        assert_eq!(fastest(&routes).unwrap().id(), Some("no-workload"));
        assert_eq!(least_crowded(&routes).unwrap().id(), Some("no-duration"));
        assert!(!dominates(&routes[0], &routes[2]));
        assert!(!dominates(&routes[1], &routes[2]));
        assert!(pareto_frontier(&routes).iter().any(|r| r.id() == Some("ok")));
    }
}
