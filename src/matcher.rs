use crate::model::{Candidate, RankedMatch, Score};

/// Scores `query` against `text` as a case-insensitive subsequence match.
///
/// Returns `None` when `query` is not a subsequence of `text`. Otherwise the
/// score is the sum of the gaps skipped while greedily matching each query
/// character at its leftmost remaining occurrence, plus the number of
/// characters `text` has beyond the query length. A text that starts with
/// the query always scores `0`.
///
/// The greedy walk is not a global alignment; equal or suboptimal scores it
/// produces are part of the ranking behaviour and are kept as is.
pub fn fuzzy_score(query: &str, text: &str) -> Option<Score> {
    let query: Vec<char> = query.to_lowercase().chars().collect();
    if query.is_empty() {
        return Some(0);
    }

    let text: Vec<char> = text.to_lowercase().chars().collect();
    if text.starts_with(&query) {
        return Some(0);
    }

    let mut cursor = 0;
    let mut score: Score = 0;
    for ch in &query {
        let gap = text[cursor..].iter().position(|c| c == ch)?;
        score += gap as Score;
        cursor += gap + 1;
    }

    Some(score + text.len() as Score - query.len() as Score)
}

/// Best score of `query` over the candidate's searchable fields.
pub fn best_score(query: &str, candidate: &Candidate) -> Option<Score> {
    candidate
        .search_fields()
        .into_iter()
        .filter_map(|field| fuzzy_score(query, field))
        .min()
}

/// Filters and orders `candidates` for `query`.
///
/// Candidates with no matching field are dropped. Survivors are ordered by
/// score, then by case-insensitive name. Surrounding whitespace in the query
/// is ignored.
pub fn rank(query: &str, candidates: &[Candidate]) -> Vec<RankedMatch> {
    let query = query.trim();

    let mut ranked: Vec<RankedMatch> = candidates
        .iter()
        .filter_map(|candidate| {
            best_score(query, candidate).map(|score| RankedMatch {
                candidate: candidate.clone(),
                score,
            })
        })
        .collect();

    ranked.sort_by_cached_key(|m| (m.score, m.candidate.sort_key()));

    log::debug!("rank: query='{}', matched={}/{}", query, ranked.len(), candidates.len());
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ranked: &[RankedMatch]) -> Vec<&str> {
        ranked.iter().map(|m| m.candidate.name.as_str()).collect()
    }

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(fuzzy_score("", "anything"), Some(0));
        assert_eq!(fuzzy_score("", ""), Some(0));
    }

    #[test]
    fn prefix_and_self_match_score_zero() {
        assert_eq!(fuzzy_score("fire", "Firefox"), Some(0));
        assert_eq!(fuzzy_score("FIRE", "firefox"), Some(0));
        assert_eq!(fuzzy_score("Firefox", "Firefox"), Some(0));
        assert_eq!(fuzzy_score("gnome terminal", "GNOME Terminal"), Some(0));
    }

    #[test]
    fn gaps_and_trailing_characters_add_up() {
        // f@0, x@6: gap 5, trailing 7 - 2
        assert_eq!(fuzzy_score("fx", "firefox"), Some(10));
        // f@0, second f@4: gap 3, trailing 7 - 2
        assert_eq!(fuzzy_score("ff", "Firefox"), Some(8));
        // t@0 is not a prefix of "tm": t@0 gap 0, m@3 gap 2, trailing 8 - 2
        assert_eq!(fuzzy_score("tm", "terminal"), Some(8));
    }

    #[test]
    fn greedy_walk_takes_leftmost_occurrence() {
        // o@1 then f@3: gaps 1 + 1, trailing 6 - 2
        assert_eq!(fuzzy_score("of", "foofoo"), Some(2 + 4));
        assert_eq!(fuzzy_score("aa", "xaxxa"), Some(1 + 2 + 3));
    }

    #[test]
    fn non_subsequence_is_no_match() {
        assert_eq!(fuzzy_score("fi", "Terminal"), None);
        assert_eq!(fuzzy_score("ba", "ab"), None);
        assert_eq!(fuzzy_score("aa", "a"), None);
    }

    #[test]
    fn extending_a_query_never_revives_a_miss() {
        let text = "Text Editor";
        let mut query = String::new();
        let mut missed = false;
        for ch in "txedz".chars() {
            query.push(ch);
            let score = fuzzy_score(&query, text);
            if missed {
                assert_eq!(score, None, "query {query:?} matched after a miss");
            }
            missed = score.is_none();
        }
        assert!(missed);
    }

    #[test]
    fn scenario_fi_prefers_prefix_matches_by_name() {
        let candidates = vec![
            Candidate::new("Firefox", "firefox"),
            Candidate::new("Files", "nautilus"),
            Candidate::new("Terminal", "xterm"),
        ];
        let ranked = rank("fi", &candidates);
        assert_eq!(names(&ranked), vec!["Files", "Firefox"]);
        assert!(ranked.iter().all(|m| m.score == 0));
    }

    #[test]
    fn empty_query_keeps_everything_in_name_order() {
        let candidates = vec![
            Candidate::new("zathura", "zathura"),
            Candidate::new("Btop", "btop"),
            Candidate::new("alacritty", "alacritty"),
        ];
        let ranked = rank("", &candidates);
        assert_eq!(names(&ranked), vec!["alacritty", "Btop", "zathura"]);
    }

    #[test]
    fn best_field_wins_and_all_fields_are_searched() {
        let mut browser = Candidate::new("Zen", "zen-bin");
        browser.comment = "Web Browser".to_string();
        let mut monitor = Candidate::new("Btop", "btop");
        monitor.categories = "System;Monitor;".to_string();
        let plain = Candidate::new("Calculator", "gnome-calculator");

        assert_eq!(best_score("web", &browser), Some(0));
        assert_eq!(best_score("monitor", &monitor), fuzzy_score("monitor", "System;Monitor;"));
        assert_eq!(best_score("gnome", &plain), Some(0));
        assert_eq!(best_score("qq", &plain), None);

        let ranked = rank("web", &[plain, browser.clone()]);
        assert_eq!(ranked, vec![RankedMatch { candidate: browser, score: 0 }]);
    }

    #[test]
    fn ranking_orders_by_score_then_name_and_is_repeatable() {
        let candidates = vec![
            Candidate::new("Text Editor", "gedit"),
            Candidate::new("tetris", "tetris"),
            Candidate::new("Terminal", "xterm"),
            Candidate::new("Thunderbird", "thunderbird"),
        ];
        let first = rank("te", &candidates);
        assert_eq!(names(&first), vec!["Terminal", "tetris", "Text Editor", "Thunderbird"]);
        assert_eq!(first[3].score, 4 + 9);
        assert!(first.windows(2).all(|w| w[0].score <= w[1].score));
        assert_eq!(first, rank("te", &candidates));
    }

    #[test]
    fn surviving_set_is_exactly_the_matching_candidates() {
        let candidates = vec![
            Candidate::new("Firefox", "firefox"),
            Candidate::new("Vim", "vim"),
            Candidate::new("Htop", "htop"),
        ];
        // firefox: f, i, r, e, f skipped then o, trailing 7 - 1
        // htop: h, t skipped then o, trailing 4 - 1
        let ranked = rank("o", &candidates);
        let scored: Vec<(&str, Score)> = ranked
            .iter()
            .map(|m| (m.candidate.name.as_str(), m.score))
            .collect();
        assert_eq!(scored, vec![("Htop", 2 + 3), ("Firefox", 5 + 6)]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut lower = Candidate::new("files", "files");
        lower.comment = "one".to_string();
        let mut upper = Candidate::new("Files", "files");
        upper.comment = "two".to_string();

        let comments = |ranked: Vec<RankedMatch>| -> Vec<String> {
            ranked.into_iter().map(|m| m.candidate.comment).collect()
        };
        assert_eq!(comments(rank("fi", &[lower.clone(), upper.clone()])), vec!["one", "two"]);
        assert_eq!(comments(rank("fi", &[upper, lower])), vec!["two", "one"]);
    }

    #[test]
    fn surrounding_whitespace_in_query_is_ignored() {
        let candidates = vec![Candidate::new("Firefox", "firefox")];
        assert_eq!(rank("  fire ", &candidates), rank("fire", &candidates));
    }
}
