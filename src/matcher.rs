/// Compare typed keys positionally against the target characters.
///
/// Positions past the end of `target` never match, so typing beyond the
/// sentence is tolerated but can never look complete.
pub fn match_keys(pressed: &[char], target: &[char]) -> Vec<bool> {
    pressed
        .iter()
        .enumerate()
        .map(|(i, c)| target.get(i) == Some(c))
        .collect()
}

/// True when every typed key lines up with the target and the whole target
/// has been typed.
pub fn is_fully_matched(matches: &[bool], target_len: usize) -> bool {
    matches.len() == target_len && matches.iter().all(|m| *m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_match_keys_all_correct() {
        assert_eq!(match_keys(&chars("cat"), &chars("cat")), vec![true; 3]);
    }

    #[test]
    fn test_match_keys_with_mistake() {
        assert_eq!(
            match_keys(&chars("cx"), &chars("cat")),
            vec![true, false]
        );
    }

    #[test]
    fn test_match_keys_empty() {
        assert!(match_keys(&[], &chars("cat")).is_empty());
    }

    #[test]
    fn test_match_keys_past_end_never_matches() {
        assert_eq!(
            match_keys(&chars("cats"), &chars("cat")),
            vec![true, true, true, false]
        );
        // even the same character repeated past the end
        assert_eq!(match_keys(&chars("aa"), &chars("a")), vec![true, false]);
    }

    #[test]
    fn test_match_keys_is_case_sensitive() {
        assert_eq!(match_keys(&chars("Cat"), &chars("cat")), vec![false, true, true]);
    }

    #[test]
    fn test_is_fully_matched() {
        assert!(is_fully_matched(&[true, true, true], 3));
        assert!(!is_fully_matched(&[true, true], 3));
        assert!(!is_fully_matched(&[true, false, true], 3));
        assert!(!is_fully_matched(&[true, true, true, false], 3));
    }

    #[test]
    fn test_is_fully_matched_empty_target() {
        // an empty sentence is trivially typed
        assert!(is_fully_matched(&[], 0));
    }

    proptest! {
        #[test]
        fn prop_results_parallel_to_pressed(pressed in "\\PC{0,40}", target in "\\PC{0,40}") {
            let p = chars(&pressed);
            let t = chars(&target);
            let m = match_keys(&p, &t);
            prop_assert_eq!(m.len(), p.len());
            for (i, ok) in m.iter().enumerate() {
                prop_assert_eq!(*ok, i < t.len() && p[i] == t[i]);
            }
        }

        #[test]
        fn prop_prefix_of_target_all_match(target in "[a-z ]{1,40}", cut in 0usize..40) {
            let t = chars(&target);
            let n = cut.min(t.len());
            let m = match_keys(&t[..n], &t);
            prop_assert!(m.iter().all(|ok| *ok));
        }

        #[test]
        fn prop_wrong_char_blocks_completion(target in "[a-z]{1,30}", pos in 0usize..30) {
            let t = chars(&target);
            let i = pos % t.len();
            let mut p = t.clone();
            p[i] = '#';
            let m = match_keys(&p, &t);
            prop_assert!(!m[i]);
            prop_assert!(!is_fully_matched(&m, t.len()));
        }
    }
}
