//! Property tests for engine output parsing.

use proptest::prelude::*;
use uci::{parse_line, Evaluation, MATE_SENTINEL_CP};

proptest! {
    #[test]
    fn never_panics_on_arbitrary_input(line in ".*", invert in any::<bool>()) {
        let _ = parse_line(&line, invert);
    }

    #[test]
    fn cp_score_survives_surrounding_tokens(cp in -30_000i32..30_000, depth in 1u32..60) {
        let line = format!("info depth {} seldepth {} score cp {} nodes 12345 nps 999 pv e2e4", depth, depth + 2, cp);
        let eval = parse_line(&line, false).unwrap();
        prop_assert_eq!(eval.centipawns(), cp);
        prop_assert_eq!(eval.pv(), ["e2e4"]);
    }

    #[test]
    fn inversion_flips_centipawns(cp in -30_000i32..30_000) {
        let line = format!("info score cp {}", cp);
        let plain = parse_line(&line, false).unwrap();
        let inverted = parse_line(&line, true).unwrap();
        prop_assert_eq!(inverted.centipawns(), -plain.centipawns());
    }

    #[test]
    fn inversion_over_full_range_misses_only_min(cp in any::<i32>()) {
        let inverted = parse_line(&format!("info depth 3 score cp {}", cp), true);
        prop_assert_eq!(inverted.map(|e| e.centipawns()), cp.checked_neg());
    }

    #[test]
    fn mate_sign_picks_sentinel(plies in -50i32..50) {
        let eval = parse_line(&format!("info score mate {}", plies), false).unwrap();
        let expected = if plies > 0 { MATE_SENTINEL_CP } else { -MATE_SENTINEL_CP };
        prop_assert_eq!(eval.centipawns(), expected);
        prop_assert_eq!(eval, Evaluation::mate(plies));
    }
}
