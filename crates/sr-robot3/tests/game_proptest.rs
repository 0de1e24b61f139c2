//! 标记规则的属性测试

use proptest::prelude::*;
use sr_robot3::game::{MARKER_SIZES, marker_size, marker_used_in_game};

proptest! {
    #[test]
    fn used_markers_have_a_size(id in 0u32..200) {
        prop_assert_eq!(marker_used_in_game(id), marker_size(id).is_ok());
    }

    #[test]
    fn marker_size_matches_its_range(id in 0u32..100) {
        let expected = MARKER_SIZES
            .iter()
            .find(|(range, _)| range.contains(&id))
            .map(|(_, size)| *size);
        prop_assert_eq!(marker_size(id).ok(), expected);
    }

    #[test]
    fn markers_outside_game_are_rejected(id in 100u32..) {
        prop_assert!(marker_size(id).is_err());
    }
}
