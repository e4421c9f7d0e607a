use converge_text::{Changeset, Operation, Side};
use proptest::prelude::*;

/// Short texts over a small alphabet, so that edits overlap and characters
/// repeat often.
fn text() -> impl Strategy<Value = String> { "[abc\n]{0,12}" }

fn unicode_text() -> impl Strategy<Value = String> { "[aé🙂]{0,8}" }

fn is_strictly_increasing(changeset: &Changeset) -> bool {
    let retained: Vec<usize> = changeset
        .operations()
        .iter()
        .filter_map(Operation::retained_index)
        .collect();

    retained.windows(2).all(|pair| pair[0] < pair[1])
}

fn has_adjacent_inserts(changeset: &Changeset) -> bool {
    changeset
        .operations()
        .windows(2)
        .any(|pair| matches!(pair, [Operation::Insert(_), Operation::Insert(_)]))
}

proptest! {
    #[test]
    fn apply_reproduces_new_text(old in text(), new in text()) {
        let changeset = Changeset::from_strings(&old, &new);

        prop_assert_eq!(changeset.apply(&old)?, new);
        prop_assert!(is_strictly_increasing(&changeset));
        prop_assert!(!has_adjacent_inserts(&changeset));
    }

    #[test]
    fn apply_reproduces_unicode_text(old in unicode_text(), new in unicode_text()) {
        prop_assert_eq!(Changeset::from_strings(&old, &new).apply(&old)?, new);
    }

    #[test]
    fn identical_texts_give_identity(text in text()) {
        prop_assert!(Changeset::from_strings(&text, &text).is_identity());
    }

    #[test]
    fn normalizing_is_idempotent(old in text(), new in text()) {
        let changeset = Changeset::from_strings(&old, &new);

        prop_assert_eq!(changeset.clone().normalized(), changeset);
    }

    #[test]
    fn merge_is_symmetric(base in text(), left in text(), right in text()) {
        let left = Changeset::from_strings(&base, &left);
        let right = Changeset::from_strings(&base, &right);

        let merged = left.merge(&right)?;
        let inverse = right.merge(&left)?;

        prop_assert_eq!(merged.changeset(), inverse.changeset());
        prop_assert!(is_strictly_increasing(merged.changeset()));
        prop_assert!(!has_adjacent_inserts(merged.changeset()));
    }

    #[test]
    fn merge_with_itself_is_a_no_op(base in text(), new in text()) {
        let changeset = Changeset::from_strings(&base, &new);

        let merged = changeset.merge(&changeset)?;

        prop_assert_eq!(merged.changeset(), &changeset);
    }

    #[test]
    fn follows_converge(base in text(), left in text(), right in text()) {
        let left_changeset = Changeset::from_strings(&base, &left);
        let right_changeset = Changeset::from_strings(&base, &right);

        let merged = left_changeset.merge(&right_changeset)?;
        let expected = merged.apply(&base)?;

        prop_assert_eq!(merged.follow(Side::Left).apply(&left)?, expected.clone());
        prop_assert_eq!(merged.follow(Side::Right).apply(&right)?, expected.clone());

        prop_assert_eq!(
            left_changeset.follow(merged.changeset())?.apply(&left)?,
            expected.clone()
        );
        prop_assert_eq!(
            right_changeset.follow(merged.changeset())?.apply(&right)?,
            expected
        );
    }

    #[test]
    fn deletions_win(base in text(), left in text(), right in text()) {
        let left = Changeset::from_strings(&base, &left);
        let right = Changeset::from_strings(&base, &right);
        let merged = left.merge(&right)?;

        for index in merged.changeset().operations().iter().filter_map(Operation::retained_index) {
            prop_assert!(left.operations().contains(&Operation::Retain(index)));
            prop_assert!(right.operations().contains(&Operation::Retain(index)));
        }
    }
}
