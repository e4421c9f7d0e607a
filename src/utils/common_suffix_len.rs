/// Number of trailing items `old` and `new` have in common.
pub fn common_suffix_len<T>(old: &[T], new: &[T]) -> usize
where
    T: PartialEq,
{
    old.iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(old, new)| old == new)
        .count()
}
