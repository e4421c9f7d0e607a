use crate::operation_transformation::Operation;

/// Joins adjacent insert operations into a single run and drops empty inserts,
/// so that no two inserts follow each other. Running it on its own output is a
/// no-op.
pub fn collapse_inserts<I>(operations: I) -> Vec<Operation>
where
    I: IntoIterator<Item = Operation>,
{
    let operations = operations.into_iter();
    let mut result: Vec<Operation> = Vec::with_capacity(operations.size_hint().0);

    for operation in operations {
        if let Operation::Insert(text) = &operation {
            if text.is_empty() {
                continue;
            }

            if let Some(Operation::Insert(previous)) = result.last_mut() {
                previous.push_str(text);
                continue;
            }
        }

        result.push(operation);
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn insert(text: &str) -> Operation { Operation::Insert(text.to_owned()) }

    #[test]
    fn test_collapse_empty() {
        assert_eq!(collapse_inserts(Vec::new()), Vec::<Operation>::new());
    }

    #[test]
    fn test_collapse_adjacent_inserts() {
        let operations = vec![
            insert("s"),
            insert("i"),
            Operation::Retain(0),
            insert("o"),
            insert(""),
            insert("w"),
        ];

        assert_eq!(
            collapse_inserts(operations),
            vec![insert("si"), Operation::Retain(0), insert("ow")]
        );
    }

    #[test]
    fn test_collapse_keeps_retains() {
        let operations = vec![Operation::Retain(0), Operation::Retain(1), insert("x")];

        assert_eq!(collapse_inserts(operations.clone()), operations);
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let operations = vec![
            insert("a"),
            insert("b"),
            Operation::Retain(2),
            insert(""),
            Operation::Retain(3),
            insert("c"),
            insert("d"),
        ];

        let once = collapse_inserts(operations);
        let twice = collapse_inserts(once.clone());

        assert_eq!(once, twice);
    }
}
