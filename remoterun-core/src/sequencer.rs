//! Execution ordering

use crate::domain::command::Batch;

/// Orders a validated batch by ascending `order`
///
/// The sort is stable, though validation already guarantees there are no ties.
pub fn sequence(mut batch: Batch) -> Batch {
    batch.commands_mut().sort_by_key(|c| c.order());
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::task::CommandRequest;
    use crate::validation::validate_batch;

    fn orders(batch: &Batch) -> Vec<i64> {
        batch.commands().iter().map(|c| c.order()).collect()
    }

    #[test]
    fn test_sorts_ascending() {
        let batch = validate_batch(vec![
            CommandRequest::new("c", &[], 30),
            CommandRequest::new("a", &[], -5),
            CommandRequest::new("b", &[], 2),
        ])
        .unwrap();

        let ordered = sequence(batch);
        assert_eq!(orders(&ordered), vec![-5, 2, 30]);
        assert_eq!(ordered.commands()[0].program(), "a");
    }

    #[test]
    fn test_every_permutation_yields_same_order() {
        let base = [("a", 1), ("b", 2), ("c", 3), ("d", 4)];
        let permutations: [[usize; 4]; 6] = [
            [0, 1, 2, 3],
            [3, 2, 1, 0],
            [1, 3, 0, 2],
            [2, 0, 3, 1],
            [3, 0, 1, 2],
            [1, 0, 3, 2],
        ];

        for perm in permutations {
            let requests = perm
                .iter()
                .map(|&i| CommandRequest::new(base[i].0, &[], base[i].1))
                .collect();
            let ordered = sequence(validate_batch(requests).unwrap());
            let programs: Vec<&str> = ordered.commands().iter().map(|c| c.program()).collect();
            assert_eq!(programs, vec!["a", "b", "c", "d"], "permutation {:?}", perm);
        }
    }

    #[test]
    fn test_single_command_unchanged() {
        let batch = validate_batch(vec![CommandRequest::new("echo", &["hi"], 9)]).unwrap();
        let ordered = sequence(batch.clone());
        assert_eq!(ordered, batch);
    }
}
