use std::collections::HashMap;

use crate::models::{DuplicateKey, Expense};

/// Partition `expenses` into clusters of entries that share a duplicate key.
///
/// Equal keys form an equivalence class, so bucketing by key gives the same
/// partition as any pairwise scan. Clusters come out in order of their first
/// member; members keep input order. Singletons are dropped.
pub fn find_duplicates<'a, I>(expenses: I) -> Vec<Vec<&'a Expense>>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut index: HashMap<DuplicateKey<'a>, usize> = HashMap::new();
    let mut buckets: Vec<Vec<&'a Expense>> = Vec::new();

    for expense in expenses {
        let slot = *index.entry(expense.duplicate_key()).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(expense);
    }

    let clusters: Vec<_> = buckets.into_iter().filter(|b| b.len() >= 2).collect();
    log::debug!("found {} duplicate clusters", clusters.len());
    clusters
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn expense(date: &str, amount: &str, category: &str, check_num: &str, line: u64) -> Expense {
        Expense {
            date: date.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            check_num: check_num.to_string(),
            line,
            ..Default::default()
        }
    }

    fn partition(clusters: &[Vec<&Expense>]) -> BTreeSet<BTreeSet<u64>> {
        clusters
            .iter()
            .map(|c| c.iter().map(|e| e.line).collect())
            .collect()
    }

    #[test]
    fn test_identical_pair_forms_one_cluster() {
        let r1 = expense("1/1", "10.00", "Food", "", 1);
        let r2 = expense("1/1", "10.00", "Food", "", 2);
        let r3 = expense("1/2", "10.00", "Food", "", 3);
        let rows = vec![r1, r2, r3];
        let clusters = find_duplicates(&rows);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0], vec![&rows[0], &rows[1]]);
    }

    #[test]
    fn test_amount_compared_literally() {
        let rows = vec![
            expense("1/1", "12.00", "Food", "", 1),
            expense("1/1", "12.0", "Food", "", 2),
        ];
        assert!(find_duplicates(&rows).is_empty());
    }

    #[test]
    fn test_check_number_is_part_of_key() {
        let rows = vec![
            expense("1/1", "12.00", "Rent", "101", 1),
            expense("1/1", "12.00", "Rent", "102", 2),
        ];
        assert!(find_duplicates(&rows).is_empty());
    }

    #[test]
    fn test_property_and_source_do_not_matter() {
        let mut a = expense("1/1", "12.00", "Rent", "", 1);
        let mut b = expense("1/1", "12.00", "Rent", "", 2);
        a.property = "Elm St".to_string();
        b.property = "Oak Ave".to_string();
        a.source = "receipt".to_string();
        b.source = "statement".to_string();
        let rows = vec![a, b];
        assert_eq!(find_duplicates(&rows).len(), 1);
    }

    #[test]
    fn test_clusters_are_disjoint_and_maximal() {
        let rows = vec![
            expense("1/1", "5.00", "A", "", 1),
            expense("1/2", "6.00", "B", "", 2),
            expense("1/1", "5.00", "A", "", 3),
            expense("1/2", "6.00", "B", "", 4),
            expense("1/1", "5.00", "A", "", 5),
            expense("1/3", "7.00", "C", "", 6),
        ];
        let clusters = find_duplicates(&rows);
        let lines: Vec<Vec<u64>> = clusters
            .iter()
            .map(|c| c.iter().map(|e| e.line).collect())
            .collect();
        assert_eq!(lines, vec![vec![1, 3, 5], vec![2, 4]]);
    }

    #[test]
    fn test_partition_is_order_independent() {
        let rows = vec![
            expense("1/1", "5.00", "A", "", 1),
            expense("1/2", "6.00", "B", "", 2),
            expense("1/1", "5.00", "A", "", 3),
            expense("1/2", "6.00", "B", "", 4),
            expense("1/1", "5.00", "A", "", 5),
            expense("1/3", "7.00", "C", "", 6),
        ];
        let forward = partition(&find_duplicates(&rows));
        let reversed = partition(&find_duplicates(rows.iter().rev()));
        let rotated = partition(&find_duplicates(rows[3..].iter().chain(&rows[..3])));
        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_empty_and_single_inputs() {
        let none: Vec<Expense> = Vec::new();
        assert!(find_duplicates(&none).is_empty());
        let one = vec![expense("1/1", "5.00", "A", "", 1)];
        assert!(find_duplicates(&one).is_empty());
    }
}
