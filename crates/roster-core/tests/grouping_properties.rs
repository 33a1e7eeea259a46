use proptest::prelude::*;
use roster_core::*;
use serde_json::json;

fn records_from(keys: &[(u8, bool)]) -> Vec<Record> {
    keys.iter()
        .enumerate()
        .map(|(i, (bucket, has_key))| {
            if *has_key {
                Record::new(json!({"id": i, "meta": {"bucket": bucket}}))
            } else {
                Record::new(json!({"id": i, "meta": {}}))
            }
        })
        .collect()
}

fn ids(records: &[Record]) -> Vec<u64> {
    records
        .iter()
        .filter_map(|r| r.get("id").and_then(serde_json::Value::as_u64))
        .collect()
}

proptest! {
    #[test]
    fn prop_grouping_partitions_input(
        keys in proptest::collection::vec((0u8..6, any::<bool>()), 0..300),
        chunk in 1usize..64,
    ) {
        let records = records_from(&keys);
        let path = KeyPath::parse("meta.bucket").unwrap();

        let mut acc = GroupAccumulator::new(path.clone());
        for slice in records.chunks(chunk) {
            acc.push_chunk(slice);
        }
        prop_assert_eq!(acc.seen(), records.len());
        let snapshot = acc.finish(Generation(1), SortPolicy::FirstSeen);

        // Every record lands in exactly one group.
        prop_assert_eq!(snapshot.record_count(), records.len());
        let mut seen: Vec<u64> = snapshot.iter().flat_map(|(_, group)| ids(group)).collect();
        seen.sort_unstable();
        let expected: Vec<u64> = (0..records.len() as u64).collect();
        prop_assert_eq!(seen, expected);

        // Source order is kept inside each group.
        for (_, group) in snapshot.iter() {
            let group_ids = ids(group);
            prop_assert!(group_ids.windows(2).all(|w| w[0] < w[1]));
        }

        // Keys appear in first-seen order, whatever the chunk boundaries.
        let mut first_seen: Vec<GroupKey> = Vec::new();
        for record in &records {
            let key = resolve_key(record, &path);
            if !first_seen.contains(&key) {
                first_seen.push(key);
            }
        }
        let order: Vec<GroupKey> = snapshot.keys().cloned().collect();
        prop_assert_eq!(order, first_seen);

        // Chunked and single-pass grouping agree.
        let single = group_now(
            Generation(1),
            &records,
            path,
            GroupingOptions::new().with_sort(SortPolicy::FirstSeen),
        );
        prop_assert_eq!(&snapshot, &single);
    }

    #[test]
    fn prop_task_pool_matches_single_pass_for_any_chunk(
        keys in proptest::collection::vec((0u8..6, any::<bool>()), 0..200),
        chunk in 1usize..32,
    ) {
        let records = records_from(&keys);
        let path = KeyPath::parse("meta.bucket").unwrap();
        let options = GroupingOptions::new()
            .with_chunk_size(chunk)
            .unwrap()
            .with_sort(SortPolicy::FirstSeen);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let pooled = runtime.block_on(async {
            let engine = TaskPoolEngine::try_current().unwrap();
            let job = GroupingJob::new(Generation(2), records.clone(), path.clone()).with_options(options);
            group_async(&engine, job).await
        });

        let single = group_now(Generation(2), &records, path, options);
        prop_assert_eq!(pooled, Some(single));
    }

    #[test]
    fn prop_window_is_always_a_growing_prefix(
        keys in proptest::collection::vec((0u8..4, any::<bool>()), 1..200),
        budget in 1usize..50,
    ) {
        let records = records_from(&keys);
        let snapshot = group_now(
            Generation(1),
            &records,
            KeyPath::parse("meta.bucket").unwrap(),
            GroupingOptions::default(),
        );
        let budget = RevealBudget::new(budget).unwrap();

        let mut window = VisibleWindow::empty();
        let steps = records.len() / budget.get() + 2;
        for _ in 0..steps {
            let next = advance(&snapshot, &window, budget);
            prop_assert!(next.revealed_count() - window.revealed_count() <= budget.get());
            for (key, group) in snapshot.iter() {
                let shown = next.get(key.as_str()).unwrap_or(&[]);
                prop_assert!(shown.len() >= window.len_of(key.as_str()));
                prop_assert_eq!(shown, &group[..shown.len()]);
            }
            window = next;
        }
        prop_assert!(window.covers(&snapshot));
    }
}

#[test]
fn name_bucketing_is_case_insensitive() {
    let records: Vec<Record> = ["alice", "Bob", "anna"]
        .iter()
        .map(|name| Record::new(json!({ "name": name })))
        .collect();

    let snapshot = group_now(
        Generation(1),
        &records,
        KeyPath::parse("name").unwrap(),
        GroupingOptions::default(),
    );

    let keys: Vec<&str> = snapshot.keys().map(GroupKey::as_str).collect();
    assert_eq!(keys, vec!["A", "B"]);
    assert_eq!(snapshot.get("A").unwrap(), &[records[0].clone(), records[2].clone()]);
    assert_eq!(snapshot.get("B").unwrap(), &[records[1].clone()]);
}

#[test]
fn missing_attributes_share_undefined_bucket() {
    let records = records_from(&[(1, true), (0, false), (1, true), (0, false)]);
    let snapshot = group_now(
        Generation(1),
        &records,
        KeyPath::parse("meta.bucket").unwrap(),
        GroupingOptions::default().with_sort(SortPolicy::FirstSeen),
    );

    let keys: Vec<&str> = snapshot.keys().map(GroupKey::as_str).collect();
    assert_eq!(keys, vec!["1", UNDEFINED_KEY]);
    assert_eq!(snapshot.get(UNDEFINED_KEY).unwrap().len(), 2);
}

#[tokio::test]
async fn task_pool_and_inline_agree() {
    let records = records_from(&(0..900u32).map(|i| ((i % 5) as u8, i % 11 != 0)).collect::<Vec<_>>());
    let path = KeyPath::parse("meta.bucket").unwrap();

    let inline = group_async(
        &InlineEngine,
        GroupingJob::new(Generation(4), records.clone(), path.clone()),
    )
    .await
    .unwrap();
    let pooled = group_async(
        &TaskPoolEngine::try_current().unwrap(),
        GroupingJob::new(Generation(4), records, path),
    )
    .await
    .unwrap();

    assert_eq!(inline, pooled);
}
