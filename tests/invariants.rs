use proptest::prelude::*;
use unrolled_list::{Error, UnrolledList};

fn encode(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

fn value_at(list: &UnrolledList, index: usize) -> u32 {
    let mut out = [0; 4];
    list.get_into(index, &mut out).unwrap();
    u32::from_le_bytes(out)
}

fn values(list: &UnrolledList) -> Vec<u32> {
    (0..list.len()).map(|i| value_at(list, i)).collect()
}

/// Item count, node count and the half-full rule, read off the node layout.
fn check_layout(list: &UnrolledList) -> Result<(), String> {
    let lens = list.node_lens();
    let half = list.items_per_node() / 2;
    if lens.iter().sum::<usize>() != list.len() {
        return Err(format!("len {} != sum of {:?}", list.len(), lens));
    }
    if lens.len() != list.node_count() {
        return Err(format!("node_count {} != {:?}", list.node_count(), lens));
    }
    if let Some((_, body)) = lens.split_last() {
        if body.iter().any(|&used| used < half) {
            return Err(format!("node below {} items in {:?}", half, lens));
        }
    }
    if lens.len() > 1 && lens.contains(&0) {
        return Err(format!("empty node kept in {:?}", lens));
    }
    if lens.iter().any(|&used| used > list.items_per_node()) {
        return Err(format!("overfull node in {:?}", lens));
    }
    Ok(())
}

fn assert_layout(list: &UnrolledList) {
    if let Err(msg) = check_layout(list) {
        panic!("{}", msg);
    }
}

#[test]
fn round_trip_at_many_capacities() {
    for &cap in &[2, 3, 7, 32, 256] {
        let mut list = UnrolledList::new(4, cap).unwrap();
        for i in 0..1000 {
            list.insert(list.len(), &encode(i)).unwrap();
            assert_layout(&list);
        }
        assert_eq!(values(&list), (0..1000).collect::<Vec<_>>(), "cap {}", cap);
    }
}

#[test]
fn random_inserts_keep_markers_in_place() {
    let indices = [4, 18, 205, 250, 348, 444, 598, 770, 899, 989];
    let mut list = UnrolledList::new(4, 3).unwrap();
    for i in 0..1000 {
        list.append(&encode(i)).unwrap();
    }
    for (k, &index) in indices.iter().enumerate() {
        list.insert(index, &encode(k as u32 + 100)).unwrap();
        assert_layout(&list);
    }
    assert_eq!(list.len(), 1010);

    let mut found = 0;
    for i in 0..list.len() {
        if indices.contains(&i) {
            assert_eq!(value_at(&list, i), found + 100);
            found += 1;
        } else {
            assert_eq!(value_at(&list, i), i as u32 - found);
        }
    }
    assert_eq!(found, 10);
}

#[test]
fn shrink_from_head() {
    for &cap in &[2, 3, 4, 7] {
        let n = cap as u32 * 10;
        let mut list = UnrolledList::new(4, cap).unwrap();
        for i in 0..n {
            list.append(&encode(i)).unwrap();
        }
        for popped in 0..n {
            let mut out = [0; 4];
            list.pop(0, Some(&mut out)).unwrap();
            assert_eq!(u32::from_le_bytes(out), popped);
            assert_layout(&list);
            assert_eq!(values(&list), (popped + 1..n).collect::<Vec<_>>());
        }
        assert!(list.is_empty());
        assert_eq!(list.node_count(), 1);
    }
}

#[test]
fn grow_with_small_nodes() {
    // append only: every node full but the tail
    let mut list = UnrolledList::new(4, 4).unwrap();
    for i in 0..18 {
        list.append(&encode(i)).unwrap();
    }
    assert_eq!(list.node_lens(), vec![4, 4, 4, 4, 2]);

    // prepend only: splits leave half-full nodes behind the head
    let mut list = UnrolledList::new(4, 4).unwrap();
    for i in 0..18 {
        list.insert(0, &encode(i)).unwrap();
        assert_layout(&list);
    }
    assert_eq!(values(&list), (0..18).rev().collect::<Vec<_>>());

    // repeated inserts into the middle of a full run
    let mut list = UnrolledList::new(4, 4).unwrap();
    let mut model: Vec<u32> = (0..8).collect();
    for &i in &model {
        list.append(&encode(i)).unwrap();
    }
    for i in 100..120 {
        list.insert(5, &encode(i)).unwrap();
        model.insert(5, i);
        assert_layout(&list);
    }
    assert_eq!(values(&list), model);
}

#[test]
fn shrink_from_tail_and_middle() {
    let mut list = UnrolledList::new(4, 4).unwrap();
    let mut model: Vec<u32> = (0..40).collect();
    for &i in &model {
        list.append(&encode(i)).unwrap();
    }
    while model.len() > 20 {
        let last = model.len() - 1;
        assert_eq!(list.remove(last).unwrap(), encode(model.pop().unwrap()));
        assert_layout(&list);
    }
    while model.len() > 2 {
        let mid = model.len() / 2;
        list.pop(mid, None).unwrap();
        model.remove(mid);
        assert_layout(&list);
        assert_eq!(values(&list), model);
    }
    list.pop(1, None).unwrap();
    list.pop(0, None).unwrap();
    assert!(list.is_empty());
    assert_eq!(list.node_lens(), vec![0]);
}

#[test]
fn cursor_restarts_after_end() {
    let mut list = UnrolledList::new(4, 3).unwrap();
    for i in 0..10 {
        list.append(&encode(i)).unwrap();
    }
    let mut forward = Vec::new();
    for _ in 0..2 {
        while let Some(item) = list.next_item().unwrap() {
            forward.push(item.to_vec());
        }
    }
    let expected: Vec<Vec<u8>> = (0..10).map(|i| encode(i).to_vec()).collect();
    assert_eq!(forward.len(), 20);
    assert_eq!(&forward[..10], &expected[..]);
    assert_eq!(&forward[10..], &expected[..]);

    list.set_iteration_start(4).unwrap();
    let mut backward = Vec::new();
    while let Some(item) = list.previous_item().unwrap() {
        backward.push(item.to_vec());
    }
    assert_eq!(backward.len(), 5);
    assert_eq!(backward[0], encode(4).to_vec());
    assert_eq!(backward[4], encode(0).to_vec());
}

#[test]
fn create_and_destroy_errors() {
    assert!(matches!(UnrolledList::new(0, 8), Err(Error::InvalidParam(_))));
    assert!(matches!(UnrolledList::new(4, 1), Err(Error::InvalidParam(_))));

    let mut list = UnrolledList::new(4, 2).unwrap();
    list.append(&encode(1)).unwrap();
    assert_eq!(list.destroy(), Ok(()));
    assert_eq!(list.destroy(), Err(Error::AlreadyDestroyed));
}

#[derive(Debug, Clone)]
enum Op {
    Insert { at: usize, value: u32 },
    Append { value: u32 },
    Pop { at: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), any::<u32>()).prop_map(|(at, value)| Op::Insert { at, value }),
        any::<u32>().prop_map(|value| Op::Append { value }),
        any::<usize>().prop_map(|at| Op::Pop { at }),
    ]
}

proptest! {
    #[test]
    fn prop_matches_vec_model(
        cap in 2usize..10,
        ops in prop::collection::vec(arb_op(), 1..300),
    ) {
        let mut list = UnrolledList::new(4, cap).unwrap();
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Op::Insert { at, value } => {
                    let at = at % (model.len() + 1);
                    list.insert(at, &encode(value)).unwrap();
                    model.insert(at, value);
                }
                Op::Append { value } => {
                    list.append(&encode(value)).unwrap();
                    model.push(value);
                }
                Op::Pop { at } => {
                    if model.is_empty() {
                        prop_assert_eq!(
                            list.pop(0, None),
                            Err(Error::IndexOutOfRange { index: 0, len: 0 })
                        );
                        continue;
                    }
                    let at = at % model.len();
                    let mut out = [0; 4];
                    list.pop(at, Some(&mut out)).unwrap();
                    prop_assert_eq!(u32::from_le_bytes(out), model.remove(at));
                }
            }
            prop_assert_eq!(check_layout(&list), Ok(()));
            prop_assert_eq!(list.len(), model.len());
        }

        prop_assert_eq!(values(&list), model.clone());
        let backwards: Vec<u32> = list
            .iter()
            .rev()
            .map(|item| u32::from_le_bytes([item[0], item[1], item[2], item[3]]))
            .collect();
        prop_assert_eq!(backwards, model.iter().rev().copied().collect::<Vec<_>>());
    }
}
