//! Property tests: the array behaves like a plain sequence model and its
//! structural invariants hold after every operation.

use proptest::prelude::*;
use slotvec_array::GrowableArray;

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Erase(usize),
    Reserve(usize),
    Resize(usize),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        2 => Just(Op::Pop),
        3 => (0usize..40, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => (0usize..40).prop_map(Op::Erase),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => (0usize..48).prop_map(Op::Resize),
        1 => Just(Op::Clear),
    ]
}

/// Apply `op` to both the array and a `Vec` model. Out-of-range positions
/// must be rejected by the array and leave both unchanged.
fn apply(array: &mut GrowableArray<i32>, model: &mut Vec<i32>, op: &Op) {
    match *op {
        Op::Push(v) => {
            array.push_back(v).unwrap();
            model.push(v);
        }
        Op::Pop => {
            assert_eq!(array.pop_back(), model.pop());
        }
        Op::Insert(i, v) => {
            let result = array.insert(i, v);
            if i <= model.len() {
                assert_eq!(result, Ok(i));
                model.insert(i, v);
            } else {
                assert!(result.is_err());
            }
        }
        Op::Erase(i) => {
            let result = array.erase(i);
            if i < model.len() {
                assert_eq!(result, Ok(i));
                model.remove(i);
            } else {
                assert!(result.is_err());
            }
        }
        Op::Reserve(c) => array.reserve(c).unwrap(),
        Op::Resize(n) => {
            array.resize(n).unwrap();
            model.resize(n, 0);
        }
        Op::Clear => {
            array.clear();
            model.clear();
        }
    }
}

proptest! {
    #[test]
    fn matches_vec_model_and_keeps_invariants(ops in prop::collection::vec(arb_op(), 0..120)) {
        let mut array = GrowableArray::new();
        let mut model = Vec::new();
        let mut last_capacity = 0;
        for op in &ops {
            apply(&mut array, &mut model, op);
            prop_assert!(array.len() <= array.capacity());
            prop_assert!(array.capacity() >= last_capacity);
            prop_assert_eq!(array.as_slice(), model.as_slice());
            last_capacity = array.capacity();
        }
    }

    #[test]
    fn insert_then_erase_restores_sequence(
        values in prop::collection::vec(any::<i32>(), 0..50),
        pos in any::<prop::sample::Index>(),
        extra in any::<i32>(),
    ) {
        let mut array = GrowableArray::new();
        for &v in &values {
            array.push_back(v).unwrap();
        }
        let at = pos.index(values.len() + 1);
        let inserted = array.insert(at, extra).unwrap();
        prop_assert_eq!(array[inserted], extra);
        prop_assert_eq!(array.erase(inserted).unwrap(), at);
        prop_assert_eq!(array.as_slice(), values.as_slice());
    }

    #[test]
    fn appends_follow_doubling(n in 1usize..300) {
        let mut array = GrowableArray::new();
        for i in 0..n {
            array.emplace_back(|| Ok(i)).unwrap();
            prop_assert_eq!(array.capacity(), (i + 1).next_power_of_two());
        }
    }

    #[test]
    fn take_is_a_full_transfer(values in prop::collection::vec(any::<u16>(), 0..64)) {
        let mut source = GrowableArray::new();
        for &v in &values {
            source.push_back(v).unwrap();
        }
        let capacity = source.capacity();
        let mut target = GrowableArray::new();
        target.move_assign(&mut source);
        prop_assert_eq!(target.as_slice(), values.as_slice());
        prop_assert_eq!(target.capacity(), capacity);
        prop_assert_eq!((source.len(), source.capacity()), (0, 0));
    }
}
