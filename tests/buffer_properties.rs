use proptest::prelude::*;
use slotrc::{BufferConfig, BufferError, GrowableSlotBuffer, GrowthPolicy, Word};

fn policy() -> impl Strategy<Value = GrowthPolicy> {
    prop_oneof![
        (1usize..16).prop_map(|increment| GrowthPolicy::Fixed { increment }),
        Just(GrowthPolicy::Doubling),
    ]
}

proptest! {
    #[test]
    fn pushes_are_read_back_in_order(words in prop::collection::vec(any::<u64>(), 0..200), initial in 0usize..12, growth in policy()) {
        let mut buffer = GrowableSlotBuffer::with_config(BufferConfig { initial_capacity: initial, growth }).unwrap();
        for &w in &words {
            buffer.push(Word(w)).unwrap();
        }

        prop_assert_eq!(buffer.len(), words.len());
        prop_assert_eq!(buffer.length(), words.len() as f64);
        for (i, &w) in words.iter().enumerate() {
            prop_assert_eq!(buffer.get(i).unwrap(), Word(w));
        }
    }

    #[test]
    fn growth_happens_only_when_full(n in 0usize..150, initial in 0usize..12, increment in 1usize..16) {
        let mut buffer = GrowableSlotBuffer::with_config(BufferConfig::fixed(initial, increment)).unwrap();

        for i in 0..n {
            let capacity = buffer.capacity();
            let events = buffer.growth_events();
            buffer.push(Word(i as u64)).unwrap();

            if i == capacity {
                prop_assert_eq!(buffer.capacity(), capacity + increment);
                prop_assert_eq!(buffer.growth_events(), events + 1);
            } else {
                prop_assert_eq!(buffer.capacity(), capacity);
                prop_assert_eq!(buffer.growth_events(), events);
            }
            prop_assert!(buffer.len() <= buffer.capacity());
        }
    }

    #[test]
    fn out_of_range_reads_are_errors(n in 0usize..40, index in any::<f64>()) {
        let mut buffer = GrowableSlotBuffer::new();
        for i in 0..n {
            buffer.push(Word(i as u64)).unwrap();
        }

        let in_range = index.is_finite() && index.trunc() >= 0.0 && (index.trunc() as usize) < n;
        match buffer.get_at(index) {
            Ok(word) => {
                prop_assert!(in_range);
                prop_assert_eq!(word, Word(index.trunc() as u64));
            }
            Err(BufferError::IndexOutOfRange { length, .. }) => {
                prop_assert!(!in_range);
                prop_assert_eq!(length, n);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}

#[test]
fn reference_scenario_twenty_three_pushes() {
    let mut buffer = GrowableSlotBuffer::with_config(BufferConfig::reference()).unwrap();
    let values: Vec<f64> = (1..=23).map(|i| i as f64 * 0.5).collect();

    for &v in &values {
        buffer.push(Word::from_f64(v)).unwrap();
    }

    assert_eq!(buffer.growth_events(), 2);
    assert_eq!(buffer.capacity(), 30);
    assert_eq!(buffer.len(), 23);
    assert_eq!(buffer.get(22).unwrap().as_f64(), values[22]);
    assert!(buffer.get(23).is_err());
}
