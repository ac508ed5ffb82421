mod common;

use common::{for_each_strategy, make_queue};
use dmxp_cmdqueue::{BoundedQueue, QueueBuilder, QueueError};

#[test]
fn fifo_order() {
    for_each_strategy(|strategy| {
        let queue = make_queue(strategy, 16, 32);
        for i in 0..16u8 {
            assert_eq!(queue.push(&[i, i.wrapping_mul(3), 0xEE]).unwrap(), 3);
        }
        for i in 0..16u8 {
            let record = queue.pop_record().unwrap();
            assert_eq!(record.as_bytes(), &[i, i.wrapping_mul(3), 0xEE], "{strategy}");
        }
        assert!(matches!(queue.pop_record(), Err(QueueError::QueueEmpty)));
    });
}

#[test]
fn capacity_plus_one_push_fails() {
    for_each_strategy(|strategy| {
        let queue = make_queue(strategy, 5, 8);
        for _ in 0..5 {
            assert!(queue.push(b"abc").is_ok());
        }
        assert!(matches!(queue.push(b"abc"), Err(QueueError::QueueFull)));
        assert_eq!(queue.len(), 5);
    });
}

#[test]
fn capacity_four_scenario() {
    for_each_strategy(|strategy| {
        let queue = make_queue(strategy, 4, 128);
        let records: Vec<[u8; 8]> = (0..5u8).map(|i| [i; 8]).collect();

        for r in &records[..4] {
            assert_eq!(queue.push(r).unwrap(), 8);
        }
        assert!(matches!(queue.push(&records[4]), Err(QueueError::QueueFull)));

        let mut out = [0u8; 128];
        assert_eq!(queue.pop(&mut out).unwrap(), 8);
        assert_eq!(&out[..8], &records[0]);

        assert_eq!(queue.push(&records[4]).unwrap(), 8);

        for expected in &records[1..] {
            assert_eq!(queue.pop(&mut out).unwrap(), 8);
            assert_eq!(&out[..8], expected);
        }
        assert!(queue.is_empty());
    });
}

#[test]
fn empty_queue_does_not_block() {
    for_each_strategy(|strategy| {
        let queue = make_queue(strategy, 2, 8);
        let mut out = [0u8; 8];
        assert!(matches!(queue.pop(&mut out), Err(QueueError::QueueEmpty)));
        assert!(!queue.poll());
        queue.push(b"x").unwrap();
        assert!(queue.poll());
    });
}

#[test]
fn round_trip_every_length() {
    for_each_strategy(|strategy| {
        let max = 64;
        let queue = make_queue(strategy, 3, max);
        let mut rng = fastrand::Rng::with_seed(0x5EED);
        let mut out = vec![0u8; max];

        for len in 1..=max {
            let mut payload = vec![0u8; len];
            rng.fill(&mut payload);
            assert_eq!(queue.push(&payload).unwrap(), len);
            out.fill(0);
            assert_eq!(queue.pop(&mut out).unwrap(), len);
            assert_eq!(&out[..len], &payload[..]);
        }
    });
}

#[test]
fn rejects_bad_payloads() {
    let queue = make_queue(Default::default(), 2, 8);
    assert!(matches!(queue.push(&[]), Err(QueueError::InvalidArgument(_))));
    assert!(matches!(queue.push(&[0u8; 9]), Err(QueueError::InvalidArgument(_))));
    assert_eq!(queue.push(&[0u8; 8]).unwrap(), 8);
    assert_eq!(queue.len(), 1);
}

#[test]
fn short_output_buffer_keeps_record() {
    let queue = make_queue(Default::default(), 2, 8);
    queue.push(b"abcdef").unwrap();

    let mut small = [0u8; 4];
    assert!(matches!(queue.pop(&mut small), Err(QueueError::InvalidArgument(_))));
    assert_eq!(queue.len(), 1);

    let mut big = [0u8; 8];
    assert_eq!(queue.pop(&mut big).unwrap(), 6);
    assert_eq!(&big[..6], b"abcdef");
}

#[test]
fn rejects_bad_construction() {
    assert!(matches!(
        QueueBuilder::new().with_capacity(0).build(),
        Err(QueueError::InvalidArgument(_))
    ));
    assert!(matches!(
        QueueBuilder::new().with_max_record_size(0).build(),
        Err(QueueError::InvalidArgument(_))
    ));
}

#[test]
fn oversized_construction_is_an_error_not_a_panic() {
    assert!(matches!(
        QueueBuilder::new().with_capacity(usize::MAX).build(),
        Err(QueueError::InvalidArgument(_))
    ));
    assert!(matches!(
        QueueBuilder::new().with_max_record_size(usize::MAX).build(),
        Err(QueueError::InvalidArgument(_))
    ));
    assert!(matches!(
        QueueBuilder::new()
            .with_capacity(1)
            .with_max_record_size(usize::MAX)
            .build(),
        Err(QueueError::Init(_))
    ));
}

#[test]
fn builder_defaults() {
    let queue = QueueBuilder::new().build().unwrap();
    assert_eq!(queue.capacity(), 100);
    assert_eq!(queue.max_record_size(), 128);
    assert_eq!(queue.wait_strategy(), dmxp_cmdqueue::WaitStrategy::Condvar);
    assert!(format!("{:?}", queue).contains("capacity: 100"));
}

#[test]
fn shutdown_requires_last_handle() {
    for_each_strategy(|strategy| {
        let queue = make_queue(strategy, 2, 8);
        let other = queue.clone();
        match BoundedQueue::shutdown(queue) {
            Err(QueueError::InUse { refs }) => assert_eq!(refs, 1),
            unexpected => panic!("expected InUse, got {:?}", unexpected),
        }
        assert!(BoundedQueue::shutdown(other).is_ok());
    });
}

#[test]
fn push_and_pop_survive_cancellation() {
    for_each_strategy(|strategy| {
        let queue = make_queue(strategy, 2, 8);
        queue.cancel().unwrap();
        assert!(queue.is_cancelled());
        queue.push(b"late").unwrap();
        assert_eq!(queue.pop_record().unwrap().as_bytes(), b"late");
        assert!(matches!(queue.wait_indefinite(), Err(QueueError::Cancelled)));
    });
}
