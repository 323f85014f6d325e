use super::*;

fn row(n: i64) -> Row {
    let mut r = Row::new();
    r.insert("n".to_string(), Value::from(n));
    r
}

#[test]
fn sequential_feeder_exhausts_after_its_rows() {
    let f = SequentialFeeder::new("seq", vec![row(1), row(2)]);
    assert!(f.has_next());
    assert_eq!(f.next().unwrap()["n"], 1);
    assert!(f.has_next());
    assert_eq!(f.next().unwrap()["n"], 2);
    assert!(!f.has_next());
    assert!(f.next().is_none());
}

#[test]
fn sequential_feeder_last_row_succeeds_then_exhausts() {
    let f = SequentialFeeder::new("seq", vec![row(1)]);
    assert!(f.has_next());
    assert!(f.next().is_some());
    assert!(!f.has_next());
    assert!(f.next().is_none());
}

#[test]
fn circular_feeder_never_reports_exhaustion() {
    let f = CircularFeeder::new("circ", vec![row(1), row(2)]);
    let seen: Vec<_> = (0..5).map(|_| f.next().unwrap()["n"].as_i64().unwrap()).collect();
    assert_eq!(seen, vec![1, 2, 1, 2, 1]);
    assert!(f.has_next());
}

#[test]
fn random_feeder_always_has_next_and_only_yields_known_rows() {
    let f = RandomFeeder::new("rand", vec![row(1), row(2), row(3)]);
    for _ in 0..50 {
        assert!(f.has_next());
        let v = f.next().unwrap()["n"].as_i64().unwrap();
        assert!((1..=3).contains(&v));
    }
}

#[test]
fn feeders_are_thread_safe_by_construction() {
    use std::sync::Arc;
    let f: Arc<dyn Feeder> = Arc::new(CircularFeeder::new("circ", vec![row(1)]));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let f = Arc::clone(&f);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    assert!(f.next().is_some());
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
