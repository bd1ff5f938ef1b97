use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use strided_linalg::arity::{self, Boxed, Fixed, FixedVector, Packed};
use strided_linalg::{Matrix, StridedRange, Vector};

/// `inspect(construct(seq))` gives `seq` back, for one storage and arity.
fn assert_round_trip<V: FixedVector<f64, N>, const N: usize>(seq: &[f64]) {
    let v = V::construct(|i| seq[i]);
    let collected = v.inspect(Vec::new(), |mut acc, x| {
        acc.push(x);
        acc
    });
    assert_eq!(collected, seq);
}

fn round_trip_all<const N: usize>(rng: &mut StdRng) {
    let seq: Vec<f64> = (0..N).map(|_| rng.sample(StandardNormal)).collect();
    assert_round_trip::<[f64; N], N>(&seq);
    assert_round_trip::<Boxed<f64, N>, N>(&seq);
    assert_round_trip::<Packed<f64, N>, N>(&seq);
    assert_round_trip::<Fixed<f64, N>, N>(&seq);
}

#[test]
fn test_construct_inspect_round_trip() {
    let mut rng = StdRng::seed_from_u64(0);
    round_trip_all::<0>(&mut rng);
    round_trip_all::<1>(&mut rng);
    round_trip_all::<3>(&mut rng);
    round_trip_all::<16>(&mut rng);
}

#[test]
fn test_derived_ops_agree_across_storages() {
    let a = [1.0f64, 2.0, 3.0, 4.0];
    let packed: Packed<f64, 4> = arity::convert(&a);
    let boxed: Boxed<f64, 4> = arity::convert(&a);

    let via_array: [f64; 4] = arity::map(&a, |x: f64| x.sqrt());
    let via_packed: [f64; 4] = arity::map(&packed, |x: f64| x.sqrt());
    assert_eq!(via_array, via_packed);

    assert_eq!(arity::dot(&a, &boxed), arity::dot(&packed, &a));
    assert_eq!(arity::sum(&boxed), 10.0);

    let head: Boxed<f64, 2> = arity::slice(&packed, 0);
    let tail: [f64; 2] = arity::slice(&boxed, 2);
    let whole: Packed<f64, 4> = arity::concat(&head, &tail);
    assert!(arity::eq(&whole, &a));
}

#[test]
fn test_vector_slice_matches_stride_arithmetic() {
    let data: Vec<f64> = (0..20).map(|x| x as f64).collect();
    let v = Vector::from_vec(data.clone());
    for (start, end, step) in [(0, 20, 1), (3, 17, 4), (19, 0, -3), (5, 5, 2), (0, 20, 7)] {
        let s = v.slice(StridedRange::new(start, end, step)).unwrap();
        for i in 0..s.len() {
            let expected = data[(start as isize + i as isize * step) as usize];
            assert_eq!(s[i], expected);
        }
    }
}

#[test]
fn test_matrix_slice_matches_stride_arithmetic() {
    let (rows, cols) = (6, 7);
    let a = Matrix::from_fn(rows, cols, |i, j| (i * cols + j) as f64);
    let s = a
        .slice(StridedRange::new(5, 0, -2), StridedRange::new(1, 7, 3))
        .unwrap();
    assert_eq!(s.shape(), [3, 2]);
    for i in 0..3 {
        for j in 0..2 {
            assert_eq!(s.get(i, j), a.get(5 - 2 * i, 1 + 3 * j));
        }
    }

    // Slicing a transposed view reads through both stride swaps.
    let st = a.t().slice(2..4, ..).unwrap();
    for i in 0..2 {
        for j in 0..rows {
            assert_eq!(st.get(i, j), a.get(j, 2 + i));
        }
    }
}

#[test]
fn test_freeze_and_thaw_isolate_buffers() {
    let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]);
    let mut m = a.thaw();
    m.set(0, 0, -1.0);
    assert_eq!(a.get(0, 0), 1.0);

    let frozen = m.freeze();
    let alias = frozen.clone();
    assert!(alias.shares_buffer(&frozen));
    assert_eq!(frozen.get(0, 0), -1.0);
}

#[test]
fn test_views_are_send_and_sync() {
    fn assert_send_sync<X: Send + Sync>() {}
    assert_send_sync::<Vector<f64>>();
    assert_send_sync::<Matrix<f64>>();

    let a = Matrix::from_fn(3, 3, |i, j| (i + j) as f64);
    let col = a.col(1);
    let handle = std::thread::spawn(move || col.to_vec());
    assert_eq!(handle.join().unwrap(), vec![1.0, 2.0, 3.0]);
}
