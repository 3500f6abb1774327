use std::collections::HashSet;
use std::time::Instant;

use rand::prelude::*;
use wormhole_filter::WormholeFilter;

fn main() {
    let key_count = 1_000_000_u64;
    let query_count = 1_000_000_u64;

    let mut rng = StdRng::seed_from_u64(0xDEAD_BEEF);
    let mut keys = HashSet::with_capacity(key_count as usize);
    while (keys.len() as u64) < key_count {
        keys.insert(rng.gen::<u64>());
    }

    let mut filter = WormholeFilter::new(key_count * 2).unwrap();

    let fill_start = Instant::now();
    let mut added = 0_u64;
    for &key in &keys {
        if filter.insert(key) {
            added += 1;
        }
    }
    let fill_time = fill_start.elapsed();

    let mut positives = 0_u64;
    let mut false_positives = 0_u64;

    let query_start = Instant::now();
    for _ in 0..query_count {
        let key = rng.gen::<u64>();
        if filter.contains(key) {
            positives += 1;
            if !keys.contains(&key) {
                false_positives += 1;
            }
        }
    }
    let query_time = query_start.elapsed();

    let fp_rate = false_positives as f64 / query_count as f64;

    println!("inserted {added}/{key_count} keys in {fill_time:?}");
    println!("load factor: {:.3}", filter.load_factor());
    println!("table size: {} bytes", filter.size_in_bytes());
    println!("ran {query_count} fresh queries in {query_time:?}");
    println!("positives: {positives}");
    println!("false positives: {false_positives}");
    println!("false positive rate: {:.6}%", fp_rate * 100.0);
}
