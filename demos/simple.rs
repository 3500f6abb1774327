use wormhole_filter::WormholeFilter;

fn main() {
    let mut filter = WormholeFilter::new(1024).unwrap();

    let key = 0x9E37_79B9_7F4A_7C15_u64;
    assert!(filter.insert(key));

    println!("contains inserted key: {}", filter.contains(key));
    println!("contains other key:    {}", filter.contains(0x0123_4567_89AB_CDEF));

    assert!(filter.remove(key));
    println!("contains after remove: {}", filter.contains(key));

    println!("{:?} using {} bytes", filter, filter.size_in_bytes());
}
