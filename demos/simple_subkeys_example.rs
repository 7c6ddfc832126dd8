use des_subkeys::des;


fn main() {
    let sample_key: u64 = 0x133457799BBCDFF1;

    let expected_first_key: u64 = 0x1B02EFFC7072;

    let keys: [u64; 16] = des::generate_round_keys(sample_key);
    println!("K1({:016X}) should be: {:012X}", sample_key, expected_first_key);
    println!("Actually derived value: {:012X}", keys[0]);
    for (i, k) in keys.iter().enumerate() {
        println!("K{}: {:012X}", i + 1, k);
    }
}
