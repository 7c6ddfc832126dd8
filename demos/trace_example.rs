use des_subkeys::{derive_subkeys_with, parse_bit_key, BitBuffer, RoundKey, ScheduleObserver};


// Prints the intermediate values in the layout of the classic worked example.
struct Printer;

impl ScheduleObserver for Printer {
    fn permuted_key(&mut self, permuted: &BitBuffer) {
        println!("\nAfter permuted choice 1 - Active key:\n{}", permuted);
    }

    fn halves(&mut self, round: usize, c: &BitBuffer, d: &BitBuffer) {
        if round == 0 {
            println!("\nC: {}\nD: {}", c, d);
        }
    }

    fn shifted(&mut self, round: usize, cd: &BitBuffer) {
        println!("\nSubkey #{} after shifting:\n{}", round, cd);
    }

    fn subkey(&mut self, round: usize, subkey: &RoundKey) {
        println!("\nSubkey #{} after permuted choice 2:\n{}", round, subkey);
    }
}


fn main() {
    let key = parse_bit_key(
        "00010011 00110100 01010111 01111001 10011011 10111100 11011111 11110001",
    )
    .unwrap();
    println!("Input key:\n{}", BitBuffer::from_bytes(&key));

    derive_subkeys_with(&key, &mut Printer);
}
