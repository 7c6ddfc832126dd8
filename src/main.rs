extern crate clap;

use clap::{App, Arg, ArgGroup, ArgMatches};
use tracing::{debug, error, info, Level};

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::process;

use des_subkeys::*;

// Reports every intermediate value of the key schedule as a debug event.
struct TracingObserver;

impl ScheduleObserver for TracingObserver {
    fn permuted_key(&mut self, permuted: &BitBuffer) {
        debug!("after permuted choice 1: {}", permuted);
    }

    fn halves(&mut self, round: usize, c: &BitBuffer, d: &BitBuffer) {
        debug!(round, "C: {}", c);
        debug!(round, "D: {}", d);
    }

    fn shifted(&mut self, round: usize, cd: &BitBuffer) {
        debug!(round, "after shifting: {}", cd);
    }

    fn subkey(&mut self, round: usize, subkey: &RoundKey) {
        debug!(round, "after permuted choice 2: {}", subkey);
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Format {
    Bits,
    Hex,
}

// Get the key from whichever source was given, falling back to the
// standard test key.
fn read_key(args: &ArgMatches) -> Result<Key, des_subkeys::Error> {
    if let Some(text) = args.value_of("key") {
        return parse_hex_key(text);
    }
    if let Some(text) = args.value_of("bits") {
        return parse_bit_key(text);
    }
    if let Some(file_name) = args.value_of("key-file") {
        let material = fs::read(file_name)?;
        return Ok(key_from_passphrase(&material));
    }
    if args.is_present("random") {
        return Ok(random_key());
    }
    return Ok(FIPS_TEST_KEY);
}

fn render(subkey: &RoundKey, format: Format) -> String {
    match format {
        Format::Bits => subkey.to_bit_string(),
        Format::Hex => format!("{:012X}", subkey.to_u64()),
    }
}

// Derive the round keys and write them to `out`, one per line.
fn run<W: Write>(args: &ArgMatches, out: &mut W) -> Result<(), des_subkeys::Error> {
    let format = match args.value_of("format") {
        Some("hex") => Format::Hex,
        _ => Format::Bits,
    };

    let key = read_key(args)?;
    info!(?format, "deriving round keys");
    debug!(key = %hex::encode_upper(key), "input key");

    let subkeys = if args.is_present("trace") {
        derive_subkeys_with(&key, &mut TracingObserver)
    } else {
        derive_subkeys(&key)
    };

    writeln!(out, "Key: {}", hex::encode_upper(key))?;
    for (i, subkey) in subkeys.iter().enumerate() {
        writeln!(out, "K{}: {}", i + 1, render(subkey, format))?;
    }
    return Ok(());
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("des_subkeys")
        .about("Derives the sixteen DES round keys from a 64-bit key")
        .arg(
            Arg::with_name("key")
                .short("k")
                .long("key")
                .takes_value(true)
                .help("Key as 16 hex digits"),
        )
        .arg(
            Arg::with_name("bits")
                .short("b")
                .long("bits")
                .takes_value(true)
                .help("Key as 64 '0'/'1' characters"),
        )
        .arg(
            Arg::with_name("key-file")
                .short("f")
                .long("key-file")
                .takes_value(true)
                .help("Key file, the key is derived from its MD5 digest"),
        )
        .arg(
            Arg::with_name("random")
                .short("r")
                .long("random")
                .help("Use a random key"),
        )
        .group(ArgGroup::with_name("source").args(&["key", "bits", "key-file", "random"]))
        .arg(
            Arg::with_name("format")
                .long("format")
                .takes_value(true)
                .possible_values(&["bits", "hex"])
                .default_value("bits")
                .help("Output format of the round keys"),
        )
        .arg(
            Arg::with_name("trace")
                .long("trace")
                .help("Log every intermediate value"),
        )
}

fn main() -> Result<(), Box<dyn Error>> {
    let matches = app().get_matches();

    let level = match matches.is_present("trace") {
        true => Level::DEBUG,
        false => Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match run(&matches, &mut io::stdout()) {
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
        Ok(_) => {
            return Ok(());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    // Records the level of every event carrying a `key` field.
    struct KeyFieldLevels(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for KeyFieldLevels {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().fields().field("key").is_some() {
                self.0.lock().unwrap().push(*event.metadata().level());
            }
        }
    }

    fn matches_from(args: &[&str]) -> ArgMatches<'static> {
        app().get_matches_from(args.iter().cloned())
    }

    fn output_of(args: &[&str]) -> String {
        let mut out: Vec<u8> = Vec::new();
        run(&matches_from(args), &mut out).unwrap();
        return String::from_utf8(out).unwrap();
    }

    #[test]
    fn default_key_is_test_key() {
        let args = matches_from(&["test"]);
        assert_eq!(read_key(&args).unwrap(), FIPS_TEST_KEY);
    }

    #[test]
    fn hex_and_bit_sources_agree() {
        let hex_args = matches_from(&["test", "--key", "133457799BBCDFF1"]);
        let bit_args = matches_from(&[
            "test",
            "--bits",
            "0001001100110100010101110111100110011011101111001101111111110001",
        ]);
        assert_eq!(read_key(&hex_args).unwrap(), read_key(&bit_args).unwrap());
    }

    #[test]
    fn missing_key_file_is_an_error() {
        let args = matches_from(&["test", "--key-file", "/nonexistent/des_subkeys.key"]);
        assert!(matches!(read_key(&args), Err(des_subkeys::Error::Io(_))));
    }

    #[test]
    fn render_formats() {
        let subkeys = derive_subkeys(&FIPS_TEST_KEY);
        assert_eq!(render(&subkeys[0], Format::Hex), "1B02EFFC7072");
        assert_eq!(
            render(&subkeys[0], Format::Bits),
            "000110110000001011101111111111000111000001110010"
        );
    }

    #[test]
    fn key_sources_are_exclusive() {
        let result = app().get_matches_from_safe(vec![
            "des_subkeys",
            "--key",
            "133457799BBCDFF1",
            "--random",
        ]);
        assert!(result.is_err());

        let result = app().get_matches_from_safe(vec!["des_subkeys", "--bits", "01", "-f", "key.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = app().get_matches_from_safe(vec!["des_subkeys", "--format", "octal"]);
        assert!(result.is_err());
    }

    #[test]
    fn format_defaults_to_bits() {
        let args = matches_from(&["des_subkeys"]);
        assert_eq!(args.value_of("format"), Some("bits"));

        let output = output_of(&["des_subkeys"]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 17);
        assert_eq!(lines[0], "Key: 133457799BBCDFF1");
        assert_eq!(lines[1], "K1: 000110110000001011101111111111000111000001110010");
    }

    #[test]
    fn hex_format_output() {
        let output = output_of(&["des_subkeys", "--key", "133457799BBCDFF1", "--format", "hex"]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "K1: 1B02EFFC7072");
        assert_eq!(lines[16], "K16: CB3D8B0E17F5");
    }

    #[test]
    fn trace_does_not_change_output() {
        assert_eq!(
            output_of(&["des_subkeys", "--trace", "--format", "hex"]),
            output_of(&["des_subkeys", "--format", "hex"])
        );
    }

    #[test]
    fn bad_key_text_is_an_error() {
        let args = matches_from(&["des_subkeys", "--key", "1334"]);
        let mut out: Vec<u8> = Vec::new();
        assert!(matches!(
            run(&args, &mut out),
            Err(des_subkeys::Error::InvalidKeyLength { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn key_is_only_logged_at_debug() {
        let levels = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(KeyFieldLevels(levels.clone()));
        tracing::subscriber::with_default(subscriber, || {
            output_of(&["des_subkeys", "--key", "0123456789ABCDEF"]);
        });
        assert_eq!(*levels.lock().unwrap(), vec![Level::DEBUG]);
    }
}
