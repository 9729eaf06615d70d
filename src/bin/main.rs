use clap::{Parser, ValueEnum};
use num::BigUint;

use fptorture::enumerate::{almost_decimal_midpoint, almost_half_decimal};

/// Print torture test inputs for floating point conversion routines.
///
/// Walks the exponent grid of the chosen format and prints every value whose rounding boundary
/// comes within the requested precision of a short decimal, one record per line: a running
/// count, the mantissa and exponent, the value itself and the exact boundary it almost hits.
#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Which conversion direction and format to generate inputs for; all of them when absent
    #[arg(value_enum)]
    mode: Option<Mode>,
    /// Largest number of decimal digits to pit the rounding boundaries against
    #[arg(long, default_value_t = 16)]
    max_digits: i32,
    /// Base closeness requirement in bits for doubles; two bits per decimal digit come on top,
    /// and the float grids use half the base
    #[arg(long, default_value_t = 64)]
    precision: u32,
}

/// The four torture grids: parsing is hard near binary midpoints, printing near half decimals.
#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum Mode {
    Parse64,
    Print64,
    Parse32,
    Print32,
}

/// Exponent grid of a binary floating point format.
#[derive(Clone, Copy)]
struct Format {
    /// Exponent limit; finite values stay below `2^emax`.
    emax: i32,
    /// Mantissa width including the leading bit.
    mantbits: u32,
    /// Smallest exponent magnitude worth searching.
    start: i32,
    /// Largest decimal digit count the format can distinguish.
    digits: i32,
}

const FLOAT64: Format = Format { emax: 1024, mantbits: 53, start: 60, digits: 17 };
const FLOAT32: Format = Format { emax: 128, mantbits: 24, start: 24, digits: 9 };

fn main() {
    env_logger::init();
    let opts = Opts::parse();
    assert!(
        (1..=FLOAT64.digits).contains(&opts.max_digits),
        "double precision values distinguish at most 17 decimal digits",
    );

    let mut count = 0u64;
    let enabled = |mode| opts.mode.map_or(true, |selected| selected == mode);

    if enabled(Mode::Parse64) {
        midpoint_grid(FLOAT64, opts.max_digits, opts.precision, &mut count);
    }
    if enabled(Mode::Print64) {
        half_decimal_grid(FLOAT64, opts.max_digits, opts.precision, &mut count);
    }
    if enabled(Mode::Parse32) {
        midpoint_grid(FLOAT32, opts.max_digits.min(FLOAT32.digits), opts.precision / 2, &mut count);
    }
    if enabled(Mode::Print32) {
        half_decimal_grid(FLOAT32, opts.max_digits.min(FLOAT32.digits), opts.precision / 2, &mut count);
    }
}

/// Values whose upper midpoint nearly hits a short decimal, the hard inputs for parsers.
fn midpoint_grid(format: Format, max_digits: i32, base_precision: u32, count: &mut u64) {
    let width = format.mantbits as i32 - 1;
    for digits in (1..=max_digits).rev() {
        println!("=== midpoints, {} digits ===", digits);
        let precision = base_precision + 2 * digits as u32;
        let mut show = |x: f64| {
            let (mant, exp) = decompose(x);
            *count += 1;
            println!(
                "count={:08} {}p{} {:.18e} midpoint={}",
                count,
                mant,
                exp,
                x,
                midpoint_decimal(mant, exp),
            );
        };

        for exp in format.start..format.emax - width {
            almost_decimal_midpoint(exp, digits, format.mantbits, precision, 1, false, &mut show);
            almost_decimal_midpoint(exp, digits, format.mantbits, precision, -1, false, &mut show);
        }
        for exp in format.start..format.emax + width {
            if exp == format.emax + width - 1 {
                // The bottom of the exponent range holds the denormals, one binary exponent
                // further down and with a free mantissa width.
                let mantbits = format.mantbits - 1;
                almost_decimal_midpoint(-(exp - 1), digits, mantbits, precision, 1, true, &mut show);
                almost_decimal_midpoint(-(exp - 1), digits, mantbits, precision, -1, true, &mut show);
            } else {
                almost_decimal_midpoint(-exp, digits, format.mantbits, precision, 1, false, &mut show);
                almost_decimal_midpoint(-exp, digits, format.mantbits, precision, -1, false, &mut show);
            }
        }
    }
}

/// Values sitting nearly on a half decimal, the hard inputs for fixed precision formatters.
fn half_decimal_grid(format: Format, max_digits: i32, base_precision: u32, count: &mut u64) {
    let width = format.mantbits as i32 - 1;
    for digits in (1..=max_digits).rev() {
        println!("=== half decimals, {} digits ===", digits);
        let precision = base_precision + 2 * digits as u32;
        let mut show = |x: f64, n: u64, k: i32| {
            let (mant, exp) = decompose(x);
            *count += 1;
            println!("count={:08} {}p{} {:.18e} half={}.5e{}", count, mant, exp, x, n, k);
        };

        for exp in format.start..format.emax - width {
            almost_half_decimal(exp, digits, format.mantbits, precision, 1, false, &mut show);
            almost_half_decimal(exp, digits, format.mantbits, precision, -1, false, &mut show);
        }
        for exp in format.start..format.emax + width {
            if exp == format.emax + width - 1 {
                let mantbits = format.mantbits - 1;
                almost_half_decimal(-(exp - 1), digits, mantbits, precision, 1, true, &mut show);
                almost_half_decimal(-(exp - 1), digits, mantbits, precision, -1, true, &mut show);
            } else {
                almost_half_decimal(-exp, digits, format.mantbits, precision, 1, false, &mut show);
                almost_half_decimal(-exp, digits, format.mantbits, precision, -1, false, &mut show);
            }
        }
    }
}

/// The integer mantissa and exponent of a positive double.
fn decompose(x: f64) -> (u64, i32) {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased - 1075)
    }
}

/// The exact midpoint `(mant + 1/2) * 2^exp` in scientific notation, 36 fraction digits.
fn midpoint_decimal(mant: u64, exp: i32) -> String {
    let odd = BigUint::from(2 * mant + 1);
    // (2 mant + 1) * 2^(exp - 1), written over a power of ten when the exponent is negative.
    let (digits, exponent) = if exp >= 1 {
        let digits = (odd << (exp - 1) as usize).to_string();
        let exponent = digits.len() as i32 - 1;
        (digits, exponent)
    } else {
        let digits = (odd * BigUint::from(5u8).pow((1 - exp) as u32)).to_string();
        let exponent = digits.len() as i32 - 1 + (exp - 1);
        (digits, exponent)
    };
    let (digits, exponent) = round_digits(&digits, 37, exponent);
    format!("{}.{}e{}", &digits[..1], &digits[1..], exponent)
}

/// Round a digit string to the given number of significant digits, to nearest with ties to even,
/// bumping the exponent when the carry runs off the front.
fn round_digits(digits: &str, significant: usize, exponent: i32) -> (String, i32) {
    if digits.len() <= significant {
        let mut padded = digits.to_string();
        padded.push_str(&"0".repeat(significant - digits.len()));
        return (padded, exponent);
    }

    let mut kept = digits.as_bytes()[..significant].to_vec();
    // The dropped digits are exact, so a lone 5 is a true tie and keeps the last digit even.
    let tail_nonzero = digits.as_bytes()[significant + 1..].iter().any(|&d| d != b'0');
    let round_up = match digits.as_bytes()[significant] {
        b'0'..=b'4' => false,
        b'5' if !tail_nonzero => kept[significant - 1] % 2 == 1,
        _ => true,
    };
    if round_up {
        let mut position = significant;
        loop {
            if position == 0 {
                kept.insert(0, b'1');
                kept.pop();
                return (String::from_utf8(kept).unwrap(), exponent + 1);
            }
            position -= 1;
            if kept[position] == b'9' {
                kept[position] = b'0';
            } else {
                kept[position] += 1;
                break;
            }
        }
    }
    (String::from_utf8(kept).unwrap(), exponent)
}
