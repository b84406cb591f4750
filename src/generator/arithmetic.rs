use rand::Rng;

use crate::generator::{Operation, Problem};
use crate::preset::{NumberRanges, TIMES_TABLE_MAX, TIMES_TABLE_MIN};

pub fn generate<R: Rng + ?Sized>(operation: Operation, ranges: &NumberRanges, rng: &mut R) -> Problem {
    match operation {
        Operation::Add => addition(ranges, rng),
        Operation::Subtract => subtraction(ranges, rng),
        Operation::Multiply => multiplication(ranges, rng),
        Operation::Divide => division(ranges, rng),
    }
}

fn addition<R: Rng + ?Sized>(ranges: &NumberRanges, rng: &mut R) -> Problem {
    let IntegerBounds { min, max } = bounds(ranges);
    let a = rng.gen_range(min..=max);
    let b = rng.gen_range(min..=max);
    Problem::new(Operation::Add, a, b, a + b)
}

fn subtraction<R: Rng + ?Sized>(ranges: &NumberRanges, rng: &mut R) -> Problem {
    let IntegerBounds { min, max } = bounds(ranges);
    let mut a = rng.gen_range(min..=max);
    let mut b = rng.gen_range(min..=max);
    // Result must never go negative
    if a < b {
        std::mem::swap(&mut a, &mut b);
    }
    Problem::new(Operation::Subtract, a, b, a - b)
}

fn multiplication<R: Rng + ?Sized>(ranges: &NumberRanges, rng: &mut R) -> Problem {
    let IntegerBounds { min, max } = bounds(ranges);
    let a = rng.gen_range(TIMES_TABLE_MIN..=TIMES_TABLE_MAX);
    let b = rng.gen_range(min..=max);
    Problem::new(Operation::Multiply, a, b, a * b)
}

/// Built backwards from divisor and quotient so the answer is always a whole number.
fn division<R: Rng + ?Sized>(ranges: &NumberRanges, rng: &mut R) -> Problem {
    let max_divisor = ranges.division.max_divisor.max(2);
    let divisor = rng.gen_range(2..=max_divisor);
    let max_quotient = (ranges.division.max_dividend / divisor).max(1);
    let quotient = rng.gen_range(1..=max_quotient);
    let dividend = divisor * quotient;
    Problem::new(Operation::Divide, dividend, divisor, quotient)
}

struct IntegerBounds {
    min: i64,
    max: i64,
}

// gen_range panics on an empty range, so tolerate inverted bounds.
fn bounds(ranges: &NumberRanges) -> IntegerBounds {
    let r = ranges.integers;
    IntegerBounds {
        min: r.min.min(r.max),
        max: r.min.max(r.max),
    }
}
