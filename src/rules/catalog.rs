//! Built-in rule catalog
//!
//! Order is part of the puzzle contract. Append-only edits still change the
//! hash-to-rule mapping, so bump [`CATALOG_VERSION`] with any change here.

use super::{Family, SequenceRule};
use rustc_hash::FxHashSet;

/// Version marker embedded in every puzzle id generated from this catalog
pub const CATALOG_VERSION: &str = "v1";

const MOTZKIN: [i64; 9] = [1, 1, 2, 4, 9, 21, 51, 127, 323];
const PARTITIONS: [i64; 10] = [1, 1, 2, 3, 5, 7, 11, 15, 22, 30];
const MERSENNE_PRIMES: [i64; 7] = [3, 7, 31, 127, 8191, 131_071, 524_287];
const PERFECT_NUMBERS: [i64; 5] = [6, 28, 496, 8128, 33_550_336];

/// The full ordered catalog
#[must_use]
#[allow(clippy::too_many_lines)] // One entry per rule
pub fn builtin_rules() -> Vec<SequenceRule> {
    use Family::{
        Alternating, Arithmetic, Digit, Figurate, Geometric, Modular, Polynomial, Recursive,
        Special,
    };

    vec![
        // Polynomial
        SequenceRule::new(
            "squares",
            Polynomial,
            "Perfect Squares: each term is n² for n = 1, 2, 3, ...",
            |len| by_index(len, |n| n.checked_mul(n)),
        ),
        SequenceRule::new(
            "cubes",
            Polynomial,
            "Perfect Cubes: each term is n³ for n = 1, 2, 3, ...",
            |len| by_index(len, |n| n.checked_pow(3)),
        ),
        SequenceRule::new(
            "squares_plus_one",
            Polynomial,
            "Squares Plus One: each term is n² + 1",
            |len| by_index(len, |n| n.checked_mul(n)?.checked_add(1)),
        ),
        SequenceRule::new(
            "n_squared_plus_n",
            Polynomial,
            "Pronic Numbers: n² + n, the product of two consecutive integers",
            |len| by_index(len, |n| n.checked_mul(n + 1)),
        ),
        SequenceRule::new(
            "shifted_squares",
            Polynomial,
            "Shifted Squares: (n - 1)², the squares starting from zero",
            |len| by_index(len, |n| (n - 1).checked_mul(n - 1)),
        ),
        SequenceRule::new(
            "central_polygonal",
            Polynomial,
            "Central Polygonal Numbers: n² - n + 1",
            |len| by_index(len, |n| n.checked_mul(n - 1)?.checked_add(1)),
        ),
        SequenceRule::new(
            "squares_minus_two",
            Polynomial,
            "Squares Minus Two: n² - 2",
            |len| by_index(len, |n| n.checked_mul(n)?.checked_sub(2)),
        ),
        SequenceRule::new(
            "cubes_minus_n",
            Polynomial,
            "Cubes Minus n: n³ - n, the product of three consecutive integers",
            |len| by_index(len, |n| n.checked_pow(3)?.checked_sub(n)),
        ),
        SequenceRule::new(
            "half_squares",
            Polynomial,
            "Half Squares: ⌊n² / 2⌋ for n = 0, 1, 2, ...",
            |len| by_index(len, |n| Some((n - 1).checked_mul(n - 1)? / 2)),
        ),
        SequenceRule::new(
            "fourth_powers",
            Polynomial,
            "Fourth Powers: n⁴",
            |len| by_index(len, |n| n.checked_pow(4)),
        ),
        // Arithmetic
        SequenceRule::new(
            "natural_numbers",
            Arithmetic,
            "Natural Numbers: 1, 2, 3, ... (the first diagonal of Pascal's triangle)",
            |len| by_index(len, Some),
        ),
        SequenceRule::new(
            "arithmetic_3",
            Arithmetic,
            "Multiples of 3: each term is 3n (common difference 3)",
            |len| by_index(len, |n| n.checked_mul(3)),
        ),
        SequenceRule::new(
            "arithmetic_5_plus_2",
            Arithmetic,
            "Arithmetic Sequence: starts at 2 and adds 5 each time",
            |len| by_index(len, |n| (n - 1).checked_mul(5)?.checked_add(2)),
        ),
        SequenceRule::new(
            "arithmetic_7_minus_3",
            Arithmetic,
            "Arithmetic Sequence: 7n - 3 (multiples of 7 shifted down by 3)",
            |len| by_index(len, |n| n.checked_mul(7)?.checked_sub(3)),
        ),
        SequenceRule::new(
            "odd_numbers",
            Arithmetic,
            "Odd Numbers: 2n - 1",
            |len| by_index(len, |n| n.checked_mul(2)?.checked_sub(1)),
        ),
        SequenceRule::new(
            "even_numbers",
            Arithmetic,
            "Even Numbers: 2n",
            |len| by_index(len, |n| n.checked_mul(2)),
        ),
        SequenceRule::new(
            "odd_from_three",
            Arithmetic,
            "Gaps Between Squares: (n + 1)² - n² = 2n + 1",
            |len| by_index(len, |n| n.checked_mul(2)?.checked_add(1)),
        ),
        SequenceRule::new(
            "countdown_by_3",
            Arithmetic,
            "Countdown: starts at 18 and subtracts 3 each time (21 - 3n)",
            |len| by_index(len, |n| 21_i64.checked_sub(n.checked_mul(3)?)),
        ),
        // Geometric
        SequenceRule::new(
            "powers_of_2",
            Geometric,
            "Powers of 2: each term is 2ⁿ (doubles each time)",
            |len| by_index(len, |n| 2_i64.checked_pow(u32::try_from(n).ok()?)),
        ),
        SequenceRule::new(
            "powers_of_3",
            Geometric,
            "Powers of 3: each term is 3ⁿ (triples each time)",
            |len| by_index(len, |n| 3_i64.checked_pow(u32::try_from(n).ok()?)),
        ),
        SequenceRule::new(
            "double_previous",
            Geometric,
            "Doubling Sequence: starts at 1, each term is double the previous one",
            |len| recurrence(len, &[1], |seq| seq.last()?.checked_mul(2)),
        ),
        SequenceRule::new(
            "triple_previous",
            Geometric,
            "Tripling Sequence: starts at 1, each term is triple the previous one",
            |len| recurrence(len, &[1], |seq| seq.last()?.checked_mul(3)),
        ),
        SequenceRule::new(
            "powers_of_10",
            Geometric,
            "Powers of 10: 10, 100, 1000, ...",
            |len| by_index(len, |n| 10_i64.checked_pow(u32::try_from(n).ok()?)),
        ),
        // Recursive / additive
        SequenceRule::new(
            "fibonacci",
            Recursive,
            "Fibonacci Sequence: each term is the sum of the previous two",
            |len| recurrence(len, &[1, 1], |seq| sum_last(seq, 2)),
        ),
        SequenceRule::new(
            "tribonacci",
            Recursive,
            "Tribonacci: each term is the sum of the previous three",
            |len| recurrence(len, &[1, 1, 2], |seq| sum_last(seq, 3)),
        ),
        SequenceRule::new(
            "lucas",
            Recursive,
            "Lucas Numbers: like Fibonacci but starting with 2, 1",
            |len| recurrence(len, &[2, 1], |seq| sum_last(seq, 2)),
        ),
        SequenceRule::new(
            "pell_numbers",
            Recursive,
            "Pell Numbers: P(n) = 2·P(n-1) + P(n-2), starting 0, 1",
            |len| {
                recurrence(len, &[0, 1], |seq| {
                    let n = seq.len();
                    seq[n - 1].checked_mul(2)?.checked_add(seq[n - 2])
                })
            },
        ),
        SequenceRule::new(
            "padovan_sequence",
            Recursive,
            "Padovan Sequence: P(n) = P(n-2) + P(n-3), starting 1, 1, 1",
            |len| {
                recurrence(len, &[1, 1, 1], |seq| {
                    let n = seq.len();
                    seq[n - 2].checked_add(seq[n - 3])
                })
            },
        ),
        SequenceRule::new(
            "sylvester_sequence",
            Recursive,
            "Sylvester's Sequence: each term is previous² - previous + 1",
            |len| {
                recurrence(len, &[2], |seq| {
                    let prev = *seq.last()?;
                    prev.checked_mul(prev)?.checked_sub(prev)?.checked_add(1)
                })
            },
        ),
        SequenceRule::new(
            "somos_4",
            Recursive,
            "Somos-4: a(n) = (a(n-1)·a(n-3) + a(n-2)²) / a(n-4), always an integer",
            |len| recurrence(len, &[1, 1, 1, 1], somos_4_next),
        ),
        SequenceRule::new(
            "recaman_sequence",
            Recursive,
            "Recamán's Sequence: step back by n if that is positive and new, otherwise step forward",
            recaman,
        ),
        // Figurate
        SequenceRule::new(
            "triangular",
            Figurate,
            "Triangular Numbers: n(n + 1) / 2, dots arranged in a triangle",
            |len| by_index(len, |n| Some(n.checked_mul(n + 1)? / 2)),
        ),
        SequenceRule::new(
            "pentagonal",
            Figurate,
            "Pentagonal Numbers: n(3n - 1) / 2, dots arranged in a pentagon",
            |len| by_index(len, |n| Some(n.checked_mul(n.checked_mul(3)? - 1)? / 2)),
        ),
        SequenceRule::new(
            "hexagonal",
            Figurate,
            "Hexagonal Numbers: n(2n - 1), dots arranged in a hexagon",
            |len| by_index(len, |n| n.checked_mul(n.checked_mul(2)? - 1)),
        ),
        SequenceRule::new(
            "lazy_caterer",
            Figurate,
            "Lazy Caterer's Sequence: most pieces from n straight cuts of a disk, (n² + n + 2) / 2",
            |len| {
                by_index(len, |n| {
                    let cuts = n - 1;
                    Some(cuts.checked_mul(cuts)?.checked_add(cuts + 2)? / 2)
                })
            },
        ),
        SequenceRule::new(
            "square_pyramidal",
            Figurate,
            "Cumulative Sum of Squares: 1² + 2² + ... + n²",
            |len| {
                recurrence(len, &[1], |seq| {
                    let n = seq.len() as i64 + 1;
                    seq.last()?.checked_add(n.checked_mul(n)?)
                })
            },
        ),
        SequenceRule::new(
            "tetrahedral",
            Figurate,
            "Tetrahedral Numbers: n(n + 1)(n + 2) / 6, stacked triangles",
            |len| by_index(len, |n| Some(n.checked_mul(n + 1)?.checked_mul(n + 2)? / 6)),
        ),
        // Special / named
        SequenceRule::new(
            "primes",
            Special,
            "Prime Numbers: divisible only by 1 and themselves",
            primes,
        ),
        SequenceRule::new(
            "factorial",
            Special,
            "Factorials: n! = 1 × 2 × ... × n",
            |len| {
                recurrence(len, &[1], |seq| {
                    seq.last()?.checked_mul(seq.len() as i64 + 1)
                })
            },
        ),
        SequenceRule::new(
            "catalan",
            Special,
            "Catalan Numbers: count balanced parentheses, binary trees and more",
            |len| {
                recurrence(len, &[1], |seq| {
                    let n = seq.len() as i64 - 1;
                    Some(seq.last()?.checked_mul(2 * (2 * n + 1))? / (n + 2))
                })
            },
        ),
        SequenceRule::new(
            "bell_numbers",
            Special,
            "Bell Numbers: the number of ways to partition a set",
            bell,
        ),
        SequenceRule::new(
            "motzkin_numbers",
            Special,
            "Motzkin Numbers: ways to draw non-crossing chords between points on a circle",
            |len| table(len, &MOTZKIN),
        )
        .with_max_len(MOTZKIN.len()),
        SequenceRule::new(
            "partition_numbers",
            Special,
            "Partition Numbers: ways to write n as a sum of positive integers",
            |len| table(len, &PARTITIONS),
        )
        .with_max_len(PARTITIONS.len()),
        SequenceRule::new(
            "mersenne_primes",
            Special,
            "Mersenne Primes: primes of the form 2ᵖ - 1",
            |len| table(len, &MERSENNE_PRIMES),
        )
        .with_max_len(MERSENNE_PRIMES.len()),
        SequenceRule::new(
            "perfect_numbers",
            Special,
            "Perfect Numbers: equal to the sum of their proper divisors",
            |len| table(len, &PERFECT_NUMBERS),
        )
        .with_max_len(PERFECT_NUMBERS.len()),
        SequenceRule::new(
            "stern_brocot",
            Special,
            "Stern-Brocot Style: alternately copy one earlier term and sum two others",
            |len| recurrence(len, &[1, 1], stern_brocot_next),
        ),
        SequenceRule::new(
            "sum_of_divisors",
            Special,
            "Sum of Divisors: the sum of every divisor of n, including n",
            |len| by_index(len, |n| Some((1..=n).filter(|d| n % d == 0).sum())),
        ),
        SequenceRule::new(
            "collatz_steps",
            Special,
            "Collatz Steps: steps for n to reach 1 by halving evens and mapping odds to 3n + 1",
            |len| by_index(len, collatz_steps),
        ),
        // Modular / cyclic
        SequenceRule::new(
            "mod_5",
            Modular,
            "Modulo 5: the remainder of n divided by 5, a repeating cycle",
            |len| by_index(len, |n| Some(n % 5)),
        ),
        SequenceRule::new(
            "mod_7_offset",
            Modular,
            "Modulo 7 Offset: (n mod 7) + 1, cycling through 1 to 7",
            |len| by_index(len, |n| Some(n % 7 + 1)),
        ),
        SequenceRule::new(
            "mod_3",
            Modular,
            "Modulo 3: the remainder of n divided by 3",
            |len| by_index(len, |n| Some(n % 3)),
        ),
        // Alternating
        SequenceRule::new(
            "alternating_sign",
            Alternating,
            "Alternating Signs: 1, -2, 3, -4, ...",
            |len| by_index(len, |n| Some(if n % 2 == 1 { n } else { -n })),
        ),
        SequenceRule::new(
            "alternating_powers",
            Alternating,
            "Alternating Powers: odd positions are n², even positions are n³",
            |len| {
                by_index(len, |n| {
                    if n % 2 == 1 {
                        n.checked_pow(2)
                    } else {
                        n.checked_pow(3)
                    }
                })
            },
        ),
        SequenceRule::new(
            "self_powers",
            Alternating,
            "Self Powers: each term is nⁿ",
            |len| by_index(len, |n| n.checked_pow(u32::try_from(n).ok()?)),
        ),
        SequenceRule::new(
            "zigzag",
            Alternating,
            "Zigzag: up two, down one (1, 3, 2, 4, 3, 5, ...)",
            |len| {
                by_index(len, |n| {
                    let i = n - 1;
                    Some(i / 2 + 1 + (i % 2) * 2)
                })
            },
        ),
        // Digit-based
        SequenceRule::new(
            "digit_sum_multiples",
            Digit,
            "Multiples of 9: every term has a digit sum divisible by 9",
            |len| by_index(len, |n| n.checked_mul(9)),
        ),
        SequenceRule::new(
            "palindromic",
            Digit,
            "Palindromic Numbers: read the same forwards and backwards",
            palindromes,
        ),
        SequenceRule::new(
            "n_plus_reverse",
            Digit,
            "Number Plus Reverse: n + reverse(n), e.g. 12 + 21 = 33",
            |len| by_index(len, |n| n.checked_add(reverse_digits(n)?)),
        ),
        SequenceRule::new(
            "digital_root",
            Digit,
            "Digital Root: repeatedly sum the digits of 10n until one digit remains",
            |len| by_index(len, |n| Some(digital_root(n.checked_mul(10)?))),
        ),
        SequenceRule::new(
            "square_digit_sums",
            Digit,
            "Digit Sums of Squares: the sum of the digits of n²",
            |len| by_index(len, |n| Some(digit_sum(n.checked_mul(n)?))),
        ),
    ]
}

/// Terms computed from their 1-based position
fn by_index(len: usize, term: impl Fn(i64) -> Option<i64>) -> Option<Vec<i64>> {
    (1..=len as i64).map(term).collect()
}

/// Terms computed from all previous terms, after the given seeds
fn recurrence(
    len: usize,
    seeds: &[i64],
    next: impl Fn(&[i64]) -> Option<i64>,
) -> Option<Vec<i64>> {
    let mut seq: Vec<i64> = seeds.iter().copied().take(len).collect();
    while seq.len() < len {
        let term = next(&seq)?;
        seq.push(term);
    }
    Some(seq)
}

fn table(len: usize, values: &[i64]) -> Option<Vec<i64>> {
    values.get(..len).map(<[i64]>::to_vec)
}

fn sum_last(seq: &[i64], count: usize) -> Option<i64> {
    seq[seq.len() - count..]
        .iter()
        .try_fold(0_i64, |acc, &v| acc.checked_add(v))
}

fn somos_4_next(seq: &[i64]) -> Option<i64> {
    let n = seq.len();
    let numerator = seq[n - 1]
        .checked_mul(seq[n - 3])?
        .checked_add(seq[n - 2].checked_mul(seq[n - 2])?)?;
    numerator.checked_div(seq[n - 4])
}

fn stern_brocot_next(seq: &[i64]) -> Option<i64> {
    let i = seq.len();
    if i % 2 == 0 {
        seq.get(i / 2 - 1).copied()
    } else {
        seq.get(i / 2)?.checked_add(*seq.get(i / 2 + 1)?)
    }
}

fn recaman(len: usize) -> Option<Vec<i64>> {
    let mut seq = Vec::with_capacity(len);
    let mut seen = FxHashSet::default();
    let mut current = 0_i64;

    for step in 0..len as i64 {
        if step > 0 {
            let back = current - step;
            current = if back > 0 && !seen.contains(&back) {
                back
            } else {
                current.checked_add(step)?
            };
        }
        seen.insert(current);
        seq.push(current);
    }

    Some(seq)
}

fn primes(len: usize) -> Option<Vec<i64>> {
    let mut found: Vec<i64> = Vec::with_capacity(len);
    let mut candidate = 2_i64;

    while found.len() < len {
        let is_prime = found
            .iter()
            .take_while(|&&p| p.checked_mul(p).is_some_and(|sq| sq <= candidate))
            .all(|&p| candidate % p != 0);
        if is_prime {
            found.push(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }

    Some(found)
}

/// Bell numbers via the Bell triangle
fn bell(len: usize) -> Option<Vec<i64>> {
    let mut out = Vec::with_capacity(len);
    let mut row = vec![1_i64];

    while out.len() < len {
        out.push(row[0]);
        let mut next = Vec::with_capacity(row.len() + 1);
        next.push(*row.last()?);
        for &v in &row {
            let term = next.last()?.checked_add(v)?;
            next.push(term);
        }
        row = next;
    }

    Some(out)
}

fn collatz_steps(start: i64) -> Option<i64> {
    let mut n = start;
    let mut steps = 0;
    while n != 1 && steps < 1000 {
        n = if n % 2 == 0 {
            n / 2
        } else {
            n.checked_mul(3)?.checked_add(1)?
        };
        steps += 1;
    }
    Some(steps)
}

fn palindromes(len: usize) -> Option<Vec<i64>> {
    let mut found = Vec::with_capacity(len);
    let mut candidate = 1_i64;
    while found.len() < len {
        if reverse_digits(candidate)? == candidate {
            found.push(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
    Some(found)
}

fn reverse_digits(mut n: i64) -> Option<i64> {
    let mut reversed = 0_i64;
    while n > 0 {
        reversed = reversed.checked_mul(10)?.checked_add(n % 10)?;
        n /= 10;
    }
    Some(reversed)
}

fn digit_sum(mut n: i64) -> i64 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

fn digital_root(mut n: i64) -> i64 {
    while n >= 10 {
        n = digit_sum(n);
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Registry;

    fn first_seven(name: &str) -> Vec<i64> {
        let registry = Registry::builtin().unwrap();
        registry.require(name).unwrap().generate(7).unwrap()
    }

    #[test]
    fn polynomial_rules() {
        assert_eq!(first_seven("squares"), vec![1, 4, 9, 16, 25, 36, 49]);
        assert_eq!(first_seven("shifted_squares"), vec![0, 1, 4, 9, 16, 25, 36]);
        assert_eq!(first_seven("half_squares"), vec![0, 0, 2, 4, 8, 12, 18]);
        assert_eq!(first_seven("central_polygonal"), vec![1, 3, 7, 13, 21, 31, 43]);
    }

    #[test]
    fn arithmetic_rules() {
        assert_eq!(first_seven("arithmetic_5_plus_2"), vec![2, 7, 12, 17, 22, 27, 32]);
        assert_eq!(first_seven("countdown_by_3"), vec![18, 15, 12, 9, 6, 3, 0]);
        assert_eq!(first_seven("odd_numbers"), vec![1, 3, 5, 7, 9, 11, 13]);
    }

    #[test]
    fn recursive_rules() {
        assert_eq!(first_seven("fibonacci"), vec![1, 1, 2, 3, 5, 8, 13]);
        assert_eq!(first_seven("tribonacci"), vec![1, 1, 2, 4, 7, 13, 24]);
        assert_eq!(first_seven("lucas"), vec![2, 1, 3, 4, 7, 11, 18]);
        assert_eq!(first_seven("pell_numbers"), vec![0, 1, 2, 5, 12, 29, 70]);
        assert_eq!(first_seven("padovan_sequence"), vec![1, 1, 1, 2, 2, 3, 4]);
        assert_eq!(first_seven("somos_4"), vec![1, 1, 1, 1, 2, 3, 7]);
        assert_eq!(first_seven("recaman_sequence"), vec![0, 1, 3, 6, 2, 7, 13]);
    }

    #[test]
    fn special_rules() {
        assert_eq!(first_seven("primes"), vec![2, 3, 5, 7, 11, 13, 17]);
        assert_eq!(first_seven("factorial"), vec![1, 2, 6, 24, 120, 720, 5040]);
        assert_eq!(first_seven("catalan"), vec![1, 1, 2, 5, 14, 42, 132]);
        assert_eq!(first_seven("bell_numbers"), vec![1, 1, 2, 5, 15, 52, 203]);
        assert_eq!(first_seven("stern_brocot"), vec![1, 1, 1, 2, 1, 3, 1]);
        assert_eq!(first_seven("sum_of_divisors"), vec![1, 3, 4, 7, 6, 12, 8]);
        assert_eq!(first_seven("collatz_steps"), vec![0, 1, 7, 2, 5, 8, 16]);
    }

    #[test]
    fn cyclic_and_digit_rules() {
        assert_eq!(first_seven("mod_5"), vec![1, 2, 3, 4, 0, 1, 2]);
        assert_eq!(first_seven("mod_7_offset"), vec![2, 3, 4, 5, 6, 7, 1]);
        assert_eq!(first_seven("zigzag"), vec![1, 3, 2, 4, 3, 5, 4]);
        assert_eq!(first_seven("digital_root"), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(first_seven("square_digit_sums"), vec![1, 4, 9, 7, 7, 9, 13]);
        let palindromes = Registry::builtin()
            .unwrap()
            .require("palindromic")
            .unwrap()
            .generate(12)
            .unwrap();
        assert_eq!(&palindromes[8..], &[9, 11, 22, 33]);
    }

    #[test]
    fn tables_declare_their_limits() {
        let registry = Registry::builtin().unwrap();
        let perfect = registry.require("perfect_numbers").unwrap();
        assert_eq!(perfect.max_len(), Some(5));
        assert!(perfect.generate(7).is_err());
        assert_eq!(perfect.generate(3).unwrap(), vec![6, 28, 496]);
    }

    #[test]
    fn sylvester_overflows_past_seven_terms() {
        let registry = Registry::builtin().unwrap();
        let rule = registry.require("sylvester_sequence").unwrap();
        assert_eq!(
            rule.generate(7).unwrap(),
            vec![2, 3, 7, 43, 1807, 3_263_443, 10_650_056_950_807]
        );
        assert!(rule.generate(8).is_err());
    }

    #[test]
    fn stern_brocot_description_matches_its_terms() {
        let registry = Registry::builtin().unwrap();
        let rule = registry.require("stern_brocot").unwrap();
        // Not the diatomic series, which runs 1, 1, 2, 1, 3, 2, 3
        assert!(!rule.description().contains("Diatomic"));
        assert!(rule.description().starts_with("Stern-Brocot Style"));
        assert_ne!(rule.generate(7).unwrap(), vec![1, 1, 2, 1, 3, 2, 3]);
    }
}
