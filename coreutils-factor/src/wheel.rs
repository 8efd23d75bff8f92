//! Single-precision wheel factorization, ported from `factor.c`'s
//! `factor_wheel`.
//!
//! The increment table walks only divisor candidates coprime to
//! `2*3*5*7 = 210` once past the lead-in trial divisions by 2, 3, 5 and
//! 7 themselves, the same skip-composite idea as the source's larger
//! (`2*3*5*7*11`-circumference) wheel, generalized here to the 210
//! wheel since its increment table is small enough to derive at
//! compile time instead of shipping a generated data file.

/// Gaps, in order, between successive integers greater than 1 and
/// coprime to 210 within one period `[11, 221)`. Cycling through this
/// table forever (adding 210 to the divisor once per full cycle,
/// implicitly, since the gaps already sum to 210) walks every divisor
/// candidate coprime to `2*3*5*7`.
pub(crate) const WHEEL_210: [u64; 48] = [
    2, 4, 2, 4, 6, 2, 6, 4, 2, 4, 6, 6, 2, 6, 4, 2, 6, 4, 6, 8, 4, 2, 4, 2, 4, 8, 6, 4, 6, 2, 4, 6, 2, 6, 6, 4, 2, 4,
    6, 2, 6, 4, 2, 4, 2, 10, 2, 10,
];

/// Trial-divide `n` down to 1, returning its prime factors with
/// multiplicity in nondecreasing order. Terminates as soon as the
/// remaining cofactor is proven prime (divisor candidate squared
/// exceeds it), exactly as the source's loop condition does.
pub fn factor_wheel(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    if n <= 1 {
        return factors;
    }

    for d in [2u64, 3, 5, 7] {
        while n % d == 0 {
            factors.push(d);
            n /= d;
        }
    }

    let mut d = 11u64;
    let mut w = WHEEL_210.iter().cycle();
    loop {
        if d.checked_mul(d).map(|sq| sq > n).unwrap_or(true) {
            break;
        }
        let mut q = n / d;
        while n == q * d {
            factors.push(d);
            n = q;
            q = n / d;
        }
        d += w.next().unwrap();
    }

    if n != 1 {
        factors.push(n);
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_small_composite() {
        assert_eq!(factor_wheel(12), vec![2, 2, 3]);
    }

    #[test]
    fn factors_prime() {
        assert_eq!(factor_wheel(97), vec![97]);
    }

    #[test]
    fn one_and_zero_have_no_factors() {
        assert!(factor_wheel(1).is_empty());
        assert!(factor_wheel(0).is_empty());
    }

    #[test]
    fn factors_large_semiprime() {
        // 99991 and 999983 are the largest primes below 1e5 and 1e6
        // respectively; their product exercises the wheel well past
        // its lead-in trial divisions.
        let n = 99_991u64 * 999_983u64;
        let factors = factor_wheel(n);
        assert_eq!(factors, vec![99_991, 999_983]);
    }

    #[test]
    fn reconstructs_original_number() {
        for n in [2u64, 3, 60, 1001, 123_456, 999_999] {
            let factors = factor_wheel(n);
            let product: u64 = factors.iter().product();
            assert_eq!(product, n);
        }
    }
}
