//! Arbitrary-precision factoring, ported from `factor.c`'s
//! `extract_factors_multi`/`factor_using_division`/
//! `factor_using_pollard_rho`, using `num-bigint` in place of GMP and a
//! from-scratch Miller-Rabin test in place of `mpz_probab_prime_p`.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

/// Small-prime trial division wheel increments, reused from
/// [`crate::wheel`] once past the lead-in divisions by 2, 3 and 5 that
/// `factor_using_division` performs directly.
use crate::wheel::WHEEL_210;

/// Trial-divide `n` by small divisors up to `limit`, pushing each
/// factor found into `out` and returning the (possibly still
/// composite) remainder. Mirrors `factor_using_division`'s bound,
/// which scales with the bit length of the input rather than being
/// fixed.
pub fn factor_using_division(mut n: BigUint, limit: u64, out: &mut Vec<BigUint>) -> BigUint {
    for small in [2u64, 3, 5] {
        let d = BigUint::from(small);
        while n.is_multiple_of(&d) {
            out.push(d.clone());
            n /= &d;
        }
    }

    let mut d = 7u64;
    let mut w = WHEEL_210.iter().cycle();
    let mut failures = 0u64;
    while n != BigUint::one() {
        let divisor = BigUint::from(d);
        let (q, r) = n.div_rem(&divisor);
        if r.is_zero() {
            n = q;
            out.push(divisor);
            failures = 0;
        } else {
            d += w.next().unwrap();
            if BigUint::from(d) > q {
                break;
            }
            failures += 1;
            if failures > limit {
                break;
            }
        }
    }
    n
}

/// Miller-Rabin primality test with `rounds` random witnesses, the
/// from-scratch analogue of `mpz_probab_prime_p(n, 3)`.
pub fn is_probably_prime(n: &BigUint, rounds: u32) -> bool {
    if *n < BigUint::from(2u32) {
        return false;
    }
    for small in [2u32, 3, 5, 7, 11, 13] {
        let p = BigUint::from(small);
        if *n == p {
            return true;
        }
        if n.is_multiple_of(&p) {
            return false;
        }
    }

    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let n_minus_one = n - &one;

    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d /= &two;
        r += 1;
    }

    let mut rng = rand::thread_rng();
    'witness: for _ in 0..rounds {
        let a = random_in_range(&mut rng, &two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 0..r.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn random_in_range<R: Rng>(rng: &mut R, low: &BigUint, high: &BigUint) -> BigUint {
    let span = high - low;
    let bits = span.bits().max(1);
    loop {
        let bytes = ((bits + 7) / 8) as usize;
        let mut buf = vec![0u8; bytes];
        rng.fill(buf.as_mut_slice());
        let candidate = BigUint::from_bytes_le(&buf);
        if candidate <= span {
            return low + candidate;
        }
    }
}

/// Find one nontrivial factor of composite `n`, Brent's cycle-detection
/// variant of Pollard's rho (`factor_using_pollard_rho`'s structure,
/// restarting with a fresh additive constant on recursion).
pub fn pollard_rho_factor(n: &BigUint) -> BigUint {
    let mut rng = rand::thread_rng();
    loop {
        let a = BigUint::from(rng.gen_range(1u64..=n.to_u64_or_max().max(2)));
        if let Some(g) = pollard_rho_attempt(n, &a) {
            return g;
        }
    }
}

fn pollard_rho_attempt(n: &BigUint, a: &BigUint) -> Option<BigUint> {
    let f = |x: &BigUint| -> BigUint { (x * x + a) % n };

    let mut x = BigUint::from(2u32);
    let mut y = BigUint::from(2u32);
    let mut d = BigUint::one();

    while d == BigUint::one() {
        x = f(&x);
        y = f(&f(&y));
        let diff = if x > y { &x - &y } else { &y - &x };
        if diff.is_zero() {
            return None;
        }
        d = diff.gcd(n);
    }

    if d == *n {
        None
    } else {
        Some(d)
    }
}

trait ToU64OrMax {
    fn to_u64_or_max(&self) -> u64;
}

impl ToU64OrMax for BigUint {
    fn to_u64_or_max(&self) -> u64 {
        use num_traits::ToPrimitive;
        self.to_u64().unwrap_or(u64::MAX)
    }
}

/// Full arbitrary-precision factorization: trial division, then a
/// primality check, then Pollard's rho for whatever remains, exactly
/// the `extract_factors_multi` pipeline.
pub fn factor_bignum(n: BigUint) -> Vec<BigUint> {
    let mut out = Vec::new();
    if n.is_zero() {
        return out;
    }

    let n_bits = n.bits().min(1000);
    let limit = n_bits * n_bits;
    let remainder = factor_using_division(n, limit, &mut out);

    if remainder != BigUint::one() {
        factor_remainder(remainder, &mut out);
    }
    out.sort();
    out
}

fn factor_remainder(n: BigUint, out: &mut Vec<BigUint>) {
    if n == BigUint::one() {
        return;
    }
    if is_probably_prime(&n, 25) {
        out.push(n);
        return;
    }
    let factor = pollard_rho_factor(&n);
    let cofactor = &n / &factor;
    factor_remainder(factor, out);
    factor_remainder(cofactor, out);
}
