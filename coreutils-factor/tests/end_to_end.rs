use coreutils_factor::{Algorithm, FactorConfig, FactorEngine};

#[test]
fn factors_a_stream_of_whitespace_separated_numbers() {
    let engine = FactorEngine::new(FactorConfig::default());
    let mut out = Vec::new();
    engine.run_stream("12 17\n100\n", &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["12: 2 2 3", "17: 17", "100: 2 2 5 5"]);
}

#[test]
fn bignum_and_single_precision_agree_on_overlapping_range() {
    let single = FactorEngine::new(FactorConfig {
        algorithm: Algorithm::Single,
        verbose: false,
    });
    let bignum = FactorEngine::new(FactorConfig {
        algorithm: Algorithm::Bignum,
        verbose: false,
    });

    for n in [2u64, 97, 1001, 99991, 123456] {
        let mut a = Vec::new();
        let mut b = Vec::new();
        single.print_factors(&n.to_string(), &mut a).unwrap();
        bignum.print_factors(&n.to_string(), &mut b).unwrap();
        assert_eq!(a, b, "mismatch for {n}");
    }
}
