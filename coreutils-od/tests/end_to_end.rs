use coreutils_od::{OdConfig, OdEngine};

#[test]
fn repeated_zero_blocks_collapse_to_a_star() {
    let cfg = OdConfig::default();
    let engine = OdEngine::new(cfg);
    let mut out = Vec::new();
    let data = vec![0u8; 64];
    engine.run(&data[..], &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches('*').count(), 1);
}

#[test]
fn distinct_blocks_each_get_their_own_line() {
    let cfg = OdConfig::default();
    let engine = OdEngine::new(cfg);
    let mut out = Vec::new();
    let mut data = Vec::new();
    for b in 0..4u8 {
        data.extend(std::iter::repeat(b).take(16));
    }
    engine.run(&data[..], &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains('*'));
    assert_eq!(text.lines().count(), 5); // 4 data lines + final offset
}
