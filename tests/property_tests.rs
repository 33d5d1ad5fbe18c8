use ppmix::models::{BlendedModel, Model, ModelConfig};
use ppmix::runner::{compress, decode_bits_with, decompress, encode_bits, encode_bits_with};
use proptest::prelude::*;

/// Few distinct symbols, so longer contexts repeat and escapes get exercised
fn small_alphabet() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(b'a'..b'e', 0..256)
}

proptest! {
    #[test]
    fn test_container_roundtrip(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let compressed = compress(&input).unwrap();
        prop_assert_eq!(decompress(&compressed).unwrap(), input);
    }

    #[test]
    fn test_bits_roundtrip_any_config(
        input in small_alphabet(),
        max_order in 0..=4usize,
        window in 0..=4usize,
    ) {
        let window = window.min(max_order);
        let config = ModelConfig::new(max_order, window).unwrap();
        let bits = encode_bits_with(config, &input).unwrap();
        prop_assert!(bits.iter().all(|&bit| bit <= 1));
        prop_assert_eq!(decode_bits_with(config, &bits, input.len()).unwrap(), input);
    }

    #[test]
    fn test_deterministic(input in small_alphabet()) {
        prop_assert_eq!(encode_bits(&input).unwrap(), encode_bits(&input).unwrap());
    }

    #[test]
    fn test_normalized_and_positive(input in small_alphabet()) {
        let mut model = BlendedModel::new();
        for &symbol in &input {
            let dist = model.predict();
            prop_assert!((dist.total() - 1.0).abs() < 1e-9, "sum {}", dist.total());
            prop_assert!(dist.probabilities().iter().all(|&p| p > 0.0));
            model.update(symbol);
        }
    }

    #[test]
    fn test_batch_matches_per_symbol(input in small_alphabet(), full in any::<bool>()) {
        let config = if full { ModelConfig::full(3).unwrap() } else { ModelConfig::default() };
        let mut model = BlendedModel::with_config(config);
        input.iter().for_each(|&symbol| model.update(symbol));

        let dist = model.predict();
        for symbol in 0..=255 {
            prop_assert_eq!(dist.p(symbol).to_bits(), model.probability(symbol).to_bits());
        }
    }

    #[test]
    fn test_totals_match_counts(input in small_alphabet()) {
        let mut model = BlendedModel::with_config(ModelConfig::full(3).unwrap());
        input.iter().for_each(|&symbol| model.update(symbol));

        let table = model.table();
        for order in 0..=table.max_order() {
            for (_, stats) in table.contexts(order) {
                let sum: u32 = stats.iter().map(|(_, count)| count).sum();
                prop_assert_eq!(stats.total(), sum);
            }
        }
    }
}
