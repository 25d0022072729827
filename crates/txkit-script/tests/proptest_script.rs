use proptest::prelude::*;

use txkit_script::Script;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn push_data_script_decodes_back(parts in prop::collection::vec(
        prop::collection::vec(any::<u8>(), 1..100), 1..8)
    ) {
        let mut script = Script::new();
        for part in &parts {
            script.append_push_data(part).unwrap();
        }
        let chunks = script.chunks().unwrap();
        prop_assert_eq!(chunks.len(), parts.len());
        for (chunk, part) in chunks.iter().zip(parts.iter()) {
            prop_assert_eq!(chunk.data.as_ref().unwrap(), part);
        }
    }

    #[test]
    fn hex_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let script = Script::from_bytes(&bytes);
        let parsed = Script::from_hex(&script.to_hex()).unwrap();
        prop_assert_eq!(script, parsed);
    }
}
