#![no_main]

use libfuzzer_sys::fuzz_target;
use stored_counter::storage::varint;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must only ever return errors, never panic
    if let Ok(value) = varint::decode_u64_exact(data) {
        // Non-canonical encodings decode too, but re-encode no longer
        let reencoded = varint::encode_u64_vec(value);
        assert!(reencoded.len() <= data.len());
        assert_eq!(varint::decode_u64_exact(&reencoded), Ok(value));
    }
});
