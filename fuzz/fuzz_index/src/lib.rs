use chipmunk_json::{escape, escape_fallback, OffsetSink, StructuralIndexer};

pub fn index(input: &[u8]) {
    // Make sure we don't panic when indexing arbitrary bytes
    let mut indexer = StructuralIndexer::new();

    let mut simd_sink = OffsetSink::new(input.len());
    let simd = indexer.index(input, input.len(), &mut simd_sink);

    let mut fallback_sink = OffsetSink::new(input.len());
    let fallback = indexer.index_fallback(input, input.len(), &mut fallback_sink);

    // The vectorized and fallback implementations must always agree
    assert_eq!(simd, fallback);
    assert_eq!(drain(&mut simd_sink), drain(&mut fallback_sink));

    if simd.is_ok() {
        let offsets = {
            let mut sink = OffsetSink::new(input.len());
            indexer.index(input, input.len(), &mut sink).unwrap();
            drain(&mut sink)
        };

        for pair in offsets.windows(2) {
            assert!(pair[0] < pair[1], "offsets must be strictly increasing");
        }

        if let Some(last) = offsets.last() {
            assert!(*last < input.len(), "offsets must stay inside the input");
        }
    } else {
        // the two error kinds only exist in documents that `serde_json`
        // also rejects
        assert!(serde_json::from_slice::<serde_json::Value>(input).is_err());
    }

    // Both escape strategies must produce identical output
    let mut simd_dst = vec![0; input.len()];
    let simd_written = escape(input, &mut simd_dst);

    let mut fallback_dst = vec![0; input.len()];
    let fallback_written = escape_fallback(input, &mut fallback_dst);

    assert_eq!(simd_written, fallback_written);
    assert_eq!(simd_dst[..simd_written], fallback_dst[..fallback_written]);
}

fn drain(sink: &mut OffsetSink) -> Vec<usize> {
    let mut offsets = Vec::new();

    while !sink.is_end() {
        offsets.push(sink.get_and_advance());
    }

    offsets
}
