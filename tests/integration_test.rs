//! Integration tests for huffpack

use huffpack::config::CompressionConfig;
use huffpack::error::HuffError;
use huffpack::*;
use rand::{Rng, SeedableRng};

fn counts_compressor() -> Compressor {
    Compressor::new(CompressionConfig {
        header: HeaderFormat::Counts,
        ..CompressionConfig::default()
    })
}

#[test]
fn test_full_lifecycle() {
    let compressor = Compressor::default();
    let data = b"the quick brown fox jumps over the lazy dog".repeat(50);
    let compressed = compressor.compress(&data).unwrap();
    assert!(compressed.stats.compressed_size > 0);
    assert!(compressed.stats.ratio < 1.0);
    let decompressed = compressor.decompress(&compressed.data).unwrap();
    assert_eq!(decompressed, data);
}

#[test]
fn test_all_headers_roundtrip() {
    let data = b"test data for all header formats roundtrip";
    for compressor in [Compressor::default(), counts_compressor()] {
        let compressed = compressor.compress(data).unwrap();
        let decompressed = compressor.decompress(&compressed.data).unwrap();
        assert_eq!(
            decompressed, data,
            "roundtrip failed for {:?}",
            compressor.config().header
        );
    }
}

#[test]
fn test_empty_input() {
    let compressor = Compressor::default();
    let compressed = compressor.compress(b"").unwrap();
    // magic + one leaf + one payload bit
    assert_eq!(compressed.data.len(), 6);
    assert!(compressor.decompress(&compressed.data).unwrap().is_empty());

    let compressed = counts_compressor().compress(b"").unwrap();
    assert!(compressor.decompress(&compressed.data).unwrap().is_empty());
}

#[test]
fn test_single_symbol() {
    let compressor = Compressor::default();
    let data = vec![0x41u8; 1000];
    let compressed = compressor.compress(&data).unwrap();
    assert_eq!(compressed.stats.metadata.payload_bits, 1001);
    let info = inspect(&compressed.data).unwrap();
    assert_eq!(info.tree.leaf_count(), 2);
    assert_eq!(compressor.decompress(&compressed.data).unwrap(), data);
}

#[test]
fn test_large_data() {
    let compressor = Compressor::default();
    let data = vec![0xABu8; 100_000];
    let compressed = compressor.compress(&data).unwrap();
    assert!(
        compressed.stats.ratio < 0.2,
        "large uniform data should compress well"
    );
    let decompressed = compressor.decompress(&compressed.data).unwrap();
    assert_eq!(decompressed, data);
}

#[test]
fn test_binary_data() {
    let compressor = Compressor::default();
    let data: Vec<u8> = (0..=255).cycle().take(2000).collect();
    let compressed = compressor.compress(&data).unwrap();
    assert_eq!(inspect(&compressed.data).unwrap().tree.leaf_count(), 257);
    let decompressed = compressor.decompress(&compressed.data).unwrap();
    assert_eq!(decompressed, data);
}

#[test]
fn test_random_data() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    let compressor = Compressor::default();
    for len in [1usize, 7, 255, 4096, 65_537] {
        let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let compressed = compressor.compress(&data).unwrap();
        assert_eq!(compressor.decompress(&compressed.data).unwrap(), data);
    }
}

#[test]
fn test_skewed_random_data() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let data: Vec<u8> = (0..20_000)
        .map(|_| {
            // geometric-ish distribution over a handful of symbols
            let mut b = 0u8;
            while b < 20 && rng.gen_bool(0.5) {
                b += 1;
            }
            b
        })
        .collect();
    let compressor = counts_compressor();
    let compressed = compressor.compress(&data).unwrap();
    assert!(compressed.stats.ratio < 0.5);
    assert_eq!(compressor.decompress(&compressed.data).unwrap(), data);
}

#[test]
fn test_truncated_payload() {
    let compressor = Compressor::default();
    let data = b"truncate me before the end-of-stream code".repeat(4);
    let compressed = compressor.compress(&data).unwrap();
    let header_bytes = (compressed.stats.metadata.header_bits / 8) as usize + 1;
    let cut = &compressed.data[..compressed.data.len() - 8];
    assert!(cut.len() > header_bytes);
    let err = compressor.decompress(cut).unwrap_err();
    assert!(
        matches!(err, HuffError::TruncatedStream { .. }),
        "unexpected error {err:?}"
    );
}

#[test]
fn test_bad_magic() {
    let compressor = Compressor::default();
    let mut compressed = compressor.compress(b"magic check").unwrap().data;
    compressed[0] ^= 0xFF;
    let err = compressor.decompress(&compressed).unwrap_err();
    assert!(matches!(err, HuffError::InvalidMagic { found: Some(_) }));

    let err = compressor.decompress(b"").unwrap_err();
    assert!(matches!(err, HuffError::InvalidMagic { found: None }));
}

#[test]
fn test_header_only_is_truncated() {
    let compressor = Compressor::default();
    let compressed = compressor.compress(b"abcabcabc").unwrap();
    let header_bytes = (compressed.stats.metadata.header_bits / 8) as usize;
    let err = compressor
        .decompress(&compressed.data[..header_bytes])
        .unwrap_err();
    assert!(matches!(err, HuffError::MalformedHeader(_)));
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.txt.hf");
    let restored = dir.path().join("restored.txt");
    let data = b"file based roundtrip through the buffered readers\n".repeat(200);
    std::fs::write(&input, &data).unwrap();

    let compressor = Compressor::new(CompressionConfig {
        buffer_size: 128,
        ..CompressionConfig::default()
    });
    let stats = compressor.compress_file(&input, &packed).unwrap();
    assert_eq!(stats.original_size, data.len() as u64);
    assert_eq!(
        std::fs::metadata(&packed).unwrap().len(),
        stats.compressed_size
    );

    let written = compressor.decompress_file(&packed, &restored).unwrap();
    assert_eq!(written, data.len() as u64);
    assert_eq!(std::fs::read(&restored).unwrap(), data);
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Compressor::default()
        .compress_file(dir.path().join("nope"), dir.path().join("out"))
        .unwrap_err();
    assert!(matches!(err, HuffError::IoError(_)));
}

#[test]
fn test_stats_serialize() {
    let stats = Compressor::default().compress(b"json stats").unwrap().stats;
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["header"], "tree");
    assert_eq!(json["original_size"], 10);
}
