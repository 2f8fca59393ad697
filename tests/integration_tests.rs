//! Integration Tests
//!
//! End-to-end tests for the decode, blur, encode pipeline.

use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use bmpblur::filter::{blur, convolve, Filter, FilterChain, GaussianBlur, Kernel};
use bmpblur::image::{
    decode, encode, generate_gradient, generate_solid, read_header, DecodeOptions, PixelBuffer,
};
use bmpblur::{BlurConfig, BlurError};

/// Build a BMP by hand: bottom-up rows, BGR pixels, no padding
fn write_raw_bmp(path: &Path, width: u32, height: u32, bgr_bottom_up: &[u8]) {
    let size = bgr_bottom_up.len() as u32;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"BM");
    for v in [size + 54, 0, 54, 40, width, height] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    for v in [0, size, 2835, 2835, 0, 0] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes.extend_from_slice(bgr_bottom_up);
    fs::write(path, bytes).unwrap();
}

// === Codec ===

#[test]
fn test_round_trip_pixel_data_is_byte_identical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bmp");
    let output = dir.path().join("out.bmp");

    // width 4: rows are 12 bytes, so padded and unpadded layouts agree
    let pixels: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
    write_raw_bmp(&input, 4, 3, &pixels);

    let buffer = decode(&input, DecodeOptions::strict()).unwrap();
    encode(&output, &buffer).unwrap();

    let original = fs::read(&input).unwrap();
    let written = fs::read(&output).unwrap();
    assert_eq!(written.len(), original.len());
    assert_eq!(&written[54..], &original[54..]);
    // header differs only in the resolution fields we zero out
    assert_eq!(&written[..38], &original[..38]);
}

#[test]
fn test_decode_orientation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orient.bmp");

    // bottom row: one blue pixel; top row: one red pixel
    write_raw_bmp(&path, 1, 2, &[255, 0, 0, 0, 0, 255]);

    let buffer = decode(&path, DecodeOptions::default()).unwrap();
    assert_eq!(buffer.pixel(0, 0).unwrap(), [255, 0, 0]);
    assert_eq!(buffer.pixel(1, 0).unwrap(), [0, 0, 255]);
}

#[test]
fn test_malformed_signature() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.bmp");
    let mut bytes = vec![0u8; 60];
    bytes[0] = b'G';
    bytes[1] = b'I';
    fs::write(&path, bytes).unwrap();

    let err = decode(&path, DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, BlurError::InvalidFormat { .. }));
    assert!(read_header(&path).is_err());
}

#[test]
fn test_encode_header_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("header.bmp");
    encode(&path, &generate_gradient(5, 2).unwrap()).unwrap();

    let header = read_header(&path).unwrap();
    assert_eq!(header.file_size, 5 * 3 * 2 + 54);
    assert_eq!(header.pixel_offset, 54);
    assert_eq!(header.info_size, 40);
    assert_eq!(header.planes, 1);
    assert_eq!(header.bits_per_pixel, 24);
    assert_eq!(header.compression, 0);
    assert_eq!(header.image_size, 30);
    assert_eq!(fs::metadata(&path).unwrap().len(), 84);
}

// === Filters ===

#[test]
fn test_identity_convolution() {
    let input = generate_gradient(13, 9).unwrap();
    assert_eq!(convolve(&input, &Kernel::identity()).unwrap(), input);
}

#[test]
fn test_kernel_normalization_all_sizes() {
    for size in (3..=11).step_by(2) {
        for sigma in [0.3, 1.0, 1.5, 4.0] {
            let kernel = Kernel::gaussian(size, sigma).unwrap();
            assert_abs_diff_eq!(kernel.sum(), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_white_image_border_darkening() {
    let input = generate_solid(15, 11, [255, 255, 255]).unwrap();
    let output = blur(&input, 7, 1.5).unwrap();

    let center = output.pixel(5, 7).unwrap();
    for (row, col) in [(0, 0), (0, 14), (10, 0), (10, 14)] {
        let corner = output.pixel(row, col).unwrap();
        for k in 0..3 {
            assert!(corner[k] < center[k]);
        }
    }
}

#[test]
fn test_uniform_interior_is_preserved() {
    let input = generate_solid(21, 21, [120, 60, 30]).unwrap();
    let output = blur(&input, 5, 1.0).unwrap();

    // away from the border the weights sum to one
    assert_eq!(output.pixel(10, 10).unwrap(), [120, 60, 30]);

    let white = generate_solid(21, 21, [255, 255, 255]).unwrap();
    let output = blur(&white, 7, 1.5).unwrap();
    for row in 3..18 {
        for col in 3..18 {
            assert_eq!(output.pixel(row, col).unwrap(), [255, 255, 255]);
        }
    }
}

// === Pipeline ===

#[test]
fn test_full_pipeline() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("sample1.bmp");
    let output_path = dir.path().join("output.bmp");

    let source = generate_gradient(32, 24).unwrap();
    encode(&input_path, &source).unwrap();

    let config = BlurConfig::default();
    let decoded = decode(&input_path, config.decode_options()).unwrap();
    let filter = GaussianBlur::new(config.kernel_size, config.sigma).unwrap();
    let blurred = filter.apply(&decoded).unwrap();
    encode(&output_path, &blurred).unwrap();

    let result = decode(&output_path, DecodeOptions::strict()).unwrap();
    assert_eq!(result.width(), 32);
    assert_eq!(result.height(), 24);
    assert_eq!(result, blur(&source, 7, 1.5).unwrap());
    assert_ne!(result.checksum(), source.checksum());
}

#[test]
fn test_chain_pipeline_leaves_source_intact() {
    let source = generate_gradient(10, 10).unwrap();
    let snapshot = source.copy().unwrap();

    let mut chain = FilterChain::new();
    chain.add(Box::new(GaussianBlur::new(3, 0.8).unwrap()));
    chain.add(Box::new(GaussianBlur::new(3, 0.8).unwrap()));
    let _ = chain.apply(&source).unwrap();

    assert_eq!(source, snapshot);
}

#[test]
fn test_empty_buffer_lifecycle() {
    let mut buffer = PixelBuffer::allocate(0, 0).unwrap();
    buffer.release();
    buffer.release();
    assert!(buffer.is_empty());

    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.bmp");
    encode(&path, &buffer).unwrap();
    assert!(decode(&path, DecodeOptions::default()).unwrap().is_empty());
    assert!(blur(&buffer, 3, 1.0).unwrap().is_empty());
}
