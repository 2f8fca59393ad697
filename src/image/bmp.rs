//! BMP file I/O for bmpblur
//!
//! Reads and writes uncompressed 24-bit Windows bitmaps. On disk, rows are
//! stored bottom-to-top and each pixel as (blue, green, red); in memory the
//! buffer's row 0 is the visual top and pixels are (red, green, blue).
//!
//! Rows are written without padding to a 4-byte boundary, and the reader
//! does not expect padding either. Files whose `width * 3` is not a multiple
//! of four are therefore not readable by strict third-party decoders.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use crate::error::{BlurError, Result};
use crate::image::buffer::{PixelBuffer, BLUE, CHANNELS, GREEN, RED};

// ============================================================================
// Constants
// ============================================================================

/// File signature, ASCII "BM"
pub const SIGNATURE: [u8; 2] = *b"BM";

/// Size of the signature plus file header
pub const FILE_HEADER_SIZE: u32 = 14;

/// Size of the BITMAPINFOHEADER
pub const INFO_HEADER_SIZE: u32 = 40;

/// Offset of the pixel array in files we write
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// The only supported bit depth
pub const SUPPORTED_BITS_PER_PIXEL: u16 = 24;

/// Compression type for uncompressed RGB (BI_RGB)
pub const COMPRESSION_NONE: u32 = 0;

/// Bytes following the signature: file header remainder plus info header
const PREAMBLE_SIZE: usize = (PIXEL_DATA_OFFSET as usize) - SIGNATURE.len();

// ============================================================================
// Decode Options
// ============================================================================

/// Decoder configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject compressed files instead of warning and decoding them as raw
    pub strict: bool,
}

impl DecodeOptions {
    /// Options that reject every non-conforming file
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

// ============================================================================
// Header
// ============================================================================

/// Parsed file header and info header
///
/// Read once per decode and discarded after the pixel data is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BmpHeader {
    pub file_size: u32,
    pub reserved: u32,
    pub pixel_offset: u32,
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub horizontal_resolution: u32,
    pub vertical_resolution: u32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BmpHeader {
    /// Header describing an unpadded 24-bit image of the given size
    ///
    /// # Errors
    /// * `UnsupportedFormat` - If the image is too large for 32-bit BMP size fields
    pub fn for_image(width: u32, height: u32) -> Result<Self> {
        let too_large = || BlurError::UnsupportedFormat {
            format: format!("{}x{} image exceeds BMP size limits", width, height),
        };

        let image_size = width
            .checked_mul(CHANNELS as u32)
            .and_then(|row| row.checked_mul(height))
            .ok_or_else(too_large)?;
        let file_size = image_size
            .checked_add(PIXEL_DATA_OFFSET)
            .ok_or_else(too_large)?;
        let width = i32::try_from(width).map_err(|_| too_large())?;
        let height = i32::try_from(height).map_err(|_| too_large())?;

        Ok(Self {
            file_size,
            reserved: 0,
            pixel_offset: PIXEL_DATA_OFFSET,
            info_size: INFO_HEADER_SIZE,
            width,
            height,
            planes: 1,
            bits_per_pixel: SUPPORTED_BITS_PER_PIXEL,
            compression: COMPRESSION_NONE,
            image_size,
            horizontal_resolution: 0,
            vertical_resolution: 0,
            colors_used: 0,
            colors_important: 0,
        })
    }

    /// Read and parse the signature and both headers
    ///
    /// # Errors
    /// * `InvalidFormat` - If the signature is not "BM" or a header is truncated
    /// * `Io` - On any other read failure
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut signature = [0u8; 2];
        read_exact_or(reader, &mut signature, "file signature truncated")?;
        if signature != SIGNATURE {
            return Err(BlurError::InvalidFormat {
                reason: format!(
                    "bad signature {:02X} {:02X} (expected 'BM')",
                    signature[0], signature[1]
                ),
            });
        }

        let mut preamble = [0u8; PREAMBLE_SIZE];
        read_exact_or(reader, &mut preamble, "header truncated")?;

        let mut fields = FieldReader::new(&preamble);
        Ok(Self {
            file_size: fields.u32(),
            reserved: fields.u32(),
            pixel_offset: fields.u32(),
            info_size: fields.u32(),
            width: fields.i32(),
            height: fields.i32(),
            planes: fields.u16(),
            bits_per_pixel: fields.u16(),
            compression: fields.u32(),
            image_size: fields.u32(),
            horizontal_resolution: fields.u32(),
            vertical_resolution: fields.u32(),
            colors_used: fields.u32(),
            colors_important: fields.u32(),
        })
    }

    /// Write the signature and both headers, little-endian
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&SIGNATURE)?;
        for value in [
            self.file_size,
            self.reserved,
            self.pixel_offset,
            self.info_size,
            self.width as u32,
            self.height as u32,
        ] {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.write_all(&self.planes.to_le_bytes())?;
        writer.write_all(&self.bits_per_pixel.to_le_bytes())?;
        for value in [
            self.compression,
            self.image_size,
            self.horizontal_resolution,
            self.vertical_resolution,
            self.colors_used,
            self.colors_important,
        ] {
            writer.write_all(&value.to_le_bytes())?;
        }
        Ok(())
    }

    /// Check that this header describes pixel data we can decode
    ///
    /// Returns the image dimensions.
    ///
    /// # Errors
    /// * `UnsupportedFormat` - For non-24-bit depths, top-down rows, or
    ///   compression in strict mode
    /// * `InvalidFormat` - For a negative width
    pub fn validate(&self, options: DecodeOptions) -> Result<(u32, u32)> {
        if self.bits_per_pixel != SUPPORTED_BITS_PER_PIXEL {
            return Err(BlurError::UnsupportedFormat {
                format: format!(
                    "{}-bit pixels (only {}-bit supported)",
                    self.bits_per_pixel, SUPPORTED_BITS_PER_PIXEL
                ),
            });
        }

        if self.compression != COMPRESSION_NONE {
            if options.strict {
                return Err(BlurError::UnsupportedFormat {
                    format: format!("compression type {}", self.compression),
                });
            }
            warn!(
                "Compression type {} is not supported; decoding pixel data as uncompressed",
                self.compression
            );
        }

        let width = u32::try_from(self.width).map_err(|_| BlurError::InvalidFormat {
            reason: format!("negative width {}", self.width),
        })?;
        let height = u32::try_from(self.height).map_err(|_| BlurError::UnsupportedFormat {
            format: format!("top-down row order (height {})", self.height),
        })?;

        Ok((width, height))
    }

    /// Bytes per stored pixel row (no padding)
    pub fn row_bytes(&self) -> usize {
        (self.bits_per_pixel as usize * self.width.max(0) as usize) / 8
    }
}

/// Sequential little-endian field reader over a header byte slice
struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }
}

// ============================================================================
// Decode
// ============================================================================

/// Decode a BMP file into a pixel buffer
///
/// # Arguments
/// * `path` - Path to the BMP file
/// * `options` - Decoder strictness
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidFormat` - Bad signature, truncated header or truncated pixel data
/// * `UnsupportedFormat` - See [`BmpHeader::validate`]
/// * `OutOfMemory` - If the pixel buffer cannot be allocated
/// * `Io` - On any other I/O failure
pub fn decode(path: &Path, options: DecodeOptions) -> Result<PixelBuffer> {
    let mut reader = BufReader::new(open(path)?);
    decode_from_reader(&mut reader, options)
}

/// Read only the headers of a BMP file
pub fn read_header(path: &Path) -> Result<BmpHeader> {
    let mut reader = BufReader::new(open(path)?);
    BmpHeader::read_from(&mut reader)
}

/// Decode BMP data from any seekable reader
pub fn decode_from_reader<R: Read + Seek>(
    reader: &mut R,
    options: DecodeOptions,
) -> Result<PixelBuffer> {
    let header = BmpHeader::read_from(reader)?;
    debug!("BMP header: {:?}", header);

    let (width, height) = header.validate(options)?;
    if width == 0 || height == 0 {
        return Ok(PixelBuffer::empty());
    }

    // the declared pixel array must fit in the stream before we allocate for it
    let stream_len = reader.seek(SeekFrom::End(0))?;
    let pixel_end = (header.row_bytes() as u64)
        .checked_mul(height as u64)
        .and_then(|size| size.checked_add(header.pixel_offset as u64));
    if pixel_end.map_or(true, |end| end > stream_len) {
        return Err(BlurError::InvalidFormat {
            reason: format!(
                "pixel data truncated: {}x{} image needs {} bytes from offset {}, stream has {}",
                width,
                height,
                (header.row_bytes() as u64).saturating_mul(height as u64),
                header.pixel_offset,
                stream_len
            ),
        });
    }

    reader.seek(SeekFrom::Start(header.pixel_offset as u64))?;

    let mut buffer = PixelBuffer::allocate(width, height)?;

    let mut disk_row = vec![0u8; header.row_bytes()];
    let height = height as usize;

    for i in 0..height {
        read_exact_or(reader, &mut disk_row, "pixel data truncated")?;

        let row = buffer.row_mut(height - 1 - i)?;
        for (dst, src) in row
            .chunks_exact_mut(CHANNELS)
            .zip(disk_row.chunks_exact(CHANNELS))
        {
            dst[RED] = src[2];
            dst[GREEN] = src[1];
            dst[BLUE] = src[0];
        }
    }

    Ok(buffer)
}

// ============================================================================
// Encode
// ============================================================================

/// Encode a pixel buffer as a 24-bit BMP file
///
/// # Errors
/// * `UnsupportedFormat` - If the image is too large for BMP size fields
/// * `Io` - If the file cannot be created or written
pub fn encode(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    // size limits are checked before the output file is created
    let header = BmpHeader::for_image(buffer.width(), buffer.height())?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_image(&mut writer, &header, buffer)?;
    writer.flush()?;
    Ok(())
}

/// Encode a pixel buffer to any writer
pub fn encode_to_writer<W: Write>(writer: &mut W, buffer: &PixelBuffer) -> Result<()> {
    let header = BmpHeader::for_image(buffer.width(), buffer.height())?;
    write_image(writer, &header, buffer)
}

fn write_image<W: Write>(writer: &mut W, header: &BmpHeader, buffer: &PixelBuffer) -> Result<()> {
    header.write_to(writer)?;

    let mut disk_row = Vec::with_capacity(buffer.width() as usize * CHANNELS);
    for row in (0..buffer.height() as usize).rev() {
        disk_row.clear();
        for pixel in buffer.row(row)?.chunks_exact(CHANNELS) {
            disk_row.extend_from_slice(&[pixel[BLUE], pixel[GREEN], pixel[RED]]);
        }
        writer.write_all(&disk_row)?;
    }

    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BlurError::FileNotFound {
            path: path.display().to_string(),
            source: Some(e),
        },
        _ => BlurError::Io(e),
    })
}

/// `read_exact` that reports a short read as a format error
fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], reason: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => BlurError::InvalidFormat {
            reason: reason.to_string(),
        },
        _ => BlurError::Io(e),
    })
}

// ============================================================================
// Tests
// ============================================================================
