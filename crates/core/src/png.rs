//! PNG screenshot encoder.
//!
//! Writes 8-bit truecolor (RGB) images. Scanlines use filter type 0 and the
//! image data is zlib-compressed with `miniz_oxide`; display contents are
//! mostly flat color so this shrinks well.

const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Encode a packed RGB buffer (`width * height * 3` bytes, row-major) as PNG.
pub fn encode_rgb(width: u32, height: u32, rgb: &[u8]) -> Vec<u8> {
    let mut png = Vec::with_capacity(rgb.len() / 4 + 1024);
    png.extend_from_slice(&SIGNATURE);

    // IHDR
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(2); // color type: RGB
    ihdr.push(0); // compression
    ihdr.push(0); // filter
    ihdr.push(0); // interlace
    write_chunk(&mut png, b"IHDR", &ihdr);

    // Filter byte (0=None) + RGB pixels per row
    let row_bytes = width as usize * 3;
    let mut raw = Vec::with_capacity((row_bytes + 1) * height as usize);
    for row in rgb.chunks_exact(row_bytes.max(1)).take(height as usize) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let zlib_data = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
    write_chunk(&mut png, b"IDAT", &zlib_data);
    write_chunk(&mut png, b"IEND", &[]);

    png
}

fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    let len = data.len() as u32;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    // CRC over type + data
    let crc = crc32(&chunk_type[..], data);
    out.extend_from_slice(&crc.to_be_bytes());
}

// CRC-32 (PNG/zlib)
fn crc32(chunk_type: &[u8], data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFFFFFF;
    for &b in chunk_type.iter().chain(data.iter()) {
        crc ^= b as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB88320;
            } else {
                crc >>= 1;
            }
        }
    }
    crc ^ 0xFFFFFFFF
}
