use std::io::{Cursor, Write};

use anyhow::{bail, ensure, Context, Result};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LOCAL_FILE_HEADER_SIGNATURE: &[u8; 4] = b"PK\x03\x04";
const CENTRAL_DIRECTORY_SIGNATURE: &[u8; 4] = b"PK\x01\x02";
const END_OF_CENTRAL_DIRECTORY_SIGNATURE: &[u8; 4] = b"PK\x05\x06";
const DATA_DESCRIPTOR_SIGNATURE: &[u8; 4] = b"PK\x07\x08";
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

enum Item {
    File(String, Vec<u8>),
    Directory(String),
}

/// Assembles an in-memory zip for feeding to the importer.
pub struct ArchiveBuilder {
    items: Vec<Item>,
    compression: CompressionMethod,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            compression: CompressionMethod::Stored,
        }
    }

    pub fn deflated(mut self) -> Self {
        self.compression = CompressionMethod::Deflated;
        self
    }

    pub fn file(mut self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.items
            .push(Item::File(path.to_string(), content.as_ref().to_vec()));
        self
    }

    pub fn directory(mut self, path: &str) -> Self {
        self.items.push(Item::Directory(path.to_string()));
        self
    }

    pub fn manifest(self, content: &str) -> Self {
        self.file("youngandroidproject/project.properties", content)
    }

    pub fn build(self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(self.compression);
        for item in self.items {
            match item {
                Item::File(path, content) => {
                    writer
                        .start_file(path.as_str(), options)
                        .with_context(|| format!("starting entry {}", path))?;
                    writer.write_all(&content)?;
                }
                Item::Directory(path) => {
                    writer
                        .add_directory(path.as_str(), options)
                        .with_context(|| format!("adding directory {}", path))?;
                }
            }
        }
        Ok(writer.finish()?.into_inner())
    }

    /// Like [`build`](Self::build), but laid out the way a writer on a
    /// non-seekable stream does it: local headers carry flag bit 3 with zeroed
    /// CRC and sizes, and each entry's data is followed by a data descriptor.
    pub fn build_streamed(self) -> Result<Vec<u8>> {
        with_data_descriptors(&self.build()?)
    }
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16> {
    let raw = bytes
        .get(at..at + 2)
        .with_context(|| format!("archive truncated at {}", at))?;
    Ok(u16::from_le_bytes([raw[0], raw[1]]))
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32> {
    let raw = bytes
        .get(at..at + 4)
        .with_context(|| format!("archive truncated at {}", at))?;
    Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn write_u16(bytes: &mut [u8], at: usize, value: u16) {
    bytes[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn write_u32(bytes: &mut [u8], at: usize, value: u32) {
    bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Rewrite a plain zip so every entry uses a trailing data descriptor.
///
/// Expects local headers in central-directory order, which is what
/// `ZipWriter` produces.
fn with_data_descriptors(bytes: &[u8]) -> Result<Vec<u8>> {
    let eocd = bytes
        .windows(4)
        .rposition(|window| window == END_OF_CENTRAL_DIRECTORY_SIGNATURE)
        .context("no end of central directory record")?;
    let entry_count = read_u16(bytes, eocd + 10)? as usize;
    let directory_start = read_u32(bytes, eocd + 16)? as usize;

    let mut out = Vec::with_capacity(bytes.len() + entry_count * 16);
    let mut directory = Vec::new();
    let mut cursor = directory_start;
    for _ in 0..entry_count {
        ensure!(
            bytes.get(cursor..cursor + 4) == Some(&CENTRAL_DIRECTORY_SIGNATURE[..]),
            "bad central directory entry at {}",
            cursor
        );
        let crc = read_u32(bytes, cursor + 16)?;
        let compressed = read_u32(bytes, cursor + 20)?;
        let uncompressed = read_u32(bytes, cursor + 24)?;
        let record_len = 46
            + read_u16(bytes, cursor + 28)? as usize
            + read_u16(bytes, cursor + 30)? as usize
            + read_u16(bytes, cursor + 32)? as usize;
        let local = read_u32(bytes, cursor + 42)? as usize;

        ensure!(
            bytes.get(local..local + 4) == Some(&LOCAL_FILE_HEADER_SIGNATURE[..]),
            "bad local header at {}",
            local
        );
        let header_len =
            30 + read_u16(bytes, local + 26)? as usize + read_u16(bytes, local + 28)? as usize;
        let data_end = local + header_len + compressed as usize;
        let new_local = out.len();

        let mut header = bytes[local..local + header_len].to_vec();
        let flags = read_u16(&header, 6)? | FLAG_DATA_DESCRIPTOR;
        write_u16(&mut header, 6, flags);
        write_u32(&mut header, 14, 0);
        write_u32(&mut header, 18, 0);
        write_u32(&mut header, 22, 0);
        out.extend_from_slice(&header);
        out.extend_from_slice(&bytes[local + header_len..data_end]);
        out.extend_from_slice(DATA_DESCRIPTOR_SIGNATURE);
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&compressed.to_le_bytes());
        out.extend_from_slice(&uncompressed.to_le_bytes());

        let mut record = bytes[cursor..cursor + record_len].to_vec();
        let flags = read_u16(&record, 8)? | FLAG_DATA_DESCRIPTOR;
        write_u16(&mut record, 8, flags);
        write_u32(&mut record, 42, new_local as u32);
        directory.extend_from_slice(&record);
        cursor += record_len;
    }

    let new_directory_start = out.len();
    out.extend_from_slice(&directory);
    let mut trailer = bytes[eocd..].to_vec();
    write_u32(&mut trailer, 16, new_directory_start as u32);
    out.extend_from_slice(&trailer);
    Ok(out)
}

/// Overwrite the signature of the `index`-th local file header (zero based)
/// so the stream breaks once a reader reaches that entry.
pub fn corrupt_entry_header(mut bytes: Vec<u8>, index: usize) -> Result<Vec<u8>> {
    let offset = bytes
        .windows(LOCAL_FILE_HEADER_SIGNATURE.len())
        .enumerate()
        .filter(|(_, window)| *window == LOCAL_FILE_HEADER_SIGNATURE)
        .map(|(offset, _)| offset)
        .nth(index);
    let Some(offset) = offset else {
        bail!("archive has no local header #{}", index);
    };
    bytes[offset..offset + 4].copy_from_slice(b"JUNK");
    Ok(bytes)
}
