use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crc32fast::Hasher;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::compression::compress::{CompressedBlock, CompressionType, EncodedIntegerBlock, IntegerEncodingType};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::postings::list::PostingsList;
use crate::postings::types::{Keyed, PositionalPosting};

/// Byte range of one framed record in the postings file, as recorded in the
/// dictionary (§3, §4.2). Independently seekable and decodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Slice {
    pub offset: u64,
    pub length: u64,
}

/// A `PositionalPosting` as written to disk: its position offsets are
/// delta-encoded (ascending within one document, §4.1) rather than stored as
/// plain `u32`s, since this is the one field in the postings file with enough
/// internal redundancy to be worth it.
#[derive(Serialize, Deserialize)]
struct WirePositionalPosting {
    doc_id: DocId,
    encoded_positions: Vec<u8>,
    encoding: IntegerEncodingType,
}

/// Appends length-prefixed, CRC32-checksummed, LZ4-compressed `bincode`
/// records to the postings file. Record layout:
/// `[u64 compressed_len][compressed bincode(CompressedBlock)][u32 crc32]`.
/// Skip state is never written — only the raw ordered value sequence.
pub struct PostingsWriter {
    file: File,
    cursor: u64,
}

impl PostingsWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(PostingsWriter { file, cursor: 0 })
    }

    fn write_framed<T: Serialize>(&mut self, values: &T) -> Result<Slice> {
        let payload = bincode::serialize(values)?;
        let block = CompressedBlock::compress(&payload, CompressionType::LZ4)?;
        let framed = bincode::serialize(&block)?;

        let mut hasher = Hasher::new();
        hasher.update(&framed);
        let checksum = hasher.finalize();

        let offset = self.cursor;
        self.file.write_all(&(framed.len() as u64).to_le_bytes())?;
        self.file.write_all(&framed)?;
        self.file.write_all(&checksum.to_le_bytes())?;

        let written = 8 + framed.len() as u64 + 4;
        self.cursor += written;

        Ok(Slice { offset, length: written })
    }

    pub fn write_record<T: Serialize>(&mut self, values: &[T]) -> Result<Slice> {
        self.write_framed(values)
    }

    /// Writes a positional record with delta-encoded position offsets (§4.1).
    pub fn write_positional_record(&mut self, values: &[PositionalPosting]) -> Result<Slice> {
        let wire = values
            .iter()
            .map(|p| {
                let block = EncodedIntegerBlock::encode(&p.positions, IntegerEncodingType::Delta)?;
                Ok(WirePositionalPosting {
                    doc_id: p.doc_id.clone(),
                    encoded_positions: block.data,
                    encoding: block.encoding,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.write_framed(&wire)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Reads framed records back by `(offset, length)`. Never memory-maps across
/// cursor lifetimes (§5) — every load seeks, reads fully, then returns.
pub struct PostingsReader {
    file: File,
}

impl PostingsReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(PostingsReader { file })
    }

    fn read_framed<T: DeserializeOwned>(&mut self, slice: &Slice) -> Result<T> {
        self.file.seek(SeekFrom::Start(slice.offset))?;

        let mut len_buf = [0u8; 8];
        self.file.read_exact(&mut len_buf)?;
        let framed_len = u64::from_le_bytes(len_buf) as usize;

        let mut framed = vec![0u8; framed_len];
        self.file.read_exact(&mut framed)?;

        let mut checksum_buf = [0u8; 4];
        self.file.read_exact(&mut checksum_buf)?;
        let stored_checksum = u32::from_le_bytes(checksum_buf);

        let mut hasher = Hasher::new();
        hasher.update(&framed);
        if hasher.finalize() != stored_checksum {
            return Err(Error::decode("postings record checksum mismatch"));
        }

        let block: CompressedBlock = bincode::deserialize(&framed)
            .map_err(|e| Error::new(ErrorKind::Decode, e.to_string()))?;
        let payload = block.decompress()?;

        bincode::deserialize(&payload).map_err(|e| Error::new(ErrorKind::Decode, e.to_string()))
    }

    pub fn read_record<T: DeserializeOwned>(&mut self, slice: &Slice) -> Result<Vec<T>> {
        self.read_framed(slice)
    }

    /// Reads a positional record written by `write_positional_record`,
    /// reversing the delta encoding on each posting's positions.
    pub fn read_positional_record(&mut self, slice: &Slice) -> Result<Vec<PositionalPosting>> {
        let wire: Vec<WirePositionalPosting> = self.read_framed(slice)?;
        wire.into_iter()
            .map(|w| {
                let block = EncodedIntegerBlock {
                    data: w.encoded_positions,
                    original_count: 0,
                    encoding: w.encoding,
                };
                let positions = block.decode()?;
                Ok(PositionalPosting::new(w.doc_id, positions))
            })
            .collect()
    }

    /// Reads a record and re-derives its skip layout (always recomputed, never
    /// persisted — see §4.2).
    pub fn read_postings_list<T: DeserializeOwned + Keyed>(
        &mut self,
        slice: &Slice,
    ) -> Result<PostingsList<T>> {
        let values = self.read_record(slice)?;
        Ok(PostingsList::from_values(values))
    }

    /// Reads a positional postings list, delta-decoding positions and
    /// re-deriving the skip layout.
    pub fn read_positional_postings_list(&mut self, slice: &Slice) -> Result<PostingsList<PositionalPosting>> {
        let values = self.read_positional_record(slice)?;
        Ok(PostingsList::from_values(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_record_round_trips_through_compression() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postings.bin");

        let values = vec![DocId::new("a"), DocId::new("b"), DocId::new("c")];
        let mut writer = PostingsWriter::create(&path).unwrap();
        let slice = writer.write_record(&values).unwrap();
        writer.flush().unwrap();

        let mut reader = PostingsReader::open(&path).unwrap();
        let decoded: Vec<DocId> = reader.read_record(&slice).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn positional_record_round_trips_with_delta_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postings.bin");

        let values = vec![
            PositionalPosting::new(DocId::new("d1"), vec![0, 5, 6, 100]),
            PositionalPosting::new(DocId::new("d2"), vec![2]),
        ];
        let mut writer = PostingsWriter::create(&path).unwrap();
        let slice = writer.write_positional_record(&values).unwrap();
        writer.flush().unwrap();

        let mut reader = PostingsReader::open(&path).unwrap();
        let decoded = reader.read_positional_record(&slice).unwrap();
        assert_eq!(decoded, values);
    }
}
