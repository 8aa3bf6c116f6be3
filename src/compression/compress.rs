use crate::compression::delta::DeltaEncoder;
use crate::compression::vbyte::VByteEncoder;
use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// Compressed block storage for general-purpose data. Consolidated on `lz4_flex`
/// (the one compressor this crate still needs, for postings-file records).
#[derive(Serialize, Deserialize)]
pub struct CompressedBlock {
    pub data: Vec<u8>,
    pub original_size: usize,
    pub compression: CompressionType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CompressionType {
    None,
    LZ4,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum IntegerEncodingType {
    None,
    Delta,
    VByte,
}

impl CompressedBlock {
    pub fn compress(data: &[u8], compression: CompressionType) -> Result<Self> {
        let compressed = match compression {
            CompressionType::None => data.to_vec(),
            CompressionType::LZ4 => lz4_flex::compress_prepend_size(data),
        };

        Ok(CompressedBlock {
            data: compressed,
            original_size: data.len(),
            compression,
        })
    }

    pub fn decompress(&self) -> Result<Vec<u8>> {
        match self.compression {
            CompressionType::None => Ok(self.data.clone()),
            CompressionType::LZ4 => lz4_flex::decompress_size_prepended(&self.data)
                .map_err(|e| crate::core::error::Error::new(
                    crate::core::error::ErrorKind::Decode,
                    e.to_string(),
                )),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct EncodedIntegerBlock {
    pub data: Vec<u8>,
    pub original_count: usize,
    pub encoding: IntegerEncodingType,
}

impl EncodedIntegerBlock {
    pub fn encode(nums: &[u32], encoding: IntegerEncodingType) -> Result<Self> {
        let encoded = match encoding {
            IntegerEncodingType::None => {
                let mut bytes = Vec::with_capacity(nums.len() * 4);
                for &num in nums {
                    bytes.extend_from_slice(&num.to_le_bytes());
                }
                bytes
            }
            IntegerEncodingType::Delta => DeltaEncoder::encode_u32_list(nums)?,
            IntegerEncodingType::VByte => VByteEncoder::encode_u32_list(nums)?,
        };

        Ok(EncodedIntegerBlock {
            data: encoded,
            original_count: nums.len(),
            encoding,
        })
    }

    pub fn decode(&self) -> Result<Vec<u32>> {
        match self.encoding {
            IntegerEncodingType::None => Ok(self
                .data
                .chunks_exact(4)
                .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect()),
            IntegerEncodingType::Delta => DeltaEncoder::decode_u32_list(&self.data),
            IntegerEncodingType::VByte => VByteEncoder::decode_u32_list(&self.data),
        }
    }
}
