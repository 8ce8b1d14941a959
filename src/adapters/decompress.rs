use crate::utils::error::Result;
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Xz,
    Zstd,
}

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];

impl Compression {
    /// Picks the codec from the file name, falling back to the leading bytes.
    pub fn detect(name: &str, bytes: &[u8]) -> Self {
        Self::from_name(name).unwrap_or_else(|| Self::sniff(bytes))
    }

    pub fn from_name(name: &str) -> Option<Self> {
        // Ignore any query string on URLs.
        let path = name.split(['?', '#']).next().unwrap_or(name);
        let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())?;
        match extension.as_str() {
            "gz" | "gzip" => Some(Self::Gzip),
            "xz" => Some(Self::Xz),
            "zst" | "zstd" => Some(Self::Zstd),
            "tsv" | "txt" => Some(Self::None),
            _ => None,
        }
    }

    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(GZIP_MAGIC) {
            Self::Gzip
        } else if bytes.starts_with(XZ_MAGIC) {
            Self::Xz
        } else if bytes.starts_with(ZSTD_MAGIC) {
            Self::Zstd
        } else {
            Self::None
        }
    }
}

pub fn decompress(compression: Compression, bytes: Vec<u8>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match compression {
        Compression::None => return Ok(bytes),
        Compression::Gzip => {
            flate2::read::MultiGzDecoder::new(bytes.as_slice()).read_to_end(&mut out)?;
        }
        Compression::Xz => {
            xz2::read::XzDecoder::new_multi_decoder(bytes.as_slice()).read_to_end(&mut out)?;
        }
        Compression::Zstd => {
            zstd::stream::read::Decoder::new(bytes.as_slice())?.read_to_end(&mut out)?;
        }
    }
    tracing::debug!(
        ?compression,
        compressed = bytes.len(),
        decompressed = out.len(),
        "decompressed payload"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TSV: &[u8] = b"date\tcountry\n2020-01-01\tUSA\n";

    #[test]
    fn test_from_name() {
        assert_eq!(Compression::from_name("metadata.tsv.gz"), Some(Compression::Gzip));
        assert_eq!(Compression::from_name("metadata.tsv.xz"), Some(Compression::Xz));
        assert_eq!(Compression::from_name("metadata.tsv.zst"), Some(Compression::Zstd));
        assert_eq!(Compression::from_name("metadata.tsv"), Some(Compression::None));
        assert_eq!(
            Compression::from_name("https://host/m.tsv.zst?download=1"),
            Some(Compression::Zstd)
        );
        assert_eq!(Compression::from_name("upload"), None);
    }

    #[test]
    fn test_gzip_is_sniffed_without_extension() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(TSV).unwrap();
        let compressed = encoder.finish().unwrap();

        let codec = Compression::detect("blob", &compressed);
        assert_eq!(codec, Compression::Gzip);
        assert_eq!(decompress(codec, compressed).unwrap(), TSV);
    }

    #[test]
    fn test_xz_and_zstd_decode() {
        let mut xz = xz2::write::XzEncoder::new(Vec::new(), 6);
        xz.write_all(TSV).unwrap();
        let xz = xz.finish().unwrap();
        assert_eq!(Compression::sniff(&xz), Compression::Xz);
        assert_eq!(decompress(Compression::Xz, xz).unwrap(), TSV);

        let zst = zstd::stream::encode_all(TSV, 3).unwrap();
        assert_eq!(Compression::sniff(&zst), Compression::Zstd);
        assert_eq!(decompress(Compression::Zstd, zst).unwrap(), TSV);
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(Compression::sniff(TSV), Compression::None);
        assert_eq!(decompress(Compression::None, TSV.to_vec()).unwrap(), TSV);
    }

    #[test]
    fn test_corrupt_gzip_is_an_error() {
        assert!(decompress(Compression::Gzip, vec![0x1f, 0x8b, 0x00]).is_err());
    }
}
