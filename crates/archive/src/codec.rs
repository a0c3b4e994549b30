//! Compression layers of a release tarball.

use crate::Compression;
use crate::error::{ErrorKind, Result};
use bzip2::{read::BzDecoder, write::BzEncoder};
use exn::ResultExt;
use flate2::{read::GzDecoder, write::GzEncoder};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Read, Write};

const BZIP2_MAGIC: &[u8] = b"BZh";
const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];

impl Compression {
    /// Identify the compression layer from the leading bytes of a file.
    ///
    /// Anything unrecognised is treated as an uncompressed tarball; the tar
    /// reader rejects it later if it isn't one.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(GZIP_MAGIC) {
            Self::Gzip
        } else if bytes.starts_with(BZIP2_MAGIC) {
            Self::Bzip2
        } else {
            Self::None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bzip2 => "bzip2",
            Self::Gzip => "gzip",
        }
    }

    /// Streaming decoder over `reader`.
    pub fn decoder<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Self::None => Box::new(reader),
            Self::Bzip2 => Box::new(BzDecoder::new(reader)),
            Self::Gzip => Box::new(GzDecoder::new(reader)),
        }
    }

    /// Compress `input` in memory at the default level.
    ///
    /// Used to build release-shaped fixture archives.
    ///
    /// ```
    /// use ciprep_archive::Compression;
    ///
    /// let packed = Compression::Gzip.compress(b"sccache").unwrap();
    /// assert_eq!(Compression::sniff(&packed), Compression::Gzip);
    /// ```
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let output = match self {
            Self::None => input.to_vec(),
            Self::Bzip2 => {
                let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)?
            },
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)?
            },
        };
        tracing::trace!(format = %self, input = input.len(), output = output.len(), "Compressed");
        Ok(output)
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
