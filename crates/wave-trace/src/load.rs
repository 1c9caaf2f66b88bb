//! Opening waveform files from disk

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Error, Format, Result, Trace, vcd};

const SNIFF_LEN: usize = 64;

/// Open a waveform file and decode it.
///
/// The file must exist and be a regular file. The format is taken from the
/// extension when it is known, otherwise sniffed from the content.
pub fn open(path: impl AsRef<Path>) -> Result<Trace> {
    let path = path.as_ref();
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(path, e)),
    };
    if !metadata.is_file() {
        return Err(Error::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| Error::io(path, e))?;

    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let format = Format::detect(path, head).ok_or_else(|| Error::UnknownFormat {
        path: path.to_path_buf(),
    })?;
    tracing::debug!(path = %path.display(), %format, bytes = bytes.len(), "opening waveform");

    match format {
        Format::Vcd => vcd::parse(&String::from_utf8_lossy(&bytes)),
        Format::Fst | Format::Ghw => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            format: format.name().to_string(),
        }),
    }
}
