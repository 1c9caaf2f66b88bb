//! Waveform format detection

use std::fmt;
use std::path::Path;

/// Waveform container formats this crate can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Value Change Dump (IEEE 1364), plain text
    Vcd,
    /// GTKWave Fast Signal Trace, binary
    Fst,
    /// GHDL waveform, binary
    Ghw,
}

const GHW_MAGIC: &[u8] = b"GHDLwave\n";

impl Format {
    /// Guess the format from the file extension (case-insensitive).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "vcd" => Some(Self::Vcd),
            "fst" => Some(Self::Fst),
            "ghw" => Some(Self::Ghw),
            _ => None,
        }
    }

    /// Guess the format from the first bytes of the file.
    ///
    /// A VCD file starts with a `$` keyword after optional whitespace. An FST
    /// file starts with a header block (block type 0) whose section length
    /// is stored big-endian in the next eight bytes.
    pub fn sniff(head: &[u8]) -> Option<Self> {
        if head.starts_with(GHW_MAGIC) {
            return Some(Self::Ghw);
        }
        let first = head.iter().find(|b| !b.is_ascii_whitespace())?;
        if *first == b'$' {
            return Some(Self::Vcd);
        }
        if head.len() >= 9 && head[0] == 0 {
            let mut len = [0u8; 8];
            len.copy_from_slice(&head[1..9]);
            // FST header sections are a fixed 329 bytes
            if u64::from_be_bytes(len) == 329 {
                return Some(Self::Fst);
            }
        }
        None
    }

    /// Extension first, content second.
    pub fn detect(path: &Path, head: &[u8]) -> Option<Self> {
        Self::from_extension(path).or_else(|| Self::sniff(head))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vcd => "VCD",
            Self::Fst => "FST",
            Self::Ghw => "GHW",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(Format::from_extension(Path::new("a/b.VCD")), Some(Format::Vcd));
        assert_eq!(Format::from_extension(Path::new("dump.fst")), Some(Format::Fst));
        assert_eq!(Format::from_extension(Path::new("dump.txt")), None);
        assert_eq!(Format::from_extension(Path::new("dump")), None);
    }

    #[test]
    fn sniff_vcd_after_whitespace() {
        assert_eq!(Format::sniff(b"\n\n  $date today $end"), Some(Format::Vcd));
        assert_eq!(Format::sniff(b"hello"), None);
        assert_eq!(Format::sniff(b""), None);
    }

    #[test]
    fn sniff_fst_header_block() {
        let mut head = vec![0u8];
        head.extend_from_slice(&329u64.to_be_bytes());
        assert_eq!(Format::sniff(&head), Some(Format::Fst));
    }

    #[test]
    fn sniff_ghw_magic() {
        assert_eq!(Format::sniff(b"GHDLwave\n\x10"), Some(Format::Ghw));
    }

    #[test]
    fn extension_wins_over_content() {
        assert_eq!(
            Format::detect(Path::new("x.fst"), b"$date $end"),
            Some(Format::Fst)
        );
        assert_eq!(
            Format::detect(Path::new("x.dump"), b"$date $end"),
            Some(Format::Vcd)
        );
    }
}
