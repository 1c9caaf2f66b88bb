//! Where tool calls get their waveforms from

use std::io::ErrorKind;
use std::path::Path;

use wave_trace::Trace;

/// Opens a waveform by path. Every tool call opens its own trace and drops
/// it before returning.
pub trait WaveformSource {
    fn open(&self, path: &Path) -> wave_trace::Result<Trace>;
}

impl<F> WaveformSource for F
where
    F: Fn(&Path) -> wave_trace::Result<Trace>,
{
    fn open(&self, path: &Path) -> wave_trace::Result<Trace> {
        self(path)
    }
}

/// Reads waveforms from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl WaveformSource for FileSource {
    fn open(&self, path: &Path) -> wave_trace::Result<Trace> {
        let resolved = dunce::canonicalize(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => wave_trace::Error::NotFound {
                path: path.to_path_buf(),
            },
            _ => wave_trace::Error::io(path, e),
        })?;
        tracing::debug!(path = %resolved.display(), "Opening waveform");
        wave_trace::open(&resolved)
    }
}
