use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{SampleStore, decode_samples, encode_samples};
use crate::config::FilterSpec;
use crate::constants::{INPUT_SUFFIX, OUTPUT_SUFFIX, SAMPLE_BYTES, SNAPSHOT_SUFFIX};
use crate::error::{Result, ZdfError};

/// [`SampleStore`] over flat binary files named after a spec identifier
///
/// For identifier `id` in directory `dir`:
/// - `dir/id.zdft` holds the seed, and receives snapshots
/// - `dir/id.zdfi` is the streaming input
/// - `dir/id.zdfo` receives one record per processed input sample
///
/// The input and output files are opened on first use.
pub struct FileStore {
    dir: PathBuf,
    identifier: u64,
    input: Option<BufReader<File>>,
    output: Option<BufWriter<File>>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P, identifier: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            identifier,
            input: None,
            output: None,
        }
    }

    pub fn for_spec<P: AsRef<Path>>(dir: P, spec: &FilterSpec) -> Self {
        Self::new(dir, spec.identifier())
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.path(SNAPSHOT_SUFFIX)
    }

    pub fn input_path(&self) -> PathBuf {
        self.path(INPUT_SUFFIX)
    }

    pub fn output_path(&self) -> PathBuf {
        self.path(OUTPUT_SUFFIX)
    }

    fn path(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.identifier, suffix))
    }
}

impl SampleStore for FileStore {
    fn read_seed(&mut self, len: usize) -> Result<Vec<f32>> {
        let path = self.snapshot_path();
        let mut bytes = Vec::with_capacity(len * SAMPLE_BYTES);
        File::open(&path)?
            .take((len * SAMPLE_BYTES) as u64)
            .read_to_end(&mut bytes)?;

        let available = bytes.len() / SAMPLE_BYTES;
        if available < len {
            return Err(ZdfError::SeedShortage {
                needed: len,
                available,
            });
        }
        debug!("Read {} seed samples from {}", len, path.display());
        Ok(decode_samples(&bytes))
    }

    fn next_sample(&mut self) -> Result<Option<f32>> {
        if self.input.is_none() {
            let path = self.input_path();
            debug!("Opening input {}", path.display());
            self.input = Some(BufReader::new(File::open(path)?));
        }
        match self.input.as_mut() {
            Some(reader) => Ok(read_sample(reader)?),
            None => Ok(None),
        }
    }

    fn begin_output(&mut self) -> Result<()> {
        let path = self.output_path();
        debug!("Creating output {}", path.display());
        self.output = Some(BufWriter::new(File::create(path)?));
        Ok(())
    }

    fn write_output(&mut self, record: &[f32]) -> Result<()> {
        if self.output.is_none() {
            self.begin_output()?;
        }
        if let Some(writer) = self.output.as_mut() {
            writer.write_all(&encode_samples(record))?;
        }
        Ok(())
    }

    fn write_snapshot(&mut self, samples: &[f32]) -> Result<()> {
        let path = self.snapshot_path();
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(&encode_samples(samples))?;
        writer.flush()?;
        debug!("Wrote {} snapshot samples to {}", samples.len(), path.display());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.output.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Read one native-endian `f32`; clean or partial end of stream gives `None`
fn read_sample<R: Read>(reader: &mut R) -> io::Result<Option<f32>> {
    let mut buf = [0u8; SAMPLE_BYTES];
    let mut filled = 0;
    while filled < SAMPLE_BYTES {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    match filled {
        0 => Ok(None),
        SAMPLE_BYTES => Ok(Some(f32::from_ne_bytes(buf))),
        partial => {
            warn!("Ignoring {} trailing bytes at end of input", partial);
            Ok(None)
        }
    }
}
