// src/exec/sink.rs

//! Destinations for child stdout/stderr.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const RELAY_CHUNK: usize = 8 * 1024;

/// One of the supervisor's own standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl fmt::Display for StdStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StdStream::Stdout => f.write_str("stdout"),
            StdStream::Stderr => f.write_str("stderr"),
        }
    }
}

impl StdStream {
    fn writer(self) -> Box<dyn AsyncWrite + Unpin + Send> {
        match self {
            StdStream::Stdout => Box::new(tokio::io::stdout()),
            StdStream::Stderr => Box::new(tokio::io::stderr()),
        }
    }
}

/// An append-mode file that several running instances may write to.
///
/// Children with a plain [`OutputSink::File`] get their own duplicate of the
/// descriptor. Relayed writes go through [`SharedFile::write_all`], which
/// holds an async mutex for the whole chunk, so concurrent relays never
/// interleave inside a chunk.
#[derive(Debug, Clone)]
pub struct SharedFile {
    path: PathBuf,
    handle: Arc<File>,
    writer: Arc<Mutex<tokio::fs::File>>,
}

impl SharedFile {
    /// Open `path` for appending, creating it if needed.
    pub fn open_append(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let handle = options.open(path)?;
        let writer = tokio::fs::File::from_std(handle.try_clone()?);

        Ok(Self {
            path: path.to_path_buf(),
            handle: Arc::new(handle),
            writer: Arc::new(Mutex::new(writer)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(buf).await?;
        writer.flush().await
    }

    fn try_clone_handle(&self) -> io::Result<File> {
        self.handle.try_clone()
    }
}

/// Where one child stream goes.
#[derive(Debug, Clone, Default)]
pub enum OutputSink {
    /// Null device.
    #[default]
    Discard,
    /// Share the supervisor's own descriptor.
    Inherit,
    /// Append directly to a file.
    File(SharedFile),
    /// Pipe the child and copy every chunk to both the file and `stream`.
    Tee { file: SharedFile, stream: StdStream },
}

impl OutputSink {
    /// `Stdio` to hand to the child for this sink.
    pub(crate) fn to_stdio(&self) -> io::Result<Stdio> {
        Ok(match self {
            OutputSink::Discard => Stdio::null(),
            OutputSink::Inherit => Stdio::inherit(),
            OutputSink::File(file) => Stdio::from(file.try_clone_handle()?),
            OutputSink::Tee { .. } => Stdio::piped(),
        })
    }

    /// Start copying a piped child stream, if this sink needs it.
    pub(crate) fn relay<R>(&self, reader: R) -> Option<JoinHandle<()>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        match self {
            OutputSink::Tee { file, stream } => {
                Some(tokio::spawn(relay_tee(reader, file.clone(), *stream)))
            }
            _ => None,
        }
    }
}

/// Runs until the pipe closes. Any process still holding the write end keeps
/// it open, so callers must be ready to abort the task.
async fn relay_tee<R>(mut reader: R, file: SharedFile, stream: StdStream)
where
    R: AsyncRead + Unpin,
{
    let mut echo = stream.writer();
    let mut buf = vec![0u8; RELAY_CHUNK];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(error = %e, %stream, "child stream closed with error");
                break;
            }
        };

        let chunk = &buf[..n];
        if let Err(e) = file.write_all(chunk).await {
            warn!(
                path = %file.path().display(),
                error = %e,
                "failed to write child output to file"
            );
        }
        if let Err(e) = echo_chunk(&mut echo, chunk).await {
            debug!(error = %e, %stream, "failed to echo child output");
        }
    }
}

async fn echo_chunk<W>(echo: &mut W, chunk: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    echo.write_all(chunk).await?;
    echo.flush().await
}

/// Resolve a CLI/config output destination into a sink.
///
/// - no path: inherit the supervisor's `stream`
/// - path opens: append to it (and echo to `stream` when `tee` is set)
/// - path fails to open: warn and fall back to inheriting `stream`
pub fn open_sink(path: Option<&Path>, stream: StdStream, tee: bool) -> OutputSink {
    let Some(path) = path else {
        return OutputSink::Inherit;
    };

    match SharedFile::open_append(path) {
        Ok(file) => sink_for_file(file, stream, tee),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to open output file; falling back to {stream}"
            );
            OutputSink::Inherit
        }
    }
}

pub(crate) fn sink_for_file(file: SharedFile, stream: StdStream, tee: bool) -> OutputSink {
    if tee {
        OutputSink::Tee { file, stream }
    } else {
        OutputSink::File(file)
    }
}
