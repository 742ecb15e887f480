use flate2::Compression as GzLevel;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Compression applied to a trajectory file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Gzip when the path ends in `.gz`, plain text otherwise.
    #[default]
    Auto,
    None,
    Gzip,
}

impl Compression {
    /// Resolves [`Compression::Auto`] from the file extension.
    pub fn resolve(self, path: &Path) -> Compression {
        match self {
            Compression::Auto => {
                let gzip = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
                if gzip { Compression::Gzip } else { Compression::None }
            }
            other => other,
        }
    }
}

/// A seekable byte source for the line stream.
///
/// Gzip files are decompressed in memory so that frame offsets can be
/// revisited without re-inflating the file.
#[derive(Debug)]
pub enum Source {
    File(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl Source {
    pub fn open(path: &Path, compression: Compression) -> io::Result<Self> {
        let file = File::open(path)?;
        match compression.resolve(path) {
            Compression::Gzip => {
                let mut data = Vec::new();
                MultiGzDecoder::new(BufReader::new(file)).read_to_end(&mut data)?;
                Ok(Source::Memory(Cursor::new(data)))
            }
            _ => Ok(Source::File(BufReader::new(file))),
        }
    }
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::File(inner) => inner.read(buf),
            Source::Memory(inner) => inner.read(buf),
        }
    }
}

impl BufRead for Source {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Source::File(inner) => inner.fill_buf(),
            Source::Memory(inner) => inner.fill_buf(),
        }
    }

    fn consume(&mut self, amount: usize) {
        match self {
            Source::File(inner) => inner.consume(amount),
            Source::Memory(inner) => inner.consume(amount),
        }
    }
}

impl Seek for Source {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Source::File(inner) => inner.seek(pos),
            Source::Memory(inner) => inner.seek(pos),
        }
    }
}

/// Output side of a trajectory file.
#[derive(Debug)]
pub enum Sink {
    File(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Sink {
    /// Creates (or, with `append`, opens for appending) the file at `path`.
    ///
    /// Appending to a gzip file adds a new gzip member, which
    /// [`MultiGzDecoder`] reads back as one continuous stream.
    pub fn create(path: &Path, compression: Compression, append: bool) -> io::Result<Self> {
        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)?
        } else {
            File::create(path)?
        };
        let writer = BufWriter::new(file);
        match compression.resolve(path) {
            Compression::Gzip => Ok(Sink::Gzip(GzEncoder::new(writer, GzLevel::default()))),
            _ => Ok(Sink::File(writer)),
        }
    }

    /// Flushes buffered data and writes the gzip trailer when needed.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Sink::File(mut inner) => inner.flush(),
            Sink::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::File(inner) => inner.write(buf),
            Sink::Gzip(inner) => inner.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::File(inner) => inner.flush(),
            Sink::Gzip(inner) => inner.flush(),
        }
    }
}

/// Decodes a line keeping its byte length: valid UTF-8 is kept, each invalid
/// byte is replaced by `?`.
fn decode_line(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            let mut text = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                text.push_str(chunk.valid());
                text.extend(std::iter::repeat_n('?', chunk.invalid().len()));
            }
            text
        }
    }
}

/// Line reader over a seekable byte stream.
///
/// `\n`, `\r\n` and a lone `\r` all end a line; the terminator is never part
/// of the returned text. Offsets reported by [`tell`](Self::tell) are byte
/// offsets of the underlying (decompressed) stream.
#[derive(Debug)]
pub struct LineStream<R> {
    inner: R,
    position: u64,
    strict: bool,
}

impl<R: BufRead + Seek> LineStream<R> {
    pub fn new(mut inner: R) -> io::Result<Self> {
        let position = inner.stream_position()?;
        Ok(Self {
            inner,
            position,
            strict: false,
        })
    }

    /// In strict mode reading past the end is an `UnexpectedEof` error
    /// instead of an empty line.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Reads the next line without its terminator.
    ///
    /// Every byte that is not part of valid UTF-8 becomes a single `?`, so
    /// byte columns of the returned text match the file. At the end of the
    /// stream this returns an empty string, unless the stream is strict.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut bytes = Vec::new();
        let mut terminated = false;
        let mut read_any = false;
        while !terminated {
            let buffer = self.inner.fill_buf()?;
            if buffer.is_empty() {
                break;
            }
            read_any = true;
            match buffer.iter().position(|b| *b == b'\n' || *b == b'\r') {
                Some(at) => {
                    let is_cr = buffer[at] == b'\r';
                    bytes.extend_from_slice(&buffer[..at]);
                    self.advance(at + 1);
                    if is_cr && self.inner.fill_buf()?.first() == Some(&b'\n') {
                        self.advance(1);
                    }
                    terminated = true;
                }
                None => {
                    let length = buffer.len();
                    bytes.extend_from_slice(buffer);
                    self.advance(length);
                }
            }
        }

        if !read_any && self.strict {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "attempted to read past the end of the stream",
            ));
        }
        Ok(decode_line(bytes))
    }

    /// Returns the next line without consuming it, or `None` at the end.
    pub fn peek_line(&mut self) -> io::Result<Option<String>> {
        if self.eof()? {
            return Ok(None);
        }
        let position = self.position;
        let line = self.read_line()?;
        self.seek(position)?;
        Ok(Some(line))
    }

    pub fn tell(&self) -> u64 {
        self.position
    }

    pub fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.position = self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        self.seek(0)
    }

    /// Whether no bytes remain to be read.
    pub fn eof(&mut self) -> io::Result<bool> {
        Ok(self.inner.fill_buf()?.is_empty())
    }

    fn advance(&mut self, amount: usize) {
        self.inner.consume(amount);
        self.position += amount as u64;
    }
}
