use std::path::PathBuf;

/// The error type of the decoding methods on [`Playlist`].
///
/// Every variant is terminal: no partial playlist is ever produced.
///
/// [`Playlist`]: ../types/struct.Playlist.html
#[derive(Debug, thiserror::Error)]
pub enum MplsError {
    /// An I/O error occurred while reading the input.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The input is shorter than the fixed MPLS header.
    #[error("invalid MPLS file (too small): {len} bytes, need at least {min}")]
    TooSmall { len: usize, min: usize },

    /// The 8-byte header tag is neither `MPLS0100` nor `MPLS0200`.
    #[error("invalid header: expected MPLS0100 or MPLS0200, found {found:?}")]
    InvalidMagic { found: String },

    #[error("invalid playlist offset: {0}")]
    InvalidPlaylistOffset(u32),

    #[error("invalid chapter offset: {0}")]
    InvalidChapterOffset(u32),

    /// The declared chapter count does not fit in the buffer.
    #[error("invalid chapter count: {count} records at offset {offset} exceed {size} bytes")]
    InvalidChapterCount {
        count: u16,
        offset: usize,
        size: usize,
    },

    /// A global trim point has its sign bit set.
    #[error("invalid playlist time {which}: {value}")]
    InvalidTrimPoint { which: TrimPoint, value: i32 },

    /// Fewer bytes were available than the field width requires.
    #[error("short read at offset {offset}: expected {expected} bytes, found {found}")]
    ShortRead {
        offset: usize,
        expected: usize,
        found: usize,
    },

    /// The cursor was moved past the end of the buffer.
    #[error("offset {offset} is out of bounds for a buffer of {size} bytes")]
    OutOfBounds { offset: usize, size: usize },

    /// A chapter mark refers to a clip that does not exist.
    #[error("chapter references stream clip {index}, but the playlist has {count}")]
    ClipIndexOutOfRange { index: u16, count: usize },
}

/// Which of the two global trim points failed validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrimPoint {
    In,
    Out,
}

impl std::fmt::Display for TrimPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrimPoint::In => write!(f, "in"),
            TrimPoint::Out => write!(f, "out"),
        }
    }
}

/// An [`MplsError`] tied to the file it occurred in.
///
/// [`MplsError`]: enum.MplsError.html
#[derive(Debug, thiserror::Error)]
#[error("{}: {source}", path.display())]
pub struct FileError {
    pub path: PathBuf,
    #[source]
    pub source: MplsError,
}

impl FileError {
    pub fn new(path: impl Into<PathBuf>, source: MplsError) -> Self {
        FileError {
            path: path.into(),
            source,
        }
    }

    /// The underlying decode or I/O failure.
    pub fn kind(&self) -> &MplsError {
        &self.source
    }
}
