use crate::parser::parse_playlist;
use crate::{FileError, MplsError};
use serde::Serialize;
use std::{
    fmt::{Debug, Display},
    io::Read,
    path::Path,
};

/// The decoded movie playlist.
///
/// See the [crate-level docs] for high-level documentation about how to use this type.
///
/// [crate-level docs]: ../index.html
#[derive(Debug, Clone, Serialize)]
pub struct Playlist {
    /// The global time-in trim point, in seconds.
    pub time_in_sec: f64,
    /// The global time-out trim point, in seconds.
    pub time_out_sec: f64,
    /// The summed duration of all stream clips.
    ///
    /// This is deliberately not `time_out_sec - time_in_sec`: per-clip trims
    /// can exclude leading or trailing material, so the two can differ.
    pub duration_sec: f64,
    pub stream_clips: Vec<StreamClip>,
    pub chapters: Vec<Chapter>,
}

impl Playlist {
    /// Decodes a playlist from an in-memory MPLS file.
    ///
    /// # Examples
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use mpls_chapters::Playlist;
    ///
    /// let bytes = std::fs::read("00800.mpls")?;
    /// let playlist = Playlist::parse(&bytes)?;
    /// println!("{} chapters", playlist.chapter_count());
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(bytes: &[u8]) -> Result<Playlist, MplsError> {
        parse_playlist(bytes)
    }

    /// Attempts to decode a playlist from the given reader.
    ///
    /// The whole input is read into memory first, since the format is
    /// navigated through absolute offsets.
    pub fn from<R: Read>(mut reader: R) -> Result<Playlist, MplsError> {
        let bytes = {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer)?;
            buffer
        };

        parse_playlist(&bytes)
    }

    /// Reads and decodes the playlist file at `path`.
    ///
    /// Any failure is reported together with the path it occurred for.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Playlist, FileError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FileError::new(path, e.into()))?;
        parse_playlist(&bytes).map_err(|e| FileError::new(path, e))
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn stream_clip(&self, index: usize) -> Option<&StreamClip> {
        self.stream_clips.get(index)
    }

    /// The largest angle count of any clip, i.e. `1` for a playlist without
    /// multi-angle segments.
    pub fn angle_count(&self) -> u8 {
        self.stream_clips
            .iter()
            .map(|c| c.angle_count)
            .max()
            .unwrap_or(1)
    }

    pub fn chapter_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.chapters.iter().map(|c| c.relative_time_sec)
    }
}

/// A clip file referenced by the playlist, also known as a segment.
///
/// `filename` is composed of the five-digit clip name and the four-letter
/// codec identifier, e.g. `"00055.M2TS"`. Times ending in `_sec` are seconds;
/// `time_in_sec`/`time_out_sec` are on the clip's own clock, while the
/// `relative_*` pair places the clip on the playlist timeline.
#[derive(Debug, Clone, Serialize)]
pub struct StreamClip {
    pub filename: String,
    pub time_in_sec: f64,
    pub time_out_sec: f64,
    pub duration_sec: f64,
    pub relative_time_in_sec: f64,
    pub relative_time_out_sec: f64,
    pub is_multi_angle: bool,
    /// Number of angles for this segment, counting the main clip.
    ///
    /// The alternate angle clips themselves are skipped, not decoded.
    pub angle_count: u8,
    pub streams: StreamCounts,
}

impl StreamClip {
    /// The clip name without its codec identifier, e.g. `"00055"`.
    pub fn clip_name(&self) -> &str {
        self.filename.split('.').next().unwrap_or(&self.filename)
    }
}

/// The elementary stream counts declared for a clip.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamCounts {
    pub video: u8,
    pub audio: u8,
    /// Presentation graphics (PG) streams.
    pub subtitle: u8,
    /// Interactive graphics (IG) streams.
    pub interactive_menu: u8,
    pub secondary_video: u8,
    pub secondary_audio: u8,
    /// Picture-in-picture streams.
    pub pip: u8,
}

/// A chapter start on the playlist timeline.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub relative_time_sec: f64,
    /// Index of the stream clip the mark was placed in.
    pub clip_index: u16,
}

/// The validated fixed header of an MPLS file.
///
/// Only lives for the duration of one decode.
#[derive(Debug, Clone)]
pub struct MplsHeader {
    /// `MPLS0100` or `MPLS0200`.
    pub tag: String,
    pub playlist_offset: u32,
    pub chapter_offset: u32,
    pub chapter_count: u16,
    pub time_in: TimeStamp,
    pub time_out: TimeStamp,
}

impl MplsHeader {
    /// Where the 14-byte chapter records start.
    pub fn chapter_list_pos(&self) -> usize {
        (self.chapter_offset as usize).saturating_add(6)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct PlayListMark {
    pub mark_type: MarkType,
    pub play_item: PlayItemRef,
    pub time_stamp: TimeStamp,
    pub entry_es_pid: u16,
    pub duration: Option<TimeStamp>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarkType {
    EntryPoint,
    LinkPoint,
    Unknown,
}

impl From<u8> for MarkType {
    fn from(n: u8) -> Self {
        match n {
            0x1 => MarkType::EntryPoint,
            0x2 => MarkType::LinkPoint,
            _ => MarkType::Unknown,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlayItemRef(pub u16);

/// A time stamp, relative to some System Time Clock sequence, expressed in 45 KHz.
///
/// To get a floating-point value in seconds, you can use the [`seconds`] method.
///
/// [`seconds`]: #method.seconds
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct TimeStamp(pub u32);

impl TimeStamp {
    /// Builds a time stamp from a raw 32-bit field. The top bit is overloaded
    /// in some files and never part of the tick count, so it is cleared.
    pub fn from_raw(raw: u32) -> Self {
        TimeStamp(raw & 0x7FFF_FFFF)
    }

    /// Returns this time stamp in units of seconds.
    pub fn seconds(&self) -> f64 {
        (self.0 as f64) / 45_000f64
    }
}

impl Debug for TimeStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeStamp")
            .field("raw", &self.0)
            .field("secs", &self.seconds())
            .finish()
    }
}

impl Display for TimeStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::HumanDuration(self.seconds()))
    }
}
