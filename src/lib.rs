//! A Blu-ray movie playlist (MPLS) decoder.
//!
//! The entry point into this crate is the [`Playlist`] struct. You can obtain
//! an instance of it through [`Playlist::parse`], [`Playlist::from`] or
//! [`Playlist::open`].
//!
//! Decoding yields how the title is stitched together from its clip files:
//! the global trim points, the ordered stream clips with their timing on both
//! the clip clock and the playlist timeline, the elementary stream counts of
//! each clip, and the chapter marks rebased onto the playlist timeline. The
//! referenced `.m2ts`/`.clpi` files themselves are never opened.
//!
//! A few behaviors worth knowing about:
//!
//! - Chapter marks of the "link point" type are ignored. Only entry marks
//!   become [`Chapter`]s.
//! - A chapter starting less than one second before the end of the title is
//!   dropped; many discs carry such a spurious trailing mark.
//! - Multi-angle segments are walked but their alternate clips are not
//!   returned. [`StreamClip::angle_count`] tells you how many angles a
//!   segment has.
//!
//! [`Playlist`]: types/struct.Playlist.html
//! [`Playlist::parse`]: types/struct.Playlist.html#method.parse
//! [`Playlist::from`]: types/struct.Playlist.html#method.from
//! [`Playlist::open`]: types/struct.Playlist.html#method.open
//! [`Chapter`]: types/struct.Chapter.html
//! [`StreamClip::angle_count`]: types/struct.StreamClip.html#structfield.angle_count
//!
//! # Examples
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mpls_chapters::{HumanDuration, Playlist};
//!
//! let playlist = Playlist::open("BDMV/PLAYLIST/00800.mpls")?;
//!
//! println!("Playlist length: {}", HumanDuration(playlist.duration_sec));
//! for (i, chapter) in playlist.chapters.iter().enumerate() {
//!     println!("Chapter {:2}: {}", i + 1, HumanDuration(chapter.relative_time_sec));
//! }
//! # Ok(())
//! # }
//! ```
#![doc(html_root_url = "https://docs.rs/mpls-chapters/0.1.0")]

mod duration;
mod error;
mod parser;
pub mod reader;
pub mod types;

pub use duration::{format_duration, HumanDuration};
pub use error::{FileError, MplsError, TrimPoint};
pub use parser::MIN_FILE_SIZE;
pub use types::*;
