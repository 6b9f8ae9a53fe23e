use super::types;
use crate::error::TrimPoint;
use crate::reader::ByteReader;
use crate::MplsError;
use nom::{
    combinator::map,
    number::complete::{be_u16, be_u32, be_u8},
    sequence::tuple,
    IResult,
};
use tracing::{debug, trace};
use types::{
    Chapter, MarkType, MplsHeader, PlayItemRef, PlayListMark, Playlist, StreamClip, StreamCounts,
    TimeStamp,
};

/// Smallest file that still holds both global trim points.
pub const MIN_FILE_SIZE: usize = 90;

const MAGICS: [&[u8; 8]; 2] = [b"MPLS0100", b"MPLS0200"];

// Fixed positions of the global time-in/time-out fields.
const TIME_IN_POS: usize = 82;
const TIME_OUT_POS: usize = 86;

const CHAPTER_SIZE: usize = 14;
const ENTRY_MARK: u8 = 0x1;

pub fn parse_header(input: &[u8]) -> Result<MplsHeader, MplsError> {
    if input.len() < MIN_FILE_SIZE {
        return Err(MplsError::TooSmall {
            len: input.len(),
            min: MIN_FILE_SIZE,
        });
    }

    let mut r = ByteReader::new(input);

    let tag = r.read_bytes(8)?;
    if !MAGICS.iter().any(|m| &m[..] == tag) {
        return Err(MplsError::InvalidMagic {
            found: String::from_utf8_lossy(tag).into_owned(),
        });
    }

    let playlist_offset = r.read_u32_be()?;
    if playlist_offset <= 8 {
        return Err(MplsError::InvalidPlaylistOffset(playlist_offset));
    }

    let chapter_offset = r.read_u32_be()?;
    if chapter_offset <= 8 {
        return Err(MplsError::InvalidChapterOffset(chapter_offset));
    }

    let chapter_count_pos = (chapter_offset as usize).saturating_add(4);
    let chapter_list_pos = (chapter_offset as usize).saturating_add(6);
    let chapter_count = r.u16_at(chapter_count_pos)?;
    let fits = (chapter_count as usize)
        .checked_mul(CHAPTER_SIZE)
        .and_then(|n| n.checked_add(chapter_list_pos))
        .map_or(false, |end| end <= input.len());
    if !fits {
        return Err(MplsError::InvalidChapterCount {
            count: chapter_count,
            offset: chapter_list_pos,
            size: input.len(),
        });
    }

    let time_in = trim_point(&r, TIME_IN_POS, TrimPoint::In)?;
    let time_out = trim_point(&r, TIME_OUT_POS, TrimPoint::Out)?;

    Ok(MplsHeader {
        tag: String::from_utf8_lossy(tag).into_owned(),
        playlist_offset,
        chapter_offset,
        chapter_count,
        time_in,
        time_out,
    })
}

fn trim_point(r: &ByteReader, offset: usize, which: TrimPoint) -> Result<TimeStamp, MplsError> {
    let raw = r.u32_at(offset)?;
    if (raw as i32) < 0 {
        return Err(MplsError::InvalidTrimPoint {
            which,
            value: raw as i32,
        });
    }
    Ok(TimeStamp(raw))
}

/// The ordered clip list plus the running total of clip durations.
///
/// Chapter rebasing looks clips up in this same table by index.
#[derive(Debug, Clone, Default)]
pub struct StreamClipTable {
    pub clips: Vec<StreamClip>,
    pub total_duration_sec: f64,
}

impl StreamClipTable {
    pub fn get(&self, index: usize) -> Option<&StreamClip> {
        self.clips.get(index)
    }
}

pub fn parse_stream_clips(
    r: &mut ByteReader,
    playlist_offset: usize,
) -> Result<StreamClipTable, MplsError> {
    r.seek(playlist_offset)?;

    // block length, reserved
    r.skip(4 + 2)?;
    let clip_count = r.read_u16_be()?;
    // sub-path count
    r.skip(2)?;

    let mut table = StreamClipTable {
        clips: Vec::with_capacity(clip_count as usize),
        total_duration_sec: 0.0,
    };

    for index in 0..clip_count {
        let clip = stream_clip(r, table.total_duration_sec)?;
        debug!(
            index,
            filename = %clip.filename,
            time_in = clip.time_in_sec,
            time_out = clip.time_out_sec,
            duration = clip.duration_sec,
            relative_time_in = clip.relative_time_in_sec,
            multi_angle = clip.is_multi_angle,
            streams = ?clip.streams,
            "stream clip"
        );
        table.total_duration_sec += clip.duration_sec;
        table.clips.push(clip);
    }

    Ok(table)
}

fn stream_clip(r: &mut ByteReader, relative_time_in_sec: f64) -> Result<StreamClip, MplsError> {
    let item_start = r.position();
    let item_length = r.read_u16_be()? as usize;

    let name = r.read_fixed_text(5)?;
    let codec_id = r.read_fixed_text(4)?;
    let filename = format!("{}.{}", name, codec_id);

    // 0000 0000 000X .... <-- connection_condition
    // |-reserved -|^---- multi-angle
    r.skip(1)?;
    let is_multi_angle = (r.read_u8()? & 0x10) != 0;
    // RefToSTCID
    r.skip(1)?;

    let time_in_sec = r.read_time_stamp()?.seconds();
    let time_out_sec = r.read_time_stamp()?.seconds();
    let duration_sec = time_out_sec - time_in_sec;

    // UO mask table, random access flag, still mode/time
    r.skip(12)?;

    let mut angle_count = 1;
    if is_multi_angle {
        angle_count = r.read_u8()?;
        r.skip(1)?;
        // the main clip counts as an angle; each alternate is name + codec + STC id
        for _ in 1..angle_count {
            r.skip(5 + 4 + 1)?;
        }
    }

    // stream number table length, reserved
    r.skip(2 + 2)?;
    let video = r.read_u8()?;
    let audio = r.read_u8()?;
    let subtitle = r.read_u8()?;
    let interactive_menu = r.read_u8()?;
    let secondary_audio = r.read_u8()?;
    let secondary_video = r.read_u8()?;
    let pip = r.read_u8()?;
    r.skip(5)?;

    r.skip(2 * secondary_audio as usize)?;
    r.skip(6 * secondary_video as usize)?;

    // The declared item length is authoritative: the stream entries above
    // are not walked individually.
    r.seek(item_start + item_length + 2)?;

    Ok(StreamClip {
        filename,
        time_in_sec,
        time_out_sec,
        duration_sec,
        relative_time_in_sec,
        relative_time_out_sec: relative_time_in_sec + duration_sec,
        is_multi_angle,
        angle_count,
        streams: StreamCounts {
            video,
            audio,
            subtitle,
            interactive_menu,
            secondary_video,
            secondary_audio,
            pip,
        },
    })
}

fn time_stamp(input: &[u8]) -> IResult<&[u8], TimeStamp> {
    map(be_u32, TimeStamp::from_raw)(input)
}

fn mark_type(input: &[u8]) -> IResult<&[u8], MarkType> {
    map(be_u8, MarkType::from)(input)
}

fn play_list_mark(input: &[u8]) -> IResult<&[u8], PlayListMark> {
    let (input, (_, mark_type, play_item, time_stamp, entry_es_pid, duration)) =
        tuple((be_u8, mark_type, be_u16, time_stamp, be_u16, time_stamp))(input)?;

    Ok((
        input,
        PlayListMark {
            mark_type,
            play_item: PlayItemRef(play_item),
            time_stamp,
            entry_es_pid,
            duration: if duration.0 == 0 { None } else { Some(duration) },
        },
    ))
}

pub fn parse_chapters(
    r: &ByteReader,
    header: &MplsHeader,
    table: &StreamClipTable,
) -> Result<Vec<Chapter>, MplsError> {
    let mut r = *r;
    let list_pos = header.chapter_list_pos();
    r.seek(list_pos)?;
    let records = r.read_bytes(header.chapter_count as usize * CHAPTER_SIZE)?;

    let entry_marks = records
        .chunks_exact(CHAPTER_SIZE)
        .filter(|rec| rec[1] == ENTRY_MARK)
        .count();
    let mut chapters = Vec::with_capacity(entry_marks);

    for (i, rec) in records.chunks_exact(CHAPTER_SIZE).enumerate() {
        let (_, mark) = play_list_mark(rec).map_err(|_| MplsError::ShortRead {
            offset: list_pos + i * CHAPTER_SIZE,
            expected: CHAPTER_SIZE,
            found: rec.len(),
        })?;

        if mark.mark_type != MarkType::EntryPoint {
            debug!(mark = i, mark_type = ?mark.mark_type, "skipping unsupported mark");
            continue;
        }

        let PlayItemRef(clip_index) = mark.play_item;
        let clip = table
            .get(clip_index as usize)
            .ok_or(MplsError::ClipIndexOutOfRange {
                index: clip_index,
                count: table.clips.len(),
            })?;

        let chapter_sec = mark.time_stamp.seconds();
        let relative_time_sec = chapter_sec - clip.time_in_sec + clip.relative_time_in_sec;
        trace!(
            mark = i,
            clip_index,
            chapter_sec,
            clip_time_in = clip.time_in_sec,
            clip_relative_time_in = clip.relative_time_in_sec,
            relative_time_sec,
            "rebased chapter"
        );

        // a mark less than a second before the end of the title is spurious
        if table.total_duration_sec - relative_time_sec > 1.0 {
            chapters.push(Chapter {
                relative_time_sec,
                clip_index,
            });
        } else {
            debug!(mark = i, relative_time_sec, "dropping trailing chapter");
        }
    }

    Ok(chapters)
}

pub fn parse_playlist(input: &[u8]) -> Result<Playlist, MplsError> {
    let header = parse_header(input)?;
    debug!(
        tag = %header.tag,
        playlist_offset = header.playlist_offset,
        chapter_offset = header.chapter_offset,
        chapter_count = header.chapter_count,
        "validated header"
    );

    let mut r = ByteReader::new(input);
    let table = parse_stream_clips(&mut r, header.playlist_offset as usize)?;
    let chapters = parse_chapters(&r, &header, &table)?;

    Ok(Playlist {
        time_in_sec: header.time_in.seconds(),
        time_out_sec: header.time_out.seconds(),
        duration_sec: table.total_duration_sec,
        stream_clips: table.clips,
        chapters,
    })
}
