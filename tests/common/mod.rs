//! Builds synthetic MPLS files for the integration tests.
#![allow(dead_code)]

pub const ENTRY_MARK: u8 = 1;
pub const LINK_POINT: u8 = 2;

/// Size of the area before the playlist block; it covers the global trim
/// points at 82 and 86.
const HEADER_SIZE: usize = 96;

pub fn secs(s: u32) -> u32 {
    s * 45_000
}

#[derive(Clone)]
pub struct ClipSpec {
    pub name: String,
    pub codec_id: String,
    pub time_in: u32,
    pub time_out: u32,
    pub alternate_angles: Vec<String>,
    /// video, audio, PG, IG, secondary audio, secondary video, PiP
    pub counts: [u8; 7],
    pub trailing_padding: usize,
}

impl ClipSpec {
    pub fn new(name: &str, time_in: u32, time_out: u32) -> Self {
        ClipSpec {
            name: name.to_string(),
            codec_id: "M2TS".to_string(),
            time_in,
            time_out,
            alternate_angles: Vec::new(),
            counts: [1, 1, 0, 0, 0, 0, 0],
            trailing_padding: 0,
        }
    }

    pub fn counts(mut self, counts: [u8; 7]) -> Self {
        self.counts = counts;
        self
    }

    pub fn angles(mut self, alternates: &[&str]) -> Self {
        self.alternate_angles = alternates.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn padding(mut self, n: usize) -> Self {
        self.trailing_padding = n;
        self
    }
}

#[derive(Clone, Copy)]
pub struct MarkSpec {
    pub mark_type: u8,
    pub clip_index: u16,
    pub time: u32,
}

pub struct MplsBuilder {
    pub tag: [u8; 8],
    pub time_in: u32,
    pub time_out: u32,
    pub clips: Vec<ClipSpec>,
    pub marks: Vec<MarkSpec>,
}

impl MplsBuilder {
    pub fn new() -> Self {
        MplsBuilder {
            tag: *b"MPLS0200",
            time_in: 0,
            time_out: 0,
            clips: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn trim(mut self, time_in: u32, time_out: u32) -> Self {
        self.time_in = time_in;
        self.time_out = time_out;
        self
    }

    pub fn clip(mut self, clip: ClipSpec) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn entry_mark(self, clip_index: u16, time: u32) -> Self {
        self.mark(ENTRY_MARK, clip_index, time)
    }

    pub fn mark(mut self, mark_type: u8, clip_index: u16, time: u32) -> Self {
        self.marks.push(MarkSpec {
            mark_type,
            clip_index,
            time,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[..8].copy_from_slice(&self.tag);
        put_u32(&mut buf, 8, HEADER_SIZE as u32);
        put_u32(&mut buf, 82, self.time_in);
        put_u32(&mut buf, 86, self.time_out);

        // playlist block
        let block_start = buf.len();
        buf.extend_from_slice(&[0; 4]);
        buf.extend_from_slice(&[0; 2]);
        buf.extend_from_slice(&(self.clips.len() as u16).to_be_bytes());
        buf.extend_from_slice(&[0; 2]);
        for clip in &self.clips {
            write_clip(&mut buf, clip);
        }
        let block_len = (buf.len() - block_start - 4) as u32;
        put_u32(&mut buf, block_start, block_len);

        // chapter block
        let chapter_offset = buf.len();
        put_u32(&mut buf, 12, chapter_offset as u32);
        buf.extend_from_slice(&((2 + self.marks.len() * 14) as u32).to_be_bytes());
        buf.extend_from_slice(&(self.marks.len() as u16).to_be_bytes());
        for mark in &self.marks {
            buf.push(0);
            buf.push(mark.mark_type);
            buf.extend_from_slice(&mark.clip_index.to_be_bytes());
            buf.extend_from_slice(&mark.time.to_be_bytes());
            buf.extend_from_slice(&[0xFF, 0xFF]);
            buf.extend_from_slice(&[0; 4]);
        }

        buf
    }
}

fn write_clip(buf: &mut Vec<u8>, clip: &ClipSpec) {
    let start = buf.len();
    buf.extend_from_slice(&[0; 2]);
    buf.extend_from_slice(clip.name.as_bytes());
    buf.extend_from_slice(clip.codec_id.as_bytes());

    let multi_angle = !clip.alternate_angles.is_empty();
    buf.push(0);
    // connection condition 1, multi-angle flag above it
    buf.push(if multi_angle { 0x11 } else { 0x01 });
    buf.push(0);

    buf.extend_from_slice(&clip.time_in.to_be_bytes());
    buf.extend_from_slice(&clip.time_out.to_be_bytes());
    buf.extend_from_slice(&[0; 12]);

    if multi_angle {
        buf.push(clip.alternate_angles.len() as u8 + 1);
        buf.push(0);
        for angle in &clip.alternate_angles {
            buf.extend_from_slice(angle.as_bytes());
            buf.extend_from_slice(b"M2TS");
            buf.push(0);
        }
    }

    // stream number table
    let table_start = buf.len();
    buf.extend_from_slice(&[0; 2]);
    buf.extend_from_slice(&[0; 2]);
    buf.extend_from_slice(&clip.counts);
    buf.extend_from_slice(&[0; 5]);
    let [video, audio, pg, ig, secondary_audio, secondary_video, pip] = clip.counts;
    // primary stream entries + attributes, which the decoder does not walk
    let primary = (video + audio + pg + ig + pip) as usize;
    buf.extend(std::iter::repeat(0xAB).take(primary * 16));
    buf.extend(std::iter::repeat(0xCD).take(secondary_audio as usize * 2));
    buf.extend(std::iter::repeat(0xEF).take(secondary_video as usize * 6));
    let table_len = (buf.len() - table_start - 2) as u16;
    buf[table_start..table_start + 2].copy_from_slice(&table_len.to_be_bytes());

    buf.extend(std::iter::repeat(0x77).take(clip.trailing_padding));

    let item_length = (buf.len() - start - 2) as u16;
    buf[start..start + 2].copy_from_slice(&item_length.to_be_bytes());
}

pub fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}
