use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Upper bound on frames per section when loading. A session recorded at
/// 60Hz for over a day would still fit; anything above is a corrupt file.
const MAX_FRAMES: u64 = 1 << 24;

/// One frame of recorded player input.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct InputFrame {
    /// Horizontal move intent: -1, 0 or 1.
    pub direction: i32,
    pub jump: i32,
    pub fire: i32,
    pub hook: i32,
}

/// A recorded session: parallel per-frame vectors of input, aim position
/// and world position. All three always have the same length.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    inputs: Vec<InputFrame>,
    aim: Vec<Vec2>,
    positions: Vec<Vec2>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame. Call once per tick while recording.
    pub fn push_frame(&mut self, input: InputFrame, aim: Vec2, pos: Vec2) {
        self.inputs.push(input);
        self.aim.push(aim);
        self.positions.push(pos);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The recorded route, for the path preview.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.aim.clear();
        self.positions.clear();
    }

    /// Write the record as three length-prefixed binary sections.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut w = BufWriter::new(fs::File::create(path)?);
        write_section(&mut w, &self.inputs)?;
        write_section(&mut w, &self.aim)?;
        write_section(&mut w, &self.positions)?;
        w.flush()?;
        log::info!("Session record saved to {}", path.display());
        Ok(())
    }

    /// Read a record saved by [`SessionRecord::save`].
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut r = BufReader::new(fs::File::open(path)?);
        let inputs: Vec<InputFrame> = read_section(&mut r)?;
        let aim: Vec<Vec2> = read_section(&mut r)?;
        let positions: Vec<Vec2> = read_section(&mut r)?;

        if inputs.len() != aim.len() || aim.len() != positions.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "record sections disagree on frame count",
            ));
        }

        Ok(Self {
            inputs,
            aim,
            positions,
        })
    }
}

fn write_section<T: Pod>(w: &mut impl Write, items: &[T]) -> io::Result<()> {
    w.write_all(&(items.len() as u64).to_le_bytes())?;
    w.write_all(bytemuck::cast_slice(items))
}

fn read_section<T: Pod>(r: &mut impl Read) -> io::Result<Vec<T>> {
    let mut header = [0u8; 8];
    r.read_exact(&mut header)?;
    let count = u64::from_le_bytes(header);
    if count > MAX_FRAMES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "record section claims an absurd frame count",
        ));
    }

    let mut bytes = vec![0u8; count as usize * std::mem::size_of::<T>()];
    r.read_exact(&mut bytes)?;
    // pod_collect_to_vec copies, so the byte buffer's alignment is fine.
    Ok(bytemuck::pod_collect_to_vec(&bytes))
}

/// Replays a loaded record frame by frame.
pub struct Playback {
    record: SessionRecord,
    cursor: usize,
}

impl Playback {
    pub fn new(record: SessionRecord) -> Self {
        Self { record, cursor: 0 }
    }

    /// The next input frame and aim position, in recorded order.
    pub fn next_frame(&mut self) -> Option<(InputFrame, Vec2)> {
        let frame = (
            *self.record.inputs.get(self.cursor)?,
            *self.record.aim.get(self.cursor)?,
        );
        self.cursor += 1;
        Some(frame)
    }

    pub fn remaining(&self) -> usize {
        self.record.len() - self.cursor
    }

    /// The full recorded route, for the path preview.
    pub fn route(&self) -> &[Vec2] {
        self.record.positions()
    }
}

/// Where the record for `map` lives under `dir`.
pub fn record_file(dir: &Path, map: &str) -> PathBuf {
    dir.join(format!("{map}.bin"))
}

/// All record files under `dir`, sorted by name.
pub fn list_records(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && path.extension().is_some_and(|e| e == "bin") {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

pub fn delete_record(path: &Path) -> io::Result<()> {
    fs::remove_file(path)?;
    log::info!("Deleted session record {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sidekick-{}-{tag}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_record(frames: usize) -> SessionRecord {
        let mut rec = SessionRecord::new();
        for i in 0..frames {
            rec.push_frame(
                InputFrame {
                    direction: (i % 3) as i32 - 1,
                    jump: (i % 7 == 0) as i32,
                    ..InputFrame::default()
                },
                Vec2::new(i as f32, -(i as f32)),
                Vec2::new(i as f32 * 10.0, 500.0),
            );
        }
        rec
    }

    #[test]
    fn save_load_delete_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let path = record_file(&dir, "sunny_plains");

        let rec = sample_record(120);
        rec.save(&path).unwrap();

        let loaded = SessionRecord::load(&path).unwrap();
        assert_eq!(loaded.len(), 120);
        assert_eq!(loaded.inputs, rec.inputs);
        assert_eq!(loaded.positions(), rec.positions());

        assert_eq!(list_records(&dir).unwrap(), vec![path.clone()]);
        delete_record(&path).unwrap();
        assert!(list_records(&dir).unwrap().is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn list_ignores_other_files() {
        let dir = scratch_dir("listing");
        fs::write(dir.join("notes.txt"), b"not a record").unwrap();
        sample_record(5).save(&record_file(&dir, "arena")).unwrap();

        let found = list_records(&dir).unwrap();
        assert_eq!(found, vec![record_file(&dir, "arena")]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn playback_replays_in_order_and_drains() {
        let mut playback = Playback::new(sample_record(10));
        assert_eq!(playback.remaining(), 10);
        assert_eq!(playback.route().len(), 10);

        let (first, aim) = playback.next_frame().unwrap();
        assert_eq!(first.direction, -1);
        assert_eq!(aim, Vec2::new(0.0, -0.0));

        let mut served = 1;
        while playback.next_frame().is_some() {
            served += 1;
        }
        assert_eq!(served, 10);
        assert_eq!(playback.remaining(), 0);
    }

    #[test]
    fn truncated_file_fails_to_load() {
        let dir = scratch_dir("truncated");
        let path = record_file(&dir, "broken");

        // Header claims 100 frames, then the file just ends.
        fs::write(&path, 100u64.to_le_bytes()).unwrap();
        assert!(SessionRecord::load(&path).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn absurd_frame_count_is_rejected() {
        let dir = scratch_dir("absurd");
        let path = record_file(&dir, "bogus");

        fs::write(&path, u64::MAX.to_le_bytes()).unwrap();
        let err = SessionRecord::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        fs::remove_dir_all(&dir).unwrap();
    }
}
