//! External k-way merging, ported from `sort.c`'s `mergefps`/`merge`/
//! `sort`: sort bounded-size runs in core, write each to a temp file,
//! then repeatedly merge batches of at most `NMERGE` runs until one
//! remains.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use coreutils_core::line_reader::ReadOutcome;
use coreutils_core::{read_until, Heap};
use tempfile::{Builder, NamedTempFile};

use crate::error::SortError;
use crate::record::Record;

/// Maximum simultaneous open input files per merge pass, matching the
/// source's `NMERGE`.
pub const NMERGE: usize = 16;

/// One run spooled to disk: records already sorted and terminator-
/// delimited, ready to be streamed back out.
pub struct Run {
    file: NamedTempFile,
}

impl Run {
    /// Write `records` (already sorted) to a fresh temp file.
    pub fn spool(records: &[Record], tmp_dir: Option<&std::path::Path>) -> Result<Self, SortError> {
        let file = match tmp_dir {
            Some(dir) => Builder::new().prefix("sort").tempfile_in(dir),
            None => Builder::new().prefix("sort").tempfile(),
        }
        .map_err(SortError::TempFile)?;
        {
            let mut w = BufWriter::new(file.as_file());
            for r in records {
                w.write_all(&r.bytes).map_err(SortError::TempFile)?;
                w.write_all(&[r.terminator]).map_err(SortError::TempFile)?;
            }
            w.flush().map_err(SortError::TempFile)?;
        }
        Ok(Run { file })
    }

    fn reopen(&self) -> Result<File, SortError> {
        self.file.reopen().map_err(SortError::TempFile)
    }
}

struct RunCursor {
    reader: BufReader<File>,
    terminator: u8,
    current: Option<Record>,
}

impl RunCursor {
    fn open(run: &Run, terminator: u8) -> Result<Self, SortError> {
        let mut cursor = RunCursor {
            reader: BufReader::new(run.reopen()?),
            terminator,
            current: None,
        };
        cursor.advance()?;
        Ok(cursor)
    }

    fn advance(&mut self) -> Result<(), SortError> {
        let mut buf = Vec::new();
        match read_until(&mut self.reader, &mut buf, 0, usize::MAX, self.terminator, None)? {
            ReadOutcome::Eof => self.current = None,
            ReadOutcome::Bytes(n) => {
                buf.truncate(n);
                if buf.last() == Some(&self.terminator) {
                    buf.pop();
                }
                self.current = Some(Record::new(buf, self.terminator));
            }
        }
        Ok(())
    }
}

/// Merge at most [`NMERGE`] runs into `out`, using a min-heap ordered by
/// `cmp` so the next record across all runs is always produced next.
/// When `unique` is set, consecutive equal records (by `cmp`) collapse
/// to the first one seen, mirroring `sort -u`'s merge-time dedup.
pub fn merge_runs<W: Write, F>(
    runs: &[Run],
    out: &mut W,
    cmp: &F,
    terminator: u8,
    unique: bool,
) -> Result<(), SortError>
where
    F: Fn(&Record, &Record) -> std::cmp::Ordering,
{
    if runs.len() > NMERGE {
        return Err(SortError::TooManyInputs(runs.len()));
    }

    let mut cursors: Vec<RunCursor> = runs
        .iter()
        .map(|r| RunCursor::open(r, terminator))
        .collect::<Result<_, _>>()?;

    // Heap::pop_top returns the *greatest* element under the comparator;
    // reverse it here so the smallest record-index pair comes out first.
    // On a tie, the lower-numbered run must win (stable merge), so break
    // ties by index rather than leaving them to the heap's internal order.
    let mut heap: Heap<usize, _> = Heap::alloc(
        |&a: &usize, &b: &usize| {
            let ra = cursors[a].current.as_ref();
            let rb = cursors[b].current.as_ref();
            match (ra, rb) {
                (Some(x), Some(y)) => cmp(y, x).then_with(|| b.cmp(&a)),
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, None) => std::cmp::Ordering::Equal,
            }
        },
        cursors.len(),
    );
    for i in 0..cursors.len() {
        if cursors[i].current.is_some() {
            heap.push(i);
        }
    }

    let mut last_written: Option<Record> = None;
    while let Some(idx) = heap.pop_top() {
        let rec = cursors[idx].current.take().unwrap();
        let emit = !unique
            || match &last_written {
                Some(prev) => cmp(prev, &rec) != std::cmp::Ordering::Equal,
                None => true,
            };
        if emit {
            out.write_all(&rec.bytes).map_err(SortError::TempFile)?;
            out.write_all(&[terminator]).map_err(SortError::TempFile)?;
            last_written = Some(rec);
        }
        cursors[idx].advance()?;
        if cursors[idx].current.is_some() {
            heap.push(idx);
        }
    }

    Ok(())
}

/// Merge an arbitrary number of runs down to one, batching in groups of
/// at most [`NMERGE`] across as many passes as needed, the way `sort`
/// repeatedly calls `mergefps` until `nfiles <= NMERGE`.
pub fn merge_all<F>(
    mut runs: Vec<Run>,
    cmp: &F,
    terminator: u8,
    unique: bool,
    tmp_dir: Option<&std::path::Path>,
) -> Result<Run, SortError>
where
    F: Fn(&Record, &Record) -> std::cmp::Ordering,
{
    if runs.is_empty() {
        return Run::spool(&[], tmp_dir);
    }

    while runs.len() > NMERGE {
        let mut next_round = Vec::with_capacity(runs.len() / NMERGE + 1);
        let mut batch = Vec::with_capacity(NMERGE);
        for run in runs.drain(..) {
            batch.push(run);
            if batch.len() == NMERGE {
                next_round.push(merge_batch_to_run(std::mem::take(&mut batch), cmp, terminator, false, tmp_dir)?);
            }
        }
        if !batch.is_empty() {
            next_round.push(merge_batch_to_run(batch, cmp, terminator, false, tmp_dir)?);
        }
        runs = next_round;
    }

    if runs.len() == 1 {
        return Ok(runs.pop().unwrap());
    }
    merge_batch_to_run(runs, cmp, terminator, unique, tmp_dir)
}

fn merge_batch_to_run<F>(
    runs: Vec<Run>,
    cmp: &F,
    terminator: u8,
    unique: bool,
    tmp_dir: Option<&std::path::Path>,
) -> Result<Run, SortError>
where
    F: Fn(&Record, &Record) -> std::cmp::Ordering,
{
    let out_run = match tmp_dir {
        Some(dir) => Builder::new().prefix("sort").tempfile_in(dir),
        None => Builder::new().prefix("sort").tempfile(),
    }
    .map_err(SortError::TempFile)?;
    {
        let mut w = BufWriter::new(out_run.as_file());
        merge_runs(&runs, &mut w, cmp, terminator, unique)?;
        w.flush().map_err(SortError::TempFile)?;
    }
    Ok(Run { file: out_run })
}

impl Run {
    /// Read the fully-merged final run back as records, for callers
    /// that want the sorted result in memory rather than streamed.
    pub fn into_records(self, terminator: u8) -> Result<Vec<Record>, SortError> {
        let mut reader = BufReader::new(self.reopen()?);
        let mut out = Vec::new();
        loop {
            let mut buf = Vec::new();
            match read_until(&mut reader, &mut buf, 0, usize::MAX, terminator, None)? {
                ReadOutcome::Eof => break,
                ReadOutcome::Bytes(n) => {
                    buf.truncate(n);
                    if buf.last() == Some(&terminator) {
                        buf.pop();
                    }
                    out.push(Record::new(buf, terminator));
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(s: &str) -> Record {
        Record::new(s.as_bytes().to_vec(), b'\n')
    }

    fn byte_cmp(a: &Record, b: &Record) -> std::cmp::Ordering {
        a.bytes.cmp(&b.bytes)
    }

    #[test]
    fn merges_two_sorted_runs_in_order() {
        let r1 = Run::spool(&[rec("a"), rec("c"), rec("e")], None).unwrap();
        let r2 = Run::spool(&[rec("b"), rec("d")], None).unwrap();
        let merged = merge_all(vec![r1, r2], &byte_cmp, b'\n', false, None).unwrap();
        let out = merged.into_records(b'\n').unwrap();
        let text: Vec<_> = out.iter().map(|r| String::from_utf8_lossy(&r.bytes).into_owned()).collect();
        assert_eq!(text, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn unique_dedups_across_runs() {
        let r1 = Run::spool(&[rec("a"), rec("b")], None).unwrap();
        let r2 = Run::spool(&[rec("b"), rec("c")], None).unwrap();
        let merged = merge_all(vec![r1, r2], &byte_cmp, b'\n', true, None).unwrap();
        let out = merged.into_records(b'\n').unwrap();
        let text: Vec<_> = out.iter().map(|r| String::from_utf8_lossy(&r.bytes).into_owned()).collect();
        assert_eq!(text, vec!["a", "b", "c"]);
    }

    #[test]
    fn ties_are_broken_by_lower_numbered_run() {
        let always_equal = |_: &Record, _: &Record| std::cmp::Ordering::Equal;
        let r0 = Run::spool(&[rec("from-0a"), rec("from-0b")], None).unwrap();
        let r1 = Run::spool(&[rec("from-1a")], None).unwrap();
        let r2 = Run::spool(&[rec("from-2a")], None).unwrap();
        let merged = merge_all(vec![r0, r1, r2], &always_equal, b'\n', false, None).unwrap();
        let out = merged.into_records(b'\n').unwrap();
        let text: Vec<_> = out.iter().map(|r| String::from_utf8_lossy(&r.bytes).into_owned()).collect();
        // Every comparison ties, so a stable merge must drain run 0
        // fully before taking anything from run 1, and run 1 before run 2.
        assert_eq!(text, vec!["from-0a", "from-0b", "from-1a", "from-2a"]);
    }

    #[test]
    fn batches_beyond_nmerge_across_multiple_passes() {
        let runs: Vec<Run> = (0..(NMERGE * 2 + 3))
            .map(|i| Run::spool(&[rec(&format!("{:04}", i))], None).unwrap())
            .collect();
        let merged = merge_all(runs, &byte_cmp, b'\n', false, None).unwrap();
        let out = merged.into_records(b'\n').unwrap();
        assert_eq!(out.len(), NMERGE * 2 + 3);
        assert_eq!(out[0].bytes, b"0000");
    }
}
