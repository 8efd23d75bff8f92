//! Orchestration: read records, decide between an in-core sort and an
//! external merge, and implement `--check`/`--merge`/`--unique`, the
//! Rust shape of `sort.c`'s `sort`/`checkfp`/`merge` top level.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use coreutils_core::line_reader::ReadOutcome;
use coreutils_core::read_until;

use crate::compare::compare_record;
use crate::error::SortError;
use crate::external::{merge_all, Run};
use crate::key::KeySpec;
use crate::mergesort::sortlines;
use crate::record::{split_records, Record};
use crate::signals::install_temp_cleanup;

/// Default in-core buffer size before spilling to a temp run, mirroring
/// the source's default of a few megabytes (`sort.c`'s `sort_size`).
pub const DEFAULT_BUFFER_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct SortConfig {
    pub keys: Vec<KeySpec>,
    pub overall_reverse: bool,
    pub unique: bool,
    pub check: bool,
    pub check_quiet: bool,
    pub merge_only: bool,
    pub stable: bool,
    pub field_delimiter: Option<u8>,
    pub zero_terminated: bool,
    pub buffer_bytes: usize,
    pub temp_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            keys: Vec::new(),
            overall_reverse: false,
            unique: false,
            check: false,
            check_quiet: false,
            merge_only: false,
            stable: false,
            field_delimiter: None,
            zero_terminated: false,
            buffer_bytes: DEFAULT_BUFFER_BYTES,
            temp_dir: None,
            output: None,
        }
    }
}

impl SortConfig {
    fn terminator(&self) -> u8 {
        if self.zero_terminated {
            0
        } else {
            b'\n'
        }
    }

    fn cmp(&self) -> impl Fn(&Record, &Record) -> std::cmp::Ordering + '_ {
        move |a, b| compare_record(&a.bytes, &b.bytes, &self.keys, self.field_delimiter, self.overall_reverse)
    }
}

/// Top-level engine: reads named files (or stdin when `inputs` is
/// empty), runs the configured operation, and writes to `out`.
pub struct SortEngine {
    config: SortConfig,
}

impl SortEngine {
    pub fn new(config: SortConfig) -> Self {
        SortEngine { config }
    }

    pub fn run(&self, inputs: &[PathBuf], out: &mut dyn Write) -> Result<(), SortError> {
        if self.config.check {
            return self.check(inputs);
        }
        if self.config.merge_only {
            return self.merge_sorted(inputs, out);
        }
        self.sort(inputs, out)
    }

    fn open_inputs(inputs: &[PathBuf]) -> Result<Vec<Box<dyn Read>>, SortError> {
        if inputs.is_empty() {
            return Ok(vec![Box::new(io::stdin())]);
        }
        inputs
            .iter()
            .map(|p| -> Result<Box<dyn Read>, SortError> {
                if p.as_os_str() == "-" {
                    Ok(Box::new(io::stdin()))
                } else {
                    Ok(Box::new(File::open(p)?))
                }
            })
            .collect()
    }

    /// `--check`: verify each input file is already in sorted order,
    /// matching `checkfp`'s "first offending line, then stop" report.
    fn check(&self, inputs: &[PathBuf]) -> Result<(), SortError> {
        let term = self.config.terminator();
        let cmp = self.config.cmp();
        let files = Self::open_inputs(inputs)?;
        let names: Vec<String> = if inputs.is_empty() {
            vec!["-".to_string()]
        } else {
            inputs.iter().map(|p| p.display().to_string()).collect()
        };

        for (file, name) in files.into_iter().zip(names) {
            let mut reader = BufReader::new(file);
            let mut prev: Option<Record> = None;
            let mut line_no = 0usize;
            loop {
                let mut buf = Vec::new();
                let outcome = read_until(&mut reader, &mut buf, 0, usize::MAX, term, None)?;
                let n = match outcome {
                    ReadOutcome::Eof => break,
                    ReadOutcome::Bytes(n) => n,
                };
                buf.truncate(n);
                if buf.last() == Some(&term) {
                    buf.pop();
                }
                line_no += 1;
                let rec = Record::new(buf, term);
                if let Some(p) = &prev {
                    let ord = cmp(p, &rec);
                    let violates = ord == std::cmp::Ordering::Greater
                        || (self.config.unique && ord == std::cmp::Ordering::Equal);
                    if violates {
                        if !self.config.check_quiet {
                            tracing::warn!(file = %name, line = line_no, "disorder");
                        }
                        return Err(SortError::CheckFailed { file: name, line: line_no });
                    }
                }
                prev = Some(rec);
            }
        }
        Ok(())
    }

    /// Create a dedicated run directory under the configured (or system
    /// default) temp location and arm signal-triggered cleanup for it,
    /// matching `sighandler`/`cleanup` unlinking spooled runs before the
    /// process dies on `SIGINT`/`SIGHUP`/`SIGPIPE`/`SIGTERM`.
    fn start_run(&self) -> Result<tempfile::TempDir, SortError> {
        let base = self.config.temp_dir.clone().unwrap_or_else(std::env::temp_dir);
        let run_dir = tempfile::Builder::new()
            .prefix("sort-run")
            .tempdir_in(&base)
            .map_err(SortError::TempFile)?;
        if let Err(e) = install_temp_cleanup(Arc::new(run_dir.path().to_path_buf())) {
            tracing::warn!(error = %e, "could not install temp cleanup handler");
        }
        Ok(run_dir)
    }

    /// `--merge`: assume each input is already sorted and just merge
    /// them, skipping the in-core sort phase of `sort`.
    fn merge_sorted(&self, inputs: &[PathBuf], out: &mut dyn Write) -> Result<(), SortError> {
        let term = self.config.terminator();
        let files = Self::open_inputs(inputs)?;
        let run_dir = self.start_run()?;
        let mut runs = Vec::with_capacity(files.len());
        for mut file in files {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            let records = split_records(&buf, term);
            runs.push(Run::spool(&records, Some(run_dir.path()))?);
        }
        let cmp = self.config.cmp();
        let merged = merge_all(runs, &cmp, term, self.config.unique, Some(run_dir.path()))?;
        stream_run_to(merged, term, out)
    }

    /// Default mode: read everything, sort bounded in-core chunks,
    /// spool each to a temp run, and merge all runs down to one,
    /// mirroring `sort`'s buffer-then-spill-then-merge structure.
    fn sort(&self, inputs: &[PathBuf], out: &mut dyn Write) -> Result<(), SortError> {
        let term = self.config.terminator();
        let files = Self::open_inputs(inputs)?;
        let cmp = self.config.cmp();
        let run_dir = self.start_run()?;

        let mut runs = Vec::new();
        let mut chunk: Vec<Record> = Vec::new();
        let mut chunk_bytes = 0usize;

        for mut file in files {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            for rec in split_records(&buf, term) {
                chunk_bytes += rec.bytes.len();
                chunk.push(rec);
                if chunk_bytes >= self.config.buffer_bytes {
                    sortlines(&mut chunk, &cmp);
                    runs.push(Run::spool(&chunk, Some(run_dir.path()))?);
                    chunk.clear();
                    chunk_bytes = 0;
                }
            }
        }

        if !chunk.is_empty() || runs.is_empty() {
            sortlines(&mut chunk, &cmp);
            runs.push(Run::spool(&chunk, Some(run_dir.path()))?);
        }

        let merged = merge_all(runs, &cmp, term, self.config.unique, Some(run_dir.path()))?;
        stream_run_to(merged, term, out)
    }
}

fn stream_run_to(run: Run, term: u8, out: &mut dyn Write) -> Result<(), SortError> {
    for rec in run.into_records(term)? {
        out.write_all(&rec.bytes)?;
        out.write_all(&[term])?;
    }
    Ok(())
}
