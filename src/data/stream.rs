// ============================================================
// Layer 4 — Streaming Batcher
// ============================================================
// Wraps one source file into a producer of padded batches.
//
//   source.java
//       │  read line by line (bytes; bad UTF-8 is skipped)
//       ▼
//   LineFilter        → drop blank / over-long lines
//       │
//       ▼
//   ShuffleBuffer     → windowed shuffle, default 10 000 lines
//       │
//       ▼
//   group of B lines  → each tagged with its own u64 seed
//       │
//       ▼
//   rayon pool        → SequenceBuilder per line, order kept
//       │
//       ▼
//   PaddedBatch       → rendezvous channel → LineStream::next()
//
// A background thread runs everything above the channel. The
// channel has no slack, so the producer assembles at most one
// batch while the consumer is busy with the previous one.
//
// When the file runs out, the last group of fewer than B lines
// is thrown away and the channel closes; `next()` then reports
// `Pull::Exhausted` forever. A stream is never rewound: the
// rotation controller opens a fresh one.
//
// Reference: Rust Book §16 (Fearless Concurrency)
//            rayon crate documentation (ThreadPool::install)

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::data::builder::SequenceBuilder;
use crate::data::codec::CharCodec;
use crate::data::error::{PipelineError, Result};
use crate::data::filter::LineFilter;
use crate::data::shuffle::ShuffleBuffer;
use crate::domain::example::{Example, PaddedBatch};

// ─── Configuration ────────────────────────────────────────────────────────────
/// Knobs shared by every stream a rotation controller opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Examples per batch; a trailing group smaller than this is dropped
    pub batch_size: usize,

    /// Lines whose trimmed length reaches this are filtered out
    pub max_sequence_length: usize,

    /// Horizon of the windowed shuffle
    pub shuffle_buffer_size: usize,

    /// Threads in the corruption/encoding pool
    pub num_workers: usize,

    pub codec: CharCodec,
}

impl StreamConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch_size must be greater than zero".into(),
            ));
        }
        if self.num_workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "num_workers must be greater than zero".into(),
            ));
        }
        if self.max_sequence_length < 2 {
            return Err(PipelineError::InvalidConfig(
                "max_sequence_length must be at least 2 to accept any line".into(),
            ));
        }
        Ok(())
    }

    /// Build the worker pool streams will share.
    pub fn worker_pool(&self) -> Result<Arc<ThreadPool>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_workers)
            .thread_name(|i| format!("corruptor-{i}"))
            .build()?;
        Ok(Arc::new(pool))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            batch_size:          128,
            max_sequence_length: 200,
            shuffle_buffer_size: 10_000,
            num_workers:         4,
            codec:               CharCodec::default(),
        }
    }
}

// ─── Pull ─────────────────────────────────────────────────────────────────────
/// Outcome of asking a stream for its next batch.
#[derive(Debug)]
pub enum Pull {
    Batch(PaddedBatch),
    /// The file is used up. Expected at the end of every epoch.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Active,
    Exhausted,
}

// ─── LineStream ───────────────────────────────────────────────────────────────
pub struct LineStream {
    path:     PathBuf,
    state:    StreamState,
    receiver: Receiver<Result<PaddedBatch>>,
    /// Tells the producer to stop reading once this stream is dropped
    cancel:   Arc<AtomicBool>,
    /// Batches the producer has finished building
    built:    Arc<AtomicUsize>,
    served:   usize,
}

impl LineStream {
    /// Open `path` and start producing batches in the background.
    ///
    /// `seed` drives the shuffle and every line's corruption, so
    /// the same file, config and seed give the same batches.
    pub fn open(
        path:   impl AsRef<Path>,
        config: &StreamConfig,
        pool:   Arc<ThreadPool>,
        seed:   u64,
    ) -> Result<Self> {
        config.validate()?;

        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PipelineError::SourceFileMissing { path: path.clone() },
            _ => PipelineError::Io { path: path.clone(), source: e },
        })?;

        // Rendezvous: the producer blocks until the consumer asks
        let (sender, receiver) = sync_channel(0);
        let cancel = Arc::new(AtomicBool::new(false));
        let built  = Arc::new(AtomicUsize::new(0));

        let producer = Producer {
            path:    path.clone(),
            config:  config.clone(),
            builder: SequenceBuilder::new(config.codec),
            pool,
            rng:     StdRng::seed_from_u64(seed),
            sender,
            cancel:  Arc::clone(&cancel),
            built:   Arc::clone(&built),
        };

        thread::Builder::new()
            .name("line-stream".into())
            .spawn(move || producer.run(BufReader::new(file)))
            .map_err(|e| PipelineError::Io { path: path.clone(), source: e })?;

        tracing::debug!("Opened stream over '{}'", path.display());

        Ok(Self {
            path,
            state: StreamState::Active,
            receiver,
            cancel,
            built,
            served: 0,
        })
    }

    /// Block until the next batch is ready or the file is used up.
    ///
    /// After the first `Exhausted` every later call is `Exhausted`
    /// too. A read error mid-file is returned once and also ends
    /// the stream.
    pub fn next(&mut self) -> Result<Pull> {
        if self.state == StreamState::Exhausted {
            return Ok(Pull::Exhausted);
        }

        match self.receiver.recv() {
            Ok(Ok(batch)) => {
                self.served += 1;
                Ok(Pull::Batch(batch))
            }
            Ok(Err(e)) => {
                self.state = StreamState::Exhausted;
                Err(e)
            }
            // Producer finished and dropped its sender
            Err(_) => {
                self.state = StreamState::Exhausted;
                tracing::debug!(
                    "Stream over '{}' exhausted after {} batches",
                    self.path.display(),
                    self.served
                );
                Ok(Pull::Exhausted)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Batches handed out so far
    pub fn served(&self) -> usize {
        self.served
    }

    /// Batches built in the background so far; never more than
    /// one ahead of `served`.
    pub fn built(&self) -> usize {
        self.built.load(Ordering::Acquire)
    }
}

impl Drop for LineStream {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

// ─── Producer (background thread) ─────────────────────────────────────────────
struct Producer {
    path:    PathBuf,
    config:  StreamConfig,
    builder: SequenceBuilder,
    pool:    Arc<ThreadPool>,
    rng:     StdRng,
    sender:  SyncSender<Result<PaddedBatch>>,
    cancel:  Arc<AtomicBool>,
    built:   Arc<AtomicUsize>,
}

/// Counters reported once the file is finished
#[derive(Debug, Default)]
struct ProducerStats {
    lines:     usize,
    filtered:  usize,
    malformed: usize,
    batches:   usize,
    dropped:   usize,
}

impl Producer {
    fn run<R: BufRead>(mut self, reader: R) {
        let filter = LineFilter::new(self.config.max_sequence_length);
        let mut shuffle = ShuffleBuffer::new(self.config.shuffle_buffer_size);
        let mut pending: Vec<(String, u64)> = Vec::with_capacity(self.config.batch_size);
        let mut stats = ProducerStats::default();
        let mut warned_collision = false;

        for (index, record) in reader.split(b'\n').enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                return;
            }
            stats.lines += 1;

            let bytes = match record {
                Ok(bytes) => bytes,
                Err(e) => {
                    let _ = self.sender.send(Err(PipelineError::Io {
                        path:   self.path.clone(),
                        source: e,
                    }));
                    return;
                }
            };

            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(_) => {
                    let err = PipelineError::MalformedLine {
                        path: self.path.clone(),
                        line: index + 1,
                    };
                    tracing::debug!("Skipping line: {}", err);
                    stats.malformed += 1;
                    continue;
                }
            };

            if !filter.accept(&line) {
                stats.filtered += 1;
                continue;
            }

            if let Some(ready) = shuffle.push(line, &mut self.rng) {
                if !self.stage(ready, &mut pending, &mut stats, &mut warned_collision) {
                    return;
                }
            }
        }

        tracing::trace!(
            "End of '{}', draining {} buffered lines",
            self.path.display(),
            shuffle.len()
        );
        while let Some(ready) = shuffle.pop(&mut self.rng) {
            if !self.stage(ready, &mut pending, &mut stats, &mut warned_collision) {
                return;
            }
        }

        stats.dropped = pending.len();
        tracing::debug!(
            "Finished '{}': {} lines, {} filtered, {} malformed, {} batches, {} left over",
            self.path.display(),
            stats.lines,
            stats.filtered,
            stats.malformed,
            stats.batches,
            stats.dropped,
        );
    }

    /// Queue one shuffled line; emit a batch once B are queued.
    /// Returns false when the consumer has gone away.
    fn stage(
        &mut self,
        line:    String,
        pending: &mut Vec<(String, u64)>,
        stats:   &mut ProducerStats,
        warned:  &mut bool,
    ) -> bool {
        // Seeds are drawn here, in shuffle order, so results do not
        // depend on which worker thread picks up which line.
        let seed = self.rng.gen::<u64>();
        pending.push((line, seed));

        if pending.len() < self.config.batch_size {
            return true;
        }

        let lines = std::mem::take(pending);
        let builder = self.builder;
        let examples: Vec<Example> = self.pool.install(|| {
            lines
                .into_par_iter()
                .map(|(line, seed)| builder.build(&line, &mut StdRng::seed_from_u64(seed)))
                .collect()
        });

        if !*warned {
            let codec = builder.codec();
            if examples.iter().any(|e| codec.collides(&e.decoder_output[..e.decoder_length - 1])) {
                tracing::warn!(
                    "'{}' contains characters that encode to a reserved id (pad={}, sos={}, eos={})",
                    self.path.display(),
                    codec.pad_id,
                    codec.sos_id,
                    codec.eos_id,
                );
                *warned = true;
            }
        }

        let batch = PaddedBatch::from_examples(&examples, self.config.codec.pad_id);
        stats.batches += 1;
        self.built.fetch_add(1, Ordering::Release);
        self.sender.send(Ok(batch)).is_ok()
    }
}
