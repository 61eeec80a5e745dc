use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::artwork::CoverImage;
use crate::config::BatchConfig;
use crate::error::{Result, CinetagError};
use crate::format::MediaFormat;
use crate::writer::TagWriter;

/// A video paired with the poster to embed into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub video: PathBuf,
    pub poster: PathBuf,
}

/// Outcome of a directory run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    /// Videos with no poster next to them
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Poster lookup order: `<stem>.jpg`, `<stem>.png`, then the shared names
pub fn find_poster(video: &Path, shared_names: &[String]) -> Option<PathBuf> {
    let dir = video.parent()?;
    let stem = video.file_stem()?.to_string_lossy();

    let own = ["jpg", "jpeg", "png"].into_iter().map(|ext| dir.join(format!("{}.{}", stem, ext)));
    let shared = shared_names.iter().map(|name| dir.join(name));

    own.chain(shared).find(|candidate| candidate.is_file())
}

/// Collect every MP4/MKV file under `input_dir` and pair it with a poster
pub fn collect_jobs<P: AsRef<Path>>(input_dir: P, config: &BatchConfig) -> Result<(Vec<BatchJob>, Vec<PathBuf>)> {
    let input_dir = input_dir.as_ref();
    if !input_dir.is_dir() {
        return Err(CinetagError::Config(format!(
            "Input path is not a directory: {}",
            input_dir.display()
        )));
    }

    let mut seen = HashSet::new();
    let mut jobs = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(input_dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !MediaFormat::from_path(path).is_supported() {
            continue;
        }

        // The same file must never be scheduled twice
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !seen.insert(key) {
            continue;
        }

        match find_poster(path, &config.poster_names) {
            Some(poster) => jobs.push(BatchJob {
                video: path.to_path_buf(),
                poster,
            }),
            None => {
                warn!("No poster found for {}, skipping", path.display());
                skipped.push(path.to_path_buf());
            }
        }
    }

    info!("Found {} video files with posters ({} skipped)", jobs.len(), skipped.len());
    Ok((jobs, skipped))
}

fn run_job(writer: &TagWriter, job: &BatchJob) -> Result<String> {
    let cover = CoverImage::from_path(&job.poster)?;
    writer.write_tags_to_file(&job.video, &cover, |event| {
        debug!("{}: {}", job.video.display(), event);
    })
}

/// Tag every job, at most `max_parallel` files at a time.
/// `skipped` is carried into the report unchanged.
pub async fn run_batch(
    writer: Arc<TagWriter>,
    jobs: Vec<BatchJob>,
    skipped: Vec<PathBuf>,
    max_parallel: usize,
    show_progress: bool,
) -> BatchReport {
    let mut report = BatchReport {
        skipped,
        ..BatchReport::default()
    };

    let pb = if show_progress {
        ProgressBar::new(jobs.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"));

    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut tasks = JoinSet::new();
    // Videos by task id, so an aborted task can still be attributed
    let mut videos: HashMap<Id, PathBuf> = HashMap::new();

    for job in jobs {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let writer = Arc::clone(&writer);

        let video = job.video.clone();
        let handle = tasks.spawn_blocking(move || {
            let _permit = permit;
            let result = run_job(&writer, &job);
            (job, result)
        });
        videos.insert(handle.id(), video);

        // Collect whatever has already finished so the bar keeps moving
        while let Some(joined) = tasks.try_join_next() {
            record(&mut report, &pb, &videos, joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        record(&mut report, &pb, &videos, joined);
    }

    pb.finish_with_message("done");
    report
}

fn record(
    report: &mut BatchReport,
    pb: &ProgressBar,
    videos: &HashMap<Id, PathBuf>,
    joined: std::result::Result<(BatchJob, Result<String>), JoinError>,
) {
    match joined {
        Ok((job, Ok(_))) => {
            pb.set_message(job.video.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
            report.written.push(job.video);
        }
        Ok((job, Err(e))) => {
            warn!("Failed to tag {}: {}", job.video.display(), e);
            report.failed.push((job.video, e.to_string()));
        }
        Err(e) => {
            let video = videos.get(&e.id()).cloned().unwrap_or_default();
            warn!("Tagging task for {} aborted: {}", video.display(), e);
            report.failed.push((video, e.to_string()));
        }
    }
    pb.inc(1);
}
