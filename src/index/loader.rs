use crate::error::LoadError;
use crate::index::store::IndexStore;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Chunked loader for large string collections.
///
/// Partitions the input into consecutive chunks of at most `batch_size`
/// and hands each chunk to [`IndexStore::insert_batch`] as its own
/// transactional unit. A failure partway through leaves earlier chunks
/// committed and the failing chunk rolled back; [`LoadError`] reports how
/// far the load got so callers can resume or report instead of guessing.
pub struct BatchLoader<'a> {
    store: &'a IndexStore,
    batch_size: usize,
}

impl<'a> BatchLoader<'a> {
    pub const DEFAULT_BATCH_SIZE: usize = 1000;

    /// Loader with the default batch size.
    pub fn new(store: &'a IndexStore) -> Self {
        Self::with_batch_size(store, Self::DEFAULT_BATCH_SIZE)
    }

    /// Loader with an explicit batch size, clamped to at least 1.
    pub fn with_batch_size(store: &'a IndexStore, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Load `strings` into the index `name`, showing a progress bar.
    pub fn load<S: AsRef<str>>(&self, name: &str, strings: &[S]) -> Result<(), LoadError> {
        self.load_with_progress(name, strings, false)
    }

    /// Load `strings` into the index `name`, optionally without output.
    pub fn load_with_progress<S: AsRef<str>>(
        &self,
        name: &str,
        strings: &[S],
        silent: bool,
    ) -> Result<(), LoadError> {
        let total = strings.len();

        #[cfg(feature = "progress")]
        let bar = if silent {
            None
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                    .unwrap()
                    .progress_chars("█▓▒░  "),
            );
            pb.set_message("Inserting strings...");
            Some(pb)
        };
        #[cfg(not(feature = "progress"))]
        let _ = silent;

        let mut inserted = 0;
        for chunk in strings.chunks(self.batch_size) {
            self.store
                .insert_batch(name, chunk)
                .map_err(|source| LoadError {
                    inserted,
                    total,
                    source,
                })?;
            inserted += chunk.len();

            #[cfg(feature = "progress")]
            if let Some(pb) = &bar {
                pb.set_position(inserted as u64);
            }
        }

        #[cfg(feature = "progress")]
        if let Some(pb) = &bar {
            pb.finish_with_message(format!("Inserted {} strings", inserted));
        }

        Ok(())
    }
}
