//! Two-phase asset transform: classify at module load, copy at finalization.
//!
//! One [`UrlTransform`] instance corresponds to one build. All classify calls
//! of that build share its pending-copy map; nothing is process-global, so
//! multiple builds can run isolated in the same process.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use dashmap::DashMap;
use rayon::prelude::*;

use crate::config::TransformOptions;
use crate::encode;
use crate::error::{CopyFailure, TransformError, TransformResult};
use crate::filter::Filter;
use crate::media_type;
use crate::naming;
use crate::store::{AssetStore, DiskStore};

/// Result of classifying one matched asset. An asset is either inlined or
/// externalized, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedAsset {
    /// Embedded directly into generated source.
    Inline {
        /// Complete `data:` URI for the asset.
        data_uri: String,
    },
    /// Copied to the build output and referenced by path.
    External {
        /// Public-facing reference emitted into generated source.
        reference: String,
        /// On-disk destination, relative to the build's output base.
        destination: PathBuf,
    },
}

/// Where the bundler writes its final output.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Output directory for multi-file builds.
    Dir(PathBuf),
    /// Explicit output file; its parent directory becomes the copy base.
    File(PathBuf),
}

impl OutputTarget {
    fn base_dir(&self) -> &Path {
        match self {
            OutputTarget::Dir(dir) => dir,
            OutputTarget::File(file) => file.parent().unwrap_or_else(|| Path::new("")),
        }
    }
}

const PHASE_COLLECTING: u8 = 0;
const PHASE_FINALIZED: u8 = 1;

/// Asset-inlining transform for a module bundler.
///
/// The host bundler drives it through two hooks: [`UrlTransform::load`] once
/// per encountered asset reference, then [`UrlTransform::finalize`] exactly
/// once when output locations are known. The lifecycle is explicit:
/// finalizing twice, or loading after finalization, is an error rather than
/// silent misbehavior.
pub struct UrlTransform {
    options: TransformOptions,
    filter: Filter,
    store: Arc<dyn AssetStore>,
    copies: DashMap<PathBuf, PathBuf>,
    phase: AtomicU8,
}

impl UrlTransform {
    /// Build a transform over the real filesystem.
    pub fn new(options: TransformOptions) -> TransformResult<Self> {
        Self::with_store(options, Arc::new(DiskStore))
    }

    /// Build a transform over an injected storage backend, e.g. an in-memory
    /// store for a server-side build.
    pub fn with_store(
        options: TransformOptions,
        store: Arc<dyn AssetStore>,
    ) -> TransformResult<Self> {
        let filter = Filter::new(&options.include, &options.exclude)?;
        Ok(Self {
            options,
            filter,
            store,
            copies: DashMap::new(),
            phase: AtomicU8::new(PHASE_COLLECTING),
        })
    }

    /// Load hook: produce replacement module source for an asset path.
    ///
    /// Returns `Ok(None)` when the path is filtered out, deferring to other
    /// transforms. Otherwise the returned source evaluates to either the
    /// inline data URI or the public reference string.
    pub fn load(&self, path: &Path) -> TransformResult<Option<String>> {
        Ok(self.classify(path)?.map(|asset| match asset {
            EncodedAsset::Inline { data_uri } => module_source(&data_uri),
            EncodedAsset::External { reference, .. } => module_source(&reference),
        }))
    }

    /// Classify one asset as inline or external.
    ///
    /// Externalizing registers a pending `source -> destination` copy entry
    /// drained later by [`UrlTransform::finalize`]; inlining records nothing.
    pub fn classify(&self, path: &Path) -> TransformResult<Option<EncodedAsset>> {
        if self.phase.load(Ordering::Acquire) != PHASE_COLLECTING {
            return Err(TransformError::Lifecycle("load invoked after finalization"));
        }
        if !self.filter.matches(path) {
            return Ok(None);
        }

        let read_error = |source| TransformError::Read {
            path: path.to_path_buf(),
            source,
        };
        let size = self.store.size(path).map_err(read_error)?;
        let content = self.store.read(path).map_err(read_error)?;

        // Zero is a sentinel for "always externalize"; a disabled limit
        // inlines everything. Strictly-greater-than, so a file of exactly
        // `limit` bytes stays inline.
        let externalize = match self.options.limit {
            Some(0) => true,
            Some(limit) => size > limit,
            None => false,
        };

        if externalize {
            let filename = naming::hashed_file_name(path, &content);
            let reference = format!("{}{}", self.options.public_path, filename);
            let destination = PathBuf::from(format!("{}{}", self.options.output_path, filename));
            self.copies.insert(path.to_path_buf(), destination.clone());
            Ok(Some(EncodedAsset::External {
                reference,
                destination,
            }))
        } else {
            let media_type = media_type::from_path(path);
            Ok(Some(EncodedAsset::Inline {
                data_uri: encode::data_uri(&content, media_type),
            }))
        }
    }

    /// Finalize hook: drain the pending-copy map into the build output.
    ///
    /// Destinations resolve against the target's base directory; all copies
    /// run in parallel and the call returns only once every one has finished.
    /// Any failure fails the whole build with the failing pairs aggregated.
    /// When `emit_files` is false this performs no filesystem writes and
    /// succeeds immediately. Single-shot: a second call is an error.
    pub fn finalize(&self, target: &OutputTarget) -> TransformResult<()> {
        self.phase
            .compare_exchange(
                PHASE_COLLECTING,
                PHASE_FINALIZED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| TransformError::Lifecycle("finalize invoked twice"))?;

        let pending: Vec<(PathBuf, PathBuf)> = self
            .copies
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        self.copies.clear();

        if !self.options.emit_files {
            return Ok(());
        }

        let base = target.base_dir();
        let mut failures: Vec<CopyFailure> = pending
            .par_iter()
            .filter_map(|(source, destination)| {
                let resolved = base.join(destination);
                self.store.copy(source, &resolved).err().map(|error| CopyFailure {
                    source: source.clone(),
                    destination: resolved,
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            failures.sort_by(|a, b| a.source.cmp(&b.source));
            Err(TransformError::Copy(failures))
        }
    }

    /// Number of assets currently registered for deferred copying.
    pub fn pending_copies(&self) -> usize {
        self.copies.len()
    }
}

fn module_source(value: &str) -> String {
    format!("export default '{value}'")
}
