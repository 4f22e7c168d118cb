//! The compilation driver.
//!
//! Per-file parse jobs run on a fixed-size worker pool. A job parses one
//! module; every `/// <reference path>` directive and relative import
//! specifier it encounters schedules a follow-up job for the referenced
//! file, deduplicated by resolved path. Completion is a pending-job counter
//! reaching zero under a condvar. The only shared mutable state is the
//! results list, the scheduled-path set and the counter, each behind its
//! own lock.

use anyhow::Result;
use rustc_hash::FxHashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use tracing::{debug, warn};

use tsf_common::CompilerOptions;
use tsf_parser::{ParseOutput, Parser};
use tsf_scanner::{Scanner, SourceStream};

/// Identity of one parsed module.
#[derive(Clone, Debug)]
pub struct ModuleInfo {
    /// Resolved path of the module.
    pub module_name: PathBuf,
    /// The extension decides declaration-mode parsing.
    pub is_declaration_file: bool,
}

impl ModuleInfo {
    #[must_use]
    pub fn new(module_name: PathBuf) -> Self {
        let is_declaration_file = module_name
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".d.ts"));
        ModuleInfo {
            module_name,
            is_declaration_file,
        }
    }
}

/// The outcome of one per-file parse job.
pub enum CompilationUnit {
    Parsed {
        module: ModuleInfo,
        source: SourceStream,
        output: ParseOutput,
    },
    Failed {
        module: ModuleInfo,
        error: String,
    },
}

impl CompilationUnit {
    #[must_use]
    pub fn module_name(&self) -> &Path {
        match self {
            CompilationUnit::Parsed { module, .. } | CompilationUnit::Failed { module, .. } => {
                &module.module_name
            }
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        match self {
            CompilationUnit::Parsed { output, .. } => !output.diagnostics.is_empty(),
            CompilationUnit::Failed { .. } => true,
        }
    }
}

struct CompilerShared {
    options: CompilerOptions,
    results: Mutex<Vec<CompilationUnit>>,
    scheduled: Mutex<FxHashSet<PathBuf>>,
    pending: Mutex<usize>,
    done: Condvar,
    shutdown: AtomicBool,
}

/// Schedules per-file parse jobs and accumulates their results.
pub struct Compiler {
    pool: Arc<rayon::ThreadPool>,
    shared: Arc<CompilerShared>,
}

impl Compiler {
    /// Build a compiler with a worker pool of `threads` workers (CPU count
    /// when `None`).
    pub fn new(options: CompilerOptions, threads: Option<usize>) -> Result<Self> {
        let threads = threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(2)
        });
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("tsf-worker-{index}"))
            .build()?;
        Ok(Compiler {
            pool: Arc::new(pool),
            shared: Arc::new(CompilerShared {
                options,
                results: Mutex::new(Vec::new()),
                scheduled: Mutex::new(FxHashSet::default()),
                pending: Mutex::new(0),
                done: Condvar::new(),
                shutdown: AtomicBool::new(false),
            }),
        })
    }

    /// Parse `files` and the transitive set of modules they reference.
    /// Results appear in completion order.
    pub fn compile(&self, files: &[PathBuf]) -> Vec<CompilationUnit> {
        for file in files {
            schedule(&self.shared, &self.pool, file.clone());
        }
        // Block until the pending counter drains: sleep exactly while jobs
        // are outstanding, wake when the last one finishes.
        let mut pending = self
            .shared
            .pending
            .lock()
            .expect("pending counter lock poisoned");
        while *pending > 0 {
            pending = self
                .shared
                .done
                .wait(pending)
                .expect("pending counter lock poisoned");
        }
        drop(pending);
        std::mem::take(
            &mut *self
                .shared
                .results
                .lock()
                .expect("results lock poisoned"),
        )
    }

    /// Ask workers to stop picking up new jobs. In-progress jobs run to
    /// completion.
    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::Relaxed);
    }
}

/// Schedule a parse job for `path` unless it was scheduled before.
fn schedule(shared: &Arc<CompilerShared>, pool: &Arc<rayon::ThreadPool>, path: PathBuf) {
    if shared.shutdown.load(Ordering::Relaxed) {
        return;
    }
    let resolved = normalize_path(&path);
    {
        let mut scheduled = shared
            .scheduled
            .lock()
            .expect("scheduled set lock poisoned");
        if !scheduled.insert(resolved.clone()) {
            return;
        }
    }
    {
        let mut pending = shared.pending.lock().expect("pending counter lock poisoned");
        *pending += 1;
    }
    let shared = Arc::clone(shared);
    let pool_for_job = Arc::clone(pool);
    let pool_spawn = Arc::clone(pool);
    pool_spawn.spawn(move || {
        if shared.shutdown.load(Ordering::Relaxed) {
            debug!(path = %resolved.display(), "skipped after shutdown");
        } else {
            run_job(&shared, &pool_for_job, resolved);
        }
        let mut pending = shared.pending.lock().expect("pending counter lock poisoned");
        *pending -= 1;
        if *pending == 0 {
            shared.done.notify_all();
        }
    });
}

/// Parse one module and record its compilation unit.
fn run_job(shared: &Arc<CompilerShared>, pool: &Arc<rayon::ThreadPool>, path: PathBuf) {
    debug!(path = %path.display(), "parsing");
    let module = ModuleInfo::new(path.clone());
    let source = match SourceStream::from_file(&path) {
        Ok(source) => source,
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to open source");
            let unit = CompilationUnit::Failed {
                module,
                error: error.to_string(),
            };
            shared
                .results
                .lock()
                .expect("results lock poisoned")
                .push(unit);
            return;
        }
    };

    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut scanner = Scanner::new(&source, shared.options);
    {
        let shared = Arc::clone(shared);
        let pool = Arc::clone(pool);
        let directory = directory.clone();
        scanner.set_reference_path_callback(Box::new(move |reference| {
            schedule(&shared, &pool, resolve_reference(&directory, reference));
        }));
    }

    let mut parser = Parser::new(scanner, shared.options, module.is_declaration_file);
    {
        let shared = Arc::clone(shared);
        let pool = Arc::clone(pool);
        parser.set_module_found_callback(Box::new(move |specifier| {
            schedule(&shared, &pool, resolve_reference(&directory, specifier));
        }));
    }

    let root = parser.parse().ok();
    let output = parser.into_output(root);
    debug!(
        path = %path.display(),
        nodes = output.arena.len(),
        diagnostics = output.diagnostics.len(),
        "parsed"
    );
    let unit = CompilationUnit::Parsed {
        module,
        source,
        output,
    };
    shared
        .results
        .lock()
        .expect("results lock poisoned")
        .push(unit);
}

/// Resolve a reference-path / import specifier against the referencing
/// module's directory. A specifier without a recognised extension gets
/// `.ts` appended.
#[must_use]
pub fn resolve_reference(directory: &Path, specifier: &str) -> PathBuf {
    let mut resolved = directory.join(specifier);
    let has_ts_extension = resolved
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".ts"));
    if !has_ts_extension {
        let mut name = resolved
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        name.push_str(".ts");
        resolved.set_file_name(name);
    }
    normalize_path(&resolved)
}

/// Lexically normalize a path: fold `.` and `..` components without
/// touching the filesystem, so unopened files still deduplicate.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
