// ── Native library resolution ─────────────────────────────────────────────────
//
// Finds the pre-built rasterizer for the running platform and loads it at
// most once per coordinator; `global()` is the one coordinator shared by the
// whole process.  Strategy order:
//   1. the artifact embedded in the crate (`resource`), extracted to a temp file
//   2. a loose artifact in a development tree above the search roots (`search`)
// If both fail the call returns `LoadError::Unresolved` and a later call
// retries from scratch.
//
// Callers are serialised by one mutex.  The first caller to succeed stores the
// module; everyone after it gets the same `Arc` without touching the disk.

pub(crate) mod cleanup;
pub mod descriptor;
pub mod platform_tag;
pub mod resource;
pub mod search;

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use tracing::info;

pub use cleanup::purge_temporary_artifacts;
pub use descriptor::LibraryDescriptor;
pub use platform_tag::{identify, Arch, Os, PlatformTag};
pub use resource::{EmbeddedResources, ResourceStore};

use crate::{
    config::LoaderConfig,
    error::{LoadError, Result},
    platform::{self, Library},
};

// ── Dynamic-load primitive ────────────────────────────────────────────────────

/// Maps a binary artifact into the process.
pub trait DynamicLoader: Send + Sync {
    /// Handle that keeps the artifact mapped while it is alive.
    type Module: Send + Sync + 'static;

    fn load(&self, path: &Path) -> Result<Self::Module>;
}

/// The host OS loader (`LoadLibraryW` / `dlopen`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLoader;

impl DynamicLoader for SystemLoader {
    type Module = Library;

    fn load(&self, path: &Path) -> Result<Library> {
        Library::open(path)
    }
}

// ── LoadCoordinator ───────────────────────────────────────────────────────────

/// Resolves and loads the native library once, no matter how many callers
/// race for it.
///
/// The state is `None` (not loaded) until a strategy succeeds, then `Some`
/// forever.  There is no way to reset it.
///
/// The guarantee is per coordinator.  Only [`global`] (configured through
/// [`init`]) is shared by the whole process; a coordinator built with `new`
/// around the [`SystemLoader`] maps its own copy of the library.  Build one
/// directly only with injected collaborators, e.g. in tests.
#[derive(Debug)]
pub struct LoadCoordinator<
    L: DynamicLoader = SystemLoader,
    R: ResourceStore = EmbeddedResources,
> {
    config: LoaderConfig,
    resources: R,
    loader: L,
    /// Fixed platform, or `None` to identify the host on every attempt.
    platform: Option<PlatformTag>,
    state: Mutex<Option<Arc<L::Module>>>,
}

impl<L: DynamicLoader, R: ResourceStore> LoadCoordinator<L, R> {
    pub fn new(config: LoaderConfig, resources: R, loader: L) -> Self {
        Self {
            config,
            resources,
            loader,
            platform: None,
            state: Mutex::new(None),
        }
    }

    /// Resolve artifacts for `tag` instead of the host platform.
    pub fn with_platform(mut self, tag: PlatformTag) -> Self {
        self.platform = Some(tag);
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the native library unless a previous call already did.
    ///
    /// Blocks while another thread is loading.  Returns the shared module
    /// handle, or `LoadError::Unresolved` naming the platform tag when
    /// neither strategy produced a loadable artifact.
    pub fn ensure_loaded(&self) -> Result<Arc<L::Module>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(module) = state.as_ref() {
            return Ok(Arc::clone(module));
        }

        let tag = self.platform.unwrap_or_else(identify);
        let descriptor = LibraryDescriptor::describe(tag, &self.config.base_name);

        let module = resource::try_load_from_resource(
            &self.resources,
            &self.loader,
            &descriptor,
            &self.config.temp_dir(),
        )
        .or_else(|| {
            search::try_load_from_filesystem(
                &self.loader,
                &descriptor,
                &self.search_roots(),
                self.config.max_ancestor_depth,
            )
        });

        let Some(module) = module else {
            return Err(LoadError::Unresolved { tag });
        };

        info!(platform = %tag, file = %descriptor.filename, "native library loaded");
        let module = Arc::new(module);
        *state = Some(Arc::clone(&module));
        Ok(module)
    }

    pub fn is_loaded(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Configured roots, or the executable's directory when none are set.
    fn search_roots(&self) -> Vec<PathBuf> {
        if !self.config.search_roots.is_empty() {
            return self.config.search_roots.clone();
        }
        platform::executable_dir().into_iter().collect()
    }
}

// ── Process-wide coordinator ──────────────────────────────────────────────────

static GLOBAL: OnceLock<LoadCoordinator> = OnceLock::new();

fn system_coordinator(config: LoaderConfig) -> LoadCoordinator {
    LoadCoordinator::new(config, EmbeddedResources::new(), SystemLoader)
}

/// Configure the process-wide coordinator.
///
/// Succeeds only if nothing has touched [`global`] yet; otherwise the
/// coordinator already exists with its own configuration and `config` is
/// handed back unused.
pub fn init(
    config: LoaderConfig,
) -> std::result::Result<&'static LoadCoordinator, LoaderConfig> {
    let mut pending = Some(config);
    let coordinator = GLOBAL.get_or_init(|| {
        system_coordinator(pending.take().unwrap_or_else(LoaderConfig::from_env))
    });
    match pending {
        None => Ok(coordinator),
        Some(config) => Err(config),
    }
}

/// The process-wide coordinator: embedded artifacts, the OS loader, and the
/// configuration given to [`init`], or from `VECTORCANVAS_LOADER_CONFIG`
/// when `init` was never called.
pub fn global() -> &'static LoadCoordinator {
    GLOBAL.get_or_init(|| system_coordinator(LoaderConfig::from_env()))
}

/// Load the native rasterizer for this process, at most once.
pub fn ensure_loaded() -> Result<Arc<Library>> {
    global().ensure_loaded()
}
