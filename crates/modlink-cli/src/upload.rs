//! Upload orchestration
//!
//! discover → order → load descriptor → insert module → link fragments.
//!
//! The file-side half ([`prepare`]) finishes before the first statement is
//! sent, so descriptor and I/O errors never leave rows behind. The storage
//! half ([`persist`]) stops at the first failed insert and compensates
//! nothing itself; atomicity comes from the store (see [`PgStore`]).
//!
//! [`PgStore`]: crate::store::PgStore

use crate::descriptor;
use crate::discovery::{self, DiscoveryPolicy};
use crate::error::Result;
use crate::linkage;
use crate::progress::Reporter;
use crate::store::ModuleStore;
use modlink_common::{FragmentChain, Module, DEFAULT_SUBSCRIPTION_PLAN_ID};
use std::path::{Path, PathBuf};

/// What to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Directory holding the content fragments
    pub root: PathBuf,

    /// Directory searched for the descriptor, defaults to `root`
    pub metadata_dir: Option<PathBuf>,

    pub subscription_plan_id: i32,

    pub discovery: DiscoveryPolicy,
}

impl UploadRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            metadata_dir: None,
            subscription_plan_id: DEFAULT_SUBSCRIPTION_PLAN_ID,
            discovery: DiscoveryPolicy::default(),
        }
    }

    pub fn with_metadata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.metadata_dir = Some(dir.into());
        self
    }

    pub fn with_subscription_plan(mut self, id: i32) -> Self {
        self.subscription_plan_id = id;
        self
    }

    pub fn with_discovery(mut self, policy: DiscoveryPolicy) -> Self {
        self.discovery = policy;
        self
    }

    pub fn metadata_dir(&self) -> &Path {
        self.metadata_dir.as_deref().unwrap_or(&self.root)
    }
}

/// Validated module and ordered fragments, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUpload {
    pub module: Module,
    pub chain: FragmentChain,
}

/// Outcome of a persisted upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Module as persisted, with `head_fragment_id` filled in
    pub module: Module,
    pub module_id: i32,

    /// Fragment ids in chain order
    pub fragment_ids: Vec<i32>,

    /// Fragment names in chain order
    pub fragment_names: Vec<String>,
}

impl UploadReport {
    pub fn head_fragment_id(&self) -> Option<i32> {
        self.module.head_fragment_id
    }
}

/// Discover, order and validate everything that comes from disk
pub fn prepare(request: &UploadRequest, reporter: &Reporter) -> Result<PreparedUpload> {
    reporter.step(format!("Collecting fragments in {}", request.root.display()));
    let fragments = discovery::discover_fragments(&request.root, request.discovery)?;

    let chain = FragmentChain::from_unordered(fragments);
    reporter.step(format!("Ordered {} fragment(s)", chain.len()));
    for fragment in &chain {
        reporter.detail(&fragment.name);
    }

    let metadata_dir = request.metadata_dir();
    reporter.step(format!("Reading module descriptor in {}", metadata_dir.display()));
    let mut module = descriptor::load_module(metadata_dir)?;
    module.subscription_plan_id = Some(request.subscription_plan_id);
    reporter.detail(format!("name: {}", module.name));
    reporter.detail(format!("description: {}", module.description));

    if chain.is_empty() {
        tracing::warn!(root = %request.root.display(), "Module has no fragments");
    }

    Ok(PreparedUpload { module, chain })
}

/// Insert the module, then its fragments linked tail first
#[tracing::instrument(skip_all, fields(module = %prepared.module.name))]
pub async fn persist<S>(store: &mut S, prepared: PreparedUpload, reporter: &Reporter) -> Result<UploadReport>
where
    S: ModuleStore + ?Sized,
{
    let PreparedUpload { mut module, chain } = prepared;

    let module_id = store.insert_module(&module).await?;
    reporter.step(format!("Recorded module '{}' with id {}", module.name, module_id));
    tracing::info!(module_id, plan = module.plan_id(), "Module persisted");

    let fragment_ids = linkage::link_fragments(store, module_id, &chain).await?;
    module.head_fragment_id = fragment_ids.first().copied();
    reporter.step(format!("Recorded {} fragment(s)", fragment_ids.len()));
    tracing::info!(module_id, fragments = fragment_ids.len(), head = ?module.head_fragment_id, "Fragments linked");

    Ok(UploadReport {
        module,
        module_id,
        fragment_ids,
        fragment_names: chain.into_fragments().into_iter().map(|f| f.name).collect(),
    })
}

/// Run the whole upload against `store`
pub async fn upload<S>(store: &mut S, request: &UploadRequest, reporter: &Reporter) -> Result<UploadReport>
where
    S: ModuleStore + ?Sized,
{
    let prepared = prepare(request, reporter)?;
    persist(store, prepared, reporter).await
}
