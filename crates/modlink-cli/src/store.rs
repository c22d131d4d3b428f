//! Storage of modules and fragments
//!
//! [`ModuleStore`] exposes the two insert-returning-id operations the upload
//! needs. [`PgStore`] writes through one PostgreSQL transaction,
//! [`MemoryStore`] keeps rows in memory for dry runs and tests.

use crate::error::Result;
use async_trait::async_trait;
use modlink_common::Module;
use sqlx::{PgPool, Postgres, Transaction};

const INSERT_MODULE_SQL: &str = r#"
    INSERT INTO "module" ("ModuleDescription", "SubscriptionPlanId", "ModuleName")
    VALUES ($1, $2, $3)
    RETURNING "Id"
"#;

const INSERT_FRAGMENT_SQL: &str = r#"
    INSERT INTO "resource" ("ModuleId", "Content", "NextResourceId")
    VALUES ($1, $2, $3)
    RETURNING "Id"
"#;

/// Insert-only persistence for modules and their fragments
#[async_trait]
pub trait ModuleStore: Send {
    /// Insert a module row and return its generated id
    async fn insert_module(&mut self, module: &Module) -> Result<i32>;

    /// Insert a fragment row pointing at `successor_id` and return its generated id
    async fn insert_fragment(
        &mut self,
        module_id: i32,
        content: &str,
        successor_id: Option<i32>,
    ) -> Result<i32>;
}

/// PostgreSQL store bound to a single transaction
///
/// Nothing is visible to other sessions until [`PgStore::commit`]. Dropping
/// the store without committing rolls every insert back.
pub struct PgStore {
    tx: Transaction<'static, Postgres>,
}

impl PgStore {
    pub async fn begin(pool: &PgPool) -> Result<Self> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ModuleStore for PgStore {
    async fn insert_module(&mut self, module: &Module) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(INSERT_MODULE_SQL)
            .bind(&module.description)
            .bind(module.plan_id())
            .bind(&module.name)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(id)
    }

    async fn insert_fragment(
        &mut self,
        module_id: i32,
        content: &str,
        successor_id: Option<i32>,
    ) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(INSERT_FRAGMENT_SQL)
            .bind(module_id)
            .bind(content)
            .bind(successor_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(id)
    }
}

/// Module row held by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredModule {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub subscription_plan_id: i32,
}

/// Fragment row held by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFragment {
    pub id: i32,
    pub module_id: i32,
    pub content: String,
    pub successor_id: Option<i32>,
}

/// In-memory store with sequential ids starting at 1
#[derive(Debug, Default)]
pub struct MemoryStore {
    modules: Vec<StoredModule>,
    fragments: Vec<StoredFragment>,
    next_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modules(&self) -> &[StoredModule] {
        &self.modules
    }

    pub fn fragments(&self) -> &[StoredFragment] {
        &self.fragments
    }

    pub fn fragment(&self, id: i32) -> Option<&StoredFragment> {
        self.fragments.iter().find(|f| f.id == id)
    }

    /// Follow successor ids from `head`.
    ///
    /// Stops at a dangling id, and after visiting every row once so a cycle
    /// cannot loop forever.
    pub fn chain(&self, head: i32) -> Vec<&StoredFragment> {
        let mut chain = Vec::new();
        let mut cursor = Some(head);
        while let Some(id) = cursor {
            if chain.len() > self.fragments.len() {
                break;
            }
            let Some(fragment) = self.fragment(id) else {
                break;
            };
            chain.push(fragment);
            cursor = fragment.successor_id;
        }
        chain
    }

    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[async_trait]
impl ModuleStore for MemoryStore {
    async fn insert_module(&mut self, module: &Module) -> Result<i32> {
        let id = self.allocate_id();
        self.modules.push(StoredModule {
            id,
            name: module.name.clone(),
            description: module.description.clone(),
            subscription_plan_id: module.plan_id(),
        });
        Ok(id)
    }

    async fn insert_fragment(
        &mut self,
        module_id: i32,
        content: &str,
        successor_id: Option<i32>,
    ) -> Result<i32> {
        let id = self.allocate_id();
        self.fragments.push(StoredFragment {
            id,
            module_id,
            content: content.to_string(),
            successor_id,
        });
        Ok(id)
    }
}
