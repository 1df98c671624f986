use crate::domain::model::{AssemblyArtifacts, AssemblyInputs};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn parts_path(&self) -> &str;
    fn template_path(&self) -> &str;
    fn platemap_path(&self) -> &str;
    fn protocol_path(&self) -> &str;
    fn archive_path(&self) -> Option<&str>;
    fn summary_path(&self) -> Option<&str>;
    fn dry_run(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<AssemblyInputs>;
    async fn transform(&self, inputs: AssemblyInputs) -> Result<AssemblyArtifacts>;
    async fn load(&self, artifacts: AssemblyArtifacts) -> Result<String>;
}
