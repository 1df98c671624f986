use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct AssemblyEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AssemblyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Reading parts and template...");
        let inputs = self.pipeline.extract().await?;
        let (count_a, count_b) = inputs.parts.counts();
        tracing::info!(
            "Read {} + {} parts and a {}-line template",
            count_a,
            count_b,
            inputs.template.len()
        );

        tracing::info!("Building plate layout and protocol...");
        let artifacts = self.pipeline.transform(inputs).await?;
        match &artifacts.plan {
            Some(plan) => tracing::info!(
                "Laid out {} wells across {} column(s); protocol has {} lines",
                artifacts.layout.len(),
                plan.columns_spanned,
                artifacts.script.len()
            ),
            None => tracing::info!(
                "Laid out {} wells without a source plan; protocol has {} lines",
                artifacts.layout.len(),
                artifacts.script.len()
            ),
        }

        tracing::info!("Saving outputs...");
        let output = self.pipeline.load(artifacts).await?;
        tracing::info!("Outputs saved: {}", output);

        Ok(output)
    }
}
