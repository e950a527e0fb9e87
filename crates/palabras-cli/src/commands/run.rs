//! The `palabras run` command: generate, judge, summarize.

use anyhow::Result;

use super::CommonArgs;

pub async fn execute(common: CommonArgs) -> Result<()> {
    super::generate::execute(common.clone()).await?;
    super::judge::execute(common.clone()).await?;
    super::summarize::execute(common)
}
