//! `acme-build resolve` command

use anyhow::{Context, Result};

use crate::cli::ResolveArgs;
use acme_build::ops::resolve_config;
use acme_build::resolver::{host_platform_id, CMakeVersionQuery};

pub fn execute(args: ResolveArgs) -> Result<()> {
    let project_root = super::project_root(args.project)?;
    let platform_id = args.platform.unwrap_or_else(host_platform_id);

    let config = resolve_config(&project_root, &platform_id, CMakeVersionQuery::new())?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&config).context("failed to serialize build config")?;
        println!("{}", json);
        return Ok(());
    }

    println!("platform                 {}", platform_id);
    println!("debug                    {}", config.debug());
    println!("dynamic                  {}", config.dynamic());
    println!("executable               {}", config.executable());
    println!("use_alternate_generator  {}", config.use_alternate_generator());
    println!("parallel_flag            {:?}", config.parallel_flag());
    println!("quiet_flag               {:?}", config.quiet_flag());

    Ok(())
}
