//! Asset resolution lookup

use super::{check_format, load_config};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use withkit_asset::{FsStore, ManifestResolver, ResolvedAsset, ThemeUris};

#[derive(Serialize)]
struct Resolution<'a> {
    #[serde(flatten)]
    asset: &'a ResolvedAsset,
    uri: String,
}

pub fn run(config_path: &Path, relative: &str, format: &str) -> Result<()> {
    check_format(format)?;
    let config = load_config(config_path, None)?;

    let resolver = ManifestResolver::new(FsStore::new(
        &config.theme.override_root,
        &config.theme.base_root,
    ));
    let uris = ThemeUris::new(&config.theme.override_uri, &config.theme.base_uri);
    let asset = resolver.resolve(relative);
    let resolution = Resolution {
        uri: resolver.uri(relative, &uris),
        asset: &asset,
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    println!("Asset: {}", asset.relative);
    match (&asset.tier, &asset.path) {
        (Some(tier), Some(path)) => println!("  Tier: {} ({})", tier, path.display()),
        _ => println!("  Tier: none (missing from both themes)"),
    }
    println!("  URI: {}", resolution.uri);
    println!("  Version: {}", asset.version);
    if asset.dependencies.is_empty() {
        println!("  Dependencies: none");
    } else {
        println!("  Dependencies: {}", asset.dependencies.join(", "));
    }
    Ok(())
}
