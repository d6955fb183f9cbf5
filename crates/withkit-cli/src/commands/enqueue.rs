//! Dry run of the host registration phases

use super::{check_format, load_config};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use withkit_asset::FsStore;
use withkit_enqueue::{EnqueueCall, HookPhase, RecordingSink, Registrar, RequestContext};

#[derive(Serialize)]
struct PhaseCalls {
    phase: HookPhase,
    calls: Vec<EnqueueCall>,
}

pub fn run(config_path: &Path, admin: bool, editor: bool, format: &str) -> Result<()> {
    check_format(format)?;
    let config = load_config(config_path, None)?;

    let store = FsStore::new(&config.theme.override_root, &config.theme.base_root);
    let registrar = Registrar::from_config(store, &config);
    let ctx = RequestContext {
        is_admin: admin || editor,
        is_block_editor: editor,
    };

    let phases: Vec<PhaseCalls> = HookPhase::ALL
        .iter()
        .map(|&phase| {
            let mut sink = RecordingSink::new();
            registrar.run_phase(phase, &ctx, &mut sink);
            PhaseCalls {
                phase,
                calls: sink.calls,
            }
        })
        .collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&phases)?);
        return Ok(());
    }

    for PhaseCalls { phase, calls } in &phases {
        println!("[{}] {} call(s)", phase, calls.len());
        for call in calls {
            println!("  {}", describe(call));
        }
    }
    Ok(())
}

fn describe(call: &EnqueueCall) -> String {
    match call {
        EnqueueCall::Style {
            handle,
            uri,
            dependencies,
            version,
        } => format!("style {} {} deps=[{}] ver={}", handle, uri, dependencies.join(","), version),
        EnqueueCall::Script {
            handle,
            uri,
            dependencies,
            version,
            in_footer,
        } => format!(
            "script {} {} deps=[{}] ver={}{}",
            handle,
            uri,
            dependencies.join(","),
            version,
            if *in_footer { " (footer)" } else { "" }
        ),
        EnqueueCall::BlockStyleVariant { block_name, asset } => format!(
            "block stylesheet {} {} {} ver={}",
            block_name, asset.handle, asset.uri, asset.version
        ),
        EnqueueCall::PatternCategory { slug, category } => {
            format!("pattern category {} \"{}\"", slug, category.label)
        }
        EnqueueCall::BlockStyle {
            block_type,
            variation,
        } => format!(
            "block style {} {} \"{}\" style={}",
            block_type, variation.name, variation.label, variation.style_handle
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use withkit_asset::Version;
    use withkit_enqueue::BlockStyleAsset;

    #[test]
    fn test_describe_footer_script() {
        let call = EnqueueCall::Script {
            handle: "withkit-starter-global-script".into(),
            uri: "/t/build/js/global.js".into(),
            dependencies: vec!["wp-i18n".into(), "jquery".into()],
            version: Version::Token("abc".into()),
            in_footer: true,
        };
        assert_eq!(
            describe(&call),
            "script withkit-starter-global-script /t/build/js/global.js deps=[wp-i18n,jquery] ver=abc (footer)"
        );
    }

    #[test]
    fn test_describe_block_stylesheet() {
        let call = EnqueueCall::BlockStyleVariant {
            block_name: "core/paragraph".into(),
            asset: BlockStyleAsset {
                handle: "withkit-starter-core-paragraph-style".into(),
                uri: "/t/build/css/blocks/core-paragraph.css".into(),
                version: Version::Modified(1700000000),
            },
        };
        assert!(describe(&call).starts_with("block stylesheet core/paragraph withkit-starter-core-paragraph-style"));
        assert!(describe(&call).ends_with("ver=1700000000"));
    }
}
